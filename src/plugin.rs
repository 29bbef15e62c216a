//! The plugin contract.
//!
//! A plugin is anything that can mutate a [`Project`] in place. Three
//! call-site forms all normalize to the single [`Plugin::apply`]
//! operation:
//!
//! - a bare closure or `fn`, via the blanket impl below;
//! - a stateful value implementing [`Plugin`];
//! - a default-constructed type, via [`Project::use_default`].
//!
//! [`Project::use_default`]: crate::project::Project::use_default

use crate::project::Project;
use anyhow::Result;
use std::rc::Rc;

/// A pipeline transformation step.
///
/// `apply` mutates the project in place; any error aborts the pipeline.
pub trait Plugin {
    fn apply(&mut self, project: &mut Project) -> Result<()>;
}

/// Bare functions and closures are plugins.
impl<F> Plugin for F
where
    F: FnMut(&mut Project) -> Result<()>,
{
    fn apply(&mut self, project: &mut Project) -> Result<()> {
        self(project)
    }
}

/// A registered lifecycle hook.
///
/// Hooks observe pipeline stages; they cannot fail. Stored behind `Rc`
/// so project clones share the callback code.
pub type Hook = Rc<dyn Fn(&mut Project)>;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    struct CountingPlugin {
        runs: u32,
    }

    impl Plugin for CountingPlugin {
        fn apply(&mut self, project: &mut Project) -> Result<()> {
            self.runs += 1;
            project.meta("runs", i64::from(self.runs));
            Ok(())
        }
    }

    #[test]
    fn test_closure_is_a_plugin() {
        let mut project = Project::new();
        let mut step = |project: &mut Project| {
            project.meta("touched", true);
            Ok(())
        };
        step.apply(&mut project).unwrap();
        assert_eq!(project.metadata()["touched"], Value::Bool(true));
    }

    #[test]
    fn test_stateful_plugin_keeps_state_across_runs() {
        let mut project = Project::new();
        let mut plugin = CountingPlugin { runs: 0 };
        plugin.apply(&mut project).unwrap();
        plugin.apply(&mut project).unwrap();
        assert_eq!(project.metadata()["runs"], Value::Int(2));
    }
}
