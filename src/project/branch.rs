//! Branching: independent sub-pipelines over deep copies.
//!
//! Each branch function receives its own structural clone of the project.
//! Clones share no mutable data with the parent or with each other, so a
//! branch may add, remove or rewrite anything without affecting the rest
//! of the pipeline. Branch functions run in listed order; isolation, not
//! ordering, is the contract.

use super::Project;
use anyhow::Result;

/// A sub-pipeline run against one project clone.
pub type BranchFn = Box<dyn FnOnce(&mut Project) -> Result<()>>;

impl Project {
    /// Run each branch function against an independent deep copy.
    ///
    /// The parent project is unaffected by anything a branch does to its
    /// clone. A branch error propagates and skips the remaining branches.
    pub fn branch(&mut self, branches: impl IntoIterator<Item = BranchFn>) -> Result<&mut Self> {
        for (index, run) in branches.into_iter().enumerate() {
            self.logger.debug(&format!("branch: forking sub-pipeline {index}"));
            let mut fork = self.fork();
            run(&mut fork)?;
        }
        Ok(self)
    }

    /// One structural deep copy of the project.
    ///
    /// Metadata values, both collections and every record's metadata are
    /// copied by value; registered hook callbacks are shared as code.
    #[must_use]
    pub fn fork(&self) -> Self {
        self.clone()
    }
}

// ============================================================================
// Tests
// ============================================================================
