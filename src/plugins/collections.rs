//! Derived groupings over the current file collections.
//!
//! A [`Collections`] pass scans the input and output collections, selects
//! the paths of records matching each group's predicate, and stores the
//! result under the reserved `"collections"` project-metadata key:
//!
//! ```text
//! collections:
//!   posts:
//!     input:  [posts/a.md, posts/b.md]
//!     output: [posts/a.html]
//! ```
//!
//! Repeated passes merge: groups registered earlier under other names
//! survive; re-registering an existing name replaces that name's entry.

use crate::collection::FileCollection;
use crate::file::{FileRecord, normalize_path, split_segments};
use crate::plugin::Plugin;
use crate::project::Project;
use crate::value::{Metadata, Value};
use anyhow::Result;

/// Reserved project-metadata key holding the groupings.
pub const COLLECTIONS_KEY: &str = "collections";

/// A predicate selecting records for one group.
pub type GroupPredicate = Box<dyn Fn(&FileRecord) -> bool>;

/// Plugin building named groupings of record paths.
#[derive(Default)]
pub struct Collections {
    groups: Vec<(String, GroupPredicate)>,
}

impl Collections {
    /// An empty grouping pass.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a named group.
    #[must_use]
    pub fn group(
        mut self,
        name: impl Into<String>,
        predicate: impl Fn(&FileRecord) -> bool + 'static,
    ) -> Self {
        self.groups.push((name.into(), Box::new(predicate)));
        self
    }
}

impl Plugin for Collections {
    fn apply(&mut self, project: &mut Project) -> Result<()> {
        for (name, predicate) in &self.groups {
            let input_paths = matching_paths(project.input(), predicate);
            let output_paths = matching_paths(project.output(), predicate);

            let mut entry = Metadata::new();
            entry.insert("input".to_owned(), Value::List(input_paths));
            entry.insert("output".to_owned(), Value::List(output_paths));

            // Merge into the existing collections map, never replace it
            let collections = project
                .metadata_mut()
                .entry(COLLECTIONS_KEY.to_owned())
                .or_insert_with(|| Value::Map(Metadata::new()));
            if !matches!(collections, Value::Map(_)) {
                *collections = Value::Map(Metadata::new());
            }
            if let Value::Map(map) = collections {
                map.insert(name.clone(), Value::Map(entry));
            }
        }
        Ok(())
    }
}

/// Paths of records matching the predicate, in collection order.
fn matching_paths(collection: &FileCollection, predicate: &GroupPredicate) -> Vec<Value> {
    collection
        .iter()
        .filter(|record| predicate(record))
        .map(|record| Value::from(record.path()))
        .collect()
}

/// Predicate selecting records in `dir` or anywhere below it.
pub fn in_directory(dir: impl Into<String>) -> impl Fn(&FileRecord) -> bool {
    let dir = normalize_path(&dir.into());
    move |record: &FileRecord| {
        let want = split_segments(&dir);
        let have = split_segments(record.directory());
        have.len() >= want.len() && have[..want.len()] == want[..]
    }
}

// ============================================================================
// Tests
// ============================================================================
