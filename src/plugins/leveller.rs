//! Directory-depth metadata.
//!
//! For every record in the input and output collections, stores the depth
//! of its directory under the `"level"` metadata key.

use crate::collection::FileCollection;
use crate::plugin::Plugin;
use crate::project::Project;
use crate::value::Value;
use anyhow::Result;

/// Metadata key the leveller writes.
pub const LEVEL_KEY: &str = "level";

/// Plugin computing a `"level"` entry for every record.
///
/// The level is the number of `/`-separated segments in the record's
/// directory string. `.` segments are not counted, and the empty (root)
/// directory counts as one segment — the split-on-slash behavior records
/// at the root share with records one directory deep.
#[derive(Debug, Clone, Copy, Default)]
pub struct Leveller;

impl Plugin for Leveller {
    fn apply(&mut self, project: &mut Project) -> Result<()> {
        level_collection(project.input_mut());
        level_collection(project.output_mut());
        Ok(())
    }
}

/// Stamp every record in one collection.
fn level_collection(collection: &mut FileCollection) {
    for record in collection.iter_mut() {
        let level = directory_depth(record.directory());
        record.set_meta(LEVEL_KEY, Value::Int(level));
    }
}

/// Depth of a directory string.
fn directory_depth(directory: &str) -> i64 {
    directory
        .split('/')
        .filter(|segment| *segment != ".")
        .count() as i64
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::FileRecord;
    use crate::logger::{Level, Logger};

    fn quiet_project() -> Project {
        let mut project = Project::new();
        *project.logger_mut() = Logger::new(Level::None);
        project
    }

    #[test]
    fn test_directory_depth() {
        assert_eq!(directory_depth(""), 1);
        assert_eq!(directory_depth("a"), 1);
        assert_eq!(directory_depth("a/b"), 2);
        assert_eq!(directory_depth("a/b/c"), 3);
    }

    #[test]
    fn test_three_segment_directory_gets_level_three() {
        let mut project = quiet_project();
        project.add_input_record(FileRecord::new("a/b/c/file.md", ""));

        project.use_leveller().unwrap();
        assert_eq!(
            project.input().get(0).unwrap().metadata[LEVEL_KEY],
            Value::Int(3)
        );
    }

    #[test]
    fn test_root_file_gets_level_one() {
        let mut project = quiet_project();
        project.add_input_record(FileRecord::new("file.md", ""));

        project.use_leveller().unwrap();
        assert_eq!(
            project.input().get(0).unwrap().metadata[LEVEL_KEY],
            Value::Int(1)
        );
    }

    #[test]
    fn test_levels_both_collections() {
        let mut project = quiet_project();
        project
            .add_input_record(FileRecord::new("in/a.md", ""))
            .add_output_record(FileRecord::new("out/deep/b.html", ""));

        project.use_leveller().unwrap();
        assert_eq!(
            project.input().get(0).unwrap().metadata[LEVEL_KEY],
            Value::Int(1)
        );
        assert_eq!(
            project.output().get(0).unwrap().metadata[LEVEL_KEY],
            Value::Int(2)
        );
    }

    #[test]
    fn test_rerun_overwrites_level() {
        let mut project = quiet_project();
        project.add_input_record(FileRecord::new("a/file.md", ""));
        project.use_leveller().unwrap();

        project
            .input_mut()
            .iter_mut()
            .next()
            .unwrap()
            .set_directory("a/b/c");
        project.use_leveller().unwrap();

        assert_eq!(
            project.input().get(0).unwrap().metadata[LEVEL_KEY],
            Value::Int(3)
        );
    }
}
