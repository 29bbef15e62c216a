//! Output materialization.
//!
//! [`Project::build`] writes the output collection to a real directory:
//! `before_build` hooks, an optional prepare transform, directory setup,
//! the writes themselves, then `after_build` hooks. There is no rollback;
//! a failing write aborts and leaves earlier writes on disk.

use super::{HookStage, Project};
use anyhow::{Context, Result};
use educe::Educe;
use std::fs;
use std::path::{Path, PathBuf};

/// A transform applied right before writing, without hook wrapping.
pub type PrepareFn = Box<dyn FnMut(&mut Project) -> Result<()>>;

/// Options controlling [`Project::build`].
#[derive(Educe)]
#[educe(Default)]
pub struct BuildOptions {
    /// Directory the output collection is written into.
    #[educe(Default = PathBuf::from("."))]
    pub output_directory: PathBuf,

    /// Delete files directly inside the output directory before writing.
    ///
    /// Non-recursive: pre-existing subdirectories and their contents are
    /// left untouched.
    pub clear_output_directory: bool,

    /// Optional transform invoked after `before_build` hooks, before any
    /// filesystem work.
    pub prepare: Option<PrepareFn>,
}

impl BuildOptions {
    /// Options writing into `output_directory`.
    pub fn new(output_directory: impl Into<PathBuf>) -> Self {
        Self {
            output_directory: output_directory.into(),
            ..Self::default()
        }
    }

    /// Enable or disable the top-level clear.
    #[must_use]
    pub fn clear(mut self, clear: bool) -> Self {
        self.clear_output_directory = clear;
        self
    }

    /// Set the prepare transform.
    #[must_use]
    pub fn prepare(mut self, prepare: impl FnMut(&mut Project) -> Result<()> + 'static) -> Self {
        self.prepare = Some(Box::new(prepare));
        self
    }
}

impl std::fmt::Debug for BuildOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildOptions")
            .field("output_directory", &self.output_directory)
            .field("clear_output_directory", &self.clear_output_directory)
            .field("prepare", &self.prepare.is_some())
            .finish()
    }
}

impl Project {
    /// Write the output collection to disk.
    ///
    /// Records are written in collection order; a duplicate path writes
    /// twice and the later record wins. Intermediate directories are
    /// created as needed and existing files are overwritten.
    ///
    /// # Errors
    ///
    /// The first filesystem failure aborts the build and propagates;
    /// files already written stay on disk.
    pub fn build(&mut self, mut options: BuildOptions) -> Result<&mut Self> {
        self.run_hooks(HookStage::BeforeBuild);

        if let Some(mut prepare) = options.prepare.take() {
            prepare(self)?;
        }

        let output_directory = &options.output_directory;
        fs::create_dir_all(output_directory).with_context(|| {
            format!("Failed to create output directory {}", output_directory.display())
        })?;

        if options.clear_output_directory {
            clear_top_level_files(output_directory)?;
        }

        let mut written = 0usize;
        for record in self.output.iter() {
            let destination = output_directory.join(record.path());
            if let Some(parent) = destination.parent() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create directory {}", parent.display())
                })?;
            }
            fs::write(&destination, &record.content)
                .with_context(|| format!("Failed to write {}", destination.display()))?;
            written += 1;
        }

        self.logger.info(&format!(
            "build: wrote {written} file(s) to {}",
            output_directory.display()
        ));

        self.run_hooks(HookStage::AfterBuild);
        Ok(self)
    }
}

/// Delete regular files directly inside `dir`.
///
/// Subdirectories are never descended into or removed.
fn clear_top_level_files(dir: &Path) -> Result<()> {
    for entry in
        fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))?
    {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            fs::remove_file(entry.path())
                .with_context(|| format!("Failed to delete {}", entry.path().display()))?;
        }
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::FileRecord;
    use crate::logger::{Level, Logger};
    use std::cell::RefCell;
    use std::rc::Rc;
    use tempfile::TempDir;

    fn quiet_project() -> Project {
        let mut project = Project::new();
        *project.logger_mut() = Logger::new(Level::None);
        project
    }

    #[test]
    fn test_build_writes_output_collection() {
        let out = TempDir::new().unwrap();
        let mut project = quiet_project();
        project
            .add_output_record(FileRecord::new("index.html", "<p>home</p>"))
            .add_output_record(FileRecord::new("posts/a.html", "<p>a</p>"));

        project.build(BuildOptions::new(out.path())).unwrap();

        assert_eq!(
            fs::read_to_string(out.path().join("index.html")).unwrap(),
            "<p>home</p>"
        );
        assert_eq!(
            fs::read_to_string(out.path().join("posts/a.html")).unwrap(),
            "<p>a</p>"
        );
    }

    #[test]
    fn test_build_creates_missing_output_directory() {
        let out = TempDir::new().unwrap();
        let nested = out.path().join("fresh/dir");

        let mut project = quiet_project();
        project.add_output_record(FileRecord::new("a.txt", "x"));
        project.build(BuildOptions::new(&nested)).unwrap();

        assert!(nested.join("a.txt").exists());
    }

    #[test]
    fn test_build_overwrites_existing_files() {
        let out = TempDir::new().unwrap();
        fs::write(out.path().join("a.txt"), "old").unwrap();

        let mut project = quiet_project();
        project.add_output_record(FileRecord::new("a.txt", "new"));
        project.build(BuildOptions::new(out.path())).unwrap();

        assert_eq!(fs::read_to_string(out.path().join("a.txt")).unwrap(), "new");
    }

    #[test]
    fn test_clear_removes_top_level_files_only() {
        let out = TempDir::new().unwrap();
        fs::write(out.path().join("stale.html"), "old").unwrap();
        fs::create_dir_all(out.path().join("Sub")).unwrap();
        fs::write(out.path().join("Sub/kept.html"), "kept").unwrap();

        let mut project = quiet_project();
        project.add_output_record(FileRecord::new("fresh.html", "new"));
        project
            .build(BuildOptions::new(out.path()).clear(true))
            .unwrap();

        assert!(!out.path().join("stale.html").exists());
        assert!(out.path().join("Sub/kept.html").exists());
        assert!(out.path().join("fresh.html").exists());
    }

    #[test]
    fn test_build_without_clear_keeps_existing_files() {
        let out = TempDir::new().unwrap();
        fs::write(out.path().join("keep.txt"), "still here").unwrap();

        let mut project = quiet_project();
        project.add_output_record(FileRecord::new("a.txt", "x"));
        project.build(BuildOptions::new(out.path())).unwrap();

        assert!(out.path().join("keep.txt").exists());
    }

    #[test]
    fn test_build_runs_hooks_and_prepare_in_order() {
        let trace = Rc::new(RefCell::new(Vec::new()));
        let out = TempDir::new().unwrap();

        let mut project = quiet_project();
        let t = Rc::clone(&trace);
        project.before_build(move |_| t.borrow_mut().push("before"));
        let t = Rc::clone(&trace);
        project.after_build(move |_| t.borrow_mut().push("after"));

        let t = Rc::clone(&trace);
        let options = BuildOptions::new(out.path()).prepare(move |_| {
            t.borrow_mut().push("prepare");
            Ok(())
        });
        project.build(options).unwrap();

        assert_eq!(*trace.borrow(), vec!["before", "prepare", "after"]);
    }

    #[test]
    fn test_prepare_transform_can_synthesize_output() {
        let out = TempDir::new().unwrap();
        let mut project = quiet_project();

        let options = BuildOptions::new(out.path()).prepare(|project| {
            project.add_output_record(FileRecord::new("generated.txt", "late"));
            Ok(())
        });
        project.build(options).unwrap();

        assert_eq!(
            fs::read_to_string(out.path().join("generated.txt")).unwrap(),
            "late"
        );
    }

    #[test]
    fn test_duplicate_paths_later_record_wins() {
        let out = TempDir::new().unwrap();
        let mut project = quiet_project();
        project
            .add_output_record(FileRecord::new("a.txt", "first"))
            .add_output_record(FileRecord::new("a.txt", "second"));

        project.build(BuildOptions::new(out.path())).unwrap();
        assert_eq!(
            fs::read_to_string(out.path().join("a.txt")).unwrap(),
            "second"
        );
    }

    #[test]
    fn test_default_options() {
        let options = BuildOptions::default();
        assert_eq!(options.output_directory, PathBuf::from("."));
        assert!(!options.clear_output_directory);
        assert!(options.prepare.is_none());
    }
}
