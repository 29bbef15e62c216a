//! The project aggregate and its pipeline lifecycle.
//!
//! A [`Project`] owns project-wide metadata, the input and output file
//! collections, lifecycle hooks and a logger. The caller populates the
//! collections with `add_input*` / `add_output*`, chains transformation
//! steps through [`Project::use_plugin`], optionally forks isolated
//! sub-pipelines with [`Project::branch`], and finally materializes the
//! output collection with [`Project::build`].
//!
//! # Pipeline flow
//!
//! ```text
//! add_input() ──► use_plugin() ··· use_plugin() ──► build()
//!      │               │                              │
//!      ▼               ▼                              ▼
//!  frontmatter    before_use /                   before_build /
//!  extraction     after_use hooks                after_build hooks
//! ```
//!
//! Steps execute strictly sequentially; a later plugin observes every
//! mutation made by earlier ones.

mod branch;
mod build;
mod error;

pub use branch::BranchFn;
pub use build::BuildOptions;
pub use error::ProjectError;

use crate::collection::FileCollection;
use crate::file::{FileRecord, normalize_path};
use crate::frontmatter;
use crate::logger::{Level, Logger};
use crate::plugin::{Hook, Plugin};
use crate::plugins::{Collections, Leveller};
use crate::value::{Metadata, Value};
use anyhow::{Context, Result, bail};
use rayon::prelude::*;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use walkdir::WalkDir;

/// Files to ignore during directory traversal
const IGNORED_FILES: &[&str] = &[".DS_Store"];

// ============================================================================
// Configuration and hooks
// ============================================================================

/// Per-project runtime settings.
#[derive(Debug, Clone, Default)]
pub struct ProjectConfig {
    /// Minimum level the logger's filtered channel reports at.
    pub log_threshold: Level,
}

/// The four lifecycle hook lists, each invoked in registration order.
#[derive(Clone, Default)]
struct Hooks {
    before_use: Vec<Hook>,
    after_use: Vec<Hook>,
    before_build: Vec<Hook>,
    after_build: Vec<Hook>,
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("before_use", &self.before_use.len())
            .field("after_use", &self.after_use.len())
            .field("before_build", &self.before_build.len())
            .field("after_build", &self.after_build.len())
            .finish()
    }
}

/// Which hook list to dispatch.
#[derive(Clone, Copy)]
enum HookStage {
    BeforeUse,
    AfterUse,
    BeforeBuild,
    AfterBuild,
}

/// Which collection an ingestion call targets.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Target {
    Input,
    Output,
}

// ============================================================================
// Project
// ============================================================================

/// An in-memory virtual file tree plus the machinery to transform it.
///
/// Cloning a project deep-copies all of its data: metadata values, both
/// collections and every record's own metadata. Registered hook callbacks
/// are shared (they are code, not data).
#[derive(Debug, Clone)]
pub struct Project {
    metadata: Metadata,
    input: FileCollection,
    output: FileCollection,
    config: ProjectConfig,
    hooks: Hooks,
    logger: Logger,
}

impl Project {
    /// Create an empty project with default settings.
    pub fn new() -> Self {
        Self::with_config(ProjectConfig::default())
    }

    /// Create an empty project from explicit settings.
    pub fn with_config(config: ProjectConfig) -> Self {
        let logger = Logger::with_terminal(config.log_threshold);
        Self {
            metadata: Metadata::new(),
            input: FileCollection::new(),
            output: FileCollection::new(),
            config,
            hooks: Hooks::default(),
            logger,
        }
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// Project-wide metadata.
    pub const fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Mutable project-wide metadata.
    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    /// The input collection.
    pub const fn input(&self) -> &FileCollection {
        &self.input
    }

    /// The mutable input collection.
    pub fn input_mut(&mut self) -> &mut FileCollection {
        &mut self.input
    }

    /// The output collection.
    pub const fn output(&self) -> &FileCollection {
        &self.output
    }

    /// The mutable output collection.
    pub fn output_mut(&mut self) -> &mut FileCollection {
        &mut self.output
    }

    /// Runtime settings.
    pub const fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// The project logger.
    pub const fn logger(&self) -> &Logger {
        &self.logger
    }

    /// The mutable project logger (for subscribing sinks).
    pub fn logger_mut(&mut self) -> &mut Logger {
        &mut self.logger
    }

    /// Change the logging threshold for both config and logger.
    pub fn set_log_threshold(&mut self, threshold: Level) -> &mut Self {
        self.config.log_threshold = threshold;
        self.logger.set_threshold(threshold);
        self
    }

    /// Insert or overwrite one project-metadata entry.
    pub fn meta(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    // ------------------------------------------------------------------------
    // Ingestion
    // ------------------------------------------------------------------------

    /// Load a file or directory into the input collection.
    ///
    /// The virtual tree mirrors `disk` as given: a directory's files keep
    /// their path relative to it, prefixed by the (normalized) directory
    /// path itself. Every ingested input file passes through frontmatter
    /// extraction before it counts as added.
    ///
    /// # Errors
    ///
    /// [`ProjectError::InvalidPath`] when `disk` is neither an existing
    /// file nor an existing directory; any read failure with context.
    pub fn add_input(&mut self, disk: impl AsRef<Path>) -> Result<&mut Self> {
        self.ingest(disk.as_ref(), None, Target::Input)
    }

    /// Load a file or directory into the input collection under
    /// `virtual_root`.
    ///
    /// A directory is rebased: its prefix is replaced by `virtual_root`,
    /// relative structure preserved. A single file lands directly under
    /// `virtual_root`.
    pub fn add_input_as(
        &mut self,
        disk: impl AsRef<Path>,
        virtual_root: impl AsRef<str>,
    ) -> Result<&mut Self> {
        self.ingest(disk.as_ref(), Some(virtual_root.as_ref()), Target::Input)
    }

    /// Load a file or directory into the output collection.
    ///
    /// Identical to [`Project::add_input`] except the raw text is kept
    /// as-is: frontmatter extraction never touches the output collection.
    pub fn add_output(&mut self, disk: impl AsRef<Path>) -> Result<&mut Self> {
        self.ingest(disk.as_ref(), None, Target::Output)
    }

    /// Load a file or directory into the output collection under
    /// `virtual_root`, without frontmatter extraction.
    pub fn add_output_as(
        &mut self,
        disk: impl AsRef<Path>,
        virtual_root: impl AsRef<str>,
    ) -> Result<&mut Self> {
        self.ingest(disk.as_ref(), Some(virtual_root.as_ref()), Target::Output)
    }

    /// Add a pre-built record to the input collection.
    ///
    /// No disk I/O and no frontmatter extraction: extraction is a property
    /// of disk ingestion, not of record construction.
    pub fn add_input_record(&mut self, record: FileRecord) -> &mut Self {
        self.input.add(record);
        self
    }

    /// Add a pre-built record to the output collection.
    pub fn add_output_record(&mut self, record: FileRecord) -> &mut Self {
        self.output.add(record);
        self
    }

    /// Shared ingestion path for files and directories.
    fn ingest(&mut self, disk: &Path, virtual_root: Option<&str>, target: Target) -> Result<&mut Self> {
        let loaded = if disk.is_file() {
            let virtual_path = match virtual_root {
                Some(root) => join_virtual(&normalize_path(root), file_name_of(disk)),
                None => normalize_path(&disk.to_string_lossy()),
            };
            let content = fs::read_to_string(disk)
                .with_context(|| format!("Failed to read {}", disk.display()))?;
            vec![(virtual_path, content)]
        } else if disk.is_dir() {
            let root = match virtual_root {
                Some(root) => normalize_path(root),
                None => normalize_path(&disk.to_string_lossy()),
            };
            let entries = collect_files(disk, &root);

            // Bulk-read in parallel; collect() keeps walk order
            entries
                .par_iter()
                .map(|(path, virtual_path)| {
                    let content = fs::read_to_string(path)
                        .with_context(|| format!("Failed to read {}", path.display()))?;
                    Ok((virtual_path.clone(), content))
                })
                .collect::<Result<Vec<_>>>()?
        } else {
            bail!(ProjectError::InvalidPath(disk.to_path_buf()));
        };

        let count = loaded.len();
        for (virtual_path, content) in loaded {
            let mut record = FileRecord::new(virtual_path, content);
            if target == Target::Input {
                frontmatter::apply(&mut record);
            }
            match target {
                Target::Input => self.input.add(record),
                Target::Output => self.output.add(record),
            }
        }

        let collection = match target {
            Target::Input => "input",
            Target::Output => "output",
        };
        self.logger.debug(&format!(
            "added {count} {collection} file(s) from {}",
            disk.display()
        ));
        Ok(self)
    }

    // ------------------------------------------------------------------------
    // Removal and moves
    // ------------------------------------------------------------------------

    /// Remove input records whose path equals `path` exactly.
    ///
    /// Returns the count removed (duplicates are all removed).
    pub fn remove_input(&mut self, path: impl AsRef<str>) -> usize {
        let path = normalize_path(path.as_ref());
        self.input.remove_all(|record| record.path() == path)
    }

    /// Remove output records whose path equals `path` exactly.
    pub fn remove_output(&mut self, path: impl AsRef<str>) -> usize {
        let path = normalize_path(path.as_ref());
        self.output.remove_all(|record| record.path() == path)
    }

    /// Move input records from one directory to another.
    ///
    /// Every record in `from` or below has that directory prefix replaced
    /// by `to`; names and extensions survive. Returns the count moved.
    pub fn move_input(&mut self, from: impl AsRef<str>, to: impl AsRef<str>) -> usize {
        move_records(&mut self.input, from.as_ref(), to.as_ref())
    }

    /// Move output records from one directory to another.
    pub fn move_output(&mut self, from: impl AsRef<str>, to: impl AsRef<str>) -> usize {
        move_records(&mut self.output, from.as_ref(), to.as_ref())
    }

    // ------------------------------------------------------------------------
    // Pipeline
    // ------------------------------------------------------------------------

    /// Apply one transformation step.
    ///
    /// Invokes `before_use` hooks, the plugin, then `after_use` hooks, and
    /// returns the same project for chaining. A plugin error aborts the
    /// chain; hooks around the failing plugin's `after_use` stage do not
    /// run.
    pub fn use_plugin(&mut self, mut plugin: impl Plugin) -> Result<&mut Self> {
        self.run_hooks(HookStage::BeforeUse);
        plugin.apply(self)?;
        self.run_hooks(HookStage::AfterUse);
        Ok(self)
    }

    /// Apply a default-constructed plugin type.
    pub fn use_default<P: Plugin + Default>(&mut self) -> Result<&mut Self> {
        self.use_plugin(P::default())
    }

    /// Apply a [`Collections`] grouping pass.
    pub fn use_collections(&mut self, collections: Collections) -> Result<&mut Self> {
        self.use_plugin(collections)
    }

    /// Apply the [`Leveller`] directory-depth pass.
    pub fn use_leveller(&mut self) -> Result<&mut Self> {
        self.use_default::<Leveller>()
    }

    /// Register a hook running before every plugin.
    pub fn before_use(&mut self, hook: impl Fn(&mut Self) + 'static) -> &mut Self {
        self.hooks.before_use.push(Rc::new(hook));
        self
    }

    /// Register a hook running after every plugin.
    pub fn after_use(&mut self, hook: impl Fn(&mut Self) + 'static) -> &mut Self {
        self.hooks.after_use.push(Rc::new(hook));
        self
    }

    /// Register a hook running before a build.
    pub fn before_build(&mut self, hook: impl Fn(&mut Self) + 'static) -> &mut Self {
        self.hooks.before_build.push(Rc::new(hook));
        self
    }

    /// Register a hook running after a build.
    pub fn after_build(&mut self, hook: impl Fn(&mut Self) + 'static) -> &mut Self {
        self.hooks.after_build.push(Rc::new(hook));
        self
    }

    /// Dispatch one hook list in registration order.
    ///
    /// The list is snapshotted first so hooks may register further hooks
    /// without invalidating the iteration.
    fn run_hooks(&mut self, stage: HookStage) {
        let hooks: Vec<Hook> = match stage {
            HookStage::BeforeUse => self.hooks.before_use.clone(),
            HookStage::AfterUse => self.hooks.after_use.clone(),
            HookStage::BeforeBuild => self.hooks.before_build.clone(),
            HookStage::AfterBuild => self.hooks.after_build.clone(),
        };
        for hook in hooks {
            hook(self);
        }
    }

}

impl Default for Project {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Ingestion helpers
// ============================================================================

/// Last path component of a disk path, lossily decoded.
fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Join a virtual root and a relative path, skipping the separator when
/// either side is empty.
fn join_virtual(root: &str, relative: impl AsRef<str>) -> String {
    let relative = relative.as_ref();
    if root.is_empty() {
        relative.to_owned()
    } else if relative.is_empty() {
        root.to_owned()
    } else {
        format!("{root}/{relative}")
    }
}

/// Recursively collect files under `dir`, paired with their virtual paths.
///
/// Walk order is made deterministic by file-name sorting so insertion
/// order is stable across runs.
fn collect_files(dir: &Path, virtual_root: &str) -> Vec<(PathBuf, String)> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            let name = entry.file_name().to_str().unwrap_or_default();
            !IGNORED_FILES.contains(&name)
        })
        .map(|entry| {
            let relative = entry
                .path()
                .strip_prefix(dir)
                .unwrap_or(entry.path())
                .to_string_lossy()
                .into_owned();
            let virtual_path = join_virtual(virtual_root, normalize_path(&relative));
            (entry.into_path(), virtual_path)
        })
        .collect()
}

/// Rewrite the directory prefix of matching records.
fn move_records(collection: &mut FileCollection, from: &str, to: &str) -> usize {
    let from = normalize_path(from);
    let to = normalize_path(to);
    let from_len = crate::file::split_segments(&from).len();

    let mut moved = 0;
    for record in collection.iter_mut() {
        let dir = record.directory().to_owned();
        let have = crate::file::split_segments(&dir);
        let from_segments = crate::file::split_segments(&from);
        if have.len() >= from_len && have[..from_len] == from_segments[..] {
            let rest = have[from_len..].join("/");
            record.set_directory(join_virtual(&to, rest));
            moved += 1;
        }
    }
    moved
}

// ============================================================================
// Tests
// ============================================================================
