//! Kiln - a pipeline-based static content transformation engine.
//!
//! Kiln holds an in-memory virtual file tree - an input and an output
//! collection, each a set of files with key/value metadata - applies a
//! sequence of transformation plugins to it, and finally writes the
//! output collection to a real filesystem.
//!
//! # Example
//!
//! ```no_run
//! use kiln::{BuildOptions, Project};
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut project = Project::new();
//!     project.add_input_as("content", "")?;
//!     project.use_leveller()?;
//!     project.use_plugin(|p: &mut Project| {
//!         // Pass every input record through to the output collection
//!         let pages: Vec<_> = p.input().iter().cloned().collect();
//!         for page in pages {
//!             p.add_output_record(page);
//!         }
//!         Ok(())
//!     })?;
//!     project.build(BuildOptions::new("public"))?;
//!     Ok(())
//! }
//! ```
//!
//! Frontmatter (YAML between `---` lines, or JSON between `;;;` lines) is
//! extracted exactly once, when a file is ingested into the input
//! collection from disk. Plugins run strictly sequentially;
//! [`Project::branch`] forks deep copies for independent sub-pipelines.

pub mod cli;
pub mod collection;
pub mod config;
pub mod file;
pub mod frontmatter;
pub mod init;
pub mod logger;
pub mod plugin;
pub mod plugins;
pub mod project;
pub mod value;

pub use collection::FileCollection;
pub use file::FileRecord;
pub use logger::{Level, Logger};
pub use plugin::Plugin;
pub use plugins::{COLLECTIONS_KEY, Collections, LEVEL_KEY, Leveller, in_directory};
pub use project::{BranchFn, BuildOptions, Project, ProjectConfig, ProjectError};
pub use value::{Metadata, Value};
