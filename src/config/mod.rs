//! Engine configuration management for `kiln.toml`.
//!
//! # Sections
//!
//! | Section         | Purpose                                        |
//! |-----------------|------------------------------------------------|
//! | `[build]`       | Input/output directories, clear, virtual root  |
//! | `[log]`         | Logging threshold                              |
//! | `[collections]` | Named directory groupings built after ingest   |
//!
//! # Example
//!
//! ```toml
//! [build]
//! input = "content"
//! output = "public"
//! clear = false
//! level = true
//!
//! [log]
//! threshold = "info"
//!
//! [collections.posts]
//! directory = "posts"
//! ```

pub mod defaults;
mod error;

pub use error::ConfigError;

use crate::cli::{Cli, Commands};
use crate::logger::Level;
use anyhow::{Result, bail};
use educe::Educe;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing kiln.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory (set from CLI)
    #[serde(skip)]
    pub root: PathBuf,

    /// Build settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Logging settings
    #[serde(default)]
    pub log: LogConfig,

    /// Named directory groupings, in declaration order
    #[serde(default)]
    pub collections: IndexMap<String, CollectionConfig>,
}

/// `[build]` section - pipeline input and output.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    /// Directory ingested into the input collection.
    #[serde(default = "defaults::build::input")]
    #[educe(Default = defaults::build::input())]
    pub input: PathBuf,

    /// Directory the output collection is written into.
    #[serde(default = "defaults::build::output")]
    #[educe(Default = defaults::build::output())]
    pub output: PathBuf,

    /// Delete top-level files in the output directory before writing.
    #[serde(default = "defaults::r#false")]
    pub clear: bool,

    /// Virtual path the input directory is rebased onto.
    #[serde(default = "defaults::build::virtual_root")]
    #[educe(Default = defaults::build::virtual_root())]
    pub virtual_root: String,

    /// Stamp directory-depth `"level"` metadata on every record.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub level: bool,
}

/// `[log]` section - logging threshold.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Minimum level reported to the terminal.
    #[serde(default = "defaults::log::threshold")]
    #[educe(Default = defaults::log::threshold())]
    pub threshold: Level,
}

/// One `[collections.<name>]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollectionConfig {
    /// Records in this directory (or below) belong to the group.
    pub directory: String,
}

impl EngineConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        let root = cli.root.clone().unwrap_or_else(|| PathBuf::from("./"));
        self.config_path = root.join(&cli.config);

        if let Commands::Build {
            input,
            output,
            clear,
            threshold,
        } = &cli.command
        {
            Self::update_option(&mut self.build.input, input.as_ref());
            Self::update_option(&mut self.build.output, output.as_ref());
            Self::update_option(&mut self.log.threshold, threshold.as_ref());
            if *clear {
                self.build.clear = true;
            }
        }

        // Resolve build paths relative to the project root
        self.build.input = root.join(&self.build.input);
        self.build.output = root.join(&self.build.output);
        self.root = root;
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Validate configuration for a build
    pub fn validate(&self) -> Result<()> {
        if !self.build.input.exists() {
            bail!(ConfigError::Validation(format!(
                "[build.input] `{}` does not exist",
                self.build.input.display()
            )));
        }

        if self.build.input == self.build.output {
            bail!(ConfigError::Validation(
                "[build.input] and [build.output] must differ".into()
            ));
        }

        for (name, collection) in &self.collections {
            if collection.directory.is_empty() {
                bail!(ConfigError::Validation(format!(
                    "[collections.{name}] directory must not be empty"
                )));
            }
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
