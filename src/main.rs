//! Kiln CLI - drive the standard pipeline from kiln.toml.

use anyhow::{Result, bail};
use clap::Parser;
use kiln::cli::{Cli, Commands};
use kiln::config::EngineConfig;
use kiln::init::new_project;
use kiln::{BuildOptions, Collections, FileRecord, Project, ProjectConfig, in_directory};
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match &cli.command {
        Commands::Init { name } => {
            let base = cli.root.clone().unwrap_or_else(|| PathBuf::from("./"));
            let root = match name {
                Some(name) => base.join(name),
                None => base,
            };
            new_project(&root, name.is_some())
        }
        Commands::Build { .. } => run_build(&config),
    }
}

/// Load and validate configuration from CLI arguments
fn load_config(cli: &Cli) -> Result<EngineConfig> {
    let root = cli.root.as_deref().unwrap_or(Path::new("./"));
    let config_path = root.join(&cli.config);
    let config_exists = config_path.exists();

    let mut config = if config_exists {
        EngineConfig::from_path(&config_path)?
    } else {
        EngineConfig::default()
    };
    config.update_with_cli(cli);

    // Validate config state based on command
    match (cli.is_init(), config_exists) {
        (true, true) => {
            bail!("Config file already exists. Remove it manually or init in a different path.")
        }
        (false, false) => bail!("Config file not found."),
        _ => {}
    }

    Ok(config)
}

/// Run the standard pipeline: ingest, level, group, pass through, build.
fn run_build(config: &EngineConfig) -> Result<()> {
    config.validate()?;

    let mut project = Project::with_config(ProjectConfig {
        log_threshold: config.log.threshold,
    });

    project.add_input_as(&config.build.input, &config.build.virtual_root)?;

    if config.build.level {
        project.use_leveller()?;
    }

    if !config.collections.is_empty() {
        let mut groups = Collections::new();
        for (name, collection) in &config.collections {
            groups = groups.group(name.clone(), in_directory(collection.directory.clone()));
        }
        project.use_collections(groups)?;
    }

    // Pass every input record through to the output collection
    project.use_plugin(|project: &mut Project| {
        let pages: Vec<FileRecord> = project.input().iter().cloned().collect();
        for page in pages {
            project.add_output_record(page);
        }
        Ok(())
    })?;

    project.build(
        BuildOptions::new(&config.build.output).clear(config.build.clear),
    )?;

    Ok(())
}
