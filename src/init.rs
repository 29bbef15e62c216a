//! Project initialization module.
//!
//! Creates a new project skeleton with default configuration.

use crate::config::EngineConfig;
use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;

/// Default config filename
const CONFIG_FILE: &str = "kiln.toml";

/// Default project directory structure
const PROJECT_DIRS: &[&str] = &["content", "content/posts"];

/// Sample page demonstrating frontmatter
const SAMPLE_PAGE: &str = "---\ntitle: Hello\ndraft: false\n---\nWelcome to kiln.\n";

/// Create a new project with default structure
pub fn new_project(root: &Path, has_name: bool) -> Result<()> {
    // Safety check: if no name was provided (init in current dir),
    // the directory must be completely empty
    if !has_name && !is_dir_empty(root)? {
        bail!(
            "Current directory is not empty. Use `kiln init <NAME>` to create in a subdirectory."
        );
    }

    init_project_structure(root)?;
    init_default_config(root)?;
    init_sample_content(root)?;

    Ok(())
}

/// Check if a directory is completely empty
fn is_dir_empty(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(true);
    }
    Ok(fs::read_dir(path)?.next().is_none())
}

/// Write default configuration file
fn init_default_config(root: &Path) -> Result<()> {
    let content = toml::to_string_pretty(&EngineConfig::default())?;
    fs::write(root.join(CONFIG_FILE), content)?;
    Ok(())
}

/// Create project directory structure
fn init_project_structure(root: &Path) -> Result<()> {
    for dir in PROJECT_DIRS {
        let path = root.join(dir);
        if path.exists() {
            bail!(
                "Path `{}` already exists. Try `kiln init <NAME>` instead.",
                path.display()
            );
        }
        fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
    }
    Ok(())
}

/// Write a starter page with frontmatter
fn init_sample_content(root: &Path) -> Result<()> {
    fs::write(root.join("content/posts/hello.md"), SAMPLE_PAGE)?;
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_new_project_creates_skeleton() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("site");

        new_project(&root, true).unwrap();

        assert!(root.join("kiln.toml").exists());
        assert!(root.join("content/posts/hello.md").exists());
    }

    #[test]
    fn test_new_project_config_parses_back() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("site");
        new_project(&root, true).unwrap();

        let config = EngineConfig::from_path(&root.join("kiln.toml")).unwrap();
        assert_eq!(config.build.input, std::path::PathBuf::from("content"));
    }

    #[test]
    fn test_init_refuses_nonempty_current_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("existing.txt"), "x").unwrap();

        let result = new_project(dir.path(), false);
        assert!(result.is_err());
    }

    #[test]
    fn test_init_refuses_existing_structure() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("site");
        new_project(&root, true).unwrap();

        let result = new_project(&root, true);
        assert!(result.is_err());
    }
}
