use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "csv-path-rewriter.toml";
const APP_DIR_NAME: &str = "csv-path-rewriter";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Base directory for relative paths. Auto-computed when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<PathBuf>,
    /// Fail instead of falling back to a stripped path.
    pub strict: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub create_parent_dirs: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            create_parent_dirs: true,
        }
    }
}

// --- Config loading ---

fn read_config_file(path: &Path) -> anyhow::Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file {}", path.display()))
}

impl Config {
    /// Load config and return the resolved file path (if any).
    pub fn load_with_path(path: Option<&Path>) -> anyhow::Result<(Self, Option<PathBuf>)> {
        // 1. Explicit path must exist
        if let Some(p) = path {
            let config = read_config_file(p)?;
            return Ok((config, Some(p.to_path_buf())));
        }

        // 2. Beside the executable
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(p) = exe_path.parent().map(|dir| dir.join(CONFIG_FILE_NAME)) {
                if p.exists() {
                    let config = read_config_file(&p)?;
                    return Ok((config, Some(p)));
                }
            }
        }

        // 3. Platform config directory (e.g. ~/.config/csv-path-rewriter/config.toml)
        if let Some(config_dir) = dirs::config_dir() {
            let platform_config = config_dir.join(APP_DIR_NAME).join("config.toml");
            if platform_config.exists() {
                let config = read_config_file(&platform_config)?;
                return Ok((config, Some(platform_config)));
            }
        }

        tracing::debug!("No config file found, using defaults");
        Ok((Config::default(), None))
    }

    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let (config, resolved) = Self::load_with_path(path)?;
        if let Some(p) = resolved {
            tracing::info!("Loaded config from {}", p.display());
        }
        Ok(config)
    }

    /// Default config file with every field documented.
    pub fn generate_default_commented() -> String {
        r#"# csv-path-rewriter configuration
# Command-line flags override the values below.

[paths]
# Base directory that relative_path is computed against.
# When unset, the longest common directory of all input paths is used.
# base_dir = "/data/corpus"
# Fail when a path cannot be expressed relative to the base directory
# (e.g. it lives on another drive) instead of writing the path with its
# drive and root stripped.
strict = false

[output]
# Create missing parent directories of the output CSV.
create_parent_dirs = true
"#
        .to_string()
    }
}
