//! Scan configuration for HookFinder

use crate::error::{HookError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name looked up in the working directory
pub const CONFIG_FILE: &str = "hookfinder.toml";

/// Configuration for an archive scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Call names that declare a hook
    #[serde(default = "default_callees")]
    pub callees: Vec<String>,

    /// Extensions treated as source (without the dot)
    #[serde(default = "default_source_extensions")]
    pub source_extensions: Vec<String>,

    /// Largest archive accepted, in bytes
    #[serde(default = "default_max_archive_bytes")]
    pub max_archive_bytes: u64,

    /// Largest single entry scanned, in bytes
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,

    /// Filter out the built-in core hooks
    #[serde(default = "default_include_builtin_hooks")]
    pub include_builtin_hooks: bool,

    /// Extra reference files with known hooks
    #[serde(default)]
    pub known_hooks_files: Vec<PathBuf>,

    /// Extra known hook names
    #[serde(default)]
    pub known_hooks: Vec<String>,
}

fn default_callees() -> Vec<String> {
    vec!["apply_filters".to_string()]
}

fn default_source_extensions() -> Vec<String> {
    vec!["php".to_string(), "inc".to_string()]
}

fn default_max_archive_bytes() -> u64 {
    150 * 1024 * 1024
}

fn default_max_file_bytes() -> u64 {
    10 * 1024 * 1024
}

fn default_include_builtin_hooks() -> bool {
    true
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            callees: default_callees(),
            source_extensions: default_source_extensions(),
            max_archive_bytes: default_max_archive_bytes(),
            max_file_bytes: default_max_file_bytes(),
            include_builtin_hooks: default_include_builtin_hooks(),
            known_hooks_files: Vec::new(),
            known_hooks: Vec::new(),
        }
    }
}

impl ScanConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            HookError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let config: ScanConfig = toml::from_str(&content)
            .map_err(|e| HookError::Config(format!("failed to parse {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `dir/hookfinder.toml`, then the user config directory,
    /// falling back to defaults
    pub fn load_or_default(dir: &Path) -> Result<Self> {
        let local = dir.join(CONFIG_FILE);
        if local.exists() {
            return Self::load(&local);
        }

        if let Some(user) = user_config_path() {
            if user.exists() {
                return Self::load(&user);
            }
        }

        Ok(Self::default())
    }

    /// Save configuration as TOML
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| HookError::Config(format!("failed to serialize configuration: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.callees.iter().all(|c| c.trim().is_empty()) {
            return Err(HookError::Config("at least one callee is required".to_string()));
        }
        if self.max_archive_bytes == 0 || self.max_file_bytes == 0 {
            return Err(HookError::Config("size limits must be greater than zero".to_string()));
        }
        Ok(())
    }
}

/// `<config dir>/hookfinder/config.toml`
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("hookfinder").join("config.toml"))
}
