use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::core::pipeline::CapabilityProfile;

pub const CONFIG_FILE_NAME: &str = ".atomauditrc.json";

pub const TEST_FILE_PATTERNS: &[&str] = &[
    "**/*.test.tsx",
    "**/*.test.ts",
    "**/*.test.jsx",
    "**/*.test.js",
    "**/*.spec.tsx",
    "**/*.spec.ts",
    "**/*.spec.jsx",
    "**/*.spec.js",
    "**/__tests__/**",
];

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Paths or glob patterns excluded from scanning.
    #[serde(default)]
    pub ignores: Vec<String>,

    /// Directories (or directory globs) to scan. Empty means the whole
    /// source root.
    #[serde(default)]
    pub includes: Vec<String>,

    #[serde(default = "default_source_root")]
    pub source_root: String,

    #[serde(default = "default_ignore_test_files")]
    pub ignore_test_files: bool,

    /// Analysis capability switches (callbacks, wrappers, forwarding,
    /// handleApi). All on by default.
    #[serde(default)]
    pub capabilities: CapabilityProfile,
}

fn default_source_root() -> String {
    "./".to_string()
}

fn default_ignore_test_files() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ignores: Vec::new(),
            includes: Vec::new(),
            source_root: default_source_root(),
            ignore_test_files: default_ignore_test_files(),
            capabilities: CapabilityProfile::default(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error if any glob patterns in `ignores` or `includes` are
    /// invalid.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }
        for pattern in &self.includes {
            if pattern.contains('*') || pattern.contains('?') {
                Pattern::new(pattern).with_context(|| {
                    format!("Invalid glob pattern in 'includes': \"{}\"", pattern)
                })?;
            }
        }
        Ok(())
    }
}

pub struct ConfigResult {
    pub config: Config,
    /// Whether the config came from a file (vs built-in defaults).
    pub from_file: bool,
}

/// Load `.atomauditrc.json` from the given directory, falling back to the
/// defaults when the file does not exist.
pub fn load_config(dir: &Path) -> Result<ConfigResult> {
    let config_path: PathBuf = dir.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        return Ok(ConfigResult {
            config: Config::default(),
            from_file: false,
        });
    }

    let content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;
    let config: Config = serde_json::from_str(&content)
        .with_context(|| format!("Invalid config file {}", config_path.display()))?;
    config.validate()?;

    Ok(ConfigResult {
        config,
        from_file: true,
    })
}

/// Pretty-printed default configuration, used by `atomaudit init`.
pub fn default_config_json() -> Result<String> {
    Ok(serde_json::to_string_pretty(&Config::default())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.includes.is_empty());
        assert!(config.ignore_test_files);
        assert_eq!(config.capabilities, CapabilityProfile::extended());
    }

    #[test]
    fn test_parse_config_with_overrides() {
        let json = r#"{
            "includes": ["src"],
            "ignores": ["**/generated/**"],
            "capabilities": { "callbacks": false, "wrappers": false }
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.includes, vec!["src"]);
        assert!(!config.capabilities.callbacks);
        assert!(!config.capabilities.wrappers);
        // Unspecified switches keep their defaults.
        assert!(config.capabilities.forwarding);
        assert!(config.capabilities.handle_api);
    }

    #[test]
    fn test_validate_rejects_bad_globs() {
        let config = Config {
            ignores: vec!["[".to_string()],
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_config_json_round_trips() {
        let json = default_config_json().unwrap();
        let config: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(config.capabilities, CapabilityProfile::extended());
    }
}
