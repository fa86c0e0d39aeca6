use config::{Config as ConfigBuilder, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::{WalkError, WalkResult};
use crate::frame::RecursionScope;

/// Which entry kinds an enumeration reports.
///
/// Maps onto the stock result handlers; callers with richer needs plug in
/// a custom handler directly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryFilter {
    Files,
    Directories,
    #[default]
    All,
}

/// Configuration for an enumeration.
///
/// The configuration can be loaded from multiple locations in order of
/// precedence:
/// 1. Custom config file specified via `--config` flag
/// 2. Local `.dirscout.yaml` in the current directory
/// 3. Global `$HOME/.config/dirscout/config.yaml`
///
/// The configuration uses YAML format. Example:
/// ```yaml
/// # Root directory to enumerate
/// root_path: "."
///
/// # Glob pattern applied to entry names
/// pattern: "*.rs"
///
/// # Recursion scope (top-only | all-directories)
/// scope: all-directories
///
/// # Entry kinds to report (files | directories | all)
/// entry_filter: files
///
/// # Show only totals
/// stats_only: false
///
/// # Log level (trace, debug, info, warn, error)
/// log_level: "warn"
/// ```
///
/// When using the CLI, command-line arguments take precedence over config
/// file values; the merging behavior is defined in `merge_with_cli`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalkConfig {
    /// Root directory to enumerate
    #[serde(default = "default_root")]
    pub root_path: PathBuf,

    /// Glob pattern applied to entry names
    #[serde(default = "default_pattern")]
    pub pattern: String,

    /// Recursion scope: immediate children only, or the full subtree
    #[serde(default)]
    pub scope: RecursionScope,

    /// Entry kinds to report
    #[serde(default)]
    pub entry_filter: EntryFilter,

    /// Whether to only show totals instead of individual entries
    #[serde(default)]
    pub stats_only: bool,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_pattern() -> String {
    "*".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            root_path: default_root(),
            pattern: default_pattern(),
            scope: RecursionScope::default(),
            entry_filter: EntryFilter::default(),
            stats_only: false,
            log_level: default_log_level(),
        }
    }
}

impl WalkConfig {
    /// Loads configuration from the default locations
    pub fn load() -> WalkResult<Self> {
        Self::load_from(None)
    }

    /// Loads configuration from a specific file
    pub fn load_from(config_path: Option<&Path>) -> WalkResult<Self> {
        let mut builder = ConfigBuilder::builder();

        // Default config locations
        let config_files = [
            // Global config
            dirs::config_dir().map(|p| p.join("dirscout/config.yaml")),
            // Local config
            Some(PathBuf::from(".dirscout.yaml")),
            // Custom config
            config_path.map(PathBuf::from),
        ];

        // Add existing config files
        for path in config_files.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| WalkError::config_error(e.to_string()))
    }

    /// Merges CLI arguments with configuration file values
    pub fn merge_with_cli(mut self, cli_config: WalkConfig) -> Self {
        // CLI values take precedence over config file values
        if cli_config.root_path != default_root() {
            self.root_path = cli_config.root_path;
        }
        if cli_config.pattern != default_pattern() {
            self.pattern = cli_config.pattern;
        }
        if cli_config.scope != RecursionScope::default() {
            self.scope = cli_config.scope;
        }
        if cli_config.entry_filter != EntryFilter::default() {
            self.entry_filter = cli_config.entry_filter;
        }
        if cli_config.stats_only {
            self.stats_only = true;
        }
        if cli_config.log_level != default_log_level() {
            self.log_level = cli_config.log_level;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_load_config_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        let config_content = r#"
            root_path: "src"
            pattern: "*.rs"
            scope: all-directories
            entry_filter: files
            stats_only: true
            log_level: "debug"
        "#;

        let mut file = File::create(&config_path).unwrap();
        file.write_all(config_content.as_bytes()).unwrap();

        let config = WalkConfig::load_from(Some(&config_path)).unwrap();
        assert_eq!(config.root_path, PathBuf::from("src"));
        assert_eq!(config.pattern, "*.rs");
        assert_eq!(config.scope, RecursionScope::AllDirectories);
        assert_eq!(config.entry_filter, EntryFilter::Files);
        assert!(config.stats_only);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_default_values() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        let mut file = File::create(&config_path).unwrap();
        file.write_all(b"pattern: \"*.txt\"\n").unwrap();

        let config = WalkConfig::load_from(Some(&config_path)).unwrap();
        assert_eq!(config.pattern, "*.txt");
        assert_eq!(config.root_path, PathBuf::from("."));
        assert_eq!(config.scope, RecursionScope::TopOnly);
        assert_eq!(config.entry_filter, EntryFilter::All);
        assert!(!config.stats_only);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_merge_with_cli() {
        let config_file = WalkConfig {
            root_path: PathBuf::from("src"),
            pattern: "*.rs".to_string(),
            scope: RecursionScope::AllDirectories,
            entry_filter: EntryFilter::Files,
            stats_only: false,
            log_level: "debug".to_string(),
        };

        let cli_config = WalkConfig {
            root_path: PathBuf::from("tests"),
            pattern: default_pattern(),
            scope: RecursionScope::default(),
            entry_filter: EntryFilter::Directories,
            stats_only: true,
            log_level: default_log_level(),
        };

        let merged = config_file.merge_with_cli(cli_config);
        assert_eq!(merged.root_path, PathBuf::from("tests")); // CLI value
        assert_eq!(merged.pattern, "*.rs"); // File value (CLI default)
        assert_eq!(merged.scope, RecursionScope::AllDirectories); // File value
        assert_eq!(merged.entry_filter, EntryFilter::Directories); // CLI value
        assert!(merged.stats_only); // CLI value
        assert_eq!(merged.log_level, "debug"); // File value (CLI default)
    }

    #[test]
    fn test_invalid_config() {
        let config_content = r#"
            root_path: []  # Should be string
            scope: "sideways"  # Not a scope
        "#;

        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        let mut file = File::create(&config_path).unwrap();
        file.write_all(config_content.as_bytes()).unwrap();

        let result = WalkConfig::load_from(Some(&config_path));
        assert!(matches!(result, Err(WalkError::ConfigError(_))));
    }
}
