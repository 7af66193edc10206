//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value. The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `STENCIL_<SECTION>__<KEY>`, e.g.
//!    `STENCIL_HOOKS__TIMEOUT_SECS=5`
//! 3. Config file: `--config FILE`, or the platform config directory
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::cli::ListFormat;

/// Prefix for environment overrides.
const ENV_PREFIX: &str = "STENCIL";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where templates are loaded from.
    pub templates: TemplatesConfig,
    /// Post-emit action settings.
    pub hooks: HooksConfig,
    /// Output settings.
    pub output: OutputConfig,
    /// Log sinks beyond stderr.
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplatesConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HooksConfig {
    pub timeout_secs: u64,
}

impl Default for HooksConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

impl HooksConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    /// Default format for `stencil list`.
    pub format: ListFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: ListFormat::Table,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Append JSON log lines to this file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

/// Every key `stencil config get` understands.
pub const KEYS: &[&str] = &[
    "templates.dir",
    "hooks.timeout_secs",
    "output.no_color",
    "output.format",
    "logging.file",
];

impl AppConfig {
    /// Load configuration, layering file and environment over defaults.
    ///
    /// An explicit `config_file` must exist; the default location is
    /// optional.
    pub fn load(config_file: Option<&Path>) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.to_path_buf(), true),
            None => (Self::config_path(), false),
        };

        Self::load_from(&path, required)
            .with_context(|| format!("failed to load configuration from {}", path.display()))
    }

    fn load_from(path: &Path, required: bool) -> anyhow::Result<Self> {
        let settings = Config::builder()
            .add_source(
                File::from(path)
                    .format(FileFormat::Toml)
                    .required(required),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        if config.hooks.timeout_secs == 0 {
            anyhow::bail!("hooks.timeout_secs must be at least 1");
        }
        Ok(config)
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.stencil.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "stencil", "stencil")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".stencil.toml"))
    }

    /// Value of one dotted key, rendered for display. `None` for unknown keys.
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "templates.dir" => display_opt(self.templates.dir.as_deref()),
            "hooks.timeout_secs" => self.hooks.timeout_secs.to_string(),
            "output.no_color" => self.output.no_color.to_string(),
            "output.format" => self.output.format.as_str().to_string(),
            "logging.file" => display_opt(self.logging.file.as_deref()),
            _ => return None,
        };
        Some(value)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

fn display_opt(path: Option<&Path>) -> String {
    path.map(|p| p.display().to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.hooks.timeout(), Duration::from_secs(30));
        assert!(!cfg.output.no_color);
        assert_eq!(cfg.output.format, ListFormat::Table);
        assert!(cfg.templates.dir.is_none());
    }

    #[test]
    fn missing_optional_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let cfg = AppConfig::load_from(&temp.path().join("nope.toml"), false).unwrap();
        assert_eq!(cfg.hooks.timeout_secs, 30);
    }

    #[test]
    fn missing_explicit_file_is_error() {
        let temp = TempDir::new().unwrap();
        assert!(AppConfig::load(Some(&temp.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn file_values_override_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            "[hooks]\ntimeout_secs = 5\n\n[templates]\ndir = \"/srv/templates\"\n\n[output]\nformat = \"json\"\n",
        )
        .unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.hooks.timeout_secs, 5);
        assert_eq!(cfg.templates.dir, Some(PathBuf::from("/srv/templates")));
        assert_eq!(cfg.output.format, ListFormat::Json);
        assert!(!cfg.output.no_color, "unset keys keep their default");
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[hooks]\ntimeout_secs = 0\n").unwrap();

        let err = AppConfig::load(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("hooks.timeout_secs"));
    }

    #[test]
    fn get_known_and_unknown_keys() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.get("hooks.timeout_secs").as_deref(), Some("30"));
        assert_eq!(cfg.get("output.format").as_deref(), Some("table"));
        assert_eq!(cfg.get("templates.dir").as_deref(), Some(""));
        assert_eq!(cfg.get("does.not.exist"), None);
    }

    #[test]
    fn every_listed_key_resolves() {
        let cfg = AppConfig::default();
        for key in KEYS {
            assert!(cfg.get(key).is_some(), "{key}");
        }
    }

    #[test]
    fn toml_round_trips() {
        let mut cfg = AppConfig::default();
        cfg.logging.file = Some(PathBuf::from("/tmp/stencil.log"));

        let text = cfg.to_toml().unwrap();
        assert!(text.contains("timeout_secs = 30"));

        let back: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn config_path_is_not_empty() {
        assert!(!AppConfig::config_path().as_os_str().is_empty());
    }
}
