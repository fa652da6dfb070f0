use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;
use serde::Deserialize;

/// Folder name used beneath the user's home directory for application files.
const DATA_DIR_NAME: &str = ".library-desk";
const CONFIG_FILE_NAME: &str = "config.toml";
const LOG_FILE_NAME: &str = "library-desk.log";

/// Runtime settings. Every field has a default so an absent or partial
/// config file is fine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seed catalog to open with instead of the built-in rows.
    pub seed_path: Option<PathBuf>,
    /// Log file. `None` resolves to `~/.library-desk/library-desk.log`.
    pub log_path: Option<PathBuf>,
    /// `tracing` filter directive, e.g. `info` or `library_desk=debug`.
    pub log_level: String,
    /// Lifetime of footer toasts.
    pub toast_secs: u64,
    /// Lifetime of the Return panel banner.
    pub banner_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed_path: None,
            log_path: None,
            log_level: "info".into(),
            toast_secs: 3,
            banner_secs: 5,
        }
    }
}

impl Settings {
    pub fn toast_duration(&self) -> Duration {
        Duration::from_secs(self.toast_secs)
    }

    pub fn banner_duration(&self) -> Duration {
        Duration::from_secs(self.banner_secs)
    }

    /// Log file location, falling back to the data directory.
    pub fn resolved_log_path(&self) -> Result<PathBuf> {
        match &self.log_path {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join(LOG_FILE_NAME)),
        }
    }

    /// Apply `LIBRARY_DESK_*` environment overrides on top of file values.
    fn apply_env(&mut self) {
        if let Ok(v) = env::var("LIBRARY_DESK_SEED") {
            if !v.trim().is_empty() {
                self.seed_path = Some(PathBuf::from(v));
            }
        }
        if let Ok(v) = env::var("LIBRARY_DESK_LOG") {
            if !v.trim().is_empty() {
                self.log_path = Some(PathBuf::from(v));
            }
        }
        if let Ok(v) = env::var("LIBRARY_DESK_LOG_LEVEL") {
            if !v.trim().is_empty() {
                self.log_level = v;
            }
        }
    }
}

/// Parse settings from TOML text.
pub fn parse_settings(raw: &str) -> Result<Settings> {
    toml::from_str(raw).context("failed to parse settings")
}

/// Load settings from `explicit` when given (the file must exist), otherwise
/// from `~/.library-desk/config.toml` if present, then apply environment
/// overrides.
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings> {
    let mut settings = match explicit {
        Some(path) => read_settings(path)?,
        None => {
            let path = data_dir()?.join(CONFIG_FILE_NAME);
            if path.exists() {
                read_settings(&path)?
            } else {
                Settings::default()
            }
        }
    };

    settings.apply_env();
    Ok(settings)
}

fn read_settings(path: &Path) -> Result<Settings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file '{}'", path.display()))?;
    parse_settings(&raw).with_context(|| format!("invalid config file '{}'", path.display()))
}

/// Resolve `~/.library-desk`.
fn data_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(parse_settings("").unwrap(), Settings::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let settings = parse_settings("banner_secs = 8\nseed_path = \"books.toml\"").unwrap();
        assert_eq!(settings.banner_duration(), Duration::from_secs(8));
        assert_eq!(settings.toast_duration(), Duration::from_secs(3));
        assert_eq!(settings.seed_path, Some(PathBuf::from("books.toml")));
    }

    #[test]
    fn rejects_wrong_types() {
        assert!(parse_settings("toast_secs = \"soon\"").is_err());
    }

    #[test]
    fn explicit_path_is_read() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "toast_secs = 1\nlog_path = \"/tmp/desk.log\"").unwrap();

        let settings = read_settings(file.path()).unwrap();
        assert_eq!(settings.toast_secs, 1);
        assert_eq!(
            settings.resolved_log_path().unwrap(),
            PathBuf::from("/tmp/desk.log")
        );
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let err = load_settings(Some(Path::new("/nonexistent/desk.toml"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/desk.toml"));
    }
}
