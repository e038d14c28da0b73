use anyhow::{Context, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::capacity::{DEFAULT_WINDOW, MAX_WINDOW};

const DEFAULT_BIND: &str = "127.0.0.1:3001";

/// Runtime settings: built-in defaults, then `capplan.toml` in the config
/// directory, then `CAPPLAN_*` environment variables, then CLI flags.
#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub(crate) db_path: PathBuf,
    pub(crate) bind: SocketAddr,
    pub(crate) window_size: usize,
    pub(crate) log_file: PathBuf,
}

/// On-disk shape of `capplan.toml`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct FileConfig {
    pub(crate) db_path: Option<PathBuf>,
    pub(crate) bind: Option<String>,
    pub(crate) window_size: Option<usize>,
}

impl FileConfig {
    pub(crate) fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("Invalid capplan.toml")
    }
}

impl Config {
    pub(crate) fn load() -> Result<Self> {
        let proj_dirs = directories::ProjectDirs::from("com", "capplan", "capplan")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        let data_dir = proj_dirs.data_dir();
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

        let mut config = Self::with_data_dir(data_dir)?;

        let file_path = proj_dirs.config_dir().join("capplan.toml");
        if file_path.exists() {
            let text = std::fs::read_to_string(&file_path)
                .with_context(|| format!("Failed to read {}", file_path.display()))?;
            config.apply_file(FileConfig::parse(&text)?)?;
        }

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub(crate) fn with_data_dir(data_dir: &Path) -> Result<Self> {
        Ok(Self {
            db_path: data_dir.join("capplan.db"),
            bind: parse_bind(DEFAULT_BIND)?,
            window_size: DEFAULT_WINDOW,
            log_file: data_dir.join("capplan.log"),
        })
    }

    pub(crate) fn apply_file(&mut self, file: FileConfig) -> Result<()> {
        if let Some(path) = file.db_path {
            self.db_path = path;
        }
        if let Some(bind) = file.bind {
            self.bind = parse_bind(&bind)?;
        }
        if let Some(n) = file.window_size {
            self.window_size = validate_window(n)?;
        }
        Ok(())
    }

    /// `lookup` is `std::env::var` outside of tests.
    pub(crate) fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(path) = lookup("CAPPLAN_DB") {
            self.db_path = PathBuf::from(path);
        }
        if let Some(bind) = lookup("CAPPLAN_BIND") {
            self.bind = parse_bind(&bind)?;
        }
        if let Some(n) = lookup("CAPPLAN_WINDOW") {
            let n: usize = n
                .trim()
                .parse()
                .with_context(|| format!("CAPPLAN_WINDOW must be a number, got '{n}'"))?;
            self.window_size = validate_window(n)?;
        }
        Ok(())
    }
}

fn parse_bind(s: &str) -> Result<SocketAddr> {
    s.trim()
        .parse()
        .with_context(|| format!("Invalid bind address '{s}' (expected host:port)"))
}

fn validate_window(n: usize) -> Result<usize> {
    if n == 0 || n > MAX_WINDOW {
        anyhow::bail!("window size must be between 1 and {MAX_WINDOW}");
    }
    Ok(n)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn base() -> Config {
        Config::with_data_dir(Path::new("/tmp/capplan-test")).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = base();
        assert_eq!(config.db_path, Path::new("/tmp/capplan-test/capplan.db"));
        assert_eq!(config.bind.port(), 3001);
        assert_eq!(config.window_size, 6);
    }

    #[test]
    fn test_file_overrides() {
        let mut config = base();
        let file = FileConfig::parse(
            "db_path = \"/srv/capplan.db\"\nbind = \"0.0.0.0:8080\"\nwindow_size = 12\n",
        )
        .unwrap();
        config.apply_file(file).unwrap();
        assert_eq!(config.db_path, Path::new("/srv/capplan.db"));
        assert_eq!(config.bind.port(), 8080);
        assert_eq!(config.window_size, 12);
    }

    #[test]
    fn test_file_rejects_unknown_keys() {
        assert!(FileConfig::parse("colour = \"blue\"\n").is_err());
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = base();
        config
            .apply_file(FileConfig::parse("window_size = 12\n").unwrap())
            .unwrap();
        config
            .apply_env(|key| match key {
                "CAPPLAN_WINDOW" => Some("3".into()),
                "CAPPLAN_BIND" => Some("127.0.0.1:9000".into()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.window_size, 3);
        assert_eq!(config.bind.port(), 9000);
    }

    #[test]
    fn test_invalid_values() {
        let mut config = base();
        assert!(config
            .apply_env(|key| (key == "CAPPLAN_WINDOW").then(|| "0".to_string()))
            .is_err());
        assert!(config
            .apply_env(|key| (key == "CAPPLAN_BIND").then(|| "nowhere".to_string()))
            .is_err());
    }
}
