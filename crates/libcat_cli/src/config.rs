//! Runtime configuration: TOML file values overridden by command-line flags.

use crate::cli::Cli;
use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use libcat_core::LogLevel;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "libcat.toml";
pub const DEFAULT_DB_FILE: &str = "libcat.db";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    #[default]
    Sqlite,
    Memory,
}

/// Shape of `libcat.toml`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub db_path: Option<PathBuf>,
    pub storage: Option<StorageKind>,
    pub seed_demo_data: Option<bool>,
    pub logging: LoggingSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSection {
    pub level: Option<String>,
    pub dir: Option<PathBuf>,
}

impl FileConfig {
    pub fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("invalid config file")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config `{}`", path.display()))?;
        Self::parse(&contents).with_context(|| format!("in `{}`", path.display()))
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub storage: StorageKind,
    pub seed_demo_data: bool,
    pub log_level: LogLevel,
    pub log_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Reads the config file named by `--config`, else `./libcat.toml` when
    /// it exists, then applies command-line overrides.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => {
                if !path.is_file() {
                    bail!("config file `{}` does not exist", path.display());
                }
                FileConfig::load(path)?
            }
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    FileConfig::load(default_path)?
                } else {
                    FileConfig::default()
                }
            }
        };
        Self::merge(file, cli)
    }

    fn merge(file: FileConfig, cli: &Cli) -> Result<Self> {
        let level_name = cli.log_level.as_deref().or(file.logging.level.as_deref());
        let log_level = match level_name {
            Some(name) => LogLevel::parse(name)?,
            None => LogLevel::build_default(),
        };

        Ok(Self {
            db_path: cli
                .db
                .clone()
                .or(file.db_path)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE)),
            storage: cli.storage.or(file.storage).unwrap_or_default(),
            seed_demo_data: cli.seed || file.seed_demo_data.unwrap_or(false),
            log_level,
            log_dir: cli.log_dir.clone().or(file.logging.dir),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, FileConfig, StorageKind, DEFAULT_DB_FILE};
    use crate::cli::Cli;
    use clap::Parser;
    use libcat_core::LogLevel;
    use std::path::PathBuf;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["libcat"];
        argv.extend_from_slice(args);
        argv.push("authors");
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn defaults_apply_without_file_or_flags() {
        let config = AppConfig::merge(FileConfig::default(), &cli(&[])).unwrap();

        assert_eq!(config.db_path, PathBuf::from(DEFAULT_DB_FILE));
        assert_eq!(config.storage, StorageKind::Sqlite);
        assert!(!config.seed_demo_data);
        assert_eq!(config.log_level, LogLevel::build_default());
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn file_values_are_used_when_flags_are_absent() {
        let file = FileConfig::parse(
            r#"
            db_path = "/var/lib/libcat/catalog.db"
            storage = "memory"
            seed_demo_data = true

            [logging]
            level = "warn"
            dir = "/var/log/libcat"
            "#,
        )
        .unwrap();

        let config = AppConfig::merge(file, &cli(&[])).unwrap();
        assert_eq!(config.db_path, PathBuf::from("/var/lib/libcat/catalog.db"));
        assert_eq!(config.storage, StorageKind::Memory);
        assert!(config.seed_demo_data);
        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/libcat")));
    }

    #[test]
    fn flags_override_file_values() {
        let file = FileConfig::parse("db_path = \"a.db\"\nstorage = \"memory\"\n[logging]\nlevel = \"warn\"\n")
            .unwrap();

        let config = AppConfig::merge(
            file,
            &cli(&["--db", "b.db", "--storage", "sqlite", "--log-level", "trace"]),
        )
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("b.db"));
        assert_eq!(config.storage, StorageKind::Sqlite);
        assert_eq!(config.log_level, LogLevel::Trace);
    }

    #[test]
    fn unknown_keys_and_levels_are_rejected() {
        assert!(FileConfig::parse("database = \"x.db\"").is_err());

        let file = FileConfig::parse("[logging]\nlevel = \"loud\"").unwrap();
        assert!(AppConfig::merge(file, &cli(&[])).is_err());
    }

    #[test]
    fn explicit_missing_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        let cli = cli(&["--config", missing.to_str().unwrap()]);

        assert!(AppConfig::resolve(&cli).is_err());
    }
}
