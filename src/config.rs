//! Command-line and environment configuration.
//!
//! Every flag can also be set through a `SITES_*` environment variable, and a
//! `.env` file in the working directory is loaded before parsing.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use crate::Database;
use crate::logging::Profile;

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    Pretty,
    /// One JSON object per line.
    Json,
}

impl From<LogFormat> for Profile {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Pretty => Profile::Development,
            LogFormat::Json => Profile::Production,
        }
    }
}

/// Where the catalog is stored.
#[derive(Debug, Clone, Default, Args)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file [default: {data_dir}/sites/sites.db]
    #[arg(long = "database", env = "SITES_DATABASE", value_name = "PATH")]
    pub path: Option<PathBuf>,
}

impl DatabaseConfig {
    /// Returns the configured path, falling back to the platform data dir.
    pub fn resolve_path(&self) -> Result<PathBuf> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => default_database_path(),
        }
    }

    /// Opens the database, creating its parent directory if needed.
    pub fn open(&self) -> Result<Database> {
        let path = self.resolve_path()?;
        ensure_database_directory(&path)?;
        Database::open(&path)
    }
}

/// Settings for the HTTP server.
#[derive(Debug, Clone, Args)]
pub struct ServeConfig {
    /// Address to listen on
    #[arg(long, env = "SITES_BIND", default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,

    /// Log output format
    #[arg(long, env = "SITES_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    #[command(flatten)]
    pub database: DatabaseConfig,
}

/// Gets the cross-platform database path.
///
/// Returns the path as `{data_dir}/sites/sites.db` where `data_dir` is:
/// - Linux: `~/.local/share`
/// - macOS: `~/Library/Application Support`
/// - Windows: `C:\Users\<user>\AppData\Roaming`
pub fn default_database_path() -> Result<PathBuf> {
    let data_dir =
        dirs::data_dir().ok_or_else(|| anyhow::anyhow!("Failed to determine data directory"))?;

    Ok(data_dir.join("sites").join("sites.db"))
}

/// Ensures the parent directory of the database file exists.
pub fn ensure_database_directory(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create database directory: {}", parent.display())
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::tempdir;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        serve: ServeConfig,
    }

    #[test]
    fn explicit_path_wins_over_default() {
        let config = DatabaseConfig {
            path: Some(PathBuf::from("/tmp/catalog.db")),
        };
        assert_eq!(
            config.resolve_path().unwrap(),
            PathBuf::from("/tmp/catalog.db")
        );
    }

    #[test]
    fn default_path_ends_with_sites_db() {
        if let Ok(path) = default_database_path() {
            assert!(path.ends_with("sites/sites.db"));
        }
    }

    #[test]
    fn open_creates_missing_parent_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("sites.db");
        let config = DatabaseConfig {
            path: Some(path.clone()),
        };

        config.open().unwrap();

        assert!(path.exists());
    }

    #[test]
    fn serve_flags_parse() {
        let cli = TestCli::try_parse_from([
            "sites",
            "--bind",
            "0.0.0.0:9000",
            "--log-format",
            "json",
            "--database",
            "/tmp/x.db",
        ])
        .unwrap();

        assert_eq!(cli.serve.bind, "0.0.0.0:9000".parse::<SocketAddr>().unwrap());
        assert_eq!(cli.serve.log_format, LogFormat::Json);
        assert_eq!(cli.serve.database.path, Some(PathBuf::from("/tmp/x.db")));
        assert_eq!(Profile::from(cli.serve.log_format), Profile::Production);
    }
}
