//! Application paths and settings.
//!
//! Defaults come from the platform's per-user data directory; a few
//! environment variables override them:
//!
//! - `DATAGRID_DATA_DIR`: where the catalog database, log file and WebView
//!   data live
//! - `DATAGRID_LOG`: `error`, `warn`, `info` (default), `debug` or `trace`
//! - `DATAGRID_PAGE_SIZE`: initial page size, one of the offered sizes

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use log::LevelFilter;

use crate::usecase::services::view_service::{DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS};

const QUALIFIER: &str = "com";
const ORGANIZATION: &str = "hellhbbd";
const APPLICATION: &str = "datagrid";

pub const DATA_DIR_ENV: &str = "DATAGRID_DATA_DIR";
pub const LOG_LEVEL_ENV: &str = "DATAGRID_LOG";
pub const PAGE_SIZE_ENV: &str = "DATAGRID_PAGE_SIZE";

const DB_FILE_NAME: &str = "datasets.sqlite";
const LOG_FILE_NAME: &str = "datagrid.log";
const WEBVIEW_DIR_NAME: &str = "webview2";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
    pub log_path: PathBuf,
    pub log_level: LevelFilter,
    pub default_page_size: usize,
}

impl AppConfig {
    /// Resolves the config from the platform data directory and the process
    /// environment.
    pub fn load() -> Result<Self> {
        Self::resolve(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::load`] with `lookup` standing in for the
    /// environment.
    pub fn resolve(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let data_dir = match lookup(DATA_DIR_ENV).filter(|dir| !dir.trim().is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir()?,
        };

        let mut config = Self::with_data_dir(data_dir);
        if let Some(level) = lookup(LOG_LEVEL_ENV) {
            config.log_level = parse_log_level(&level);
        }
        if let Some(size) = lookup(PAGE_SIZE_ENV) {
            config.default_page_size = parse_page_size(&size);
        }
        Ok(config)
    }

    /// Config rooted at `data_dir` with default settings.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            db_path: data_dir.join(DB_FILE_NAME),
            log_path: data_dir.join(LOG_FILE_NAME),
            data_dir,
            log_level: LevelFilter::Info,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn webview_data_dir(&self) -> PathBuf {
        self.data_dir.join(WEBVIEW_DIR_NAME)
    }

    /// Creates the data directory and the WebView data directory.
    pub fn ensure_dirs(&self) -> Result<()> {
        create_dir(&self.data_dir)?;
        create_dir(&self.webview_data_dir())
    }
}

fn create_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create dir: {}", dir.display()))
}

pub fn default_data_dir() -> Result<PathBuf> {
    let project_dirs = ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .ok_or_else(|| anyhow!("unable to resolve data directory"))?;
    Ok(project_dirs.data_local_dir().to_path_buf())
}

/// Unknown level names fall back to `info`.
pub fn parse_log_level(text: &str) -> LevelFilter {
    match text.trim().to_ascii_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" | "warning" => LevelFilter::Warn,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

/// Sizes outside [`PAGE_SIZE_OPTIONS`] fall back to the default.
pub fn parse_page_size(text: &str) -> usize {
    text.trim()
        .parse::<usize>()
        .ok()
        .filter(|size| PAGE_SIZE_OPTIONS.contains(size))
        .unwrap_or(DEFAULT_PAGE_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn data_dir_override_roots_every_path() {
        let env = HashMap::from([
            (DATA_DIR_ENV, "/tmp/grid-data"),
            (LOG_LEVEL_ENV, "DEBUG"),
            (PAGE_SIZE_ENV, "25"),
        ]);
        let config = AppConfig::resolve(|key| env.get(key).map(|value| value.to_string()))
            .expect("config resolves");

        assert_eq!(config.data_dir, PathBuf::from("/tmp/grid-data"));
        assert_eq!(config.db_path, PathBuf::from("/tmp/grid-data/datasets.sqlite"));
        assert_eq!(config.log_path, PathBuf::from("/tmp/grid-data/datagrid.log"));
        assert_eq!(config.log_level, LevelFilter::Debug);
        assert_eq!(config.default_page_size, 25);
    }

    #[test]
    fn invalid_settings_fall_back_to_defaults() {
        assert_eq!(parse_log_level("loud"), LevelFilter::Info);
        assert_eq!(parse_page_size("30"), DEFAULT_PAGE_SIZE);
        assert_eq!(parse_page_size("0"), DEFAULT_PAGE_SIZE);
        assert_eq!(parse_page_size(" 100 "), 100);
    }

    #[test]
    fn ensure_dirs_creates_webview_dir() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = AppConfig::with_data_dir(dir.path().join("app"));
        config.ensure_dirs().expect("dirs are created");
        assert!(config.webview_data_dir().is_dir());
        assert_eq!(config.default_page_size, 50);
    }
}
