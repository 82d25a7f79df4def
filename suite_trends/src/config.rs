use config::{Config, ConfigError, File, FileFormat};
use log::warn;
use std::{
    env,
    path::{Path, PathBuf},
};

use crate::{
    data::SuiteKind,
    defaults::{
        DEFAULT_TITLE_WIDTH, DEFAULT_WINDOWS, LOCAL_CONFIG_FILE, SYSTEM_CONFIG_DIR,
        SYSTEM_CONFIG_FILE,
    },
};

/// System configuration path: `$XDG_CONFIG_HOME/suite-trends/config.toml`,
/// falling back to `~/.config/suite-trends/config.toml`.
fn system_config_path() -> Option<PathBuf> {
    if let Ok(xdg_config_home) = env::var("XDG_CONFIG_HOME") {
        return Some(
            Path::new(&xdg_config_home)
                .join(SYSTEM_CONFIG_DIR)
                .join(SYSTEM_CONFIG_FILE),
        );
    }
    dirs_next::home_dir().map(|home| {
        home.join(".config")
            .join(SYSTEM_CONFIG_DIR)
            .join(SYSTEM_CONFIG_FILE)
    })
}

/// Nearest `.suitetrendsconfig` in `start` or one of its ancestors.
fn find_local_config(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(LOCAL_CONFIG_FILE))
        .find(|candidate| candidate.is_file())
}

/// Layer the given files, later files overriding earlier ones. Missing files
/// are skipped.
fn build_config(sources: impl IntoIterator<Item = PathBuf>) -> Result<Config, ConfigError> {
    sources
        .into_iter()
        .fold(Config::builder(), |builder, path| {
            builder.add_source(File::from(path).format(FileFormat::Toml).required(false))
        })
        .build()
}

/// Read hierarchical configuration (system -> local override)
pub fn read_hierarchical_config() -> Result<Config, ConfigError> {
    let local = env::current_dir()
        .ok()
        .and_then(|dir| find_local_config(&dir));
    build_config(system_config_path().into_iter().chain(local))
}

fn load_or_default() -> Config {
    read_hierarchical_config().unwrap_or_else(|e| {
        warn!("Ignoring unreadable configuration: {e}");
        Config::default()
    })
}

fn windows_from(config: &Config) -> Vec<u32> {
    match config.get::<Vec<u32>>("report.windows") {
        Ok(windows) if !windows.is_empty() && windows.iter().all(|w| *w > 0) => windows,
        Ok(_) => {
            warn!("Ignoring 'report.windows': windows must be non-empty and positive");
            DEFAULT_WINDOWS.to_vec()
        }
        Err(ConfigError::NotFound(_)) => DEFAULT_WINDOWS.to_vec(),
        Err(e) => {
            warn!("Ignoring 'report.windows': {e}");
            DEFAULT_WINDOWS.to_vec()
        }
    }
}

fn title_width_from(config: &Config) -> usize {
    match config.get::<usize>("report.title_width") {
        Ok(width) if width > 0 => width,
        Ok(_) | Err(ConfigError::NotFound(_)) => DEFAULT_TITLE_WIDTH,
        Err(e) => {
            warn!("Ignoring 'report.title_width': {e}");
            DEFAULT_TITLE_WIDTH
        }
    }
}

fn suite_title_from(config: &Config, kind: SuiteKind) -> String {
    config
        .get_string(&format!("suite.{}.title", kind.key()))
        .ok()
        .filter(|title| !title.trim().is_empty())
        .unwrap_or_else(|| kind.title().to_string())
}

/// Rolling window lengths for the summary.
pub fn report_windows() -> Vec<u32> {
    windows_from(&load_or_default())
}

/// Title column width of the matrix table.
pub fn title_width() -> usize {
    title_width_from(&load_or_default())
}

/// Display title of a suite kind, as configured under `suite.<kind>.title`.
pub fn suite_title(kind: SuiteKind) -> String {
    suite_title_from(&load_or_default(), kind)
}
