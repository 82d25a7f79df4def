//! Centralized default values for suite-trends configuration.
//!
//! These are used whenever neither the command line nor a configuration file
//! provides a value.

// ============================================================================
// Report Configuration Defaults
// ============================================================================

/// Default trailing windows, in days, of the summary health cards.
///
/// Windows overlap: a run inside the 3-day window is also counted by every
/// longer window.
pub const DEFAULT_WINDOWS: [u32; 4] = [3, 7, 14, 30];

/// Default width of the title column in `matrix` table output. Longer titles
/// are truncated with an ellipsis.
pub const DEFAULT_TITLE_WIDTH: usize = 60;

// ============================================================================
// Configuration File Locations
// ============================================================================

/// Name of the local configuration file, searched from the working directory
/// upwards.
pub const LOCAL_CONFIG_FILE: &str = ".suitetrendsconfig";

/// Directory below `$XDG_CONFIG_HOME` (or `~/.config`) holding the system
/// configuration file.
pub const SYSTEM_CONFIG_DIR: &str = "suite-trends";

pub const SYSTEM_CONFIG_FILE: &str = "config.toml";
