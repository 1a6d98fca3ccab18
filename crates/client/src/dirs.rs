//! Platform-specific directory utilities
//!
//! Follows platform conventions for cache and data directories.

use std::path::PathBuf;

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", "pursuit")
}

/// Get the platform-specific log directory
///
/// - macOS: `~/Library/Caches/pursuit/logs`
/// - Linux: `~/.cache/pursuit/logs` (or `$XDG_CACHE_HOME/pursuit/logs`)
/// - Windows: `%LOCALAPPDATA%\pursuit\logs`
/// - Fallback: `/tmp/pursuit/logs`
pub fn log_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("/tmp/pursuit"))
        .join("logs")
}

/// Get the platform-specific replay directory
///
/// - Linux: `~/.local/share/pursuit/replays` (or `$XDG_DATA_HOME/pursuit/replays`)
/// - Fallback: `./save_data/replays`
pub fn replay_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./save_data"))
        .join("replays")
}
