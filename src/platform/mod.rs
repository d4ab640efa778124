// SplitScreen platform paths
// Resolves where the page database and the flags file live on each OS.
//
// Linux:   $XDG_CONFIG_HOME/splitscreen, $XDG_DATA_HOME/splitscreen
// macOS:   ~/Library/Application Support/SplitScreen (both)
// Windows: %APPDATA%\SplitScreen (both)

use std::env;
use std::path::PathBuf;

/// Environment variable that overrides both directories.
pub const DATA_DIR_ENV: &str = "SPLITSCREEN_DATA_DIR";

#[derive(Clone, Copy)]
enum DirKind {
    Config,
    Data,
}

fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

#[cfg(target_os = "linux")]
fn base_dir(kind: DirKind) -> PathBuf {
    let (var, fallback) = match kind {
        DirKind::Config => ("XDG_CONFIG_HOME", home_dir().join(".config")),
        DirKind::Data => ("XDG_DATA_HOME", home_dir().join(".local").join("share")),
    };
    let base = env::var(var).map(PathBuf::from).unwrap_or(fallback);
    base.join("splitscreen")
}

#[cfg(target_os = "macos")]
fn base_dir(_kind: DirKind) -> PathBuf {
    home_dir()
        .join("Library")
        .join("Application Support")
        .join("SplitScreen")
}

#[cfg(target_os = "windows")]
fn base_dir(_kind: DirKind) -> PathBuf {
    env::var("APPDATA")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join("AppData").join("Roaming"))
        .join("SplitScreen")
}

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
fn base_dir(_kind: DirKind) -> PathBuf {
    home_dir().join(".splitscreen")
}

fn resolve(kind: DirKind) -> PathBuf {
    match env::var(DATA_DIR_ENV) {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => base_dir(kind),
    }
}

/// Directory holding `settings.json`.
pub fn get_config_dir() -> PathBuf {
    resolve(DirKind::Config)
}

/// Directory holding the page database.
pub fn get_data_dir() -> PathBuf {
    resolve(DirKind::Data)
}

/// Default path of the page database.
pub fn default_db_path() -> PathBuf {
    get_data_dir().join("splitscreen.db")
}
