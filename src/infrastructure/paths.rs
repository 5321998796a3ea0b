//! Filesystem locations for the credential file and trace output.

use crate::Config;
use std::path::PathBuf;

const APP_DIR: &str = "shelfsync";

/// Returns the data directory for credentials and traces.
///
/// Resolution order:
/// 1. `data_dir` from the configuration (`~` expanded)
/// 2. `$XDG_DATA_HOME/shelfsync`
/// 3. `$HOME/.local/share/shelfsync`
/// 4. `./.shelfsync`
#[must_use]
pub fn get_data_dir(config: &Config) -> PathBuf {
    resolve_data_dir(
        config.data_dir.as_deref(),
        std::env::var("XDG_DATA_HOME").ok(),
        std::env::var("HOME").ok(),
    )
}

fn resolve_data_dir(configured: Option<&str>, xdg: Option<String>, home: Option<String>) -> PathBuf {
    let home = home.filter(|h| !h.is_empty());
    if let Some(dir) = configured.filter(|d| !d.trim().is_empty()) {
        return PathBuf::from(expand_tilde_with(dir, home.as_deref()));
    }
    if let Some(xdg) = xdg.filter(|x| !x.is_empty()) {
        return PathBuf::from(xdg).join(APP_DIR);
    }
    home.map_or_else(
        || PathBuf::from(format!(".{APP_DIR}")),
        |home| PathBuf::from(home).join(".local/share").join(APP_DIR),
    )
}

/// Path of the persisted credential document.
#[must_use]
pub fn credentials_file(config: &Config) -> PathBuf {
    get_data_dir(config).join("credentials.json")
}

/// Path of the OTLP trace file.
#[must_use]
pub fn trace_file(config: &Config) -> PathBuf {
    get_data_dir(config).join("shelfsync-otlp.json")
}

/// Expands a leading `~` to `$HOME`. Other paths are returned unchanged.
///
/// # Examples
///
/// ```
/// use shelfsync::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("/absolute/path"), "/absolute/path");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    expand_tilde_with(path, std::env::var("HOME").ok().as_deref())
}

fn expand_tilde_with(path: &str, home: Option<&str>) -> String {
    match (path, home) {
        ("~", Some(home)) => home.to_string(),
        (p, Some(home)) if p.starts_with("~/") => format!("{home}{}", &p[1..]),
        _ => path.to_string(),
    }
}
