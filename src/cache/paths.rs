// Filesystem locations used by quill.
// Resolves the per-user config file and the log file written while the TUI runs.

use std::path::PathBuf;

use directories::ProjectDirs;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "quill")
}

/// Get the base cache directory (~/.cache/quill on Linux).
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Get the config directory (~/.config/quill on Linux).
pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

/// Path to the default config file.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// Path to the log file used in TUI mode.
pub fn log_path() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join("quill.log"))
}

/// Sanitize a slug for use in a URL path segment.
/// Anything outside `[A-Za-z0-9-_.]` becomes a dash.
pub fn sanitize_slug(slug: &str) -> String {
    slug.chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' => c,
            _ => '-',
        })
        .collect()
}
