// Application configuration.
// Loaded from TOML with every field defaulted, then adjusted by CLI flags.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::cache::paths;
use crate::error::{QuillError, Result};

const RAW_HOST: &str = "https://raw.githubusercontent.com";

/// Full configuration tree.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub source: SourceConfig,
    pub cache: CacheConfig,
    pub http: HttpConfig,
    pub content: ContentConfig,
    pub features: Features,
}

/// Display information about the blog.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub name: String,
    pub description: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "The Novice Coder".to_string(),
            description: "Beginner-friendly programming tutorials and coding journey".to_string(),
        }
    }
}

/// Format of the per-post resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentFormat {
    /// `/posts/<slug>.json` records.
    #[default]
    Json,
    /// `/posts/<slug>.md` raw markdown.
    Markdown,
}

/// Where the static files live.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub username: String,
    pub repo: String,
    pub branch: String,
    /// Explicit base URL; wins over username/repo/branch.
    pub base_url: Option<String>,
    pub content_format: ContentFormat,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            username: "heaslis3-dcu".to_string(),
            repo: "the-novice-coder-blog".to_string(),
            branch: "main".to_string(),
            base_url: None,
            content_format: ContentFormat::Json,
        }
    }
}

impl SourceConfig {
    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!(
                "{}/{}/{}/{}",
                RAW_HOST, self.username, self.repo, self.branch
            ),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub timeout_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { timeout_secs: 300 }
    }
}

impl CacheConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 10 }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    pub posts_per_page: usize,
    /// Reject loosely-typed post records instead of coercing them.
    pub strict_validation: bool,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            posts_per_page: 6,
            strict_validation: false,
        }
    }
}

/// Feature flags for the optional UI surfaces.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Features {
    pub search: bool,
    pub categories: bool,
    pub archive: bool,
    pub skill_levels: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            search: true,
            categories: true,
            archive: true,
            skill_levels: true,
        }
    }
}

impl Config {
    /// Load config from an explicit path, or from the default location.
    /// A missing default file yields defaults; a missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match paths::config_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => {
                    debug!("no config file found, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    /// Parse a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        debug!(path = %path.display(), "loading config");
        Self::parse(&contents)
    }

    /// Parse config from a TOML string.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        if config.content.posts_per_page == 0 {
            return Err(QuillError::Other(
                "content.posts_per_page must be at least 1".to_string(),
            ));
        }
        if config.http.timeout_secs == 0 {
            return Err(QuillError::Other(
                "http.timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(
            config.source.base_url(),
            "https://raw.githubusercontent.com/heaslis3-dcu/the-novice-coder-blog/main"
        );
        assert_eq!(config.cache.timeout(), Duration::from_secs(300));
        assert_eq!(config.content.posts_per_page, 6);
        assert!(!config.content.strict_validation);
        assert!(config.features.search);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::parse(
            r#"
            [source]
            base_url = "http://localhost:8080/"
            content_format = "markdown"

            [cache]
            timeout_secs = 60
            "#,
        )
        .unwrap();

        assert_eq!(config.source.base_url(), "http://localhost:8080");
        assert_eq!(config.source.content_format, ContentFormat::Markdown);
        assert_eq!(config.cache.timeout_secs, 60);
        assert_eq!(config.http.timeout_secs, 10);
        assert_eq!(config.site.name, "The Novice Coder");
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let err = Config::parse("[content]\nposts_per_page = 0\n").unwrap_err();
        assert!(matches!(err, QuillError::Other(_)));
    }

    #[test]
    fn test_zero_http_timeout_rejected() {
        let err = Config::parse("[http]\ntimeout_secs = 0\n").unwrap_err();
        assert!(err.to_string().contains("http.timeout_secs"));
        assert!(Config::parse("[http]\ntimeout_secs = 1\n").is_ok());
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[site]\nname = \"Test Blog\"").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.site.name, "Test Blog");
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, QuillError::Io(_)));
    }

    #[test]
    fn test_malformed_file() {
        let err = Config::parse("[cache]\ntimeout_secs = \"soon\"\n").unwrap_err();
        assert!(matches!(err, QuillError::Config(_)));
    }
}
