// Remote resource layout.
// Typed fetches for the metadata index and the per-post files.

use serde_json::Value;

use crate::cache::paths::sanitize_slug;
use crate::error::{QuillError, Result};

use super::client::BlogClient;
use super::types::{MetadataIndex, PostRecord};

pub const METADATA_PATH: &str = "/data/posts-metadata.json";

impl BlogClient {
    /// Get the posts metadata index.
    pub async fn get_metadata(&self) -> Result<MetadataIndex> {
        let body = self.get(METADATA_PATH).await?.text().await?;
        let index: MetadataIndex = serde_json::from_str(&body)?;
        Ok(index)
    }

    /// Get a single post record (`/posts/<slug>.json`).
    pub async fn get_post_record(&self, slug: &str) -> Result<PostRecord> {
        let path = format!("/posts/{}.json", sanitize_slug(slug));
        let body = self.get(&path).await?.text().await?;
        match serde_json::from_str(&body)? {
            Value::Object(record) => Ok(record),
            _ => Err(QuillError::Other(format!("{} is not a JSON object", path))),
        }
    }

    /// Get a post's raw markdown (`/posts/<slug>.md`).
    pub async fn get_post_markdown(&self, slug: &str) -> Result<String> {
        let path = format!("/posts/{}.md", sanitize_slug(slug));
        let markdown = self.get(&path).await?.text().await?;
        Ok(markdown)
    }

    /// Existence probe on the metadata index.
    pub async fn probe_metadata(&self) -> Result<()> {
        self.head(METADATA_PATH).await?;
        Ok(())
    }
}
