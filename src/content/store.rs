// Content store: fetch, cache and fall back.
// Public methods never fail; every error degrades to cached, fallback or placeholder data.

use std::sync::Arc;

use futures::future::try_join_all;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cache::MemoryCache;
use crate::config::{Config, ContentFormat};
use crate::error::Result;
use crate::render::markdown_to_html;

use super::client::BlogClient;
use super::fallback::{PLACEHOLDER_CONTENT, fallback_posts};
use super::types::{Content, Post, PostRecord};
use super::validate::{Validator, merge_records};

/// Retrieves posts from the remote host with a short-lived per-slug cache.
#[derive(Debug)]
pub struct ContentStore {
    client: BlogClient,
    format: ContentFormat,
    validator: Validator,
    /// Post records keyed by slug (JSON format).
    records: MemoryCache<Arc<PostRecord>>,
    /// Rendered markdown keyed by slug (markdown format).
    documents: MemoryCache<Arc<String>>,
}

impl ContentStore {
    pub fn new(config: &Config) -> Result<Self> {
        let client = BlogClient::new(&config.source.base_url(), config.http.timeout())?;
        let ttl = config.cache.timeout();
        Ok(Self {
            client,
            format: config.source.content_format,
            validator: Validator::new(config.content.strict_validation),
            records: MemoryCache::new(ttl),
            documents: MemoryCache::new(ttl),
        })
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    /// All published posts, newest first. Falls back to the sample posts on any failure.
    pub async fn get_posts(&self) -> Vec<Post> {
        match self.load_posts().await {
            Ok(posts) => {
                info!(count = posts.len(), "loaded posts");
                posts
            }
            Err(error) => {
                warn!(%error, "loading posts failed, using fallback posts");
                fallback_posts()
            }
        }
    }

    async fn load_posts(&self) -> Result<Vec<Post>> {
        let index = self.client.get_metadata().await?;

        let mut listed = Vec::with_capacity(index.posts.len());
        for metadata in index.posts {
            if self.validator.published(&metadata)? {
                listed.push(metadata);
            }
        }

        let mut posts = try_join_all(listed.iter().map(|metadata| self.load_post(metadata))).await?;

        // A post file may itself carry `published: false`.
        posts.retain(|post| post.published);
        let mut posts = self.validator.dedupe(posts)?;
        posts.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(posts)
    }

    async fn load_post(&self, metadata: &PostRecord) -> Result<Post> {
        let slug = self.validator.slug(metadata)?;
        let mut merged = match self.format {
            ContentFormat::Json => {
                let record = self.fetch_record(&slug).await?;
                merge_records(metadata, &record)
            }
            ContentFormat::Markdown => {
                let markup = self.fetch_document(&slug).await?;
                let mut merged = metadata.clone();
                merged.insert("content".to_string(), Value::String(markup.to_string()));
                merged
            }
        };
        // The slug names the fetched resource, so a post file cannot rename it.
        merged.insert("slug".to_string(), Value::String(slug));
        Ok(self.validator.post(&merged)?)
    }

    async fn fetch_record(&self, slug: &str) -> Result<Arc<PostRecord>> {
        if let Some(record) = self.records.get(slug) {
            debug!(slug, "post record cache hit");
            return Ok(record);
        }
        let record = Arc::new(self.client.get_post_record(slug).await?);
        self.records.insert(slug, Arc::clone(&record));
        Ok(record)
    }

    async fn fetch_document(&self, slug: &str) -> Result<Arc<String>> {
        if let Some(markup) = self.documents.get(slug) {
            debug!(slug, "markdown cache hit");
            return Ok(markup);
        }
        let markdown = self.client.get_post_markdown(slug).await?;
        let markup = Arc::new(markdown_to_html(&markdown));
        self.documents.insert(slug, Arc::clone(&markup));
        Ok(markup)
    }

    /// Body of one post. A failed fetch yields placeholder content.
    pub async fn get_post_content(&self, slug: &str) -> Content {
        match self.load_content(slug).await {
            Ok(content) => content,
            Err(error) => {
                warn!(slug, %error, "loading post content failed");
                Content::Markup(PLACEHOLDER_CONTENT.to_string())
            }
        }
    }

    /// Body of a post taken from `get_posts`. Where `get_post_content` would
    /// give the placeholder, the content the post was listed with is used.
    pub async fn content_for(&self, post: &Post) -> Content {
        match self.get_post_content(&post.slug).await {
            Content::Markup(markup) if markup == PLACEHOLDER_CONTENT => {
                debug!(slug = post.slug.as_str(), "using listed content");
                post.content.clone()
            }
            content => content,
        }
    }

    async fn load_content(&self, slug: &str) -> Result<Content> {
        match self.format {
            ContentFormat::Json => {
                let record = self.fetch_record(slug).await?;
                if record.contains_key("content") {
                    Ok(self.validator.content(&record)?)
                } else {
                    let excerpt = record.get("excerpt").and_then(Value::as_str);
                    Ok(match excerpt {
                        Some(excerpt) => Validator::coming_soon(excerpt),
                        None => Content::Markup(PLACEHOLDER_CONTENT.to_string()),
                    })
                }
            }
            ContentFormat::Markdown => {
                let markup = self.fetch_document(slug).await?;
                Ok(Content::Markup(markup.to_string()))
            }
        }
    }

    /// Drop every cached entry. In-flight fetches are unaffected.
    pub fn clear_cache(&self) {
        self.records.clear();
        self.documents.clear();
        info!("cache cleared");
    }

    /// Whether the metadata index is reachable.
    pub async fn check_connection(&self) -> bool {
        match self.client.probe_metadata().await {
            Ok(()) => true,
            Err(error) => {
                debug!(%error, "connection probe failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::types::ContentBlock;
    use httpmock::MockServer;
    use serde_json::json;
    use std::time::Duration;

    fn config(server: &MockServer) -> Config {
        let mut config = Config::default();
        config.source.base_url = Some(server.base_url());
        config.http.timeout_secs = 5;
        config
    }

    fn store(server: &MockServer) -> ContentStore {
        ContentStore::new(&config(server)).unwrap()
    }

    fn metadata_body() -> String {
        json!({
            "posts": [
                {"id": 1, "slug": "a", "title": "Alpha", "excerpt": "first", "category": "Projects", "date": "2024-01-10"},
                {"id": 2, "slug": "b", "title": "Beta", "excerpt": "second", "category": "Projects", "date": "2024-02-10", "published": false},
                {"id": 3, "slug": "c", "title": "Gamma", "excerpt": "third", "category": "Learning Tips", "date": "2024-03-10"}
            ]
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_get_posts_skips_unpublished_and_sorts() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path("/data/posts-metadata.json");
            then.status(200)
                .header("content-type", "application/json")
                .body(metadata_body());
        });
        let post_a = server.mock(|when, then| {
            when.method("GET").path("/posts/a.json");
            then.status(200)
                .body(r#"{"title": "Alpha (full)", "content": [{"type": "paragraph", "text": "hi"}]}"#);
        });
        let post_b = server.mock(|when, then| {
            when.method("GET").path("/posts/b.json");
            then.status(200).body("{}");
        });
        server.mock(|when, then| {
            when.method("GET").path("/posts/c.json");
            then.status(200).body(r#"{"content": "<p>c</p>"}"#);
        });

        let posts = store(&server).get_posts().await;

        let slugs: Vec<&str> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["c", "a"]);
        assert_eq!(posts[1].title, "Alpha (full)");
        assert_eq!(
            posts[1].content,
            Content::Blocks(vec![ContentBlock::Paragraph {
                text: "hi".to_string()
            }])
        );
        post_a.assert_hits(1);
        post_b.assert_hits(0);
    }

    #[tokio::test]
    async fn test_same_date_keeps_metadata_order() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path("/data/posts-metadata.json");
            then.status(200).body(
                json!({
                    "posts": [
                        {"id": 1, "slug": "m", "title": "Mu", "excerpt": "x", "category": "Projects", "date": "2024-01-10"},
                        {"id": 2, "slug": "k", "title": "Kappa", "excerpt": "x", "category": "Projects", "date": "2024-01-10"},
                        {"id": 3, "slug": "z", "title": "Zeta", "excerpt": "x", "category": "Projects", "date": "2024-02-01"},
                        {"id": 4, "slug": "b", "title": "Beta", "excerpt": "x", "category": "Projects", "date": "2024-01-10"}
                    ]
                })
                .to_string(),
            );
        });
        for slug in ["m", "k", "z", "b"] {
            server.mock(|when, then| {
                when.method("GET").path(format!("/posts/{}.json", slug));
                then.status(200).body("{}");
            });
        }

        let posts = store(&server).get_posts().await;
        let slugs: Vec<&str> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["z", "m", "k", "b"]);
    }

    #[tokio::test]
    async fn test_post_file_cannot_rename_slug() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path("/data/posts-metadata.json");
            then.status(200).body(
                json!({"posts": [{"id": 1, "slug": "a", "title": "Alpha", "excerpt": "x", "category": "Projects", "date": "2024-01-10"}]})
                    .to_string(),
            );
        });
        let post_a = server.mock(|when, then| {
            when.method("GET").path("/posts/a.json");
            then.status(200)
                .body(r#"{"slug": "renamed", "content": "<p>body</p>"}"#);
        });

        let store = store(&server);
        let posts = store.get_posts().await;
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, "a");

        let content = store.get_post_content(&posts[0].slug).await;
        assert_eq!(content, Content::Markup("<p>body</p>".to_string()));
        post_a.assert_hits(1);
    }

    #[tokio::test]
    async fn test_content_for_uses_listed_content_offline() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET");
            then.status(500);
        });

        let store = store(&server);
        let posts = store.get_posts().await;
        assert_eq!(posts, fallback_posts());
        assert_eq!(store.content_for(&posts[0]).await, posts[0].content);
    }

    #[tokio::test]
    async fn test_metadata_server_error_falls_back() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path("/data/posts-metadata.json");
            then.status(500);
        });

        let posts = store(&server).get_posts().await;
        let ids: Vec<u64> = posts.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(posts, fallback_posts());
    }

    #[tokio::test]
    async fn test_one_failed_post_falls_back_entirely() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path("/data/posts-metadata.json");
            then.status(200).body(metadata_body());
        });
        server.mock(|when, then| {
            when.method("GET").path("/posts/a.json");
            then.status(200).body("{}");
        });
        server.mock(|when, then| {
            when.method("GET").path("/posts/c.json");
            then.status(404);
        });

        let posts = store(&server).get_posts().await;
        assert_eq!(posts, fallback_posts());
    }

    #[tokio::test]
    async fn test_malformed_metadata_falls_back() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path("/data/posts-metadata.json");
            then.status(200).body("{\"posts\": [");
        });

        assert_eq!(store(&server).get_posts().await, fallback_posts());
    }

    #[tokio::test]
    async fn test_post_content_is_cached() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("GET").path("/posts/a.json");
            then.status(200).body(r#"{"content": "<p>cached</p>"}"#);
        });

        let store = store(&server);
        let first = store.get_post_content("a").await;
        let second = store.get_post_content("a").await;

        assert_eq!(first, Content::Markup("<p>cached</p>".to_string()));
        assert_eq!(first, second);
        mock.assert_hits(1);
    }

    #[tokio::test]
    async fn test_post_content_refetched_after_expiry() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("GET").path("/posts/a.json");
            then.status(200).body(r#"{"content": "<p>fresh</p>"}"#);
        });

        let mut config = config(&server);
        config.cache.timeout_secs = 0;
        let store = ContentStore::new(&config).unwrap();

        store.get_post_content("a").await;
        tokio::time::sleep(Duration::from_millis(20)).await;
        store.get_post_content("a").await;

        mock.assert_hits(2);
    }

    #[tokio::test]
    async fn test_clear_cache_forces_refetch() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("GET").path("/posts/a.json");
            then.status(200).body(r#"{"content": "<p>x</p>"}"#);
        });

        let store = store(&server);
        store.get_post_content("a").await;
        store.clear_cache();
        store.get_post_content("a").await;

        mock.assert_hits(2);
    }

    #[tokio::test]
    async fn test_post_content_failure_is_placeholder() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path("/posts/missing.json");
            then.status(404);
        });

        let content = store(&server).get_post_content("missing").await;
        assert_eq!(content, Content::Markup(PLACEHOLDER_CONTENT.to_string()));
    }

    #[tokio::test]
    async fn test_record_without_content_uses_excerpt() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path("/posts/a.json");
            then.status(200).body(r#"{"excerpt": "Soon <b>"}"#);
        });

        let content = store(&server).get_post_content("a").await;
        assert_eq!(
            content,
            Content::Markup(
                "<p>Soon &lt;b&gt;</p><p><em>Full post content coming soon!</em></p>".to_string()
            )
        );
    }

    #[tokio::test]
    async fn test_markdown_format() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path("/data/posts-metadata.json");
            then.status(200).body(
                json!({"posts": [{"id": 1, "slug": "a", "title": "Alpha", "excerpt": "x", "category": "Projects", "date": "2024-01-10"}]})
                    .to_string(),
            );
        });
        let md = server.mock(|when, then| {
            when.method("GET").path("/posts/a.md");
            then.status(200).body("# Hello\n\nWorld");
        });

        let mut config = config(&server);
        config.source.content_format = ContentFormat::Markdown;
        let store = ContentStore::new(&config).unwrap();

        let posts = store.get_posts().await;
        assert_eq!(posts.len(), 1);
        assert_eq!(
            posts[0].content,
            Content::Markup("<h1>Hello</h1>\n<p>World</p>\n".to_string())
        );

        // Served from the cache filled by get_posts.
        let content = store.get_post_content("a").await;
        assert_eq!(content, posts[0].content);
        md.assert_hits(1);
    }

    #[tokio::test]
    async fn test_check_connection() {
        let server = MockServer::start();
        let probe = server.mock(|when, then| {
            when.method("HEAD").path("/data/posts-metadata.json");
            then.status(200);
        });
        assert!(store(&server).check_connection().await);
        probe.assert_hits(1);

        let down = MockServer::start();
        down.mock(|when, then| {
            when.method("HEAD").path("/data/posts-metadata.json");
            then.status(503);
        });
        assert!(!store(&down).check_connection().await);
    }
}
