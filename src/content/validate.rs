// Ingestion boundary for post records.
// Turns untrusted JSON objects into validated `Post` values.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::error::ValidationError;
use crate::render::escape_html;

use super::types::{Content, Post, PostRecord, SkillLevel};

const WORDS_PER_MINUTE: usize = 200;

/// Merge a post record over its metadata entry; post fields win on conflict.
pub fn merge_records(metadata: &PostRecord, post: &PostRecord) -> PostRecord {
    let mut merged = metadata.clone();
    for (key, value) in post {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// Parse an ISO-8601 date or date-time into a calendar date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

/// Reading time estimate, e.g. "3 min read".
pub fn estimate_read_time(content: &Content) -> String {
    let words = content.plain_text().split_whitespace().count();
    let minutes = words.div_ceil(WORDS_PER_MINUTE).max(1);
    format!("{} min read", minutes)
}

fn is_url_safe(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Validates post records, strictly or with type coercion.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator {
    strict: bool,
}

impl Validator {
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    /// Validate a full post record.
    pub fn post(&self, record: &PostRecord) -> Result<Post, ValidationError> {
        let id = self.id(record)?;
        let title = self.required_string(record, "title")?;
        if title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        let excerpt = self.required_string(record, "excerpt")?;
        let category = self.required_string(record, "category")?;

        let raw_date = self.required_string(record, "date")?;
        let date = parse_date(&raw_date).ok_or(ValidationError::InvalidDate(raw_date))?;

        let content = match self.content(record) {
            Err(ValidationError::MissingField(_)) => Self::coming_soon(&excerpt),
            content => content?,
        };

        let skill_level = self.skill_level(record)?;
        let read_time = match self.optional_string(record, "readTime")? {
            Some(read_time) => read_time,
            None => estimate_read_time(&content),
        };
        let slug = self.slug(record)?;
        let published = self.published(record)?;
        let tags = self.tags(record)?;
        let icon = self.optional_string(record, "icon")?;

        Ok(Post {
            id,
            title,
            excerpt,
            content,
            category,
            skill_level,
            date,
            read_time,
            slug,
            published,
            tags,
            icon,
        })
    }

    /// The `content` field of a record.
    pub fn content(&self, record: &PostRecord) -> Result<Content, ValidationError> {
        match record.get("content") {
            None | Some(Value::Null) => Err(ValidationError::MissingField("content")),
            Some(value) => parse_content(value),
        }
    }

    /// Stand-in body for a post published without content.
    pub fn coming_soon(excerpt: &str) -> Content {
        Content::Markup(format!(
            "<p>{}</p><p><em>Full post content coming soon!</em></p>",
            escape_html(excerpt)
        ))
    }

    /// Whether a record should be listed. Absent means published.
    pub fn published(&self, record: &PostRecord) -> Result<bool, ValidationError> {
        let wrong = ValidationError::WrongType {
            field: "published",
            expected: "a boolean",
        };
        match record.get("published") {
            None | Some(Value::Null) => Ok(true),
            Some(Value::Bool(published)) => Ok(*published),
            Some(_) if self.strict => Err(wrong),
            Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Ok(true),
                "false" | "no" | "0" | "" => Ok(false),
                _ => Err(wrong),
            },
            Some(Value::Number(n)) => Ok(n.as_f64().is_some_and(|n| n != 0.0)),
            Some(_) => Err(wrong),
        }
    }

    /// The URL slug of a record, derived from the title when absent.
    pub fn slug(&self, record: &PostRecord) -> Result<String, ValidationError> {
        match self.optional_string(record, "slug")? {
            Some(slug) if is_url_safe(&slug) => Ok(slug),
            Some(_) if self.strict => Err(ValidationError::WrongType {
                field: "slug",
                expected: "a URL-safe string",
            }),
            Some(slug) => Ok(slug::slugify(slug)),
            None => {
                let title = self.required_string(record, "title")?;
                Ok(slug::slugify(title))
            }
        }
    }

    /// Enforce unique ids and slugs. Lenient mode keeps the first occurrence.
    pub fn dedupe(&self, posts: Vec<Post>) -> Result<Vec<Post>, ValidationError> {
        let mut ids = HashSet::new();
        let mut slugs = HashSet::new();
        let mut unique = Vec::with_capacity(posts.len());

        for post in posts {
            let error = if !ids.insert(post.id) {
                Some(ValidationError::DuplicateId(post.id))
            } else if !slugs.insert(post.slug.clone()) {
                ids.remove(&post.id);
                Some(ValidationError::DuplicateSlug(post.slug.clone()))
            } else {
                None
            };

            match error {
                Some(error) if self.strict => return Err(error),
                Some(error) => warn!(%error, "dropping duplicate post"),
                None => unique.push(post),
            }
        }
        Ok(unique)
    }

    fn id(&self, record: &PostRecord) -> Result<u64, ValidationError> {
        let wrong = ValidationError::WrongType {
            field: "id",
            expected: "a non-negative integer",
        };
        match record.get("id") {
            None | Some(Value::Null) => Err(ValidationError::MissingField("id")),
            Some(Value::Number(n)) => n.as_u64().ok_or(wrong),
            Some(Value::String(s)) if !self.strict => s.trim().parse().map_err(|_| wrong),
            Some(_) => Err(wrong),
        }
    }

    fn required_string(
        &self,
        record: &PostRecord,
        field: &'static str,
    ) -> Result<String, ValidationError> {
        self.optional_string(record, field)?
            .ok_or(ValidationError::MissingField(field))
    }

    fn optional_string(
        &self,
        record: &PostRecord,
        field: &'static str,
    ) -> Result<Option<String>, ValidationError> {
        match record.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(Value::Number(n)) if !self.strict => Ok(Some(n.to_string())),
            Some(Value::Bool(b)) if !self.strict => Ok(Some(b.to_string())),
            Some(_) => Err(ValidationError::WrongType {
                field,
                expected: "a string",
            }),
        }
    }

    fn skill_level(&self, record: &PostRecord) -> Result<SkillLevel, ValidationError> {
        match self.optional_string(record, "skillLevel")? {
            None => Ok(SkillLevel::default()),
            Some(level) => match SkillLevel::parse(&level) {
                Some(level) => Ok(level),
                None if self.strict => Err(ValidationError::WrongType {
                    field: "skillLevel",
                    expected: "beginner, intermediate or advanced",
                }),
                None => Ok(SkillLevel::default()),
            },
        }
    }

    fn tags(&self, record: &PostRecord) -> Result<Vec<String>, ValidationError> {
        let wrong = ValidationError::WrongType {
            field: "tags",
            expected: "a list of strings",
        };
        match record.get("tags") {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(items)) => {
                let mut tags = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::String(tag) => tags.push(tag.clone()),
                        _ if self.strict => return Err(wrong),
                        _ => {}
                    }
                }
                Ok(tags)
            }
            Some(Value::String(s)) if !self.strict => Ok(s
                .split(',')
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(str::to_string)
                .collect()),
            Some(_) => Err(wrong),
        }
    }
}

fn parse_content(value: &Value) -> Result<Content, ValidationError> {
    Content::deserialize(value).map_err(|_| ValidationError::WrongType {
        field: "content",
        expected: "a markup string or a list of content blocks",
    })
}
