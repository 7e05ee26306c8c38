// Blog content types.
// Validated posts, skill levels, and the structured content block union.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::{Map, Value};

use crate::render::strip_html;

use super::fallback::category_icon;

/// Raw JSON object as published, before validation.
pub type PostRecord = Map<String, Value>;

/// The manifest listing every post before its body is fetched.
#[derive(Debug, Clone, Deserialize)]
pub struct MetadataIndex {
    pub posts: Vec<PostRecord>,
}

/// Audience level of a post.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl SkillLevel {
    pub const ALL: [SkillLevel; 3] = [
        SkillLevel::Beginner,
        SkillLevel::Intermediate,
        SkillLevel::Advanced,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SkillLevel::Beginner => "beginner",
            SkillLevel::Intermediate => "intermediate",
            SkillLevel::Advanced => "advanced",
        }
    }

    /// Case-insensitive parse.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "beginner" => Some(SkillLevel::Beginner),
            "intermediate" => Some(SkillLevel::Intermediate),
            "advanced" => Some(SkillLevel::Advanced),
            _ => None,
        }
    }
}

impl std::fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordering of a list block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListStyle {
    Ordered,
    #[default]
    Unordered,
}

/// One typed unit of structured body content.
///
/// `Unknown` keeps blocks written by a newer publisher renderable: their type
/// name is preserved and shown as a placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentBlock {
    Heading {
        level: u8,
        text: String,
    },
    Paragraph {
        text: String,
    },
    Code {
        language: Option<String>,
        code: String,
    },
    List {
        style: ListStyle,
        items: Vec<String>,
    },
    Image {
        src: String,
        alt: Option<String>,
        caption: Option<String>,
    },
    Quote {
        text: String,
        author: Option<String>,
    },
    Unknown {
        kind: String,
    },
}

const KNOWN_BLOCK_TYPES: [&str; 6] = ["heading", "paragraph", "code", "list", "image", "quote"];

/// Wire shape of the block types this version understands.
#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum KnownBlock {
    Heading {
        level: i64,
        text: String,
    },
    Paragraph {
        text: String,
    },
    Code {
        language: Option<String>,
        code: String,
    },
    List {
        #[serde(default)]
        style: ListStyle,
        #[serde(default)]
        items: Vec<String>,
    },
    Image {
        src: String,
        alt: Option<String>,
        caption: Option<String>,
    },
    Quote {
        text: String,
        author: Option<String>,
    },
}

impl From<KnownBlock> for ContentBlock {
    fn from(block: KnownBlock) -> Self {
        match block {
            KnownBlock::Heading { level, text } => ContentBlock::Heading {
                level: level.clamp(1, 6) as u8,
                text,
            },
            KnownBlock::Paragraph { text } => ContentBlock::Paragraph { text },
            KnownBlock::Code { language, code } => ContentBlock::Code { language, code },
            KnownBlock::List { style, items } => ContentBlock::List { style, items },
            KnownBlock::Image { src, alt, caption } => ContentBlock::Image { src, alt, caption },
            KnownBlock::Quote { text, author } => ContentBlock::Quote { text, author },
        }
    }
}

impl<'de> Deserialize<'de> for ContentBlock {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let kind = match value.get("type") {
            Some(Value::String(kind)) => kind.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        };

        if !KNOWN_BLOCK_TYPES.contains(&kind.as_str()) {
            return Ok(ContentBlock::Unknown { kind });
        }

        KnownBlock::deserialize(value)
            .map(ContentBlock::from)
            .map_err(de::Error::custom)
    }
}

impl ContentBlock {
    /// Text that a reader would see, for indexing.
    pub fn plain_text(&self) -> String {
        match self {
            ContentBlock::Heading { text, .. } | ContentBlock::Paragraph { text } => text.clone(),
            ContentBlock::Code { code, .. } => code.clone(),
            ContentBlock::List { items, .. } => items.join(" "),
            ContentBlock::Image { alt, caption, .. } => [alt.as_deref(), caption.as_deref()]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" "),
            ContentBlock::Quote { text, author } => match author {
                Some(author) => format!("{} {}", text, author),
                None => text.clone(),
            },
            ContentBlock::Unknown { .. } => String::new(),
        }
    }
}

/// A post body: trusted markup, or a sequence of typed blocks.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Content {
    Markup(String),
    Blocks(Vec<ContentBlock>),
}

impl Default for Content {
    fn default() -> Self {
        Content::Markup(String::new())
    }
}

impl Content {
    /// Body text without markup, for search and word counts.
    pub fn plain_text(&self) -> String {
        match self {
            Content::Markup(markup) => strip_html(markup),
            Content::Blocks(blocks) => blocks
                .iter()
                .map(ContentBlock::plain_text)
                .filter(|text| !text.is_empty())
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// A validated blog post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub excerpt: String,
    pub content: Content,
    pub category: String,
    pub skill_level: SkillLevel,
    pub date: NaiveDate,
    pub read_time: String,
    pub slug: String,
    pub published: bool,
    pub tags: Vec<String>,
    pub icon: Option<String>,
}

impl Post {
    /// Icon to show on the post card, from the post or its category.
    pub fn display_icon(&self) -> &str {
        self.icon
            .as_deref()
            .unwrap_or_else(|| category_icon(&self.category))
    }

    /// Long-form date, e.g. "November 15, 2023".
    pub fn display_date(&self) -> String {
        self.date.format("%B %-d, %Y").to_string()
    }
}
