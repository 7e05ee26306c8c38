// HTML rendering of post bodies.
// Block text is escaped; plain markup strings are trusted and returned unchanged.

use pulldown_cmark::{Options, Parser, html};
use url::{ParseError, Url};

use crate::content::{Content, ContentBlock, ListStyle};

/// Escape text for use in element content or a quoted attribute.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Strip HTML tags from a string and decode the common entities.
pub fn strip_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut in_tag = false;

    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    result
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Convert markdown to markup.
pub fn markdown_to_html(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
    let parser = Parser::new_ext(markdown, options);
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Accept http(s) URLs and relative references; reject every other scheme.
pub fn is_safe_image_src(src: &str) -> bool {
    match Url::parse(src.trim()) {
        Ok(url) => matches!(url.scheme(), "http" | "https"),
        Err(ParseError::RelativeUrlWithoutBase) => !src.trim().is_empty(),
        Err(_) => false,
    }
}

/// Render a post body to markup.
pub fn render(content: &Content) -> String {
    match content {
        Content::Markup(markup) => markup.clone(),
        Content::Blocks(blocks) => blocks
            .iter()
            .map(render_block)
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Render one content block.
pub fn render_block(block: &ContentBlock) -> String {
    match block {
        ContentBlock::Heading { level, text } => {
            format!("<h{0}>{1}</h{0}>", level, escape_html(text))
        }
        ContentBlock::Paragraph { text } => format!("<p>{}</p>", escape_html(text)),
        ContentBlock::Code { language, code } => format!(
            r#"<pre><code class="language-{}">{}</code></pre>"#,
            escape_html(language.as_deref().unwrap_or("text")),
            escape_html(code)
        ),
        ContentBlock::List { style, items } => {
            let tag = match style {
                ListStyle::Ordered => "ol",
                ListStyle::Unordered => "ul",
            };
            let items: String = items
                .iter()
                .map(|item| format!("<li>{}</li>", escape_html(item)))
                .collect();
            format!("<{0}>{1}</{0}>", tag, items)
        }
        ContentBlock::Image { src, alt, caption } => {
            if !is_safe_image_src(src) {
                return placeholder("Image omitted: unsupported source");
            }
            let caption = caption
                .as_deref()
                .map(|c| format!("<figcaption>{}</figcaption>", escape_html(c)))
                .unwrap_or_default();
            format!(
                r#"<figure><img src="{}" alt="{}">{}</figure>"#,
                escape_html(src.trim()),
                escape_html(alt.as_deref().unwrap_or("")),
                caption
            )
        }
        ContentBlock::Quote { text, author } => {
            let cite = author
                .as_deref()
                .map(|a| format!("<cite>— {}</cite>", escape_html(a)))
                .unwrap_or_default();
            format!("<blockquote>{}{}</blockquote>", escape_html(text), cite)
        }
        ContentBlock::Unknown { kind } => {
            placeholder(&format!("Unknown content type: {}", kind))
        }
    }
}

fn placeholder(message: &str) -> String {
    format!(
        r#"<p class="content-placeholder">{}</p>"#,
        escape_html(message)
    )
}
