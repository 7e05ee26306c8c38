// Terminal rendering of post bodies.
// Maps content blocks onto styled ratatui lines for the post overlay.

use ratatui::prelude::*;

use crate::content::{Content, ContentBlock, ListStyle};

use super::html::strip_html;

const BLOCK_BREAKS: [&str; 14] = [
    "</p>", "<br>", "<br/>", "<br />", "</h1>", "</h2>", "</h3>", "</h4>", "</h5>", "</h6>",
    "</li>", "</pre>", "</blockquote>", "</figure>",
];

/// Convert trusted markup to readable text, one paragraph per line.
pub fn markup_to_text(markup: &str) -> String {
    let mut text = markup.to_string();
    for tag in BLOCK_BREAKS {
        text = text.replace(tag, &format!("{}\n", tag));
    }
    let stripped = strip_html(&text);

    let mut lines: Vec<&str> = Vec::new();
    for line in stripped.lines().map(str::trim_end) {
        if line.trim().is_empty() && lines.last().is_none_or(|prev| prev.trim().is_empty()) {
            continue;
        }
        lines.push(line);
    }
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

/// Render a post body to terminal lines.
pub fn to_lines(content: &Content) -> Vec<Line<'static>> {
    match content {
        Content::Markup(markup) => markup_to_text(markup)
            .lines()
            .map(|line| Line::from(line.to_string()))
            .collect(),
        Content::Blocks(blocks) => {
            let mut lines = Vec::new();
            for (i, block) in blocks.iter().enumerate() {
                if i > 0 {
                    lines.push(Line::from(""));
                }
                lines.extend(block_lines(block));
            }
            lines
        }
    }
}

fn block_lines(block: &ContentBlock) -> Vec<Line<'static>> {
    match block {
        ContentBlock::Heading { level, text } => {
            let style = Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD);
            vec![Line::from(Span::styled(
                format!("{} {}", "#".repeat(*level as usize), text),
                style,
            ))]
        }
        ContentBlock::Paragraph { text } => {
            text.lines().map(|l| Line::from(l.to_string())).collect()
        }
        ContentBlock::Code { language, code } => {
            let mut lines = vec![Line::from(Span::styled(
                format!("── {} ──", language.as_deref().unwrap_or("text")),
                Style::default().fg(Color::DarkGray),
            ))];
            lines.extend(code.lines().map(|l| {
                Line::from(Span::styled(
                    format!("  {}", l),
                    Style::default().fg(Color::Green),
                ))
            }));
            lines
        }
        ContentBlock::List { style, items } => items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let marker = match style {
                    ListStyle::Ordered => format!("{}.", i + 1),
                    ListStyle::Unordered => "•".to_string(),
                };
                Line::from(vec![
                    Span::styled(format!("  {} ", marker), Style::default().fg(Color::Yellow)),
                    Span::raw(item.clone()),
                ])
            })
            .collect(),
        ContentBlock::Image { src, alt, caption } => {
            let label = alt.as_deref().filter(|a| !a.is_empty()).unwrap_or("image");
            let mut lines = vec![Line::from(vec![
                Span::styled(format!("[{}]", label), Style::default().fg(Color::Magenta)),
                Span::styled(format!(" {}", src), Style::default().fg(Color::DarkGray)),
            ])];
            if let Some(caption) = caption {
                lines.push(Line::from(Span::styled(
                    caption.clone(),
                    Style::default().add_modifier(Modifier::ITALIC),
                )));
            }
            lines
        }
        ContentBlock::Quote { text, author } => {
            let style = Style::default().add_modifier(Modifier::ITALIC);
            let mut lines: Vec<Line<'static>> = text
                .lines()
                .map(|l| {
                    Line::from(vec![
                        Span::styled("│ ", Style::default().fg(Color::DarkGray)),
                        Span::styled(l.to_string(), style),
                    ])
                })
                .collect();
            if let Some(author) = author {
                lines.push(Line::from(Span::styled(
                    format!("  — {}", author),
                    Style::default().fg(Color::DarkGray),
                )));
            }
            lines
        }
        ContentBlock::Unknown { kind } => vec![Line::from(Span::styled(
            format!("[Unknown content type: {}]", kind),
            Style::default().fg(Color::DarkGray),
        ))],
    }
}
