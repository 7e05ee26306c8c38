// List rendering for posts, categories and the archive.
// Provides styled list views with loading and empty states.

use ratatui::{prelude::*, widgets::*};

use crate::app::ArchiveItem;
use crate::content::{Post, SkillLevel, category_icon};
use crate::state::SelectableList;

fn skill_color(level: SkillLevel) -> Color {
    match level {
        SkillLevel::Beginner => Color::Green,
        SkillLevel::Intermediate => Color::Yellow,
        SkillLevel::Advanced => Color::Red,
    }
}

fn highlighted<'a>(list: List<'a>) -> List<'a> {
    list.highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("> ")
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "post" } else { "posts" }
}

/// Render a loading indicator.
pub fn render_loading(frame: &mut Frame, area: Rect, message: &str) {
    let text = Paragraph::new(format!("⏳ {}...", message))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Yellow));
    frame.render_widget(text, area);
}

/// Render an empty state message.
pub fn render_empty(frame: &mut Frame, area: Rect, message: &str) {
    let text = Paragraph::new(message)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(text, area);
}

/// A card for a post: title, metadata, then the excerpt.
fn post_card(post: &Post) -> ListItem<'static> {
    let title = Line::from(vec![
        Span::raw(format!("{} ", post.display_icon())),
        Span::styled(
            post.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ]);
    let meta = Line::from(vec![
        Span::raw("   "),
        Span::styled(post.category.clone(), Style::default().fg(Color::Cyan)),
        Span::styled(" · ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            post.skill_level.to_string(),
            Style::default().fg(skill_color(post.skill_level)),
        ),
        Span::styled(
            format!(" · {} · {}", post.display_date(), post.read_time),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    let excerpt = Line::from(Span::styled(
        format!("   {}", post.excerpt),
        Style::default().fg(Color::Gray),
    ));
    ListItem::new(vec![title, meta, excerpt, Line::from("")])
}

/// Render the current page of posts.
pub fn render_posts_list(frame: &mut Frame, list: &mut SelectableList<Post>, area: Rect) {
    if list.is_empty() {
        render_empty(frame, area, "No posts found. Press Esc to clear the filter.");
        return;
    }

    let items: Vec<ListItem> = list.items.iter().map(post_card).collect();
    let widget = highlighted(List::new(items).block(Block::default().borders(Borders::ALL)));
    frame.render_stateful_widget(widget, area, &mut list.list_state);
}

/// Render categories with post counts.
pub fn render_categories_list(
    frame: &mut Frame,
    list: &mut SelectableList<(String, usize)>,
    area: Rect,
) {
    if list.is_empty() {
        render_empty(frame, area, "No categories");
        return;
    }

    let items: Vec<ListItem> = list
        .items
        .iter()
        .map(|(category, count)| {
            ListItem::new(Line::from(vec![
                Span::raw(format!("{} ", category_icon(category))),
                Span::raw(category.clone()),
                Span::styled(
                    format!("  ({} {})", count, plural(*count)),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let widget = highlighted(
        List::new(items).block(Block::default().borders(Borders::ALL).title(" Categories ")),
    );
    frame.render_stateful_widget(widget, area, &mut list.list_state);
}

/// Render the rows of the current archive level under its title.
pub fn render_archive_list(
    frame: &mut Frame,
    list: &mut SelectableList<ArchiveItem>,
    title: &str,
    area: Rect,
) {
    if list.is_empty() {
        render_empty(frame, area, "No posts in the archive");
        return;
    }

    let items: Vec<ListItem> = list
        .items
        .iter()
        .map(|item| match item {
            ArchiveItem::Year { year, count } => ListItem::new(Line::from(vec![
                Span::styled(
                    format!("📅 {}", year),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  ({} {})", count, plural(*count)),
                    Style::default().fg(Color::DarkGray),
                ),
            ])),
            ArchiveItem::Month { name, count, .. } => ListItem::new(Line::from(vec![
                Span::raw(name.to_string()),
                Span::styled(
                    format!("  ({} {})", count, plural(*count)),
                    Style::default().fg(Color::DarkGray),
                ),
            ])),
            ArchiveItem::Post(post) => ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:>8}  ", post.date.format("%b %-d").to_string()),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(post.title.clone()),
            ])),
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", title));
    let widget = highlighted(List::new(items).block(block));
    frame.render_stateful_widget(widget, area, &mut list.list_state);
}
