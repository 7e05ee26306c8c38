// UI module for rendering the TUI.
// Contains widgets for tabs, the header line, lists and modals.

mod breadcrumb;
mod list;
mod modal;
mod tabs;

use ratatui::{prelude::*, widgets::*};

use crate::app::{App, Tab};
use crate::state::page_count;

/// Main draw function that renders the entire UI.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Length(2), // Header
            Constraint::Min(1),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    tabs::draw_tabs(frame, app, chunks[0]);
    draw_header(frame, app, chunks[1]);
    draw_content(frame, app, chunks[2]);
    draw_status_bar(frame, app, chunks[3]);

    // Overlays, topmost last
    if let Some(view) = &app.post_view {
        modal::draw_post_modal(frame, view);
    }
    if app.search_active {
        modal::draw_search_modal(frame, &app.search_input);
    }
    if app.show_help {
        draw_help_overlay(frame, app);
    }
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    match app.active_tab {
        Tab::Posts => {
            let state = app.blog.state();
            let pages = page_count(app.visible_total, app.config.content.posts_per_page);
            let detail = format!(
                "Page {}/{} · {} posts",
                state.current_page + 1,
                pages,
                app.visible_total
            );
            breadcrumb::draw_section_title(frame, &state.section_title(), Some(detail), area);
        }
        Tab::Categories => {
            let detail = format!("{} categories", app.categories.len());
            breadcrumb::draw_section_title(frame, "Categories", Some(detail), area);
        }
        Tab::Archive => {
            breadcrumb::draw_breadcrumb(frame, &app.archive_nav.breadcrumbs(), area);
        }
    }
}

/// Draw the main content area based on active tab.
fn draw_content(frame: &mut Frame, app: &mut App, area: Rect) {
    if app.blog.state().loading && app.blog.state().posts.is_empty() {
        list::render_loading(frame, area, "Loading posts");
        return;
    }

    match app.active_tab {
        Tab::Posts => list::render_posts_list(frame, &mut app.posts, area),
        Tab::Categories => list::render_categories_list(frame, &mut app.categories, area),
        Tab::Archive => {
            let title = app.archive_nav.current().title();
            list::render_archive_list(frame, &mut app.archive_items, &title, area)
        }
    }
}

/// Draw the status bar with keybinding hints, errors and connection state.
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let state = app.blog.state();
    let features = &app.config.features;

    let mut spans = if let Some(error) = &state.error {
        vec![Span::styled(
            format!(" ❌ {}", error),
            Style::default().fg(Color::Red),
        )]
    } else {
        let mut hints = vec![
            Span::raw(" ↑↓ "),
            Span::styled("Navigate", Style::default().fg(Color::DarkGray)),
            Span::raw("  ↵ "),
            Span::styled("Open", Style::default().fg(Color::DarkGray)),
            Span::raw("  Esc "),
            Span::styled("Back", Style::default().fg(Color::DarkGray)),
        ];
        if features.search {
            hints.push(Span::raw("  / "));
            hints.push(Span::styled("Search", Style::default().fg(Color::DarkGray)));
        }
        hints.extend([
            Span::raw("  n/p "),
            Span::styled("Page", Style::default().fg(Color::DarkGray)),
            Span::raw("  ? "),
            Span::styled("Help", Style::default().fg(Color::DarkGray)),
            Span::raw("  q "),
            Span::styled("Quit", Style::default().fg(Color::DarkGray)),
        ]);
        hints
    };

    let (label, color) = if state.loading || app.online.is_loading() {
        ("loading", Color::Yellow)
    } else {
        match app.online.data() {
            Some(true) => ("online", Color::Green),
            Some(false) => ("offline · sample posts", Color::Red),
            None => ("", Color::DarkGray),
        }
    };
    if !label.is_empty() {
        spans.push(Span::styled(format!("  [{}]", label), Style::default().fg(color)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Draw the help overlay.
fn draw_help_overlay(frame: &mut Frame, app: &App) {
    let features = &app.config.features;
    let area = frame.area();

    let mut bindings = vec![
        ("↑/↓ or j/k", "Navigate list / scroll post"),
        ("Enter", "Open post / select / drill down"),
        ("Esc", "Go back / clear filter / close"),
        ("Tab", "Switch tabs"),
        ("n/p or →/←", "Next/previous page"),
    ];
    if features.search {
        bindings.push(("/", "Search posts"));
    }
    if features.categories {
        bindings.push(("c", "Cycle category filter"));
    }
    if features.skill_levels {
        bindings.push(("l", "Cycle skill level filter"));
    }
    bindings.extend([
        ("r", "Reload posts"),
        ("x", "Clear cache and reload"),
        ("?", "Show/hide this help"),
        ("q", "Quit"),
    ]);

    let mut help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
    ];
    help_text.extend(bindings.into_iter().map(|(key, action)| {
        Line::from(vec![
            Span::styled(format!("  {:<14}", key), Style::default().fg(Color::Cyan)),
            Span::raw(action),
        ])
    }));
    help_text.push(Line::from(""));
    help_text.push(Line::from(vec![
        Span::styled("Press ", Style::default().fg(Color::DarkGray)),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::styled(" or ", Style::default().fg(Color::DarkGray)),
        Span::styled("?", Style::default().fg(Color::Yellow)),
        Span::styled(" to close", Style::default().fg(Color::DarkGray)),
    ]));

    // Create a centered popup
    let popup_width = 55.min(area.width);
    let popup_height = (help_text.len() as u16 + 2).min(area.height);
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let help_paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help ")
                .title_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
        )
        .alignment(Alignment::Left);

    frame.render_widget(help_paragraph, popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::content::{ContentStore, fallback_posts};
    use crate::app::AppEvent;
    use ratatui::backend::TestBackend;
    use std::sync::Arc;

    fn screen(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn app() -> App {
        let config = Config::default();
        let store = Arc::new(ContentStore::new(&config).unwrap());
        App::new(config, store)
    }

    #[test]
    fn test_draw_loaded_posts() {
        let mut app = app();
        app.apply(AppEvent::PostsLoaded(fallback_posts()));
        let text = screen(&mut app);
        assert!(text.contains("Featured Posts"));
        assert!(text.contains("Page 1/1"));
        assert!(text.contains(&fallback_posts()[0].title));
    }

    #[test]
    fn test_draw_loading() {
        let mut app = app();
        app.blog.update(|s| s.loading = true);
        assert!(screen(&mut app).contains("Loading posts"));
    }

    #[test]
    fn test_draw_error_line() {
        let mut app = app();
        app.apply(AppEvent::PostsLoaded(fallback_posts()));
        app.open_post(404);
        assert!(screen(&mut app).contains("Post not found"));
    }

    #[test]
    fn test_draw_archive_level_title() {
        let mut app = app();
        app.apply(AppEvent::PostsLoaded(fallback_posts()));
        app.active_tab = Tab::Archive;
        app.archive_nav.push(crate::state::ViewLevel::Posts {
            year: 2023,
            month: 11,
        });
        assert!(screen(&mut app).contains("November 2023"));
    }

    #[test]
    fn test_draw_offline_status() {
        let mut app = app();
        app.apply(AppEvent::PostsLoaded(fallback_posts()));
        app.apply(AppEvent::ConnectionChecked(false));
        assert!(screen(&mut app).contains("offline · sample posts"));
    }
}
