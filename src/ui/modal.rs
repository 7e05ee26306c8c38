// Modal UI components.
// The search input and the post overlay, drawn over the current view.

use ratatui::{prelude::*, widgets::*};

use crate::app::PostView;

/// A rectangle of at most `width` x `height`, centered in `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn key_hint(key: &'static str, action: &'static str) -> [Span<'static>; 2] {
    [
        Span::styled(key, Style::default().fg(Color::Yellow)),
        Span::styled(action, Style::default().fg(Color::DarkGray)),
    ]
}

/// Draw the search input modal.
pub fn draw_search_modal(frame: &mut Frame, input: &str) {
    let modal_area = centered(frame.area(), 60, 5);

    // Clear the area behind the modal
    frame.render_widget(Clear, modal_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Input
            Constraint::Length(2), // Instructions
        ])
        .split(modal_area);

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Search Posts ");

    let input_line = Line::from(vec![
        Span::styled("Query: ", Style::default().fg(Color::DarkGray)),
        Span::raw(input),
        Span::styled("█", Style::default().fg(Color::Yellow)),
    ]);
    frame.render_widget(Paragraph::new(input_line).block(input_block), chunks[0]);

    let mut instructions = vec![Span::raw(" ")];
    instructions.extend(key_hint("Enter", " = Search  "));
    instructions.extend(key_hint("Esc", " = Cancel "));
    frame.render_widget(
        Paragraph::new(Line::from(instructions))
            .alignment(Alignment::Center)
            .style(Style::default().bg(Color::Black)),
        chunks[1],
    );
}

/// Draw the post overlay with its rendered body.
pub fn draw_post_modal(frame: &mut Frame, view: &PostView) {
    let area = frame.area();
    let modal_area = centered(
        area,
        area.width.saturating_sub(8).max(40),
        area.height.saturating_sub(4),
    );

    frame.render_widget(Clear, modal_area);

    let post = &view.post;
    let mut lines = vec![
        Line::from(Span::styled(
            post.title.clone(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!(
                "{} {} · {} · {} · {}",
                post.display_icon(),
                post.category,
                post.skill_level,
                post.display_date(),
                post.read_time
            ),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    if !post.tags.is_empty() {
        lines.push(Line::from(Span::styled(
            post.tags
                .iter()
                .map(|t| format!("#{}", t))
                .collect::<Vec<_>>()
                .join(" "),
            Style::default().fg(Color::Magenta),
        )));
    }
    lines.push(Line::from(""));
    lines.extend(view.body.iter().cloned());

    let mut footer = vec![Span::raw(" ")];
    footer.extend(key_hint("↑↓", " Scroll  "));
    footer.extend(key_hint("Esc", " Close "));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Post ")
        .title_bottom(Line::from(footer));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((view.scroll, 0));
    frame.render_widget(paragraph, modal_area);
}
