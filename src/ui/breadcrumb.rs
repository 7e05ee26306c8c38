// Header line above the content area.
// Shows the archive breadcrumb trail, or a section title with page info.

use ratatui::{prelude::*, widgets::*};

use crate::state::BreadcrumbNode;

/// Render the breadcrumb trail.
pub fn draw_breadcrumb(frame: &mut Frame, breadcrumbs: &[BreadcrumbNode], area: Rect) {
    let mut spans = Vec::new();

    for (i, node) in breadcrumbs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" > ", Style::default().fg(Color::DarkGray)));
        }

        let style = if i == breadcrumbs.len() - 1 {
            // Current level is highlighted
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };

        spans.push(Span::styled(node.label.clone(), style));
    }

    draw_header(frame, Line::from(spans), None, area);
}

/// Render a section title, with optional detail text on the right.
pub fn draw_section_title(frame: &mut Frame, title: &str, detail: Option<String>, area: Rect) {
    let line = Line::from(Span::styled(
        title.to_string(),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ));
    draw_header(frame, line, detail, area);
}

fn draw_header(frame: &mut Frame, line: Line, detail: Option<String>, area: Rect) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray));

    frame.render_widget(Paragraph::new(line).block(block), area);

    if let Some(detail) = detail {
        let detail = Paragraph::new(Line::from(Span::styled(
            detail,
            Style::default().fg(Color::DarkGray),
        )))
        .alignment(Alignment::Right);
        frame.render_widget(
            detail,
            Rect {
                x: area.x,
                y: area.y,
                width: area.width,
                height: 1,
            },
        );
    }
}
