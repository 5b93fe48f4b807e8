use ratatui::Frame;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::theme::Theme;
use crate::view::{centered_rect, truncate};

/// Delete confirmation dialog.
pub fn render_delete(f: &mut Frame, id: u32, company: &str, theme: &Theme) {
    let popup = centered_rect(52, 6, f.area());

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  Delete {} (#{id})?", truncate(company, 28)),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled(
                "  y/Enter",
                Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
            ),
            Span::styled(": delete   ", Style::default().fg(theme.dim)),
            Span::styled(
                "n/Esc",
                Style::default()
                    .fg(theme.active)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(": cancel", Style::default().fg(theme.dim)),
        ]),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.error))
            .title(" Confirm Delete "),
    );

    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}

/// Blocking notification, drawn above every other overlay.
pub fn render_alert(f: &mut Frame, message: &str, theme: &Theme) {
    let popup = centered_rect(60, 7, f.area());

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {message}"),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "  Enter/Esc: dismiss",
            Style::default().fg(theme.dim),
        )),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.error))
                .title(" Notice "),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}
