use ratatui::Frame;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::app::App;
use crate::view::centered_rect;

/// Token editor. The token is masked; only its length is visible.
pub fn render(f: &mut Frame, app: &App) {
    let theme = &app.theme;
    let popup = centered_rect(56, 7, f.area());

    let masked = "\u{2022}".repeat(app.gate.token().chars().count());
    let state = if app.gate.is_validated() {
        Span::styled("validated", Style::default().fg(theme.completed))
    } else if app.gate.token().is_empty() {
        Span::styled("empty: read-only mode", Style::default().fg(theme.dim))
    } else {
        Span::styled("not validated", Style::default().fg(theme.pending))
    };

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  Token: ", Style::default().fg(theme.dim)),
            Span::styled(masked, Style::default().fg(theme.text)),
            Span::styled("\u{2588}", Style::default().fg(theme.active)),
        ]),
        Line::from(vec![Span::styled("  Status: ", Style::default().fg(theme.dim)), state]),
        Line::from(vec![
            Span::styled(
                "  Enter",
                Style::default()
                    .fg(theme.active)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(": validate   ", Style::default().fg(theme.dim)),
            Span::styled(
                "Esc",
                Style::default()
                    .fg(theme.active)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(": close", Style::default().fg(theme.dim)),
        ]),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.active))
            .title(" Admin Token "),
    );

    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}
