use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use placement_core::format::format_date;

use crate::app::App;
use crate::view::spinner_char;

const TITLE: &str = " LNMIIT Placement Tracker ";

/// Title bar: app name, last-updated date, and admin status on the right.
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let chunks = Layout::horizontal([Constraint::Min(20), Constraint::Length(34)]).split(area);

    let mut left = vec![
        Span::styled(TITLE, theme.header_style()),
        Span::styled(
            format!(" Last Updated: {}", format_date(app.today)),
            Style::default().fg(theme.dim),
        ),
    ];
    if app.loading {
        left.push(Span::styled(
            format!(" {} loading", spinner_char(app.tick)),
            Style::default().fg(theme.spinner),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(left)), chunks[0]);

    let admin = if app.gate.is_checking() {
        Span::styled(
            format!("{} checking token ", spinner_char(app.tick)),
            Style::default().fg(theme.spinner),
        )
    } else if app.gate.is_validated() {
        Span::styled(
            " ADMIN ",
            Style::default()
                .fg(theme.header_fg)
                .bg(theme.completed)
                .add_modifier(Modifier::BOLD),
        )
    } else if app.gate.token().is_empty() {
        Span::styled("read-only (t: set token) ", Style::default().fg(theme.dim))
    } else {
        Span::styled(
            "token not validated (v) ",
            Style::default().fg(theme.pending),
        )
    };
    f.render_widget(
        Paragraph::new(Line::from(admin)).alignment(Alignment::Right),
        chunks[1],
    );
}
