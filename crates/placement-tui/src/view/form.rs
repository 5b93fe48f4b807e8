use ratatui::Frame;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::model::form::{FormField, FormState};
use crate::theme::Theme;
use crate::view::{centered_rect, spinner_char};

/// Add/edit form overlay: one line per field, the active one highlighted.
pub fn render(f: &mut Frame, form: &FormState, theme: &Theme, tick: usize) {
    let popup = centered_rect(72, FormField::ALL.len() as u16 + 8, f.area());
    let current = form.current_field();

    let mut lines = vec![Line::from("")];
    for field in FormField::ALL {
        let active = field == current;
        let marker = if active { "\u{25B6} " } else { "  " };
        let value = form.value(field);
        let value_span = if value.is_empty() && !active {
            Span::styled(field.placeholder(), Style::default().fg(theme.dim))
        } else if field.is_choice() {
            Span::styled(
                format!("\u{25C0} {value} \u{25B6}"),
                Style::default().fg(theme.process_color(form.draft.process)),
            )
        } else {
            Span::styled(value.replace('\n', " "), Style::default().fg(theme.text))
        };

        let label_style = if active {
            Style::default()
                .fg(theme.active)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.dim)
        };

        let mut spans = vec![
            Span::styled(format!(" {marker}{:<18}", field.label()), label_style),
            value_span,
        ];
        if active && !field.is_choice() {
            spans.push(Span::styled("\u{2588}", Style::default().fg(theme.active)));
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(""));
    if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(
            format!("  {error}"),
            Style::default().fg(theme.error),
        )));
    } else if form.submitting {
        lines.push(Line::from(Span::styled(
            format!("  {} Saving\u{2026}", spinner_char(tick)),
            Style::default().fg(theme.spinner),
        )));
    } else {
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        "  Tab/\u{2193}: next  Shift+Tab/\u{2191}: prev  \u{2190}/\u{2192}: toggle process  Enter: save  Esc: cancel",
        Style::default().fg(theme.dim),
    )));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.active))
                .title(form.title()),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}
