use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use placement_core::format::{format_inr, format_selected};

use crate::app::App;
use crate::theme::Theme;

/// Row of stat cards, with the offer-type breakdown on the second line.
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let stats = &app.stats;

    let cards = [
        (
            "Companies",
            stats.total_unique_companies.to_string(),
            format!("On-campus {} \u{00B7} PPO {}", stats.on_campus, stats.ppo),
        ),
        (
            "Avg CTC",
            format_inr(stats.average_ctc),
            "simple mean".to_string(),
        ),
        (
            "Weighted CTC",
            format_inr(stats.average_ctc_weighted),
            "by students".to_string(),
        ),
        (
            "Median CTC",
            format_inr(stats.median_ctc),
            "fixed component".to_string(),
        ),
        (
            "Avg Stipend",
            format_inr(stats.average_stipend),
            "per month".to_string(),
        ),
        (
            "Students Selected",
            format_selected(stats.students_selected, app.settings.batch_size),
            format!(
                "I {} \u{00B7} F {} \u{00B7} I+F {}",
                stats.intern_count, stats.fte_count, stats.intern_fte_count
            ),
        ),
    ];

    let chunks = Layout::horizontal([Constraint::Ratio(1, 6); 6]).split(area);
    for (chunk, (title, value, detail)) in chunks.iter().zip(cards) {
        render_card(f, *chunk, title, value, detail, theme);
    }
}

fn render_card(f: &mut Frame, area: Rect, title: &str, value: String, detail: String, theme: &Theme) {
    let lines = vec![
        Line::from(Span::styled(
            value,
            Style::default()
                .fg(theme.money)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(detail, Style::default().fg(theme.dim))),
    ];
    let card = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style())
            .title(Span::styled(
                format!(" {title} "),
                Style::default().fg(theme.text),
            )),
    );
    f.render_widget(card, area);
}
