use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};

use placement_core::format::format_date;
use placement_core::{CtcFilter, PlacementRecord, SortKey};

use crate::app::{App, InputMode};
use crate::view::{single_line, truncate};

/// Columns shown when the terminal is too narrow for all ten.
const NARROW_COLUMNS: &[SortKey] = &[
    SortKey::Id,
    SortKey::NotificationDate,
    SortKey::CompanyName,
    SortKey::TypeOfOffer,
    SortKey::CtcStipend,
    SortKey::StudentsSelected,
    SortKey::Process,
];

/// Search box, CTC filter and sort indicator.
pub fn render_controls(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let searching = app.input_mode == InputMode::Search;
    let cursor = if searching { "\u{2588}" } else { "" };

    let search_text = if app.view_state.search.is_empty() && !searching {
        Span::styled("search by company (/)", Style::default().fg(theme.dim))
    } else {
        Span::styled(app.view_state.search.clone(), Style::default().fg(theme.text))
    };

    let filter_style = if app.view_state.ctc_filter == CtcFilter::All {
        Style::default().fg(theme.dim)
    } else {
        Style::default().fg(theme.active)
    };

    let sort_text = match app.view_state.sort {
        Some(sort) => format!("{} {}", sort.key.label(), sort.direction.arrow()),
        None => "none".to_string(),
    };

    let line = Line::from(vec![
        Span::styled(
            " /",
            Style::default()
                .fg(theme.active)
                .add_modifier(Modifier::BOLD),
        ),
        search_text,
        Span::styled(cursor, Style::default().fg(theme.active)),
        Span::styled("  \u{2502} CTC: ", Style::default().fg(theme.dim)),
        Span::styled(app.view_state.ctc_filter.label(), filter_style),
        Span::styled("  \u{2502} Sort: ", Style::default().fg(theme.dim)),
        Span::styled(sort_text, Style::default().fg(theme.text)),
        Span::styled(
            format!("  \u{2502} {}/{} shown", app.visible.len(), app.records.len()),
            Style::default().fg(theme.dim),
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

pub fn render_table(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let columns: &[SortKey] = if area.width >= 140 {
        SortKey::all()
    } else {
        NARROW_COLUMNS
    };

    let header = Row::new(columns.iter().map(|&key| {
        let arrow = match app.view_state.sort {
            Some(sort) if sort.key == key => format!(" {}", sort.direction.arrow()),
            _ => String::new(),
        };
        Cell::from(format!("{}{}", key.label(), arrow))
            .style(Style::default().fg(theme.text).add_modifier(Modifier::BOLD))
    }))
    .height(1);

    let widths: Vec<Constraint> = columns.iter().map(|&k| column_width(k)).collect();

    let rows: Vec<Row> = app
        .visible
        .iter()
        .enumerate()
        .map(|(display_idx, &record_idx)| {
            let record = &app.records[record_idx];
            Row::new(
                columns
                    .iter()
                    .map(|&key| cell(key, record, display_idx, app)),
            )
        })
        .collect();

    let title = if !app.loaded {
        " Loading records\u{2026} ".to_string()
    } else if rows.is_empty() {
        " No matching records ".to_string()
    } else {
        format!(" Records ({}) ", rows.len())
    };

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style())
                .title(title),
        )
        .row_highlight_style(theme.highlight_style());

    let mut state = TableState::default();
    if !app.visible.is_empty() {
        state.select(Some(app.cursor));
    }
    f.render_stateful_widget(table, area, &mut state);
}

fn column_width(key: SortKey) -> Constraint {
    match key {
        SortKey::Id => Constraint::Length(4),
        SortKey::NotificationDate => Constraint::Length(11),
        SortKey::CompanyName => Constraint::Min(14),
        SortKey::TypeOfOffer => Constraint::Length(12),
        SortKey::BranchesAllowed => Constraint::Length(16),
        SortKey::EligibilityCgpa => Constraint::Length(8),
        SortKey::JobRoles => Constraint::Length(16),
        SortKey::CtcStipend => Constraint::Min(22),
        SortKey::StudentsSelected => Constraint::Length(9),
        SortKey::Process => Constraint::Length(10),
    }
}

fn cell<'a>(key: SortKey, record: &PlacementRecord, display_idx: usize, app: &App) -> Cell<'a> {
    let theme = &app.theme;
    match key {
        // Display position, not the record id.
        SortKey::Id => Cell::from(format!("{}", display_idx + 1)).style(Style::default().fg(theme.dim)),
        SortKey::NotificationDate => Cell::from(format_date(record.notification_date)),
        SortKey::CompanyName => Cell::from(record.company_name.clone())
            .style(Style::default().fg(theme.text).add_modifier(Modifier::BOLD)),
        SortKey::TypeOfOffer => Cell::from(record.type_of_offer.clone()),
        SortKey::BranchesAllowed => Cell::from(truncate(
            record.branches_allowed.as_deref().unwrap_or("\u{2014}"),
            16,
        )),
        SortKey::EligibilityCgpa => {
            Cell::from(record.eligibility_cgpa.clone().unwrap_or_else(|| "\u{2014}".to_string()))
        }
        SortKey::JobRoles => Cell::from(truncate(&record.job_roles, 16)),
        SortKey::CtcStipend => Cell::from(single_line(&record.ctc_stipend))
            .style(Style::default().fg(theme.money)),
        SortKey::StudentsSelected => Cell::from(record.students_selected.to_string()),
        SortKey::Process => Cell::from(record.process.label())
            .style(Style::default().fg(theme.process_color(record.process))),
    }
}

pub fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;

    let mut spans: Vec<Span> = Vec::new();
    if let Some(status) = &app.status {
        spans.push(Span::styled(
            format!(" {status} "),
            Style::default()
                .fg(theme.header_fg)
                .bg(theme.active)
                .add_modifier(Modifier::BOLD),
        ));
    }

    let hints = if app.input_mode == InputMode::Search {
        " type to filter  Enter:done  Esc:clear"
    } else if app.gate.can_mutate() {
        " /:search  f/F:CTC  s/S:sort  1-0:column  a:add  e:edit  d:delete  r:refresh  ?:help  q:quit"
    } else {
        " /:search  f/F:CTC  s/S:sort  1-0:column  t:token  v:validate  r:refresh  ?:help  q:quit"
    };
    spans.push(Span::styled(hints, theme.footer_style()));

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
