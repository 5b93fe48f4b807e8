use std::io::Write;

use owo_colors::OwoColorize;
use placement_core::format::{format_date, format_inr, format_selected};
use placement_core::{PlacementRecord, Process, Stats, ViewState};

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

const COMPANY_WIDTH: usize = 24;
const OFFER_WIDTH: usize = 12;
const ROLES_WIDTH: usize = 22;
const CTC_WIDTH: usize = 30;

/// Print the derived rows as a fixed-width table, followed by a count line.
pub fn print_records(
    w: &mut dyn Write,
    rows: &[&PlacementRecord],
    total: usize,
    state: &ViewState,
    color: ColorMode,
) -> std::io::Result<()> {
    let header = format!(
        "{:>4}  {:>5}  {:<10}  {:<COMPANY_WIDTH$}  {:<OFFER_WIDTH$}  {:<ROLES_WIDTH$}  {:<CTC_WIDTH$}  {:>4}  {}",
        "#", "ID", "Date", "Company", "Offer", "Roles", "CTC / Stipend", "Sel", "Process"
    );
    if color.enabled() {
        writeln!(w, "{}", header.bold())?;
    } else {
        writeln!(w, "{}", header)?;
    }

    for (idx, record) in rows.iter().enumerate() {
        let line = format!(
            "{:>4}  {:>5}  {:<10}  {:<COMPANY_WIDTH$}  {:<OFFER_WIDTH$}  {:<ROLES_WIDTH$}  {:<CTC_WIDTH$}  {:>4}  ",
            idx + 1,
            record.id,
            format_date(record.notification_date),
            truncate(&record.company_name, COMPANY_WIDTH),
            truncate(&record.type_of_offer, OFFER_WIDTH),
            truncate(&single_line(&record.job_roles), ROLES_WIDTH),
            truncate(&single_line(&record.ctc_stipend), CTC_WIDTH),
            record.students_selected,
        );
        write!(w, "{}", line)?;
        write_process(w, record.process, color)?;
        writeln!(w)?;
    }

    writeln!(w)?;
    let summary = format!(
        "{} of {} records  ({})",
        rows.len(),
        total,
        describe_view(state)
    );
    if color.enabled() {
        writeln!(w, "{}", summary.dimmed())?;
    } else {
        writeln!(w, "{}", summary)?;
    }
    Ok(())
}

/// Print every field of one record.
pub fn print_record(
    w: &mut dyn Write,
    record: &PlacementRecord,
    color: ColorMode,
) -> std::io::Result<()> {
    let title = format!("#{} {}", record.id, record.company_name);
    if color.enabled() {
        writeln!(w, "{}", title.bold())?;
    } else {
        writeln!(w, "{}", title)?;
    }

    let fields = [
        ("Notification date", format_date(record.notification_date)),
        ("Type of offer", record.type_of_offer.clone()),
        (
            "Branches allowed",
            record.branches_allowed.clone().unwrap_or_else(|| "-".into()),
        ),
        (
            "Eligibility CGPA",
            record.eligibility_cgpa.clone().unwrap_or_else(|| "-".into()),
        ),
        ("Job roles", record.job_roles.clone()),
        ("CTC / stipend", record.ctc_stipend.clone()),
        ("Students selected", record.students_selected.to_string()),
    ];
    for (label, value) in fields {
        print_field(w, label, &value, color)?;
    }
    write!(w, "  {:<18} ", "Process:")?;
    write_process(w, record.process, color)?;
    writeln!(w)?;
    Ok(())
}

/// Print the aggregate statistics block.
pub fn print_stats(
    w: &mut dyn Write,
    stats: &Stats,
    batch_size: u32,
    local: bool,
    color: ColorMode,
) -> std::io::Result<()> {
    let sep = "=".repeat(48);
    let title = if local {
        "PLACEMENT STATS (computed locally)"
    } else {
        "PLACEMENT STATS"
    };
    if color.enabled() {
        writeln!(w, "{}", sep.bold())?;
        writeln!(w, "{}", title.bold())?;
        writeln!(w, "{}", sep.bold())?;
    } else {
        writeln!(w, "{}", sep)?;
        writeln!(w, "{}", title)?;
        writeln!(w, "{}", sep)?;
    }

    print_field(
        w,
        "Companies",
        &format!(
            "{} ({} on-campus, {} PPO)",
            stats.total_unique_companies, stats.on_campus, stats.ppo
        ),
        color,
    )?;
    print_money(w, "Average CTC", stats.average_ctc, color)?;
    print_money(w, "Weighted CTC", stats.average_ctc_weighted, color)?;
    print_money(w, "Median CTC", stats.median_ctc, color)?;
    print_money(w, "Average stipend", stats.average_stipend, color)?;
    print_field(
        w,
        "Students selected",
        &format_selected(stats.students_selected, batch_size),
        color,
    )?;
    let breakdown = format!(
        "Intern {}  FTE {}  Intern+FTE {}",
        stats.intern_count, stats.fte_count, stats.intern_fte_count
    );
    if color.enabled() {
        writeln!(w, "  {:<18} {}", "", breakdown.dimmed())?;
    } else {
        writeln!(w, "  {:<18} {}", "", breakdown)?;
    }
    Ok(())
}

/// Show only the last four characters of a token.
pub fn mask_token(token: &str) -> String {
    let count = token.chars().count();
    if count <= 4 {
        return "*".repeat(count);
    }
    let tail: String = token.chars().skip(count - 4).collect();
    format!("{}{}", "*".repeat(count - 4), tail)
}

fn print_field(
    w: &mut dyn Write,
    label: &str,
    value: &str,
    color: ColorMode,
) -> std::io::Result<()> {
    let label = format!("{label}:");
    if color.enabled() {
        writeln!(w, "  {:<18} {}", label.cyan(), value)
    } else {
        writeln!(w, "  {:<18} {}", label, value)
    }
}

fn print_money(w: &mut dyn Write, label: &str, value: f64, color: ColorMode) -> std::io::Result<()> {
    let label = format!("{label}:");
    let amount = format_inr(value);
    if color.enabled() {
        writeln!(w, "  {:<18} {}", label.cyan(), amount.green())
    } else {
        writeln!(w, "  {:<18} {}", label, amount)
    }
}

fn write_process(w: &mut dyn Write, process: Process, color: ColorMode) -> std::io::Result<()> {
    if !color.enabled() {
        return write!(w, "{}", process);
    }
    match process {
        Process::Completed => write!(w, "{}", process.label().green()),
        Process::Pending => write!(w, "{}", process.label().yellow()),
    }
}

fn describe_view(state: &ViewState) -> String {
    let mut parts = Vec::new();
    if !state.search.is_empty() {
        parts.push(format!("search \"{}\"", state.search));
    }
    parts.push(state.ctc_filter.label());
    if let Some(sort) = state.sort {
        parts.push(format!(
            "sorted by {} {}",
            sort.key.field_name(),
            sort.direction.arrow()
        ));
    }
    parts.join(", ")
}

fn single_line(s: &str) -> String {
    s.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" / ")
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use placement_core::{CtcFilter, SortConfig, SortDirection, SortKey};

    fn record() -> PlacementRecord {
        PlacementRecord {
            id: 12,
            notification_date: NaiveDate::from_ymd_opt(2025, 8, 14).unwrap(),
            company_name: "Alpha Technologies".into(),
            type_of_offer: "Intern + FTE".into(),
            branches_allowed: None,
            eligibility_cgpa: Some("7.0".into()),
            job_roles: "SDE-I\nSDE-II".into(),
            ctc_stipend: "CTC: ₹14,15,600".into(),
            students_selected: 3,
            process: Process::Pending,
        }
    }

    fn render(f: impl FnOnce(&mut dyn Write) -> std::io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn table_lists_display_index_and_summary() {
        let r = record();
        let state = ViewState::default()
            .with_ctc_filter(CtcFilter::MinLakh(10))
            .with_sort(Some(SortConfig {
                key: SortKey::CompanyName,
                direction: SortDirection::Desc,
            }));
        let out = render(|w| print_records(w, &[&r], 5, &state, ColorMode(false)));

        let row = out.lines().nth(1).unwrap();
        assert!(row.trim_start().starts_with("1     12  14/08/2025"));
        assert!(row.contains("SDE-I / SDE-II"));
        assert!(row.ends_with("Pending"));
        assert!(out.contains("1 of 5 records"));
        assert!(out.contains("Above ₹10 Lakh CTC"));
    }

    #[test]
    fn record_detail_marks_missing_fields() {
        let out = render(|w| print_record(w, &record(), ColorMode(false)));
        assert!(out.starts_with("#12 Alpha Technologies"));
        assert!(out.contains("Branches allowed:  -"));
        assert!(out.contains("Eligibility CGPA:  7.0"));
    }

    #[test]
    fn stats_use_indian_grouping() {
        let stats = Stats {
            total_unique_companies: 3,
            on_campus: 2,
            ppo: 1,
            average_ctc: 1_415_600.0,
            students_selected: 42,
            ..Stats::default()
        };
        let out = render(|w| print_stats(w, &stats, 490, true, ColorMode(false)));
        assert!(out.contains("computed locally"));
        assert!(out.contains("3 (2 on-campus, 1 PPO)"));
        assert!(out.contains("₹14,15,600"));
        assert!(out.contains("42/490"));
    }

    #[test]
    fn token_mask_keeps_last_four() {
        assert_eq!(mask_token("supersecret"), "*******cret");
        assert_eq!(mask_token("abc"), "***");
        assert_eq!(mask_token(""), "");
    }

    #[test]
    fn truncate_is_char_safe() {
        assert_eq!(truncate("₹₹₹₹₹₹", 5), "₹₹...");
        assert_eq!(truncate("short", 10), "short");
    }
}
