//! Display formatting: Indian-locale rupee amounts and day/month/year dates.

use chrono::NaiveDate;

/// Format an amount as Indian rupees with no fractional digits,
/// e.g. `1415600.4` -> `₹14,15,600`.
pub fn format_inr(value: f64) -> String {
    if !value.is_finite() {
        return "₹0".to_string();
    }
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());
    format!("{sign}₹{}", group_indian(&digits))
}

/// Insert separators using Indian grouping: the last three digits, then
/// pairs (`12,34,56,789`).
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

/// `DD/MM/YYYY`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// "Students selected" card text, e.g. `123/490`.
pub fn format_selected(selected: u64, batch_size: u32) -> String {
    format!("{selected}/{batch_size}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indian_grouping() {
        assert_eq!(format_inr(0.0), "₹0");
        assert_eq!(format_inr(999.0), "₹999");
        assert_eq!(format_inr(1000.0), "₹1,000");
        assert_eq!(format_inr(100_000.0), "₹1,00,000");
        assert_eq!(format_inr(1_415_600.0), "₹14,15,600");
        assert_eq!(format_inr(123_456_789.0), "₹12,34,56,789");
    }

    #[test]
    fn rounds_to_whole_rupees() {
        assert_eq!(format_inr(27_000.49), "₹27,000");
        assert_eq!(format_inr(27_000.5), "₹27,001");
        assert_eq!(format_inr(-1500.0), "-₹1,500");
        assert_eq!(format_inr(f64::NAN), "₹0");
    }

    #[test]
    fn date_is_day_month_year() {
        let d = NaiveDate::from_ymd_opt(2025, 8, 4).unwrap();
        assert_eq!(format_date(d), "04/08/2025");
    }

    #[test]
    fn selected_fraction() {
        assert_eq!(format_selected(123, 490), "123/490");
    }
}
