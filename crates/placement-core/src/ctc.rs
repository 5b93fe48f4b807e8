//! Best-effort extraction of monetary figures from the free-text
//! `ctc_stipend` field ("CTC: ₹14,15,600", "Fixed - ₹1,200,000",
//! "Stipend: ₹27,000/month").
//!
//! None of these functions fail: unrecognised or malformed text yields `0.0`
//! (or `None` for the `Option` variants).

use once_cell::sync::Lazy;
use regex::Regex;

static CTC_LABEL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)CTC:\s*₹?[0-9,]+").unwrap());
static FIRST_AMOUNT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"₹?[0-9,]+").unwrap());
static FIXED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Fixed\s*-\s*₹?([0-9,]+)").unwrap());

// Amount token: "35k" / "2.5 K" or a separator-grouped figure.
const AMOUNT: &str = r"([0-9]+(?:\.[0-9]+)?\s*[kK]\b|[0-9,]+(?:\.[0-9]+)?)";

static STIPEND_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"(?i)Stipend\s*[:\-]\s*₹?\s*{AMOUNT}")).unwrap());
static STIPEND_LOOSE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"(?i)Stipend\s*₹?\s*{AMOUNT}")).unwrap());
static LABELLED_CTC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"(?i)CTC\s*[:\-]\s*₹?\s*{AMOUNT}")).unwrap());
static FIXED_AMOUNT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)Fixed\s*[-:]\s*(same as CTC|₹?\s*{AMOUNT})")).unwrap()
});
static PLAIN_AMOUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]+(?:\.[0-9]+)?)(k)?$").unwrap());

/// Extract the CTC figure used by the table's CTC threshold filter.
///
/// When the text carries a `CTC:` label, the first amount anywhere in the
/// text is taken (not necessarily the one after the label). Otherwise a
/// `Fixed - <amount>` figure is used. Returns `0.0` when neither is present.
pub fn extract_ctc_value(text: &str) -> f64 {
    if text.is_empty() {
        return 0.0;
    }

    if CTC_LABEL_RE.is_match(text) {
        return FIRST_AMOUNT_RE
            .find(text)
            .map(|m| parse_grouped(m.as_str()))
            .unwrap_or(0.0);
    }

    if let Some(caps) = FIXED_RE.captures(text) {
        return parse_grouped(&caps[1]);
    }

    0.0
}

/// Strip currency marks and thousands separators, then parse. `0.0` on failure.
fn parse_grouped(raw: &str) -> f64 {
    let cleaned: String = raw.chars().filter(|c| *c != '₹' && *c != ',').collect();
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .unwrap_or(0.0)
}

/// Parse a single amount token such as `1,20,000`, `₹ 45000` or `35k`.
pub fn parse_amount(token: &str) -> Option<f64> {
    let cleaned: String = token
        .chars()
        .filter(|c| *c != ',' && *c != '₹' && !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    if cleaned.is_empty() {
        return None;
    }
    let caps = PLAIN_AMOUNT_RE.captures(&cleaned)?;
    let mut value: f64 = caps[1].parse().ok()?;
    if caps.get(2).is_some() {
        value *= 1000.0;
    }
    Some(value)
}

/// Explicit stipend amount (`Stipend: ₹27,000/month`, `Stipend - 35k`).
pub fn extract_stipend_value(text: &str) -> Option<f64> {
    STIPEND_RE
        .captures(text)
        .or_else(|| STIPEND_LOOSE_RE.captures(text))
        .and_then(|caps| parse_amount(&caps[1]))
}

/// Explicitly labelled CTC amount (`CTC: ₹12,50,000` or `CTC - 12,50,000`).
///
/// Unlike [`extract_ctc_value`], this reads the amount that follows the label.
pub fn extract_labelled_ctc(text: &str) -> Option<f64> {
    LABELLED_CTC_RE
        .captures(text)
        .and_then(|caps| parse_amount(&caps[1]))
}

/// Fixed package amount. `Fixed - same as CTC` resolves to the labelled CTC.
pub fn extract_fixed_value(text: &str) -> Option<f64> {
    let caps = FIXED_AMOUNT_RE.captures(text)?;
    let raw = caps.get(1)?.as_str();
    if raw.trim().to_lowercase().starts_with("same") {
        extract_labelled_ctc(text)
    } else {
        parse_amount(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctc_label_with_indian_grouping() {
        assert_eq!(extract_ctc_value("CTC: ₹14,15,600"), 1_415_600.0);
        assert_eq!(extract_ctc_value("ctc: 700,000"), 700_000.0);
        assert_eq!(extract_ctc_value("CTC:₹1200000"), 1_200_000.0);
    }

    #[test]
    fn ctc_label_takes_first_amount_in_text() {
        // The first figure wins even when it precedes the label.
        let text = "Stipend: ₹27,000/month, CTC: ₹14,00,000";
        assert_eq!(extract_ctc_value(text), 27_000.0);
    }

    #[test]
    fn fixed_pattern_used_when_no_ctc_label() {
        assert_eq!(extract_ctc_value("Fixed - ₹1,500,000"), 1_500_000.0);
        assert_eq!(extract_ctc_value("fixed-1150000 + bonus"), 1_150_000.0);
    }

    #[test]
    fn unrecognised_text_is_zero() {
        assert_eq!(extract_ctc_value(""), 0.0);
        assert_eq!(extract_ctc_value("Stipend: ₹27,000/month"), 0.0);
        assert_eq!(extract_ctc_value("To be announced"), 0.0);
        assert_eq!(extract_ctc_value("CTC: TBD"), 0.0);
    }

    #[test]
    fn separator_only_group_is_zero() {
        assert_eq!(extract_ctc_value("CTC: ,, later"), 0.0);
    }

    #[test]
    fn parse_amount_handles_k_suffix_and_marks() {
        assert_eq!(parse_amount("35k"), Some(35_000.0));
        assert_eq!(parse_amount("2.5 K"), Some(2_500.0));
        assert_eq!(parse_amount("₹ 1,20,000"), Some(120_000.0));
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount(""), None);
    }

    #[test]
    fn stipend_extraction() {
        assert_eq!(
            extract_stipend_value("Stipend: ₹27,000/month"),
            Some(27_000.0)
        );
        assert_eq!(extract_stipend_value("Stipend - 35k fixed"), Some(35_000.0));
        assert_eq!(extract_stipend_value("Stipend ₹40,000"), Some(40_000.0));
        assert_eq!(extract_stipend_value("CTC: ₹9,00,000"), None);
    }

    #[test]
    fn fixed_same_as_ctc_resolves_to_ctc() {
        let text = "CTC: ₹12,00,000\nFixed - same as CTC";
        assert_eq!(extract_labelled_ctc(text), Some(1_200_000.0));
        assert_eq!(extract_fixed_value(text), Some(1_200_000.0));
    }

    #[test]
    fn fixed_with_rupee_mark() {
        assert_eq!(
            extract_fixed_value("CTC: ₹18,00,000 Fixed - ₹ 12,00,000"),
            Some(1_200_000.0)
        );
        assert_eq!(extract_fixed_value("CTC: ₹18,00,000"), None);
    }
}
