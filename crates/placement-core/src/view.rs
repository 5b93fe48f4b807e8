//! Client-side view pipeline: search -> CTC threshold filter -> stable sort.
//!
//! The view state is a plain value. Every derivation is a pure function of
//! `(records, &ViewState)`, so the displayed order never depends on hidden
//! mutable state.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::ctc::extract_ctc_value;
use crate::model::PlacementRecord;

/// One lakh (100,000), the unit of the CTC threshold.
pub const LAKH: f64 = 100_000.0;

/// Threshold presets offered by the filter selector, in lakh.
pub const CTC_PRESETS: &[u32] = &[7, 10, 12, 15, 20, 25];

/// Minimum-CTC filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CtcFilter {
    #[default]
    All,
    /// Keep records whose extracted CTC is at least this many lakh.
    MinLakh(u32),
}

impl CtcFilter {
    pub fn threshold(self) -> Option<f64> {
        match self {
            Self::All => None,
            Self::MinLakh(lakh) => Some(f64::from(lakh) * LAKH),
        }
    }

    pub fn matches(self, record: &PlacementRecord) -> bool {
        match self.threshold() {
            None => true,
            Some(min) => extract_ctc_value(&record.ctc_stipend) >= min,
        }
    }

    /// Next preset: All -> 7 -> 10 -> ... -> 25 -> All.
    pub fn next(self) -> Self {
        match self {
            Self::All => Self::MinLakh(CTC_PRESETS[0]),
            Self::MinLakh(lakh) => CTC_PRESETS
                .iter()
                .copied()
                .find(|&p| p > lakh)
                .map(Self::MinLakh)
                .unwrap_or(Self::All),
        }
    }

    /// Previous preset: All -> 25 -> 20 -> ... -> 7 -> All.
    pub fn prev(self) -> Self {
        match self {
            Self::All => Self::MinLakh(CTC_PRESETS[CTC_PRESETS.len() - 1]),
            Self::MinLakh(lakh) => CTC_PRESETS
                .iter()
                .rev()
                .copied()
                .find(|&p| p < lakh)
                .map(Self::MinLakh)
                .unwrap_or(Self::All),
        }
    }

    pub fn label(self) -> String {
        match self {
            Self::All => "All Companies".to_string(),
            Self::MinLakh(lakh) => format!("Above ₹{lakh} Lakh CTC"),
        }
    }
}

impl fmt::Display for CtcFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::MinLakh(lakh) => write!(f, "{lakh}"),
        }
    }
}

impl FromStr for CtcFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse::<u32>()
            .map(Self::MinLakh)
            .map_err(|_| format!("invalid CTC filter '{s}': expected 'all' or a number of lakh"))
    }
}

/// Sortable columns, in table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Id,
    NotificationDate,
    CompanyName,
    TypeOfOffer,
    BranchesAllowed,
    EligibilityCgpa,
    JobRoles,
    CtcStipend,
    StudentsSelected,
    Process,
}

impl SortKey {
    pub fn all() -> &'static [SortKey] {
        &[
            SortKey::Id,
            SortKey::NotificationDate,
            SortKey::CompanyName,
            SortKey::TypeOfOffer,
            SortKey::BranchesAllowed,
            SortKey::EligibilityCgpa,
            SortKey::JobRoles,
            SortKey::CtcStipend,
            SortKey::StudentsSelected,
            SortKey::Process,
        ]
    }

    /// Wire/field name, as used on the command line.
    pub fn field_name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::NotificationDate => "notification_date",
            Self::CompanyName => "company_name",
            Self::TypeOfOffer => "type_of_offer",
            Self::BranchesAllowed => "branches_allowed",
            Self::EligibilityCgpa => "eligibility_cgpa",
            Self::JobRoles => "job_roles",
            Self::CtcStipend => "ctc_stipend",
            Self::StudentsSelected => "students_selected",
            Self::Process => "process",
        }
    }

    /// Column header text.
    pub fn label(self) -> &'static str {
        match self {
            Self::Id => "#",
            Self::NotificationDate => "Notification Date",
            Self::CompanyName => "Company Name",
            Self::TypeOfOffer => "Type of Offer",
            Self::BranchesAllowed => "Branches Allowed",
            Self::EligibilityCgpa => "Eligibility CGPA",
            Self::JobRoles => "Job Roles",
            Self::CtcStipend => "CTC/Stipend",
            Self::StudentsSelected => "Students Selected",
            Self::Process => "Process",
        }
    }

    pub fn next(self) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|&k| k == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    /// Compare two records by this column, ascending.
    pub fn compare(self, a: &PlacementRecord, b: &PlacementRecord) -> Ordering {
        match self {
            Self::Id => a.id.cmp(&b.id),
            Self::NotificationDate => a.notification_date.cmp(&b.notification_date),
            Self::CompanyName => compare_text(&a.company_name, &b.company_name),
            Self::TypeOfOffer => compare_text(&a.type_of_offer, &b.type_of_offer),
            Self::BranchesAllowed => compare_text(
                a.branches_allowed.as_deref().unwrap_or(""),
                b.branches_allowed.as_deref().unwrap_or(""),
            ),
            Self::EligibilityCgpa => compare_text(
                a.eligibility_cgpa.as_deref().unwrap_or(""),
                b.eligibility_cgpa.as_deref().unwrap_or(""),
            ),
            Self::JobRoles => compare_text(&a.job_roles, &b.job_roles),
            Self::CtcStipend => compare_text(&a.ctc_stipend, &b.ctc_stipend),
            Self::StudentsSelected => a.students_selected.cmp(&b.students_selected),
            Self::Process => compare_text(a.process.label(), b.process.label()),
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        Self::all()
            .iter()
            .copied()
            .find(|k| k.field_name() == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::all().iter().map(|k| k.field_name()).collect();
                format!("unknown sort key '{s}' (expected one of: {})", names.join(", "))
            })
    }
}

/// Case-insensitive first, raw text as tie-break: "alpha" < "Beta" < "beta".
fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn arrow(self) -> char {
        match self {
            Self::Asc => '\u{2191}',
            Self::Desc => '\u{2193}',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortConfig {
    pub key: SortKey,
    pub direction: SortDirection,
}

/// Everything that determines which rows are shown, and in what order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub search: String,
    pub ctc_filter: CtcFilter,
    pub sort: Option<SortConfig>,
}

impl ViewState {
    pub fn with_search(self, search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            ..self
        }
    }

    pub fn with_ctc_filter(self, ctc_filter: CtcFilter) -> Self {
        Self { ctc_filter, ..self }
    }

    pub fn with_sort(self, sort: Option<SortConfig>) -> Self {
        Self { sort, ..self }
    }

    /// Selecting the current key while ascending flips to descending; any
    /// other selection sorts ascending by `key`.
    pub fn toggle_sort(self, key: SortKey) -> Self {
        let direction = match self.sort {
            Some(SortConfig {
                key: current,
                direction: SortDirection::Asc,
            }) if current == key => SortDirection::Desc,
            _ => SortDirection::Asc,
        };
        self.with_sort(Some(SortConfig { key, direction }))
    }

    /// Search (case-insensitive substring on company name) AND CTC threshold.
    pub fn matches(&self, record: &PlacementRecord) -> bool {
        let search_ok = self.search.is_empty()
            || record
                .company_name
                .to_lowercase()
                .contains(&self.search.to_lowercase());
        search_ok && self.ctc_filter.matches(record)
    }
}

/// Indices into `records` of the rows to display, in display order.
pub fn visible_indices(records: &[PlacementRecord], state: &ViewState) -> Vec<usize> {
    let mut indices: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, r)| state.matches(r))
        .map(|(i, _)| i)
        .collect();

    if let Some(sort) = state.sort {
        // `sort_by` is stable: equal keys keep their filter-stage order.
        indices.sort_by(|&a, &b| {
            let ord = sort.key.compare(&records[a], &records[b]);
            match sort.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });
    }

    indices
}

/// The records to display, in display order. Row `i` has display index `i + 1`.
pub fn derive<'a>(records: &'a [PlacementRecord], state: &ViewState) -> Vec<&'a PlacementRecord> {
    visible_indices(records, state)
        .into_iter()
        .map(|i| &records[i])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Process;
    use chrono::NaiveDate;

    fn record(id: u32, name: &str, ctc: &str) -> PlacementRecord {
        PlacementRecord {
            id,
            notification_date: NaiveDate::from_ymd_opt(2025, 8, id.clamp(1, 28)).unwrap(),
            company_name: name.to_string(),
            type_of_offer: "FTE".to_string(),
            branches_allowed: None,
            eligibility_cgpa: None,
            job_roles: "SDE".to_string(),
            ctc_stipend: ctc.to_string(),
            students_selected: id,
            process: Process::Completed,
        }
    }

    fn names(rows: &[&PlacementRecord]) -> Vec<String> {
        rows.iter().map(|r| r.company_name.clone()).collect()
    }

    fn sample() -> Vec<PlacementRecord> {
        vec![
            record(1, "Gamma", "CTC: ₹12,00,000"),
            record(2, "alpha", "Fixed - ₹6,00,000"),
            record(3, "Beta", "CTC: ₹25,00,000"),
            record(4, "Delta", "Stipend: ₹40,000/month"),
            record(5, "Alphabet", "CTC: ₹10,00,000"),
        ]
    }

    #[test]
    fn default_state_is_identity() {
        let records = sample();
        let rows = derive(&records, &ViewState::default());
        assert_eq!(rows.len(), records.len());
        for (row, original) in rows.iter().zip(records.iter()) {
            assert_eq!(row.id, original.id);
        }
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let records = sample();
        let state = ViewState::default().with_search("ALPHA");
        assert_eq!(names(&derive(&records, &state)), vec!["alpha", "Alphabet"]);
    }

    #[test]
    fn ctc_threshold_example() {
        let records = vec![
            record(1, "Alpha", "CTC: ₹700,000"),
            record(2, "Beta", "Fixed - ₹1,500,000"),
        ];
        let state = ViewState::default().with_ctc_filter(CtcFilter::MinLakh(10));
        assert_eq!(names(&derive(&records, &state)), vec!["Beta"]);
    }

    #[test]
    fn threshold_is_inclusive() {
        let records = sample();
        let state = ViewState::default().with_ctc_filter(CtcFilter::MinLakh(10));
        assert_eq!(
            names(&derive(&records, &state)),
            vec!["Gamma", "Beta", "Alphabet"]
        );
    }

    #[test]
    fn raising_threshold_never_grows_result() {
        let records = sample();
        for search in ["", "a", "alpha", "zzz"] {
            let mut prev = usize::MAX;
            let mut filter = CtcFilter::All;
            loop {
                let state = ViewState::default()
                    .with_search(search)
                    .with_ctc_filter(filter);
                let count = visible_indices(&records, &state).len();
                assert!(count <= prev, "{search:?} at {filter} grew to {count}");
                prev = count;
                filter = filter.next();
                if filter == CtcFilter::All {
                    break;
                }
            }
        }
    }

    #[test]
    fn search_and_filter_are_combined() {
        let records = sample();
        let state = ViewState::default()
            .with_search("alpha")
            .with_ctc_filter(CtcFilter::MinLakh(7));
        assert_eq!(names(&derive(&records, &state)), vec!["Alphabet"]);
    }

    #[test]
    fn sort_toggle_example() {
        let records = vec![record(1, "Beta", ""), record(2, "Alpha", "")];
        let asc = ViewState::default().toggle_sort(SortKey::CompanyName);
        assert_eq!(names(&derive(&records, &asc)), vec!["Alpha", "Beta"]);
        let desc = asc.toggle_sort(SortKey::CompanyName);
        assert_eq!(names(&derive(&records, &desc)), vec!["Beta", "Alpha"]);
    }

    #[test]
    fn toggle_cycles_direction_and_new_key_resets() {
        let s1 = ViewState::default().toggle_sort(SortKey::StudentsSelected);
        assert_eq!(s1.sort.unwrap().direction, SortDirection::Asc);
        let s2 = s1.toggle_sort(SortKey::StudentsSelected);
        assert_eq!(s2.sort.unwrap().direction, SortDirection::Desc);
        let s3 = s2.clone().toggle_sort(SortKey::StudentsSelected);
        assert_eq!(s3.sort.unwrap().direction, SortDirection::Asc);
        let other = s2.toggle_sort(SortKey::Id);
        assert_eq!(
            other.sort,
            Some(SortConfig {
                key: SortKey::Id,
                direction: SortDirection::Asc
            })
        );
    }

    #[test]
    fn descending_is_reverse_of_ascending_without_ties() {
        let records = sample();
        let asc = ViewState::default().toggle_sort(SortKey::CompanyName);
        let desc = asc.clone().toggle_sort(SortKey::CompanyName);
        let mut forward = visible_indices(&records, &asc);
        forward.reverse();
        assert_eq!(forward, visible_indices(&records, &desc));
        let again = desc.toggle_sort(SortKey::CompanyName);
        assert_eq!(
            visible_indices(&records, &again),
            visible_indices(&records, &asc)
        );
    }

    #[test]
    fn text_sort_is_case_insensitive() {
        let records = sample();
        let state = ViewState::default().toggle_sort(SortKey::CompanyName);
        assert_eq!(
            names(&derive(&records, &state)),
            vec!["alpha", "Alphabet", "Beta", "Delta", "Gamma"]
        );
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let mut records = sample();
        for r in &mut records {
            r.type_of_offer = "Intern".to_string();
        }
        let asc = ViewState::default().toggle_sort(SortKey::TypeOfOffer);
        let ids: Vec<u32> = derive(&records, &asc).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        let desc = asc.toggle_sort(SortKey::TypeOfOffer);
        let ids: Vec<u32> = derive(&records, &desc).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn numeric_sort_and_missing_optional_text() {
        let mut records = sample();
        records[0].branches_allowed = Some("CSE".into());
        records[2].branches_allowed = Some("ECE".into());
        let state = ViewState::default().toggle_sort(SortKey::BranchesAllowed);
        let ids: Vec<u32> = derive(&records, &state).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 4, 5, 1, 3]);

        let by_count = ViewState::default()
            .toggle_sort(SortKey::StudentsSelected)
            .toggle_sort(SortKey::StudentsSelected);
        let ids: Vec<u32> = derive(&records, &by_count).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn ctc_filter_parse_and_cycle() {
        assert_eq!("all".parse::<CtcFilter>().unwrap(), CtcFilter::All);
        assert_eq!("10".parse::<CtcFilter>().unwrap(), CtcFilter::MinLakh(10));
        assert!("ten".parse::<CtcFilter>().is_err());
        assert_eq!(CtcFilter::All.next(), CtcFilter::MinLakh(7));
        assert_eq!(CtcFilter::MinLakh(25).next(), CtcFilter::All);
        assert_eq!(CtcFilter::All.prev(), CtcFilter::MinLakh(25));
        assert_eq!(CtcFilter::MinLakh(7).prev(), CtcFilter::All);
        assert_eq!(CtcFilter::MinLakh(11).next(), CtcFilter::MinLakh(12));
    }

    #[test]
    fn sort_key_parse() {
        assert_eq!("company_name".parse::<SortKey>().unwrap(), SortKey::CompanyName);
        assert_eq!("ctc-stipend".parse::<SortKey>().unwrap(), SortKey::CtcStipend);
        assert!("salary".parse::<SortKey>().is_err());
    }
}
