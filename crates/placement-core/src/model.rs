use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Recruitment process status of a placement drive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Process {
    #[default]
    Completed,
    Pending,
}

impl Process {
    pub fn label(self) -> &'static str {
        match self {
            Self::Completed => "Completed",
            Self::Pending => "Pending",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Self::Completed => Self::Pending,
            Self::Pending => Self::Completed,
        }
    }

    /// Lenient parse: anything other than "pending" (any case) is `Completed`.
    pub fn from_label(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("pending") {
            Self::Pending
        } else {
            Self::Completed
        }
    }
}

impl std::fmt::Display for Process {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Process {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Process {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Process::from_label).unwrap_or_default())
    }
}

/// A single placement drive as returned by `GET /companies`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementRecord {
    pub id: u32,
    pub notification_date: NaiveDate,
    pub company_name: String,
    pub type_of_offer: String,
    #[serde(default)]
    pub branches_allowed: Option<String>,
    #[serde(default)]
    pub eligibility_cgpa: Option<String>,
    pub job_roles: String,
    pub ctc_stipend: String,
    pub students_selected: u32,
    #[serde(default)]
    pub process: Process,
}

/// Request body for `POST /companies` and `PUT /companies/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordInput {
    pub notification_date: NaiveDate,
    pub company_name: String,
    pub type_of_offer: String,
    pub branches_allowed: Option<String>,
    pub eligibility_cgpa: Option<String>,
    pub job_roles: String,
    pub ctc_stipend: String,
    pub students_selected: u32,
    pub process: Process,
}

impl From<&PlacementRecord> for RecordInput {
    fn from(record: &PlacementRecord) -> Self {
        Self {
            notification_date: record.notification_date,
            company_name: record.company_name.clone(),
            type_of_offer: record.type_of_offer.clone(),
            branches_allowed: record.branches_allowed.clone(),
            eligibility_cgpa: record.eligibility_cgpa.clone(),
            job_roles: record.job_roles.clone(),
            ctc_stipend: record.ctc_stipend.clone(),
            students_selected: record.students_selected,
            process: record.process,
        }
    }
}

/// Aggregate statistics from `GET /stats`. Missing fields read as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub total_unique_companies: u64,
    pub on_campus: u64,
    pub ppo: u64,
    pub average_stipend: f64,
    pub average_ctc: f64,
    pub average_ctc_weighted: f64,
    pub median_ctc: f64,
    pub students_selected: u64,
    pub intern_count: u64,
    pub fte_count: u64,
    pub intern_fte_count: u64,
}
