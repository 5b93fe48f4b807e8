use chrono::NaiveDate;
use thiserror::Error;

use crate::model::{PlacementRecord, Process, RecordInput};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("invalid notification date '{0}' (expected YYYY-MM-DD or DD/MM/YYYY)")]
    InvalidDate(String),
    #[error("students selected must be a whole number, got '{0}'")]
    InvalidCount(String),
}

/// Free-text contents of the add/edit form, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordDraft {
    pub notification_date: String,
    pub company_name: String,
    pub type_of_offer: String,
    pub branches_allowed: String,
    pub eligibility_cgpa: String,
    pub job_roles: String,
    pub ctc_stipend: String,
    pub students_selected: String,
    pub process: Process,
}

impl RecordDraft {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Prefill from an existing record for editing.
    pub fn from_record(record: &PlacementRecord) -> Self {
        Self {
            notification_date: record.notification_date.format("%Y-%m-%d").to_string(),
            company_name: record.company_name.clone(),
            type_of_offer: record.type_of_offer.clone(),
            branches_allowed: record.branches_allowed.clone().unwrap_or_default(),
            eligibility_cgpa: record.eligibility_cgpa.clone().unwrap_or_default(),
            job_roles: record.job_roles.clone(),
            ctc_stipend: record.ctc_stipend.clone(),
            students_selected: record.students_selected.to_string(),
            process: record.process,
        }
    }

    /// Validate the required fields and build the request body.
    pub fn to_input(&self) -> Result<RecordInput, DraftError> {
        let notification_date = parse_date(required(&self.notification_date, "notification date")?)?;
        let company_name = required(&self.company_name, "company name")?.to_string();
        let type_of_offer = required(&self.type_of_offer, "type of offer")?.to_string();
        let job_roles = required(&self.job_roles, "job roles")?.to_string();
        let ctc_stipend = required(&self.ctc_stipend, "CTC/stipend")?.to_string();
        let count = required(&self.students_selected, "students selected")?;
        let students_selected = count
            .parse::<u32>()
            .map_err(|_| DraftError::InvalidCount(count.to_string()))?;

        Ok(RecordInput {
            notification_date,
            company_name,
            type_of_offer,
            branches_allowed: optional(&self.branches_allowed),
            eligibility_cgpa: optional(&self.eligibility_cgpa),
            job_roles,
            ctc_stipend,
            students_selected,
            process: self.process,
        })
    }
}

fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, DraftError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(DraftError::Missing(field))
    } else {
        Ok(trimmed)
    }
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Accepts ISO `YYYY-MM-DD` and the displayed `DD/MM/YYYY` form.
pub fn parse_date(s: &str) -> Result<NaiveDate, DraftError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%d/%m/%Y"))
        .map_err(|_| DraftError::InvalidDate(s.to_string()))
}
