use placement_core::{PlacementRecord, RecordDraft};

/// Whether the form creates a new record or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Add,
    Edit(u32),
}

/// Form fields, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
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

impl FormField {
    pub const ALL: [FormField; 9] = [
        FormField::NotificationDate,
        FormField::CompanyName,
        FormField::TypeOfOffer,
        FormField::BranchesAllowed,
        FormField::EligibilityCgpa,
        FormField::JobRoles,
        FormField::CtcStipend,
        FormField::StudentsSelected,
        FormField::Process,
    ];

    pub fn label(self) -> &'static str {
        match self {
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

    pub fn placeholder(self) -> &'static str {
        match self {
            Self::NotificationDate => "YYYY-MM-DD",
            Self::TypeOfOffer => "FTE, Intern, PPO, Intern+FTE",
            Self::CtcStipend => "CTC: ₹12,00,000",
            Self::BranchesAllowed | Self::EligibilityCgpa => "optional",
            _ => "",
        }
    }

    pub fn is_choice(self) -> bool {
        self == Self::Process
    }
}

/// State of the add/edit overlay.
#[derive(Debug, Clone)]
pub struct FormState {
    pub mode: FormMode,
    pub draft: RecordDraft,
    pub field: usize,
    /// Validation or save error shown under the fields.
    pub error: Option<String>,
    /// A save request is in flight; further submits are ignored.
    pub submitting: bool,
    /// Id of the last save request sent from this form. Results for any
    /// other id belong to a form that has since been closed.
    pub submit: Option<u64>,
}

impl FormState {
    pub fn add() -> Self {
        Self::with(FormMode::Add, RecordDraft::empty())
    }

    pub fn edit(record: &PlacementRecord) -> Self {
        Self::with(FormMode::Edit(record.id), RecordDraft::from_record(record))
    }

    fn with(mode: FormMode, draft: RecordDraft) -> Self {
        Self {
            mode,
            draft,
            field: 0,
            error: None,
            submitting: false,
            submit: None,
        }
    }

    pub fn current_field(&self) -> FormField {
        FormField::ALL[self.field.min(FormField::ALL.len() - 1)]
    }

    pub fn next_field(&mut self) {
        self.field = (self.field + 1) % FormField::ALL.len();
    }

    pub fn prev_field(&mut self) {
        self.field = (self.field + FormField::ALL.len() - 1) % FormField::ALL.len();
    }

    /// Display text of a field.
    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Process => self.draft.process.label(),
            other => self.text(other).map(String::as_str).unwrap_or(""),
        }
    }

    fn text(&self, field: FormField) -> Option<&String> {
        let d = &self.draft;
        Some(match field {
            FormField::NotificationDate => &d.notification_date,
            FormField::CompanyName => &d.company_name,
            FormField::TypeOfOffer => &d.type_of_offer,
            FormField::BranchesAllowed => &d.branches_allowed,
            FormField::EligibilityCgpa => &d.eligibility_cgpa,
            FormField::JobRoles => &d.job_roles,
            FormField::CtcStipend => &d.ctc_stipend,
            FormField::StudentsSelected => &d.students_selected,
            FormField::Process => return None,
        })
    }

    fn text_mut(&mut self, field: FormField) -> Option<&mut String> {
        let d = &mut self.draft;
        Some(match field {
            FormField::NotificationDate => &mut d.notification_date,
            FormField::CompanyName => &mut d.company_name,
            FormField::TypeOfOffer => &mut d.type_of_offer,
            FormField::BranchesAllowed => &mut d.branches_allowed,
            FormField::EligibilityCgpa => &mut d.eligibility_cgpa,
            FormField::JobRoles => &mut d.job_roles,
            FormField::CtcStipend => &mut d.ctc_stipend,
            FormField::StudentsSelected => &mut d.students_selected,
            FormField::Process => return None,
        })
    }

    /// Type into the current field. On the process field any key toggles.
    pub fn input(&mut self, c: char) {
        let field = self.current_field();
        if field.is_choice() {
            if c == ' ' {
                self.cycle_choice();
            }
            return;
        }
        if let Some(text) = self.text_mut(field) {
            text.push(c);
        }
        self.error = None;
    }

    pub fn backspace(&mut self) {
        let field = self.current_field();
        if let Some(text) = self.text_mut(field) {
            text.pop();
        }
        self.error = None;
    }

    pub fn cycle_choice(&mut self) {
        if self.current_field().is_choice() {
            self.draft.process = self.draft.process.toggle();
        }
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            FormMode::Add => " Add New Record ",
            FormMode::Edit(_) => " Edit Record ",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use placement_core::Process;

    #[test]
    fn typing_goes_to_current_field() {
        let mut form = FormState::add();
        form.next_field();
        for c in "Acme".chars() {
            form.input(c);
        }
        form.backspace();
        assert_eq!(form.draft.company_name, "Acm");
        assert_eq!(form.value(FormField::CompanyName), "Acm");
    }

    #[test]
    fn field_navigation_wraps() {
        let mut form = FormState::add();
        form.prev_field();
        assert_eq!(form.current_field(), FormField::Process);
        form.next_field();
        assert_eq!(form.current_field(), FormField::NotificationDate);
    }

    #[test]
    fn process_field_toggles_instead_of_typing() {
        let mut form = FormState::add();
        form.field = FormField::ALL.len() - 1;
        form.input('x');
        assert_eq!(form.draft.process, Process::Completed);
        form.input(' ');
        assert_eq!(form.draft.process, Process::Pending);
        form.cycle_choice();
        assert_eq!(form.value(FormField::Process), "Completed");
    }
}
