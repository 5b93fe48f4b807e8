use placement_core::GateOutcome;

use super::{App, Overlay};
use crate::tui_event::BackendEvent;

pub const SAVE_FAILED: &str = "Admin authorization failed or error saving. Check admin token.";
pub const DELETE_FAILED: &str = "Admin authorization failed or error deleting. Check admin token.";

impl App {
    /// Process a backend event and update model state.
    pub fn handle_backend_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::Companies { generation, result } => {
                if generation == self.refresh_generation {
                    self.loading = false;
                }
                match result {
                    Ok(records) if generation >= self.records_generation => {
                        tracing::debug!(count = records.len(), generation, "records loaded");
                        self.records = records;
                        self.records_generation = generation;
                        self.loaded = true;
                        self.recompute_visible();
                        if self.status.as_deref() == Some("Refreshing\u{2026}") {
                            self.status = None;
                        }
                    }
                    Ok(_) => {
                        tracing::debug!(generation, "dropping records from a superseded refresh");
                    }
                    Err(e) => {
                        // Keep the previous snapshot on screen.
                        tracing::warn!(error = %e, "error fetching companies");
                        if generation == self.refresh_generation {
                            self.status = Some(format!("Could not load records: {e}"));
                        }
                    }
                }
            }
            BackendEvent::Stats { generation, result } => match result {
                Ok(stats) if generation >= self.stats_generation => {
                    self.stats = stats;
                    self.stats_generation = generation;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "error fetching stats");
                }
            },
            BackendEvent::TokenChecked { ticket, result } => {
                match self.gate.complete_validation(ticket, result) {
                    GateOutcome::Validated => {
                        self.status = Some("Admin mode enabled".to_string());
                    }
                    GateOutcome::Rejected(message) => {
                        self.status = None;
                        self.alert = Some(message);
                    }
                    GateOutcome::Stale => {}
                }
            }
            BackendEvent::Saved {
                submit,
                result: Ok(record),
            } => {
                tracing::info!(id = record.id, company = %record.company_name, "record saved");
                if self.form_awaits(submit) {
                    self.close_overlay();
                }
                self.status = Some(format!("Saved {}", record.company_name));
                self.request_refresh();
            }
            BackendEvent::Saved {
                submit,
                result: Err(e),
            } => {
                tracing::error!(error = %e, "error saving record");
                if self.form_awaits(submit)
                    && let Overlay::Form(form) = &mut self.overlay
                {
                    form.submitting = false;
                    form.error = Some(e.to_string());
                }
                self.alert = Some(SAVE_FAILED.to_string());
            }
            BackendEvent::Deleted { id, result: Ok(()) } => {
                tracing::info!(id, "record deleted");
                self.status = Some(format!("Deleted record {id}"));
                self.request_refresh();
            }
            BackendEvent::Deleted { id, result: Err(e) } => {
                tracing::error!(id, error = %e, "error deleting record");
                self.status = None;
                self.alert = Some(DELETE_FAILED.to_string());
            }
        }
    }

    /// True when the open form is the one that sent submission `submit`.
    fn form_awaits(&self, submit: u64) -> bool {
        matches!(&self.overlay, Overlay::Form(form) if form.submit == Some(submit))
    }
}
