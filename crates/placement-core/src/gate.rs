//! Admin gate: tracks the admin token and whether the server has accepted it.
//!
//! `validated` only controls which affordances the UI shows. Every mutating
//! request still carries the token and is authorized by the server.

use crate::client::{ApiError, PlacementApi};

/// Issued when a token check starts; hand it back with the outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckTicket {
    token: String,
    generation: u64,
}

impl CheckTicket {
    pub fn token(&self) -> &str {
        &self.token
    }
}

/// Result of applying a finished token check to the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// The server accepted the token; admin mode is on.
    Validated,
    /// The check failed; carries a message for the user.
    Rejected(String),
    /// The token was edited while the check was in flight; result ignored.
    Stale,
}

#[derive(Debug, Clone, Default)]
pub struct AdminGate {
    token: String,
    validated: bool,
    /// Checks in flight for the current token; older ones are already stale.
    in_flight: usize,
    generation: u64,
}

impl AdminGate {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            ..Self::default()
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn is_validated(&self) -> bool {
        self.validated
    }

    /// A check of the current token is in flight; the UI disables its
    /// validate trigger. Checks of an edited-away token do not count.
    pub fn is_checking(&self) -> bool {
        self.in_flight > 0
    }

    /// Whether add/edit/delete should be offered.
    pub fn can_mutate(&self) -> bool {
        self.validated
    }

    /// Replace the token text. Any change drops admin mode until the new
    /// token is validated explicitly.
    pub fn set_token(&mut self, token: impl Into<String>) {
        let token = token.into();
        if token != self.token {
            self.token = token;
            self.validated = false;
            self.in_flight = 0;
            self.generation = self.generation.wrapping_add(1);
        }
    }

    pub fn push_char(&mut self, c: char) {
        let mut token = self.token.clone();
        token.push(c);
        self.set_token(token);
    }

    pub fn pop_char(&mut self) {
        let mut token = self.token.clone();
        if token.pop().is_some() {
            self.set_token(token);
        }
    }

    /// Start a token check. An empty token short-circuits to read-only mode
    /// and returns `None`: no request should be made.
    pub fn begin_validation(&mut self) -> Option<CheckTicket> {
        if self.token.is_empty() {
            self.validated = false;
            return None;
        }
        self.in_flight += 1;
        Some(CheckTicket {
            token: self.token.clone(),
            generation: self.generation,
        })
    }

    /// Apply the outcome of a check started with [`begin_validation`].
    ///
    /// Checks for the current token are applied in completion order, so the
    /// last one to finish wins.
    ///
    /// [`begin_validation`]: AdminGate::begin_validation
    pub fn complete_validation(
        &mut self,
        ticket: CheckTicket,
        result: Result<(), ApiError>,
    ) -> GateOutcome {
        if ticket.generation != self.generation {
            tracing::debug!("discarding token check for a superseded token");
            return GateOutcome::Stale;
        }
        self.in_flight = self.in_flight.saturating_sub(1);
        match result {
            Ok(()) => {
                self.validated = true;
                GateOutcome::Validated
            }
            Err(e) => {
                tracing::warn!(error = %e, "admin token rejected");
                self.validated = false;
                GateOutcome::Rejected(rejection_message(&e))
            }
        }
    }

    /// Begin, perform and complete a check in one step.
    ///
    /// Returns `None` when the token is empty and no request was made.
    pub async fn validate(&mut self, api: &dyn PlacementApi) -> Option<GateOutcome> {
        let ticket = self.begin_validation()?;
        let result = api.check_auth(ticket.token()).await;
        Some(self.complete_validation(ticket, result))
    }
}

fn rejection_message(err: &ApiError) -> String {
    if err.is_unauthorized() {
        "Invalid admin token".to_string()
    } else {
        format!("Could not validate admin token: {err}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ApiFuture;
    use crate::model::{PlacementRecord, RecordInput, Stats};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Accepts exactly one token and counts auth checks.
    struct FakeApi {
        accepted: &'static str,
        checks: AtomicUsize,
    }

    impl FakeApi {
        fn new(accepted: &'static str) -> Self {
            Self {
                accepted,
                checks: AtomicUsize::new(0),
            }
        }
    }

    impl PlacementApi for FakeApi {
        fn list_companies(&self) -> ApiFuture<'_, Vec<PlacementRecord>> {
            Box::pin(async { Ok(Vec::new()) })
        }
        fn get_company(&self, id: u32) -> ApiFuture<'_, PlacementRecord> {
            Box::pin(async move { Err(ApiError::NotFound { id }) })
        }
        fn fetch_stats(&self) -> ApiFuture<'_, Stats> {
            Box::pin(async { Ok(Stats::default()) })
        }
        fn check_auth<'a>(&'a self, token: &'a str) -> ApiFuture<'a, ()> {
            self.checks.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move {
                if token == self.accepted {
                    Ok(())
                } else {
                    Err(ApiError::Unauthorized { status: 403 })
                }
            })
        }
        fn create_company<'a>(
            &'a self,
            _token: &'a str,
            _input: &'a RecordInput,
        ) -> ApiFuture<'a, PlacementRecord> {
            Box::pin(async { Err(ApiError::Unauthorized { status: 403 }) })
        }
        fn update_company<'a>(
            &'a self,
            _token: &'a str,
            id: u32,
            _input: &'a RecordInput,
        ) -> ApiFuture<'a, PlacementRecord> {
            Box::pin(async move { Err(ApiError::NotFound { id }) })
        }
        fn delete_company<'a>(&'a self, _token: &'a str, _id: u32) -> ApiFuture<'a, ()> {
            Box::pin(async { Ok(()) })
        }
    }

    #[tokio::test]
    async fn empty_token_never_hits_network() {
        let api = FakeApi::new("secret");
        let mut gate = AdminGate::new("");
        assert_eq!(gate.validate(&api).await, None);
        assert!(!gate.is_validated());
        assert_eq!(api.checks.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn accepted_token_validates_then_edit_resets() {
        let api = FakeApi::new("secret");
        let mut gate = AdminGate::new("secret");
        assert_eq!(gate.validate(&api).await, Some(GateOutcome::Validated));
        assert!(gate.can_mutate());

        gate.push_char('x');
        assert!(!gate.is_validated());
        gate.pop_char();
        assert_eq!(gate.token(), "secret");
        assert!(!gate.is_validated(), "no implicit re-validation");
    }

    #[tokio::test]
    async fn rejected_token_surfaces_message() {
        let api = FakeApi::new("secret");
        let mut gate = AdminGate::new("wrong");
        let outcome = gate.validate(&api).await;
        assert_eq!(
            outcome,
            Some(GateOutcome::Rejected("Invalid admin token".to_string()))
        );
        assert!(!gate.is_validated());
        assert!(!gate.is_checking());
    }

    #[test]
    fn setting_same_token_keeps_validation() {
        let mut gate = AdminGate::new("secret");
        let ticket = gate.begin_validation().unwrap();
        gate.complete_validation(ticket, Ok(()));
        gate.set_token("secret");
        assert!(gate.is_validated());
    }

    #[test]
    fn checking_flag_tracks_in_flight_checks() {
        let mut gate = AdminGate::new("secret");
        let first = gate.begin_validation().unwrap();
        let second = gate.begin_validation().unwrap();
        assert!(gate.is_checking());
        gate.complete_validation(first, Ok(()));
        assert!(gate.is_checking());
        // Last completion wins.
        gate.complete_validation(second, Err(ApiError::Unauthorized { status: 401 }));
        assert!(!gate.is_checking());
        assert!(!gate.is_validated());
    }

    #[test]
    fn result_for_edited_token_is_discarded() {
        let mut gate = AdminGate::new("secret");
        let ticket = gate.begin_validation().unwrap();
        assert_eq!(ticket.token(), "secret");
        gate.set_token("other");
        assert_eq!(gate.complete_validation(ticket, Ok(())), GateOutcome::Stale);
        assert!(!gate.is_validated());
        assert!(!gate.is_checking());
    }

    #[test]
    fn edit_unblocks_validation_while_old_check_is_pending() {
        let mut gate = AdminGate::new("old");
        let old = gate.begin_validation().unwrap();
        assert!(gate.is_checking());

        gate.push_char('2');
        assert!(!gate.is_checking());
        let new = gate.begin_validation().unwrap();
        assert_eq!(new.token(), "old2");

        // The old check finishing late neither validates nor clears the new one.
        assert_eq!(gate.complete_validation(old, Ok(())), GateOutcome::Stale);
        assert!(gate.is_checking());
        assert_eq!(gate.complete_validation(new, Ok(())), GateOutcome::Validated);
        assert!(!gate.is_checking());
    }

    #[test]
    fn clearing_token_then_validating_drops_admin_mode() {
        let mut gate = AdminGate::new("secret");
        let ticket = gate.begin_validation().unwrap();
        gate.complete_validation(ticket, Ok(()));
        gate.set_token("");
        assert!(gate.begin_validation().is_none());
        assert!(!gate.is_validated());
    }
}
