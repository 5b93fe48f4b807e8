//! Runs API calls off the UI loop and reports results as [`BackendEvent`]s.

use std::sync::Arc;

use placement_core::PlacementApi;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::tui_event::{BackendCommand, BackendEvent};

/// Receive commands until the channel closes or `cancel` fires. Each command
/// runs in its own task, so a slow request never blocks the next command.
pub async fn run(
    api: Arc<dyn PlacementApi>,
    mut cmd_rx: mpsc::UnboundedReceiver<BackendCommand>,
    event_tx: mpsc::UnboundedSender<BackendEvent>,
    cancel: CancellationToken,
) {
    loop {
        let cmd = tokio::select! {
            _ = cancel.cancelled() => break,
            cmd = cmd_rx.recv() => match cmd {
                Some(cmd) => cmd,
                None => break,
            },
        };
        let api = Arc::clone(&api);
        let tx = event_tx.clone();
        tokio::spawn(async move {
            execute(api.as_ref(), cmd, &tx).await;
        });
    }
    tracing::debug!("backend listener stopped");
}

/// Perform one command and send its result events. Send errors mean the UI
/// has gone away and are ignored.
pub async fn execute(
    api: &dyn PlacementApi,
    cmd: BackendCommand,
    tx: &mpsc::UnboundedSender<BackendEvent>,
) {
    match cmd {
        BackendCommand::Refresh { generation } => {
            let (companies, stats) = tokio::join!(api.list_companies(), api.fetch_stats());
            let _ = tx.send(BackendEvent::Companies {
                generation,
                result: companies,
            });
            let _ = tx.send(BackendEvent::Stats {
                generation,
                result: stats,
            });
        }
        BackendCommand::ValidateToken(ticket) => {
            let result = api.check_auth(ticket.token()).await;
            let _ = tx.send(BackendEvent::TokenChecked { ticket, result });
        }
        BackendCommand::Create {
            submit,
            token,
            input,
        } => {
            tracing::info!(company = %input.company_name, "creating record");
            let result = api.create_company(&token, &input).await;
            let _ = tx.send(BackendEvent::Saved { submit, result });
        }
        BackendCommand::Update {
            submit,
            token,
            id,
            input,
        } => {
            tracing::info!(id, "updating record");
            let result = api.update_company(&token, id, &input).await;
            let _ = tx.send(BackendEvent::Saved { submit, result });
        }
        BackendCommand::Delete { token, id } => {
            tracing::info!(id, "deleting record");
            let result = api.delete_company(&token, id).await;
            let _ = tx.send(BackendEvent::Deleted { id, result });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use placement_core::client::ApiFuture;
    use placement_core::{AdminGate, ApiError, PlacementRecord, Process, RecordInput, Stats};

    /// Accepts only the token "good"; every list call returns one record.
    struct FakeApi;

    fn sample() -> PlacementRecord {
        PlacementRecord {
            id: 1,
            notification_date: NaiveDate::from_ymd_opt(2025, 8, 14).unwrap(),
            company_name: "Alpha".into(),
            type_of_offer: "FTE".into(),
            branches_allowed: None,
            eligibility_cgpa: None,
            job_roles: "SDE".into(),
            ctc_stipend: "CTC: ₹12,00,000".into(),
            students_selected: 2,
            process: Process::Completed,
        }
    }

    fn authorize(token: &str) -> Result<(), ApiError> {
        if token == "good" {
            Ok(())
        } else {
            Err(ApiError::Unauthorized { status: 403 })
        }
    }

    impl PlacementApi for FakeApi {
        fn list_companies(&self) -> ApiFuture<'_, Vec<PlacementRecord>> {
            Box::pin(async { Ok(vec![sample()]) })
        }

        fn get_company(&self, id: u32) -> ApiFuture<'_, PlacementRecord> {
            Box::pin(async move { Err(ApiError::NotFound { id }) })
        }

        fn fetch_stats(&self) -> ApiFuture<'_, Stats> {
            Box::pin(async {
                Err(ApiError::Status {
                    status: 500,
                    detail: "db down".into(),
                })
            })
        }

        fn check_auth<'a>(&'a self, token: &'a str) -> ApiFuture<'a, ()> {
            Box::pin(async move { authorize(token) })
        }

        fn create_company<'a>(
            &'a self,
            token: &'a str,
            _input: &'a RecordInput,
        ) -> ApiFuture<'a, PlacementRecord> {
            Box::pin(async move { authorize(token).map(|()| sample()) })
        }

        fn update_company<'a>(
            &'a self,
            token: &'a str,
            _id: u32,
            _input: &'a RecordInput,
        ) -> ApiFuture<'a, PlacementRecord> {
            Box::pin(async move { authorize(token).map(|()| sample()) })
        }

        fn delete_company<'a>(&'a self, token: &'a str, _id: u32) -> ApiFuture<'a, ()> {
            Box::pin(async move { authorize(token) })
        }
    }

    #[tokio::test]
    async fn refresh_reports_companies_and_stats_separately() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        execute(&FakeApi, BackendCommand::Refresh { generation: 3 }, &tx).await;

        match rx.recv().await {
            Some(BackendEvent::Companies {
                generation: 3,
                result: Ok(records),
            }) => assert_eq!(records.len(), 1),
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(matches!(
            rx.recv().await,
            Some(BackendEvent::Stats {
                generation: 3,
                result: Err(ApiError::Status { status: 500, .. }),
            })
        ));
    }

    #[tokio::test]
    async fn token_check_carries_its_ticket_back() {
        let mut gate = AdminGate::new("bad");
        let ticket = gate.begin_validation().unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        execute(&FakeApi, BackendCommand::ValidateToken(ticket), &tx).await;

        match rx.recv().await {
            Some(BackendEvent::TokenChecked { ticket, result }) => {
                assert_eq!(ticket.token(), "bad");
                assert!(result.unwrap_err().is_unauthorized());
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn delete_reports_id_with_result() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        execute(
            &FakeApi,
            BackendCommand::Delete {
                token: "good".into(),
                id: 42,
            },
            &tx,
        )
        .await;
        assert!(matches!(
            rx.recv().await,
            Some(BackendEvent::Deleted { id: 42, result: Ok(()) })
        ));
    }

    #[tokio::test]
    async fn listener_dispatches_until_cancelled() {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run(Arc::new(FakeApi), cmd_rx, event_tx, cancel.clone()));

        cmd_tx
            .send(BackendCommand::Create {
                submit: 1,
                token: "nope".into(),
                input: RecordInput::from(&sample()),
            })
            .unwrap();
        assert!(matches!(
            event_rx.recv().await,
            Some(BackendEvent::Saved {
                submit: 1,
                result: Err(ApiError::Unauthorized { status: 403 }),
            })
        ));

        cancel.cancel();
        handle.await.unwrap();
    }
}
