use placement_core::{ApiError, CheckTicket, PlacementRecord, RecordInput, Stats};

/// Commands sent from the TUI to the backend.
#[derive(Debug)]
pub enum BackendCommand {
    /// Re-fetch the record list and the aggregate stats. Results carry the
    /// generation back so late answers to older refreshes can be dropped.
    Refresh { generation: u64 },
    /// Check an admin token against `/auth/check`.
    ValidateToken(CheckTicket),
    /// `submit` identifies the form submission the result belongs to.
    Create {
        submit: u64,
        token: String,
        input: RecordInput,
    },
    Update {
        submit: u64,
        token: String,
        id: u32,
        input: RecordInput,
    },
    Delete {
        token: String,
        id: u32,
    },
}

/// Events flowing from the backend tasks to the TUI.
#[derive(Debug)]
pub enum BackendEvent {
    Companies {
        generation: u64,
        result: Result<Vec<PlacementRecord>, ApiError>,
    },
    Stats {
        generation: u64,
        result: Result<Stats, ApiError>,
    },
    TokenChecked {
        ticket: CheckTicket,
        result: Result<(), ApiError>,
    },
    /// A create or update finished.
    Saved {
        submit: u64,
        result: Result<PlacementRecord, ApiError>,
    },
    Deleted {
        id: u32,
        result: Result<(), ApiError>,
    },
}
