//! Core library for the placement tracker: the record model, the client-side
//! view pipeline (search, CTC filter, sort), the admin token gate and the
//! HTTP client for the placement API.

pub mod client;
pub mod config_file;
pub mod ctc;
pub mod draft;
pub mod format;
pub mod gate;
pub mod model;
pub mod stats;
pub mod token_store;
pub mod view;

// Re-export for convenience
pub use client::{ADMIN_TOKEN_HEADER, ApiClient, ApiError, DEFAULT_API_URL, PlacementApi};
pub use ctc::extract_ctc_value;
pub use draft::{DraftError, RecordDraft};
pub use gate::{AdminGate, CheckTicket, GateOutcome};
pub use model::{PlacementRecord, Process, RecordInput, Stats};
pub use view::{CtcFilter, SortConfig, SortDirection, SortKey, ViewState};

/// Number of students in the graduating batch, shown as the denominator of
/// the "students selected" card.
pub const DEFAULT_BATCH_SIZE: u32 = 490;
