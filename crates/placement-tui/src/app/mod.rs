mod events;
mod update;

use chrono::NaiveDate;
use ratatui::layout::{Constraint, Layout};
use tokio::sync::mpsc;

use placement_core::config_file::Settings;
use placement_core::token_store::TokenStore;
use placement_core::view::visible_indices;
use placement_core::{AdminGate, PlacementRecord, Stats, ViewState};

use crate::model::form::FormState;
use crate::theme::Theme;
use crate::tui_event::BackendCommand;

/// Input mode determines how keyboard input is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    TextInput,
}

/// Modal panel drawn over the table. At most one is open at a time; the
/// blocking alert is tracked separately so it can sit on top of any of them.
#[derive(Debug, Clone)]
pub enum Overlay {
    None,
    Help,
    Token,
    Form(FormState),
    ConfirmDelete { id: u32, company: String },
}

/// Main application state.
pub struct App {
    /// Last fetched snapshot, in server order.
    pub records: Vec<PlacementRecord>,
    pub stats: Stats,
    pub view_state: ViewState,
    /// Indices into `records` in display order (recomputed on every view change).
    pub visible: Vec<usize>,
    pub cursor: usize,
    pub gate: AdminGate,
    pub token_store: Box<dyn TokenStore>,
    pub settings: Settings,
    pub theme: Theme,

    pub input_mode: InputMode,
    pub overlay: Overlay,
    /// Blocking notification; dismissed with Enter or Esc.
    pub alert: Option<String>,
    /// One-line status shown in the footer.
    pub status: Option<String>,
    /// The latest refresh is in flight.
    pub loading: bool,
    /// Generation of the most recently issued refresh.
    pub refresh_generation: u64,
    /// Generations of the snapshots currently shown; older results are dropped.
    pub records_generation: u64,
    pub stats_generation: u64,
    /// Id of the most recent form submission.
    pub last_submit: u64,
    /// At least one fetch has completed.
    pub loaded: bool,
    /// Date shown as "Last Updated".
    pub today: NaiveDate,

    pub tick: usize,
    pub should_quit: bool,
    /// Height of the visible table area (set on resize, used for page up/down).
    pub visible_rows: usize,
    /// Channel to send commands to the backend listener.
    pub backend_cmd_tx: Option<mpsc::UnboundedSender<BackendCommand>>,
}

impl App {
    /// The initial token comes from the environment if set, else from the store.
    pub fn new(settings: Settings, token_store: Box<dyn TokenStore>) -> Self {
        let token = settings.admin_token.clone().or_else(|| {
            token_store.load().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "could not read stored admin token");
                None
            })
        });
        let theme = Theme::from_name(&settings.theme);

        Self {
            records: Vec::new(),
            stats: Stats::default(),
            view_state: ViewState::default(),
            visible: Vec::new(),
            cursor: 0,
            gate: AdminGate::new(token.unwrap_or_default()),
            token_store,
            settings,
            theme,
            input_mode: InputMode::Normal,
            overlay: Overlay::None,
            alert: None,
            status: None,
            loading: false,
            refresh_generation: 0,
            records_generation: 0,
            stats_generation: 0,
            last_submit: 0,
            loaded: false,
            today: chrono::Local::now().date_naive(),
            tick: 0,
            should_quit: false,
            visible_rows: 20,
            backend_cmd_tx: None,
        }
    }

    /// Queue a command for the backend. Without a backend (tests) it is dropped.
    pub(crate) fn send(&self, cmd: BackendCommand) {
        if let Some(tx) = &self.backend_cmd_tx
            && tx.send(cmd).is_err()
        {
            tracing::warn!("backend listener is gone; command dropped");
        }
    }

    pub fn request_refresh(&mut self) {
        self.refresh_generation += 1;
        self.loading = true;
        self.send(BackendCommand::Refresh {
            generation: self.refresh_generation,
        });
    }

    /// The record under the cursor, if any row is visible.
    pub fn selected_record(&self) -> Option<&PlacementRecord> {
        self.visible
            .get(self.cursor)
            .and_then(|&i| self.records.get(i))
    }

    /// Recompute `visible` from the records and view state.
    ///
    /// Stabilises the cursor: if the record previously under the cursor is
    /// still visible, the cursor follows it to its new row.
    pub fn recompute_visible(&mut self) {
        let prev_id = self.selected_record().map(|r| r.id);
        self.visible = visible_indices(&self.records, &self.view_state);

        let follow = prev_id.and_then(|id| {
            self.visible
                .iter()
                .position(|&i| self.records[i].id == id)
        });
        self.cursor = follow.unwrap_or_else(|| self.cursor.min(self.visible.len().saturating_sub(1)));
    }

    /// Apply a change to the view state and re-derive the rows.
    pub(crate) fn set_view(&mut self, change: impl FnOnce(ViewState) -> ViewState) {
        let current = std::mem::take(&mut self.view_state);
        self.view_state = change(current);
        self.recompute_visible();
    }

    /// Render the current screen.
    pub fn view(&mut self, f: &mut ratatui::Frame) {
        let area = f.area();
        let chunks = Layout::vertical([
            Constraint::Length(1), // header
            Constraint::Length(4), // stats cards
            Constraint::Length(1), // search / filter / sort line
            Constraint::Min(5),    // table
            Constraint::Length(1), // footer
        ])
        .split(area);

        crate::view::header::render(f, chunks[0], self);
        crate::view::stats::render(f, chunks[1], self);
        crate::view::table::render_controls(f, chunks[2], self);
        crate::view::table::render_table(f, chunks[3], self);
        crate::view::table::render_footer(f, chunks[4], self);

        match &self.overlay {
            Overlay::None => {}
            Overlay::Help => crate::view::help::render(f, &self.theme),
            Overlay::Token => crate::view::token::render(f, self),
            Overlay::Form(form) => crate::view::form::render(f, form, &self.theme, self.tick),
            Overlay::ConfirmDelete { id, company } => {
                crate::view::confirm::render_delete(f, *id, company, &self.theme)
            }
        }

        if let Some(message) = &self.alert {
            crate::view::confirm::render_alert(f, message, &self.theme);
        }
    }
}
