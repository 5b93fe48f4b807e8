use placement_core::config_file::save_config;
use placement_core::{SortConfig, SortDirection, SortKey};

use super::{App, InputMode, Overlay};
use crate::action::Action;
use crate::model::form::{FormMode, FormState};
use crate::tui_event::BackendCommand;

const ADMIN_REQUIRED: &str = "Admin mode required: press t to enter a token, then v to validate";

impl App {
    /// Process a user action and update state. Returns true if the app should quit.
    pub fn update(&mut self, action: Action) -> bool {
        match action {
            Action::Tick => {
                self.tick = self.tick.wrapping_add(1);
                return false;
            }
            Action::Resize(_w, h) => {
                self.visible_rows = (h as usize).saturating_sub(10).max(1);
                return false;
            }
            Action::Quit if self.input_mode != InputMode::Normal || self.alert.is_some() => {
                // Only Ctrl+C reaches here while typing; still quit.
                self.should_quit = true;
                return true;
            }
            _ => {}
        }

        // Blocking alert swallows everything until dismissed
        if self.alert.is_some() {
            if matches!(action, Action::Confirm | Action::Cancel) {
                self.alert = None;
            }
            return false;
        }

        match self.overlay {
            Overlay::None => {}
            Overlay::Help => {
                match action {
                    Action::Quit => {
                        self.should_quit = true;
                        return true;
                    }
                    Action::ToggleHelp | Action::Cancel | Action::Confirm => {
                        self.overlay = Overlay::None;
                    }
                    _ => {}
                }
                return false;
            }
            Overlay::Token => {
                self.handle_token_action(action);
                return false;
            }
            Overlay::Form(_) => {
                self.handle_form_action(action);
                return false;
            }
            Overlay::ConfirmDelete { .. } => {
                self.handle_confirm_delete(action);
                return false;
            }
        }

        if self.input_mode == InputMode::Search {
            self.handle_search_action(action);
            return false;
        }

        match action {
            Action::Quit => {
                self.should_quit = true;
                return true;
            }
            Action::MoveDown => {
                if self.cursor + 1 < self.visible.len() {
                    self.cursor += 1;
                }
            }
            Action::MoveUp => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            Action::PageDown => {
                let last = self.visible.len().saturating_sub(1);
                self.cursor = (self.cursor + self.visible_rows).min(last);
            }
            Action::PageUp => {
                self.cursor = self.cursor.saturating_sub(self.visible_rows);
            }
            Action::GoTop => {
                self.cursor = 0;
            }
            Action::GoBottom => {
                self.cursor = self.visible.len().saturating_sub(1);
            }
            Action::StartSearch => {
                self.input_mode = InputMode::Search;
            }
            Action::Cancel => {
                if !self.view_state.search.is_empty() {
                    self.set_view(|v| v.with_search(""));
                }
                self.status = None;
            }
            Action::NextCtcFilter => {
                self.set_view(|v| {
                    let next = v.ctc_filter.next();
                    v.with_ctc_filter(next)
                });
            }
            Action::PrevCtcFilter => {
                self.set_view(|v| {
                    let prev = v.ctc_filter.prev();
                    v.with_ctc_filter(prev)
                });
            }
            Action::NextSortColumn => {
                let key = self
                    .view_state
                    .sort
                    .map(|s| s.key.next())
                    .unwrap_or(SortKey::Id);
                self.set_view(|v| {
                    v.with_sort(Some(SortConfig {
                        key,
                        direction: SortDirection::Asc,
                    }))
                });
            }
            Action::FlipSortDirection => {
                if let Some(sort) = self.view_state.sort {
                    let direction = match sort.direction {
                        SortDirection::Asc => SortDirection::Desc,
                        SortDirection::Desc => SortDirection::Asc,
                    };
                    self.set_view(|v| {
                        v.with_sort(Some(SortConfig {
                            key: sort.key,
                            direction,
                        }))
                    });
                }
            }
            Action::SortBy(key) => {
                self.set_view(|v| v.toggle_sort(key));
            }
            Action::EditToken => {
                self.overlay = Overlay::Token;
                self.input_mode = InputMode::TextInput;
            }
            Action::ValidateToken => self.validate_token(),
            Action::AddRecord => {
                if self.require_admin() {
                    self.open_form(FormState::add());
                }
            }
            Action::EditRecord => {
                if self.require_admin()
                    && let Some(record) = self.selected_record()
                {
                    let form = FormState::edit(record);
                    self.open_form(form);
                }
            }
            Action::DeleteRecord => {
                if self.require_admin()
                    && let Some(record) = self.selected_record()
                {
                    let (id, company) = (record.id, record.company_name.clone());
                    self.overlay = Overlay::ConfirmDelete { id, company };
                }
            }
            Action::Refresh => {
                self.request_refresh();
                self.status = Some("Refreshing\u{2026}".to_string());
            }
            Action::ToggleHelp => {
                self.overlay = Overlay::Help;
            }
            Action::SaveConfig => self.save_config(),
            _ => {}
        }
        false
    }

    fn handle_search_action(&mut self, action: Action) {
        match action {
            Action::Input(c) => {
                let mut search = self.view_state.search.clone();
                search.push(c);
                self.set_view(|v| v.with_search(search));
            }
            Action::Backspace => {
                let mut search = self.view_state.search.clone();
                search.pop();
                self.set_view(|v| v.with_search(search));
            }
            Action::Confirm => {
                self.input_mode = InputMode::Normal;
            }
            Action::Cancel => {
                self.input_mode = InputMode::Normal;
                self.set_view(|v| v.with_search(""));
            }
            _ => {}
        }
    }

    fn handle_token_action(&mut self, action: Action) {
        match action {
            Action::Input(c) => {
                self.gate.push_char(c);
                self.persist_token();
            }
            Action::Backspace => {
                self.gate.pop_char();
                self.persist_token();
            }
            Action::Confirm => {
                self.close_overlay();
                self.validate_token();
            }
            Action::Cancel => self.close_overlay(),
            _ => {}
        }
    }

    fn handle_form_action(&mut self, action: Action) {
        let Overlay::Form(form) = &mut self.overlay else {
            return;
        };
        match action {
            Action::Input(c) => form.input(c),
            Action::Backspace => form.backspace(),
            Action::NextField => form.next_field(),
            Action::PrevField => form.prev_field(),
            Action::CycleChoice => form.cycle_choice(),
            Action::Cancel => self.close_overlay(),
            Action::Confirm => {
                if form.submitting {
                    return;
                }
                match form.draft.to_input() {
                    Err(e) => form.error = Some(e.to_string()),
                    Ok(input) => {
                        self.last_submit += 1;
                        let submit = self.last_submit;
                        form.submitting = true;
                        form.submit = Some(submit);
                        form.error = None;
                        let token = self.gate.token().to_string();
                        let cmd = match form.mode {
                            FormMode::Add => BackendCommand::Create {
                                submit,
                                token,
                                input,
                            },
                            FormMode::Edit(id) => BackendCommand::Update {
                                submit,
                                token,
                                id,
                                input,
                            },
                        };
                        self.send(cmd);
                    }
                }
            }
            _ => {}
        }
    }

    fn handle_confirm_delete(&mut self, action: Action) {
        let Overlay::ConfirmDelete { id, .. } = self.overlay else {
            return;
        };
        match action {
            Action::Confirm => {
                self.overlay = Overlay::None;
                self.status = Some(format!("Deleting record {id}\u{2026}"));
                self.send(BackendCommand::Delete {
                    token: self.gate.token().to_string(),
                    id,
                });
            }
            Action::Cancel | Action::Quit => {
                self.overlay = Overlay::None;
            }
            _ => {}
        }
    }

    fn open_form(&mut self, form: FormState) {
        self.overlay = Overlay::Form(form);
        self.input_mode = InputMode::TextInput;
    }

    pub(crate) fn close_overlay(&mut self) {
        self.overlay = Overlay::None;
        self.input_mode = InputMode::Normal;
    }

    /// True when mutations are allowed; otherwise explains how to unlock them.
    fn require_admin(&mut self) -> bool {
        if self.gate.can_mutate() {
            true
        } else {
            self.status = Some(ADMIN_REQUIRED.to_string());
            false
        }
    }

    fn validate_token(&mut self) {
        if self.gate.is_checking() {
            self.status = Some("Token check already in progress\u{2026}".to_string());
            return;
        }
        match self.gate.begin_validation() {
            None => {
                self.status = Some("No admin token set; read-only mode".to_string());
            }
            Some(ticket) => {
                self.status = Some("Validating admin token\u{2026}".to_string());
                self.send(BackendCommand::ValidateToken(ticket));
            }
        }
    }

    /// Persist the token after every edit so it survives restarts.
    fn persist_token(&mut self) {
        if let Err(e) = self.token_store.save(self.gate.token()) {
            tracing::warn!(error = %e, "failed to persist admin token");
            self.status = Some(format!("Could not save token: {e}"));
        }
    }

    fn save_config(&mut self) {
        match save_config(&self.settings.to_config_file()) {
            Ok(path) => {
                tracing::info!(path = %path.display(), "saved config");
                self.status = Some(format!("Config saved to {}", path.display()));
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to save config");
                self.alert = Some(format!("Failed to save config: {e}"));
            }
        }
    }
}
