use placement_core::SortKey;

/// Everything the user can ask the app to do, already decoded from key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    Tick,
    Resize(u16, u16),

    // Navigation
    MoveDown,
    MoveUp,
    PageDown,
    PageUp,
    GoTop,
    GoBottom,

    // View pipeline
    StartSearch,
    NextCtcFilter,
    PrevCtcFilter,
    NextSortColumn,
    FlipSortDirection,
    SortBy(SortKey),

    // Admin
    EditToken,
    ValidateToken,
    AddRecord,
    EditRecord,
    DeleteRecord,

    Refresh,
    ToggleHelp,
    SaveConfig,

    // Modal / text input
    Confirm,
    Cancel,
    Input(char),
    Backspace,
    NextField,
    PrevField,
    CycleChoice,
}
