/// User-level actions produced by the input mapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Tick,
    Resize(u16, u16),

    // Navigation
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    GoTop,
    GoBottom,
    FocusNext,
    FocusPrev,
    DrillIn,
    NavigateBack,

    // Upload screen
    AddFiles,
    Remove,
    Submit,
    Refresh,
    StartSearch,
    ToggleSelect,
    ToggleHelp,

    // Text input
    TextInput(char),
    Backspace,
    ConfirmInput,
    CancelInput,

    None,
}
