//! Action enum: all user-initiated intents and internal events.

use crate::close_flow::CloseRequest;

/// Outcome of a close request, as reported back to the card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseOutcome {
    Closed(String),
    Failed(String),
}

/// All actions that can flow through the system.
/// Components produce Actions; the App dispatches them.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ── Cards ────────────────────────────────────────────────────────────────
    /// Select the card at this snapshot index (open it, or close it if open).
    ToggleCard(usize),
    /// Open the close-channel modal of the expanded card at this index.
    OpenCloseModal(usize),
    DismissModal,
    SubmitClose(CloseRequest),
    CloseFinished {
        channel_id: String,
        outcome: CloseOutcome,
    },

    // ── Navigation ───────────────────────────────────────────────────────────
    CursorUp(usize),
    CursorDown(usize),
    CursorFirst,
    CursorLast,

    // ── Filter / sort ────────────────────────────────────────────────────────
    OpenFilter,
    CloseFilter,
    CycleSort,
    CycleSortReverse,

    // ── UI ───────────────────────────────────────────────────────────────────
    ToggleHelp,
    CopyToClipboard(String),
    Notify(String),

    // ── System ───────────────────────────────────────────────────────────────
    Quit,
    Resize(u16, u16),
}
