//! Action enum: all user-initiated intents and internal events.

use crate::commands::HostCommand;
use crate::widgets::toast::Severity;

/// A call against the trash extension, executed off the UI loop.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiRequest {
    List,
    Restore { trash_path: String, name: String },
    Delete { trash_path: String, name: String },
    Empty,
}

/// A blocking yes/no question whose accept path runs `on_accept`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmRequest {
    pub title: String,
    pub body: String,
    /// Label of the destructive button.
    pub confirm_label: String,
    pub on_accept: ApiRequest,
}

/// All actions that can flow through the system.
/// Components produce Actions; the App dispatches them.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ── Trash operations ─────────────────────────────────────────────────────
    Refresh,
    EmptyTrash,

    // ── Dialogs / effects ────────────────────────────────────────────────────
    Confirm(ConfirmRequest),
    Api(ApiRequest),
    Notify(Severity, String),

    // ── Host shell ───────────────────────────────────────────────────────────
    RunCommand(HostCommand),
    OpenCommandPrompt,
    TogglePanel,
    ToggleHelp,
    CopyToClipboard(String),
    Quit,
}
