//! Host commands exposed through the `:` prompt.

use crate::action::Action;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCommand {
    Refresh,
    Empty,
}

impl HostCommand {
    pub const ALL: [HostCommand; 2] = [Self::Refresh, Self::Empty];

    pub fn id(self) -> &'static str {
        match self {
            Self::Refresh => "trash:refresh",
            Self::Empty => "trash:empty",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Refresh => "Refresh Trash",
            Self::Empty => "Empty Trash",
        }
    }

    pub fn caption(self) -> &'static str {
        match self {
            Self::Refresh => "Refresh the trash panel contents",
            Self::Empty => "Permanently delete all items in trash",
        }
    }

    /// Accepts the id, the label, or the bare verb, case-insensitively.
    pub fn parse(input: &str) -> Option<Self> {
        let wanted = input.trim().to_lowercase();
        if wanted.is_empty() {
            return None;
        }
        Self::ALL.into_iter().find(|cmd| {
            let id = cmd.id();
            let verb = id.trim_start_matches("trash:");
            wanted == id || wanted == verb || wanted == cmd.label().to_lowercase()
        })
    }

    /// What running the command dispatches. Empty goes through the same
    /// confirm flow as the panel's own button.
    pub fn action(self) -> Action {
        match self {
            Self::Refresh => Action::Refresh,
            Self::Empty => Action::EmptyTrash,
        }
    }
}
