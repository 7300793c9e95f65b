//! AppState: shared read-only data passed to all components during render/event.
//!
//! Components read this, but never mutate it.
//! The App event-loop is the only thing that writes to AppState.

use chrono::{DateTime, Local};

use crate::widgets::status_bar::InputMode;

pub struct AppState {
    /// Base URL of the notebook server, for display.
    pub server_url: String,
    pub input_mode: InputMode,
    /// Requests spawned but not yet answered.
    pub in_flight: usize,
    /// When the last `list` call succeeded.
    pub last_refresh: Option<DateTime<Local>>,
    pub panel_visible: bool,
}

impl AppState {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            input_mode: InputMode::Normal,
            in_flight: 0,
            last_refresh: None,
            panel_visible: false,
        }
    }
}
