//! Status bar: bottom line with mode, server state, and keybindings.

use chrono::{DateTime, Local};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme::{
    C_BUSY, C_MODE_COMMAND, C_MODE_CONFIRM, C_MODE_NORMAL, C_MUTED, C_OK, C_SECONDARY,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Command,
    Confirm,
}

impl InputMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Command => "COMMAND",
            Self::Confirm => "CONFIRM",
        }
    }

    pub fn color(self) -> Color {
        match self {
            Self::Normal => C_MODE_NORMAL,
            Self::Command => C_MODE_COMMAND,
            Self::Confirm => C_MODE_CONFIRM,
        }
    }
}

/// Draw the keybindings footer bar (one row).
pub fn draw_keys_bar(
    frame: &mut Frame,
    area: Rect,
    mode: InputMode,
    in_flight: usize,
    last_refresh: Option<DateTime<Local>>,
) {
    let mut spans = vec![Span::styled(
        format!(" {} ", mode.label()),
        Style::default()
            .fg(mode.color())
            .add_modifier(Modifier::BOLD),
    )];

    let (bulb, bulb_color) = if in_flight > 0 {
        ("◌", C_BUSY)
    } else {
        ("●", C_OK)
    };
    spans.push(Span::styled(bulb, Style::default().fg(bulb_color)));
    if let Some(ts) = last_refresh {
        spans.push(Span::styled(
            format!(" {}", ts.format("%H:%M:%S")),
            Style::default().fg(C_SECONDARY),
        ));
    }

    let keys = match mode {
        InputMode::Normal => {
            "  ↑↓/jk move  1/2/3 sort  Enter menu  r restore  x delete  E empty  R refresh  y copy  t panel  : cmd  ? help  q quit"
        }
        InputMode::Command => "  type command  Enter run  Esc cancel",
        InputMode::Confirm => "  ←→/Tab choose  Enter select  y accept  n/Esc cancel",
    };
    spans.push(Span::styled(keys, Style::default().fg(C_MUTED)));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
