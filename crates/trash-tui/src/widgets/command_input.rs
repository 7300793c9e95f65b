//! CommandInput: wraps tui-input for the `:` host command prompt.

use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input};

use crate::theme::{C_MUTED, C_PROMPT_BG, C_PROMPT_FG};

pub enum PromptAction {
    Submitted(String),
    Cancelled,
    None,
}

pub struct CommandInput {
    input: Input,
    active: bool,
    placeholder: String,
}

impl CommandInput {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            input: Input::default(),
            active: false,
            placeholder: placeholder.into(),
        }
    }

    pub fn activate(&mut self) {
        self.input = Input::default();
        self.active = true;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Handle a key event. Enter submits the text, Esc abandons it.
    pub fn handle_key(&mut self, key: KeyEvent) -> PromptAction {
        match key.code {
            KeyCode::Esc => {
                self.active = false;
                PromptAction::Cancelled
            }
            KeyCode::Enter => {
                self.active = false;
                let text = self.input.value().to_string();
                self.input = Input::default();
                PromptAction::Submitted(text)
            }
            _ => {
                self.input
                    .handle_event(&ratatui::crossterm::event::Event::Key(key));
                PromptAction::None
            }
        }
    }

    /// Render the prompt bar into `area`.
    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        let scroll = self
            .input
            .visual_scroll(area.width.saturating_sub(4) as usize);
        let value = self.input.value();
        let display = if value.is_empty() {
            Span::styled(
                format!(": {}", self.placeholder),
                Style::default().fg(C_MUTED),
            )
        } else {
            Span::styled(
                format!(": {}", &value[scroll..]),
                Style::default().fg(C_PROMPT_FG),
            )
        };

        let paragraph =
            Paragraph::new(Line::from(vec![display])).style(Style::default().bg(C_PROMPT_BG));
        frame.render_widget(paragraph, area);

        if self.active {
            let cursor_x = area.x + 2 + self.input.visual_cursor().saturating_sub(scroll) as u16;
            let max_x = area.x + area.width.saturating_sub(1);
            frame.set_cursor_position((cursor_x.min(max_x), area.y));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_typed_text_is_submitted() {
        let mut prompt = CommandInput::new("trash:refresh | trash:empty");
        prompt.activate();
        for c in "empty".chars() {
            prompt.handle_key(key(KeyCode::Char(c)));
        }
        match prompt.handle_key(key(KeyCode::Enter)) {
            PromptAction::Submitted(text) => assert_eq!(text, "empty"),
            _ => panic!("expected submit"),
        }
        assert!(!prompt.is_active());
    }

    #[test]
    fn test_escape_cancels() {
        let mut prompt = CommandInput::new("");
        prompt.activate();
        prompt.handle_key(key(KeyCode::Char('x')));
        assert!(matches!(
            prompt.handle_key(key(KeyCode::Esc)),
            PromptAction::Cancelled
        ));
        assert!(!prompt.is_active());
    }
}
