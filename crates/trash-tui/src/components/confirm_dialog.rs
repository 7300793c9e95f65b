//! ConfirmDialog component: modal yes/no question in front of a destructive
//! request. Cancel is the default button; only an explicit accept lets the
//! request through.

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use tracing::debug;

use crate::{
    action::{Action, ConfirmRequest},
    app_state::AppState,
    component::Component,
    components::help_overlay::centered_rect,
    theme::{C_DANGER, C_POPUP_BG, C_PRIMARY, C_SECONDARY, C_SELECTION_BG},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Button {
    Cancel,
    Accept,
}

pub struct ConfirmDialog {
    request: Option<ConfirmRequest>,
    focused: Button,
    cancel_area: Rect,
    accept_area: Rect,
}

impl ConfirmDialog {
    pub fn new() -> Self {
        Self {
            request: None,
            focused: Button::Cancel,
            cancel_area: Rect::default(),
            accept_area: Rect::default(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.request.is_some()
    }

    pub fn open(&mut self, request: ConfirmRequest) {
        debug!("confirm: {}", request.title);
        self.request = Some(request);
        self.focused = Button::Cancel;
    }

    fn accept(&mut self) -> Vec<Action> {
        match self.request.take() {
            Some(req) => {
                debug!("confirm accepted: {}", req.title);
                vec![Action::Api(req.on_accept)]
            }
            None => vec![],
        }
    }

    fn cancel(&mut self) -> Vec<Action> {
        if let Some(req) = self.request.take() {
            debug!("confirm cancelled: {}", req.title);
        }
        vec![]
    }

    fn toggle_focus(&mut self) {
        self.focused = match self.focused {
            Button::Cancel => Button::Accept,
            Button::Accept => Button::Cancel,
        };
    }
}

impl Component for ConfirmDialog {
    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release || !self.is_open() {
            return vec![];
        }
        match key.code {
            KeyCode::Tab
            | KeyCode::BackTab
            | KeyCode::Left
            | KeyCode::Right
            | KeyCode::Char('h')
            | KeyCode::Char('l') => self.toggle_focus(),
            KeyCode::Enter => {
                return match self.focused {
                    Button::Accept => self.accept(),
                    Button::Cancel => self.cancel(),
                }
            }
            KeyCode::Char('y') => return self.accept(),
            KeyCode::Char('n') | KeyCode::Esc => return self.cancel(),
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        if !self.is_open() {
            return vec![];
        }
        if let MouseEventKind::Down(MouseButton::Left) = event.kind {
            let (col, row) = (event.column, event.row);
            let inside = |r: Rect| col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height;
            if inside(self.accept_area) {
                return self.accept();
            }
            if inside(self.cancel_area) {
                return self.cancel();
            }
        }
        vec![]
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        if let Action::Confirm(req) = action {
            self.open(req.clone());
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, _state: &AppState) {
        let Some(req) = &self.request else {
            return;
        };

        let popup = centered_rect(60, 9, area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(C_DANGER))
            .title(Span::styled(
                format!(" {} ", req.title),
                Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
            ))
            .style(Style::default().bg(C_POPUP_BG));
        let inner = block.inner(popup);
        frame.render_widget(Clear, popup);
        frame.render_widget(block, popup);
        if inner.height < 2 {
            return;
        }

        let body = Rect {
            height: inner.height - 1,
            ..inner
        };
        frame.render_widget(
            Paragraph::new(Span::styled(req.body.as_str(), Style::default().fg(C_SECONDARY)))
                .wrap(Wrap { trim: true }),
            Rect {
                x: body.x + 1,
                width: body.width.saturating_sub(2),
                ..body
            },
        );

        let cancel_label = " Cancel ".to_string();
        let accept_label = format!(" {} ", req.confirm_label);
        let row = inner.y + inner.height - 1;
        let total = (cancel_label.len() + accept_label.len() + 2) as u16;
        let start = inner.x + inner.width.saturating_sub(total + 1);
        self.cancel_area = Rect::new(start, row, cancel_label.len() as u16, 1);
        self.accept_area = Rect::new(
            start + cancel_label.len() as u16 + 2,
            row,
            accept_label.len() as u16,
            1,
        );

        let cancel_style = if self.focused == Button::Cancel {
            Style::default()
                .bg(C_SELECTION_BG)
                .fg(C_PRIMARY)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(C_SECONDARY)
        };
        let accept_style = if self.focused == Button::Accept {
            Style::default()
                .bg(C_DANGER)
                .fg(C_POPUP_BG)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(C_DANGER)
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(cancel_label, cancel_style))),
            self.cancel_area,
        );
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(accept_label, accept_style)))
                .alignment(Alignment::Left),
            self.accept_area,
        );
    }
}
