//! Small popup menu anchored at a screen position.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::theme::{C_PANEL_BORDER_FOCUSED, C_POPUP_BG, C_PRIMARY, C_SECONDARY, C_SELECTION_BG};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    Restore,
    DeletePermanently,
}

impl MenuCommand {
    pub fn label(self) -> &'static str {
        match self {
            Self::Restore => "Restore",
            Self::DeletePermanently => "Delete Permanently",
        }
    }
}

pub struct ContextMenu {
    items: Vec<MenuCommand>,
    highlighted: usize,
    anchor: (u16, u16),
    /// Where the menu was last drawn, for mouse hit-testing.
    area: Rect,
}

impl ContextMenu {
    pub fn new(items: Vec<MenuCommand>, anchor: (u16, u16)) -> Self {
        Self {
            items,
            highlighted: 0,
            anchor,
            area: Rect::default(),
        }
    }

    pub fn highlighted(&self) -> Option<MenuCommand> {
        self.items.get(self.highlighted).copied()
    }

    pub fn move_up(&mut self) {
        self.highlighted = self.highlighted.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.highlighted + 1 < self.items.len() {
            self.highlighted += 1;
        }
    }

    pub fn contains(&self, col: u16, row: u16) -> bool {
        let r = self.area;
        col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height
    }

    /// Menu item under a screen position, if any.
    pub fn item_at(&self, col: u16, row: u16) -> Option<MenuCommand> {
        let r = self.area;
        // Border cells belong to no item.
        if col <= r.x || col + 1 >= r.x + r.width || row <= r.y || row + 1 >= r.y + r.height {
            return None;
        }
        self.items.get((row - self.area.y - 1) as usize).copied()
    }

    /// Draw the menu clamped inside `bounds`.
    pub fn draw(&mut self, frame: &mut Frame, bounds: Rect) {
        let inner_w = self
            .items
            .iter()
            .map(|i| i.label().chars().count())
            .max()
            .unwrap_or(0) as u16
            + 4;
        let w = (inner_w + 2).min(bounds.width);
        let h = (self.items.len() as u16 + 2).min(bounds.height);
        let max_x = (bounds.x + bounds.width).saturating_sub(w);
        let max_y = (bounds.y + bounds.height).saturating_sub(h);
        self.area = Rect {
            x: self.anchor.0.clamp(bounds.x, max_x.max(bounds.x)),
            y: self.anchor.1.clamp(bounds.y, max_y.max(bounds.y)),
            width: w,
            height: h,
        };

        let lines: Vec<Line> = self
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let style = if i == self.highlighted {
                    Style::default()
                        .bg(C_SELECTION_BG)
                        .fg(C_PRIMARY)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(C_SECONDARY)
                };
                let text = format!("  {:<width$}", item.label(), width = (inner_w - 2) as usize);
                Line::from(Span::styled(text, style))
            })
            .collect();

        frame.render_widget(Clear, self.area);
        frame.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(C_PANEL_BORDER_FOCUSED))
                    .style(Style::default().bg(C_POPUP_BG)),
            ),
            self.area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn menu() -> ContextMenu {
        ContextMenu::new(
            vec![MenuCommand::Restore, MenuCommand::DeletePermanently],
            (5, 3),
        )
    }

    #[test]
    fn test_keyboard_highlight_is_bounded() {
        let mut m = menu();
        assert_eq!(m.highlighted(), Some(MenuCommand::Restore));
        m.move_down();
        m.move_down();
        assert_eq!(m.highlighted(), Some(MenuCommand::DeletePermanently));
        m.move_up();
        m.move_up();
        assert_eq!(m.highlighted(), Some(MenuCommand::Restore));
    }

    #[test]
    fn test_hit_testing_after_draw() {
        let mut m = menu();
        let mut terminal = Terminal::new(TestBackend::new(40, 12)).unwrap();
        terminal
            .draw(|f| m.draw(f, Rect::new(0, 0, 40, 12)))
            .unwrap();
        // Border row, then one row per item.
        assert_eq!(m.item_at(7, 4), Some(MenuCommand::Restore));
        assert_eq!(m.item_at(7, 5), Some(MenuCommand::DeletePermanently));
        assert_eq!(m.item_at(7, 3), None);
        assert!(!m.contains(0, 0));
    }

    #[test]
    fn test_border_cells_pick_nothing() {
        let mut m = menu();
        let mut terminal = Terminal::new(TestBackend::new(40, 12)).unwrap();
        terminal
            .draw(|f| m.draw(f, Rect::new(0, 0, 40, 12)))
            .unwrap();
        let r = m.area;
        let right = r.x + r.width - 1;
        let bottom = r.y + r.height - 1;
        assert!(m.contains(r.x, r.y + 1));
        assert_eq!(m.item_at(r.x, r.y + 1), None);
        assert_eq!(m.item_at(right, r.y + 1), None);
        assert_eq!(m.item_at(r.x + 1, bottom), None);
        assert_eq!(m.item_at(right - 1, r.y + 1), Some(MenuCommand::Restore));
    }

    #[test]
    fn test_menu_clamped_into_bounds() {
        let mut m = ContextMenu::new(vec![MenuCommand::Restore], (39, 11));
        let mut terminal = Terminal::new(TestBackend::new(40, 12)).unwrap();
        terminal
            .draw(|f| m.draw(f, Rect::new(0, 0, 40, 12)))
            .unwrap();
        assert!(m.area.x + m.area.width <= 40);
        assert!(m.area.y + m.area.height <= 12);
    }
}
