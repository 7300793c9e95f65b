//! TrashPanel component: the side panel that lists trash entries and drives
//! restore and delete.
//!
//! The panel never mutates server state optimistically: every successful
//! mutation is followed by a fresh `list`, and every failure leaves the last
//! rendered listing in place.

use chrono::Utc;
use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tracing::{debug, error, info};
use trash_proto::{ApiError, TrashEntry};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::{
    action::{Action, ApiRequest, ConfirmRequest},
    app_state::AppState,
    component::Component,
    effects::ApiOutcome,
    icons::{IconKind, IconResolver},
    periodic::{PeriodicTask, RefreshTick},
    theme::{
        style_context_selected, style_danger, style_muted, style_selected, C_BUSY, C_DANGER,
        C_FOLDER, C_MUTED, C_PRIMARY, C_SECONDARY, C_SELECTION_BG, C_SORT_ARROW,
    },
    timefmt::format_relative_time,
    view_model::{SortColumn, TrashViewModel},
    widgets::{
        context_menu::{ContextMenu, MenuCommand},
        list_cursor::ListCursor,
        pane_chrome::{pane_chrome, Badge},
        toast::Severity,
    },
};

const MODIFIED_WIDTH: u16 = 16;
const SIZE_WIDTH: u16 = 10;
const EMPTY_MESSAGE: &str = "Trash is empty";

/// Visibility/refresh state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    Hidden,
    Idle,
    Refreshing,
}

/// Screen areas from the last draw, used for mouse hit-testing.
#[derive(Debug, Default)]
struct HitAreas {
    refresh_button: Rect,
    empty_button: Rect,
    columns: Vec<(SortColumn, Rect)>,
    list: Rect,
}

pub struct TrashPanel {
    model: TrashViewModel,
    state: PanelState,
    cursor: ListCursor,
    /// Entry the cursor sits on; keeps the cursor on the same item across
    /// re-sorts and refreshes.
    cursor_path: Option<String>,
    /// Entry bound to the open context menu.
    selection: Option<TrashEntry>,
    menu: Option<ContextMenu>,
    /// The last refresh failed; what is shown is the previous listing.
    stale: bool,
    icons: Box<dyn IconResolver>,
    timer: PeriodicTask<RefreshTick>,
    hits: HitAreas,
}

impl TrashPanel {
    pub fn new(icons: Box<dyn IconResolver>, timer: PeriodicTask<RefreshTick>) -> Self {
        Self {
            model: TrashViewModel::new(),
            state: PanelState::Hidden,
            cursor: ListCursor::default(),
            cursor_path: None,
            selection: None,
            menu: None,
            stale: false,
            icons,
            timer,
            hits: HitAreas::default(),
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> PanelState {
        self.state
    }

    #[cfg(test)]
    pub fn model(&self) -> &TrashViewModel {
        &self.model
    }

    pub fn icons(&self) -> &dyn IconResolver {
        self.icons.as_ref()
    }

    #[cfg(test)]
    pub fn selection(&self) -> Option<&TrashEntry> {
        self.selection.as_ref()
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu.is_some()
    }

    #[cfg(test)]
    pub fn is_timer_running(&self) -> bool {
        self.timer.is_running()
    }

    pub fn cursor_entry(&self) -> Option<&TrashEntry> {
        self.model.sorted_view().get(self.cursor.selected).copied()
    }

    // ── Operations ────────────────────────────────────────────────────────────

    /// Ask for a fresh listing.
    pub fn refresh(&mut self) -> Vec<Action> {
        if self.state == PanelState::Idle {
            self.state = PanelState::Refreshing;
        }
        vec![Action::Api(ApiRequest::List)]
    }

    pub fn restore(&self, entry: &TrashEntry) -> Vec<Action> {
        vec![Action::Api(ApiRequest::Restore {
            trash_path: entry.trash_path.clone(),
            name: entry.name.clone(),
        })]
    }

    /// Permanent delete; only runs once the user accepts the dialog.
    pub fn delete(&self, entry: &TrashEntry) -> Vec<Action> {
        vec![Action::Confirm(ConfirmRequest {
            title: "Delete Permanently".to_string(),
            body: format!(
                "Are you sure you want to permanently delete \"{}\"? This cannot be undone.",
                entry.name
            ),
            confirm_label: "Delete".to_string(),
            on_accept: ApiRequest::Delete {
                trash_path: entry.trash_path.clone(),
                name: entry.name.clone(),
            },
        })]
    }

    pub fn empty_all(&self) -> Vec<Action> {
        vec![Action::Confirm(ConfirmRequest {
            title: "Empty Trash".to_string(),
            body: "Are you sure you want to permanently delete all items in the trash? \
                   This cannot be undone."
                .to_string(),
            confirm_label: "Empty Trash".to_string(),
            on_accept: ApiRequest::Empty,
        })]
    }

    /// Apply the result of a request issued earlier.
    ///
    /// Results are applied even when the panel was hidden in the meantime.
    pub fn on_api_outcome(&mut self, outcome: ApiOutcome) -> Vec<Action> {
        match outcome {
            ApiOutcome::Listed(Ok(listing)) => {
                debug!("trash listing: {} entries", listing.entries.len());
                self.model.set_listing(listing);
                self.stale = false;
                self.finish_refresh();
                self.sync_cursor();
                let gone = self
                    .selection
                    .as_ref()
                    .is_some_and(|sel| self.model.find(&sel.trash_path).is_none());
                if gone {
                    self.close_menu();
                }
                vec![]
            }
            ApiOutcome::Listed(Err(e)) => {
                error!("failed to load trash: {}", e);
                self.stale = true;
                self.finish_refresh();
                vec![notify_error("Trash Error", "Failed to load trash contents")]
            }
            ApiOutcome::Restored { name, result } => match result {
                Ok(resp) if resp.success => {
                    info!("restored {} to {}", name, resp.restored_to);
                    let msg = if resp.restored_to.is_empty() {
                        format!("Restored {}", name)
                    } else {
                        format!("Restored to {}", resp.restored_to)
                    };
                    self.after_mutation(msg)
                }
                Ok(_) => vec![notify_error("Restore Failed", "Failed to restore item")],
                Err(e) => vec![failure("Restore Failed", &e, "Failed to restore item")],
            },
            ApiOutcome::Deleted { name, result } => match result {
                Ok(resp) if resp.success => {
                    info!("permanently deleted {}", name);
                    self.after_mutation(format!("Deleted {}", name))
                }
                Ok(_) => vec![notify_error("Delete Failed", "Failed to delete item")],
                Err(e) => vec![failure("Delete Failed", &e, "Failed to delete item")],
            },
            ApiOutcome::Emptied(result) => match result {
                Ok(resp) if resp.success => {
                    info!("emptied trash ({} items)", resp.deleted_count);
                    self.after_mutation(format!("Emptied trash ({} items)", resp.deleted_count))
                }
                Ok(_) => vec![notify_error("Empty Trash Failed", "Failed to empty trash")],
                Err(e) => vec![failure("Empty Trash Failed", &e, "Failed to empty trash")],
            },
        }
    }

    /// Success toast plus a re-list. Showing the panel re-lists anyway, so a
    /// hidden panel skips it.
    fn after_mutation(&self, message: String) -> Vec<Action> {
        let mut actions = vec![Action::Notify(Severity::Success, message)];
        if self.state != PanelState::Hidden {
            actions.push(Action::Api(ApiRequest::List));
        }
        actions
    }

    fn finish_refresh(&mut self) {
        if self.state == PanelState::Refreshing {
            self.state = PanelState::Idle;
        }
    }

    // ── Sorting / cursor ──────────────────────────────────────────────────────

    pub fn sort_by(&mut self, column: SortColumn) {
        self.model.set_sort(column);
        self.sync_cursor();
    }

    /// Re-seat the cursor on `cursor_path` after the order changed.
    fn sync_cursor(&mut self) {
        let view = self.model.sorted_view();
        if let Some(path) = &self.cursor_path {
            if let Some(pos) = view.iter().position(|e| &e.trash_path == path) {
                self.cursor.selected = pos;
            }
        }
        self.cursor.clamp(view.len());
        self.cursor_path = view
            .get(self.cursor.selected)
            .map(|e| e.trash_path.clone());
    }

    fn move_cursor(&mut self, f: impl FnOnce(&mut ListCursor, usize)) {
        let len = self.model.entries().len();
        f(&mut self.cursor, len);
        self.cursor_path = self
            .model
            .sorted_view()
            .get(self.cursor.selected)
            .map(|e| e.trash_path.clone());
    }

    // ── Context menu / selection ──────────────────────────────────────────────

    /// Select exactly the row at `index` and open the action menu on it.
    pub fn open_menu_at(&mut self, index: usize, anchor: (u16, u16)) {
        let Some(entry) = self.model.sorted_view().get(index).map(|e| (*e).clone()) else {
            return;
        };
        self.move_cursor(|c, _| c.selected = index);
        self.selection = Some(entry);
        self.menu = Some(ContextMenu::new(
            vec![MenuCommand::Restore, MenuCommand::DeletePermanently],
            anchor,
        ));
    }

    /// Closing for any reason drops the selection too.
    pub fn close_menu(&mut self) {
        self.menu = None;
        self.selection = None;
    }

    pub fn activate_menu(&mut self, command: MenuCommand) -> Vec<Action> {
        let entry = self.selection.take();
        self.menu = None;
        match entry {
            Some(entry) => match command {
                MenuCommand::Restore => self.restore(&entry),
                MenuCommand::DeletePermanently => self.delete(&entry),
            },
            None => vec![],
        }
    }

    fn menu_anchor_for_cursor(&self) -> (u16, u16) {
        let row = self.cursor.selected.saturating_sub(self.cursor.scroll_offset) as u16;
        (self.hits.list.x + 4, self.hits.list.y + row + 1)
    }

    fn handle_menu_key(&mut self, key: KeyEvent) -> Vec<Action> {
        let Some(menu) = self.menu.as_mut() else {
            return vec![];
        };
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => menu.move_up(),
            KeyCode::Down | KeyCode::Char('j') => menu.move_down(),
            KeyCode::Enter => {
                if let Some(cmd) = menu.highlighted() {
                    return self.activate_menu(cmd);
                }
            }
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('m') => self.close_menu(),
            _ => {}
        }
        vec![]
    }

    // ── Rendering helpers ─────────────────────────────────────────────────────

    fn draw_header(&mut self, frame: &mut Frame, area: Rect) {
        let listing = self.model.listing();
        let count = listing.entries.len();
        let info = if self.model.is_loaded() {
            format!(" {} items ({})", count, listing.total_size_display)
        } else {
            " …".to_string()
        };

        let refresh_label = format!("[{}]", self.icons.icon(IconKind::Refresh));
        let empty_label = format!("[{} empty]", self.icons.icon(IconKind::Delete));
        let refresh_w = refresh_label.width() as u16;
        let empty_w = if count > 0 { empty_label.width() as u16 + 1 } else { 0 };

        let right = area.x + area.width;
        self.hits.refresh_button = Rect {
            x: right.saturating_sub(refresh_w + empty_w + 1).max(area.x),
            y: area.y,
            width: refresh_w.min(area.width),
            height: 1,
        };
        self.hits.empty_button = if count > 0 {
            Rect {
                x: right.saturating_sub(empty_w).max(area.x),
                y: area.y,
                width: empty_w.saturating_sub(1).min(area.width),
                height: 1,
            }
        } else {
            Rect::default()
        };

        frame.render_widget(
            Paragraph::new(Span::styled(info, Style::default().fg(C_SECONDARY))),
            area,
        );
        frame.render_widget(
            Paragraph::new(Span::styled(refresh_label, Style::default().fg(C_PRIMARY))),
            self.hits.refresh_button,
        );
        if count > 0 {
            frame.render_widget(
                Paragraph::new(Span::styled(empty_label, style_danger())),
                self.hits.empty_button,
            );
        }
    }

    fn draw_columns(&mut self, frame: &mut Frame, area: Rect) {
        let sort = self.model.sort();
        let name_w = area.width.saturating_sub(MODIFIED_WIDTH + SIZE_WIDTH);
        self.hits.columns.clear();
        let mut spans = Vec::new();
        let mut x = area.x;
        for column in SortColumn::ALL {
            let w = match column {
                SortColumn::Name => name_w,
                SortColumn::Modified => MODIFIED_WIDTH,
                SortColumn::Size => SIZE_WIDTH,
            };
            let w = w.min(area.x + area.width - x);
            self.hits.columns.push((
                column,
                Rect {
                    x,
                    y: area.y,
                    width: w,
                    height: 1,
                },
            ));
            x += w;

            let active = sort.column == column;
            let label = format!(" {}", column.label());
            let arrow = if active {
                format!(" {}", sort.direction.arrow())
            } else {
                String::new()
            };
            let label_style = if active {
                Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(C_SECONDARY)
            };
            let pad = (w as usize).saturating_sub(label.width() + arrow.width());
            spans.push(Span::styled(label, label_style));
            spans.push(Span::styled(arrow, Style::default().fg(C_SORT_ARROW)));
            spans.push(Span::raw(" ".repeat(pad)));
        }
        frame.render_widget(
            Paragraph::new(Line::from(spans)).style(Style::default().add_modifier(Modifier::UNDERLINED)),
            area,
        );
    }

    fn draw_rows(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        self.hits.list = area;
        let height = area.height as usize;
        let len = self.model.entries().len();
        self.cursor.ensure_visible(height);
        let range = self.cursor.visible_range(height, len);
        let name_w = area.width.saturating_sub(MODIFIED_WIDTH + SIZE_WIDTH) as usize;
        let now = Utc::now();
        let selected_path = self.selection.as_ref().map(|e| e.trash_path.as_str());

        let view = self.model.sorted_view();
        let lines: Vec<Line> = view[range.clone()]
            .iter()
            .zip(range)
            .map(|(entry, idx)| {
                let is_cursor = idx == self.cursor.selected;
                let row_style = if selected_path == Some(entry.trash_path.as_str()) {
                    style_context_selected()
                } else if is_cursor && focused {
                    style_selected()
                } else if is_cursor {
                    Style::default().bg(C_SELECTION_BG)
                } else {
                    Style::default()
                };
                let kind = IconKind::for_entry(entry);
                let icon_color = if entry.is_directory { C_FOLDER } else { C_MUTED };
                let name = fit(&entry.name, name_w.saturating_sub(4));
                let modified = fit(
                    &format!(" {}", format_relative_time(&entry.deletion_timestamp, now)),
                    MODIFIED_WIDTH as usize,
                );
                let size = format!(
                    "{:>width$}",
                    fit(&entry.size_display, SIZE_WIDTH as usize - 1),
                    width = SIZE_WIDTH as usize - 1
                );

                Line::from(vec![
                    Span::raw(" "),
                    Span::styled(self.icons.icon(kind), Style::default().fg(icon_color)),
                    Span::raw(" "),
                    Span::styled(name, Style::default().fg(C_PRIMARY)),
                    Span::raw(" "),
                    Span::styled(modified, Style::default().fg(C_SECONDARY)),
                    Span::styled(size, Style::default().fg(C_SECONDARY)),
                    Span::raw(" "),
                ])
                .style(row_style)
            })
            .collect();

        frame.render_widget(Paragraph::new(lines), area);
    }
}

impl Component for TrashPanel {
    fn mount(&mut self, _state: &AppState) -> Vec<Action> {
        debug!(
            "trash panel mounted (refresh every {:?})",
            self.timer.period()
        );
        vec![]
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        if self.menu.is_some() {
            return self.handle_menu_key(key);
        }

        let step = if key.modifiers.contains(KeyModifiers::SHIFT) {
            5
        } else {
            1
        };
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(|c, _| c.select_up(step)),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(|c, len| c.select_down(step, len)),
            KeyCode::PageUp => self.move_cursor(|c, _| c.select_up(10)),
            KeyCode::PageDown => self.move_cursor(|c, len| c.select_down(10, len)),
            KeyCode::Home | KeyCode::Char('g') => self.move_cursor(|c, _| c.select_first()),
            KeyCode::End | KeyCode::Char('G') => self.move_cursor(|c, len| c.select_last(len)),

            KeyCode::Char('1') => self.sort_by(SortColumn::Name),
            KeyCode::Char('2') => self.sort_by(SortColumn::Modified),
            KeyCode::Char('3') => self.sort_by(SortColumn::Size),

            KeyCode::Enter | KeyCode::Char('m') => {
                if !self.model.is_empty() {
                    let anchor = self.menu_anchor_for_cursor();
                    self.open_menu_at(self.cursor.selected, anchor);
                }
            }
            KeyCode::Char('r') => {
                if let Some(entry) = self.cursor_entry().cloned() {
                    return self.restore(&entry);
                }
            }
            KeyCode::Char('x') | KeyCode::Delete => {
                if let Some(entry) = self.cursor_entry().cloned() {
                    return self.delete(&entry);
                }
            }
            KeyCode::Char('E') => return self.empty_all(),
            KeyCode::Char('R') | KeyCode::F(5) => return self.refresh(),
            KeyCode::Char('y') => {
                if let Some(entry) = self.cursor_entry() {
                    return vec![Action::CopyToClipboard(entry.original_path.clone())];
                }
            }
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        let (col, row) = (event.column, event.row);

        if let Some(menu) = &self.menu {
            match event.kind {
                MouseEventKind::Down(MouseButton::Left) => {
                    if let Some(cmd) = menu.item_at(col, row) {
                        return self.activate_menu(cmd);
                    }
                    if !menu.contains(col, row) {
                        self.close_menu();
                    }
                    return vec![];
                }
                MouseEventKind::Down(_) => self.close_menu(),
                _ => return vec![],
            }
        }

        let len = self.model.entries().len();
        let row_index = if hit(self.hits.list, col, row) {
            self.cursor
                .index_at_row((row - self.hits.list.y) as usize, len)
        } else {
            None
        };

        match event.kind {
            MouseEventKind::ScrollUp => self.move_cursor(|c, _| c.select_up(1)),
            MouseEventKind::ScrollDown => self.move_cursor(|c, len| c.select_down(1, len)),
            MouseEventKind::Down(MouseButton::Left) => {
                if hit(self.hits.refresh_button, col, row) {
                    return self.refresh();
                }
                if hit(self.hits.empty_button, col, row) {
                    return self.empty_all();
                }
                if let Some((column, _)) = self
                    .hits
                    .columns
                    .iter()
                    .find(|(_, r)| hit(*r, col, row))
                {
                    let column = *column;
                    self.sort_by(column);
                    return vec![];
                }
                if let Some(idx) = row_index {
                    self.move_cursor(|c, _| c.selected = idx);
                }
            }
            MouseEventKind::Down(MouseButton::Right) => {
                if let Some(idx) = row_index {
                    self.open_menu_at(idx, (col, row));
                }
            }
            _ => {}
        }
        vec![]
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        match action {
            Action::Refresh => self.refresh(),
            Action::EmptyTrash => self.empty_all(),
            _ => vec![],
        }
    }

    fn on_visibility_change(&mut self, visible: bool, _state: &AppState) -> Vec<Action> {
        match (self.state, visible) {
            (PanelState::Hidden, true) => {
                debug!("trash panel shown");
                self.state = PanelState::Idle;
                self.timer.start();
                self.refresh()
            }
            (PanelState::Idle | PanelState::Refreshing, false) => {
                debug!("trash panel hidden");
                self.timer.stop();
                self.close_menu();
                self.state = PanelState::Hidden;
                vec![]
            }
            _ => vec![],
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, _state: &AppState) {
        let badge = match (self.state, self.stale) {
            (PanelState::Refreshing, _) => Some(Badge {
                text: "SYNC",
                color: C_BUSY,
            }),
            (_, true) => Some(Badge {
                text: "STALE",
                color: C_DANGER,
            }),
            _ => None,
        };
        let block = pane_chrome(self.icons.icon(IconKind::Trash), "trash", focused, badge);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        self.hits = HitAreas::default();
        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let header = Rect { height: 1, ..inner };
        self.draw_header(frame, header);
        let body = Rect {
            y: inner.y + 1,
            height: inner.height - 1,
            ..inner
        };
        if body.height == 0 {
            return;
        }

        if !self.model.is_loaded() {
            frame.render_widget(
                Paragraph::new(Span::styled("  loading trash…", style_muted())),
                body,
            );
            return;
        }

        // Empty state replaces the column header and list entirely.
        if self.model.is_empty() {
            let middle = Rect {
                y: body.y + body.height / 2,
                height: 1,
                ..body
            };
            frame.render_widget(
                Paragraph::new(Span::styled(EMPTY_MESSAGE, Style::default().fg(C_MUTED)))
                    .alignment(Alignment::Center),
                middle,
            );
            return;
        }

        self.draw_columns(frame, Rect { height: 1, ..body });
        let list = Rect {
            y: body.y + 1,
            height: body.height - 1,
            ..body
        };
        self.draw_rows(frame, list, focused);

        let screen = frame.area();
        if let Some(menu) = self.menu.as_mut() {
            menu.draw(frame, screen);
        }
    }

    fn dispose(&mut self) {
        self.timer.stop();
        self.close_menu();
        self.state = PanelState::Hidden;
    }
}

fn hit(r: Rect, col: u16, row: u16) -> bool {
    col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height
}

fn notify_error(title: &str, message: &str) -> Action {
    Action::Notify(
        Severity::Error,
        format!("{}: {}", title, message),
    )
}

/// Server message when there is one, else the per-action fallback.
fn failure(title: &str, err: &ApiError, fallback: &str) -> Action {
    error!("{}: {}", title, err);
    notify_error(title, err.server_message().unwrap_or(fallback))
}

/// Truncate to `width` display cells (with an ellipsis) and pad to exactly it.
fn fit(text: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    if text.width() <= width {
        return format!("{}{}", text, " ".repeat(width - text.width()));
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    used += 1;
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icons::AsciiIcons;
    use crate::view_model::tests::{entry, listing};
    use ratatui::crossterm::event::KeyModifiers;
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::Duration;
    use tokio::sync::mpsc;
    use trash_proto::protocol::RestoreResponse;

    fn panel() -> (TrashPanel, mpsc::Receiver<RefreshTick>) {
        let (tx, rx) = mpsc::channel(16);
        let timer = PeriodicTask::new(Duration::from_secs(10), tx, RefreshTick);
        (TrashPanel::new(Box::new(AsciiIcons), timer), rx)
    }

    fn state() -> AppState {
        AppState::new("http://127.0.0.1:8888/")
    }

    fn loaded() -> (TrashPanel, mpsc::Receiver<RefreshTick>) {
        let (mut p, rx) = panel();
        p.on_api_outcome(ApiOutcome::Listed(Ok(listing(vec![
            entry("beta.txt", "2024-03-02T10:00:00", 300),
            entry("alpha.txt", "2024-03-03T10:00:00", 100),
        ]))));
        (p, rx)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn list_calls(actions: &[Action]) -> usize {
        actions
            .iter()
            .filter(|a| **a == Action::Api(ApiRequest::List))
            .count()
    }

    fn render(p: &mut TrashPanel) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        let st = state();
        terminal
            .draw(|f| p.draw(f, f.area(), true, &st))
            .unwrap();
        let buf = terminal.backend().buffer();
        (0..buf.area.height)
            .map(|y| {
                (0..buf.area.width)
                    .map(|x| buf[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_failed_list_keeps_previous_entries() {
        let (mut p, _rx) = loaded();
        let actions = p.on_api_outcome(ApiOutcome::Listed(Err(ApiError::Response {
            status: 500,
            message: "boom".into(),
        })));
        assert_eq!(p.model().entries().len(), 2);
        assert_eq!(actions.len(), 1);
        assert!(matches!(&actions[0], Action::Notify(Severity::Error, _)));
        assert!(render(&mut p).contains("STALE"));
    }

    #[test]
    fn test_successful_mutations_trigger_one_list() {
        let (mut p, _rx) = loaded();
        p.state = PanelState::Idle;
        let actions = p.on_api_outcome(ApiOutcome::Restored {
            name: "beta.txt".into(),
            result: Ok(RestoreResponse {
                success: true,
                restored_to: "/home/u/beta.txt".into(),
            }),
        });
        assert_eq!(list_calls(&actions), 1);

        let actions = p.on_api_outcome(ApiOutcome::Deleted {
            name: "beta.txt".into(),
            result: Ok(trash_proto::protocol::DeleteResponse { success: true }),
        });
        assert_eq!(list_calls(&actions), 1);

        let actions = p.on_api_outcome(ApiOutcome::Emptied(Ok(
            trash_proto::protocol::EmptyResponse {
                success: true,
                deleted_count: 2,
            },
        )));
        assert_eq!(list_calls(&actions), 1);
        // Nothing was removed locally; the follow-up list decides.
        assert_eq!(p.model().entries().len(), 2);
    }

    #[test]
    fn test_mutation_landing_while_hidden_skips_list() {
        let (mut p, _rx) = loaded();
        assert_eq!(p.state(), PanelState::Hidden);
        let actions = p.on_api_outcome(ApiOutcome::Deleted {
            name: "beta.txt".into(),
            result: Ok(trash_proto::protocol::DeleteResponse { success: true }),
        });
        assert_eq!(
            actions,
            vec![Action::Notify(Severity::Success, "Deleted beta.txt".into())]
        );
    }

    #[test]
    fn test_failed_mutation_surfaces_server_message() {
        let (mut p, _rx) = loaded();
        let actions = p.on_api_outcome(ApiOutcome::Deleted {
            name: "beta.txt".into(),
            result: Err(ApiError::Response {
                status: 404,
                message: "Item not found in trash".into(),
            }),
        });
        assert_eq!(
            actions,
            vec![Action::Notify(
                Severity::Error,
                "Delete Failed: Item not found in trash".into()
            )]
        );
        assert_eq!(p.model().entries().len(), 2);

        let actions = p.on_api_outcome(ApiOutcome::Restored {
            name: "beta.txt".into(),
            result: Ok(RestoreResponse {
                success: false,
                restored_to: String::new(),
            }),
        });
        assert_eq!(
            actions,
            vec![Action::Notify(
                Severity::Error,
                "Restore Failed: Failed to restore item".into()
            )]
        );
    }

    #[test]
    fn test_delete_and_empty_ask_first() {
        let (mut p, _rx) = loaded();
        let st = state();
        let actions = p.handle_key(key(KeyCode::Char('x')), &st);
        assert_eq!(actions.len(), 1);
        match &actions[0] {
            Action::Confirm(req) => {
                assert_eq!(req.confirm_label, "Delete");
                // Default sort is newest first, so the cursor is on alpha.txt.
                assert_eq!(
                    req.on_accept,
                    ApiRequest::Delete {
                        trash_path: "/trash/files/alpha.txt".into(),
                        name: "alpha.txt".into()
                    }
                );
            }
            other => panic!("expected confirm, got {:?}", other),
        }

        let actions = p.on_action(&Action::EmptyTrash, &st);
        assert!(matches!(&actions[..], [Action::Confirm(req)] if req.on_accept == ApiRequest::Empty));
    }

    #[test]
    fn test_restore_goes_straight_to_api() {
        let (mut p, _rx) = loaded();
        let actions = p.handle_key(key(KeyCode::Char('r')), &state());
        assert!(matches!(
            &actions[..],
            [Action::Api(ApiRequest::Restore { name, .. })] if name == "alpha.txt"
        ));
    }

    #[test]
    fn test_context_menu_selection_lifecycle() {
        let (mut p, _rx) = loaded();
        let st = state();
        p.open_menu_at(1, (3, 3));
        assert!(p.is_menu_open());
        assert_eq!(p.selection().map(|e| e.name.as_str()), Some("beta.txt"));

        // Re-selecting replaces, never accumulates.
        p.open_menu_at(0, (3, 2));
        assert_eq!(p.selection().map(|e| e.name.as_str()), Some("alpha.txt"));

        p.handle_key(key(KeyCode::Esc), &st);
        assert!(!p.is_menu_open());
        assert!(p.selection().is_none());

        p.open_menu_at(1, (3, 3));
        let actions = p.activate_menu(MenuCommand::DeletePermanently);
        assert!(p.selection().is_none());
        assert!(matches!(&actions[..], [Action::Confirm(_)]));
    }

    #[test]
    fn test_click_on_menu_border_keeps_menu() {
        let (mut p, _rx) = loaded();
        let st = state();
        p.open_menu_at(0, (3, 3));
        render(&mut p);
        let click = |column, row| MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        };

        // Left border beside the first item.
        assert!(p.handle_mouse(click(3, 4), Rect::default(), &st).is_empty());
        assert!(p.is_menu_open());

        let actions = p.handle_mouse(click(4, 4), Rect::default(), &st);
        assert!(matches!(&actions[..], [Action::Api(ApiRequest::Restore { .. })]));
        assert!(!p.is_menu_open());
    }

    #[test]
    fn test_menu_keyboard_restore() {
        let (mut p, _rx) = loaded();
        let st = state();
        p.handle_key(key(KeyCode::Enter), &st);
        assert!(p.is_menu_open());
        let actions = p.handle_key(key(KeyCode::Enter), &st);
        assert!(matches!(&actions[..], [Action::Api(ApiRequest::Restore { .. })]));
        assert!(!p.is_menu_open());
    }

    #[test]
    fn test_cursor_follows_entry_across_sort() {
        let (mut p, _rx) = loaded();
        let st = state();
        p.handle_key(key(KeyCode::Char('j')), &st);
        assert_eq!(p.cursor_entry().unwrap().name, "beta.txt");
        p.handle_key(key(KeyCode::Char('1')), &st);
        assert_eq!(p.cursor_entry().unwrap().name, "beta.txt");
        assert_eq!(p.model().sorted_view()[1].name, "beta.txt");
    }

    #[test]
    fn test_empty_listing_renders_empty_state_only() {
        let (mut p, _rx) = panel();
        p.on_api_outcome(ApiOutcome::Listed(Ok(listing(vec![]))));
        let screen = render(&mut p);
        assert!(screen.contains(EMPTY_MESSAGE));
        assert!(!screen.contains("Name"));
        assert!(!screen.contains("empty]"));
    }

    #[test]
    fn test_listing_renders_columns_and_rows() {
        let (mut p, _rx) = loaded();
        let screen = render(&mut p);
        assert!(!screen.contains(EMPTY_MESSAGE));
        assert!(screen.contains("Name"));
        assert!(screen.contains("Modified ▼"));
        assert!(screen.contains("alpha.txt"));
        assert!(screen.contains("beta.txt"));
        assert!(screen.contains("2 items"));
        let alpha = screen.find("alpha.txt").unwrap();
        let beta = screen.find("beta.txt").unwrap();
        assert!(alpha < beta, "newest first");
    }

    #[test]
    fn test_fit_truncates_by_display_width() {
        assert_eq!(fit("abc", 5), "abc  ");
        assert_eq!(fit("abcdef", 4), "abc…");
        assert_eq!(fit("データファイル", 5), "デー…");
        assert_eq!(fit("x", 0), "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_visibility_drives_refresh_timer() {
        let (mut p, mut rx) = panel();
        let st = state();

        let actions = p.on_visibility_change(true, &st);
        assert_eq!(list_calls(&actions), 1);
        assert_eq!(p.state(), PanelState::Refreshing);
        assert!(p.is_timer_running());

        tokio::time::advance(Duration::from_secs(10)).await;
        tokio::task::yield_now().await;
        assert_eq!(rx.recv().await, Some(RefreshTick));

        assert!(p.on_visibility_change(false, &st).is_empty());
        assert_eq!(p.state(), PanelState::Hidden);
        assert!(!p.is_timer_running());
        tokio::time::advance(Duration::from_secs(60)).await;
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
        assert!(rx.try_recv().is_err());

        // An in-flight refresh that lands while hidden still applies.
        p.on_api_outcome(ApiOutcome::Listed(Ok(listing(vec![entry("late", "", 1)]))));
        assert_eq!(p.model().entries().len(), 1);
        assert_eq!(p.state(), PanelState::Hidden);

        let actions = p.on_visibility_change(true, &st);
        assert_eq!(list_calls(&actions), 1);
        p.dispose();
        assert!(!p.is_timer_running());
    }
}
