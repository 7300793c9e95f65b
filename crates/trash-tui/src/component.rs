//! Component trait: the interface every UI panel implements.
//!
//! Design principles:
//! - Components are self-contained: they own their state and render themselves.
//! - Components receive `AppState` (read-only) for data they don't own.
//! - Components produce `Vec<Action>` and never mutate shared state directly.
//! - The host delivers lifecycle events (mount, visibility, dispose) as
//!   explicit calls; nothing is inherited from a widget base.

use ratatui::crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{layout::Rect, Frame};

use crate::action::Action;
use crate::app_state::AppState;

/// The trait every focusable panel implements.
pub trait Component {
    /// Called once when the host registers the component.
    fn mount(&mut self, _state: &AppState) -> Vec<Action> {
        Vec::new()
    }

    /// Handle a key event. Returns actions to be dispatched.
    /// Only called when this component has focus.
    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action>;

    /// Handle a mouse event. Returns actions to be dispatched.
    fn handle_mouse(&mut self, event: MouseEvent, area: Rect, state: &AppState) -> Vec<Action>;

    /// Receive an action dispatched by the App.
    fn on_action(&mut self, action: &Action, state: &AppState) -> Vec<Action>;

    /// The host showed or hid the component.
    fn on_visibility_change(&mut self, _visible: bool, _state: &AppState) -> Vec<Action> {
        Vec::new()
    }

    /// Render the component into `area`.
    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState);

    /// Release anything that outlives a frame (timers, tasks).
    fn dispose(&mut self) {}
}
