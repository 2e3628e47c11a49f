//! Component trait: the interface every UI panel implements.
//!
//! - Components own their local state and render themselves.
//! - Shared data comes in through `AppState`, read-only.
//! - Components never mutate shared state; they return `Vec<Action>` and the
//!   App dispatches those to every component.

use ratatui::crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{layout::Rect, Frame};

use crate::action::Action;
use crate::app_state::AppState;

pub trait Component {
    /// Handle a key event. Returns actions to be dispatched.
    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action>;

    /// Handle a mouse event at screen coordinates.
    fn handle_mouse(&mut self, _event: MouseEvent, _state: &AppState) -> Vec<Action> {
        Vec::new()
    }

    /// Receive an action dispatched by the App.
    fn on_action(&mut self, action: &Action, state: &AppState) -> Vec<Action>;

    /// Render the component into `area`.
    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState);
}
