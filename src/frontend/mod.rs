//! Frontend abstraction layer
//!
//! The `Frontend` trait separates terminal concerns from the core: the main
//! loop polls events through it and asks it to draw the current `AppCore`.

pub mod events;
pub mod tui;

use crate::core::{Action, AppCore};
use anyhow::Result;
pub use events::FrontendEvent;
pub use tui::TuiFrontend;

pub trait Frontend {
    /// Poll for pending input events (empty if none arrived within the poll
    /// timeout).
    fn poll_events(&mut self) -> Result<Vec<FrontendEvent>>;

    /// Draw the current application state.
    ///
    /// Takes `&mut` because layout feeds measured sizes back into widgets
    /// (the progress button stores its measured width).
    fn render(&mut self, app: &mut AppCore) -> Result<()>;

    /// Translate a mouse press at `(x, y)` into an action, using the layout of
    /// the last frame.
    fn hit_test(&self, x: u16, y: u16) -> Action;

    /// Restore the terminal.
    fn cleanup(&mut self) -> Result<()>;
}
