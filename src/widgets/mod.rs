//! Widget state structs (rendering-agnostic)
//!
//! These hold widget state and produce drawing instructions, but never touch
//! a terminal. The TUI frontend paints what they describe.

pub mod animator;
pub mod button_state;
pub mod progress_button;

pub use button_state::ButtonState;
pub use progress_button::{ButtonStyle, Constraints, DrawOp, MeasureSpec, ProgressButton};
