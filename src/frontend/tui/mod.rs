//! TUI Frontend (ratatui-based)
//!
//! Implements the Frontend trait using ratatui for rendering and crossterm for
//! terminal management and input.

pub mod app;
pub mod detail_screen;
pub mod main_screen;
pub mod progress_button;

pub use app::TuiFrontend;
