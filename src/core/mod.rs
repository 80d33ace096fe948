//! Core application logic
//!
//! Selection, the progress button, download bookkeeping and notifications.
//! NO imports from frontend/ or terminal code: the core updates its state and
//! frontends read and render it.

pub mod app_core;
pub mod detail;
pub mod input_router;
pub mod state;

pub use app_core::AppCore;
pub use input_router::{route_key, Action};
pub use state::Screen;
