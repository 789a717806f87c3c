//! converter-board
//!
//! A board of three conversion widgets (time zones, currency, units) whose
//! order can be rearranged, plus a persisted light/dark theme.

pub mod app;
pub mod commands;
pub mod core;
pub mod shared;

pub use app::AppState;
pub use shared::{AppError, AppResult};
