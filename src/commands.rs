//! Command surface
//!
//! Async functions over [`AppState`](crate::app::AppState), one submodule per
//! concern. Each returns a serializable response DTO.
//!
//! - `settings`: settings persistence
//! - `theme`: theme flag
//! - `board`: widget order
//! - `widgets`: the three converters

pub mod board;
pub mod settings;
pub mod theme;
pub mod widgets;

pub use board::{get_board, reorder_board};
pub use settings::{get_settings, save_settings};
pub use theme::{get_theme, toggle_theme};
pub use widgets::{
    convert_currency, convert_time, convert_units, currency_display, currency_options, get_timezones, get_units,
    list_currencies, unit_display,
};
