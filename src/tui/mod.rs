//! TUI module: Terminal User Interface using Ratatui.
//!
//! A single-screen form: input fields on the left, prediction pane on the
//! right.

mod app;
mod styles;
mod ui;

pub use app::App;
pub use styles::Theme;
