//! UI layer for the desktop app: app shell, theme, and row widgets.

pub mod app;
pub mod theme;
pub mod widgets;

pub use app::CommissionDeskApp;
