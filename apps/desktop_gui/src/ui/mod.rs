//! UI layer for desktop GUI: app shell, screens, and colors.

pub mod app;
pub mod theme;

pub use app::{AppPaths, AskPdfApp, StartupConfig};
