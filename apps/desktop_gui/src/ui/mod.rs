//! UI layer for the desktop GUI: the single riddle window.

pub mod app;

pub use app::RiddleApp;
