//! Reactive terminal form: every key press re-renders, Enter submits.

mod app;
pub mod form;
pub mod theme;
pub mod widgets;

pub use app::{run, submit};
