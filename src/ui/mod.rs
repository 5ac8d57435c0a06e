//! UI rendering module for the ENEM question-bank browser
//!
//! This module contains all the rendering logic for the terminal user
//! interface, using the ratatui library for TUI components.

pub mod help_overlay;
pub mod question_detail;
pub mod question_list;

pub use help_overlay::render as render_help_overlay;
pub use question_detail::render as render_question_detail;
pub use question_list::render_question_list;
