//! netrack-report — HTML rendering of analytics reports.

pub mod html;

pub use html::{generate_html, write_html_report};
