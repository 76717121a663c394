//! Output formatting module
//!
//! Terminal rendering of a validation run and the JSON report file.

pub mod json;
pub mod terminal;

pub use json::{to_json, write_json_file};
pub use terminal::{print_summary, report_event};
