//! Report rendering: placeholder resolution and output formats

pub mod formatter;
pub mod report;

pub use formatter::{OutputFormatter, ReportGenerator};
pub use report::ReportView;
