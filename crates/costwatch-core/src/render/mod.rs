//! Renderers for the report: chat text, CSV attachment, HTML email body

mod csv;
mod html;
mod text;

pub use self::csv::{CsvExporter, CSV_HEADER};
pub use html::{AlertTemplate, Logo};
pub use text::{format_summary, total_line};
