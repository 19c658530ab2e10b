//! Data models for costwatch

mod period;
mod report;

pub use period::*;
pub use report::*;
