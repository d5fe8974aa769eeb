//! Row mapper: turns a checked workbook into a canonical section record.
//!
//! Scalar fields land at fixed paths, each data row becomes one entry of the
//! section's list, and delimited fan-out columns expand into nested lists.
//! Empty cells are left out so that optional record fields stay absent.

pub mod error;
pub mod mapper;

pub use error::{MappingError, Result};
pub use mapper::{map_document, map_section};
