pub mod destination;
pub mod error;
pub mod reader;
pub mod trim;

pub use destination::{Destination, parse_destination};
pub use error::{IngestError, Result};
pub use reader::{WorkbookFormat, read_workbook, read_workbook_bytes};
pub use trim::{common_length, trim_sheet, trim_workbook};
