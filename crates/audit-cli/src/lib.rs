//! Library side of the `single-audit` command line.

pub mod logging;
pub mod summary;
