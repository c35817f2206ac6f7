//! Library side of the `growth` command-line tool.

pub mod batch;
pub mod logging;
