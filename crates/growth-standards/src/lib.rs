#![deny(unsafe_code)]

pub mod csv;
pub mod error;
pub mod hash;
pub mod manifest;
pub mod paths;
pub mod store;
pub mod table;

pub use crate::csv::lms::{parse_table, parse_table_file};
pub use crate::error::StandardsError;
pub use crate::paths::{STANDARDS_ENV_VAR, standards_root};
pub use crate::store::{ReferenceTableStore, TableSummary, VerifySummary};
pub use crate::table::ReferenceTable;

/// Load the reference tables from the default standards directory.
pub fn load_default_store() -> Result<ReferenceTableStore, StandardsError> {
    ReferenceTableStore::load(&standards_root())
}
