//! Doc
/// CSV catalog conversion driver
mod csv2po;
/// DTD entity conversion driver
mod dtd2po;
/// Colliding source text handling
mod duplicates;

use thiserror::Error;

pub use csv2po::{
    CsvOptions,
    csv_to_po,
};
pub use dtd2po::{
    DtdOptions,
    dtd_to_po,
};
pub use duplicates::{
    DuplicateStyle,
    apply_duplicate_policy,
};

use crate::formats::FormatError;

/// Result of one end-to-end conversion run.
#[derive(Debug)]
pub struct Conversion {
    /// Serialized PO catalog.
    pub output: String,
    /// Emitted units, not counting a header.
    pub unit_count: usize,
    /// Units that found no translation counterpart.
    pub unmatched: usize,
    /// Units skipped because several counterparts were equally valid.
    pub ambiguous: usize,
}

/// Errors raised by the conversion drivers.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// An input file could not be parsed.
    #[error(transparent)]
    Format(#[from] FormatError),
}
