//! Per-format readers and writers.
//!
//! These are thin shims around the engine: each reader hands the core a
//! plain in-memory sequence of [`crate::unit::TranslationUnit`], and the
//! writer serializes the core's output sequence unchanged.

pub mod csv;
pub mod dtd;
pub mod po;

use thiserror::Error;

/// Errors raised while reading a concrete file syntax.
#[derive(Error, Debug)]
pub enum FormatError {
    /// Structurally invalid markup-entity (DTD) input.
    #[error("malformed DTD at line {line}: {message}")]
    Dtd {
        /// 1-indexed line of the offending input.
        line: usize,
        /// What was wrong.
        message: String,
    },
    /// Structurally invalid delimited-record (CSV) input.
    #[error("malformed CSV at line {line}: {message}")]
    Csv {
        /// 1-indexed line of the offending input.
        line: usize,
        /// What was wrong.
        message: String,
    },
    /// Structurally invalid gettext catalog input.
    #[error("malformed PO catalog at line {line}: {message}")]
    Po {
        /// 1-indexed line of the offending input.
        line: usize,
        /// What was wrong.
        message: String,
    },
}
