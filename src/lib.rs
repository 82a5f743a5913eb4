//! catmerge
//!
//! 翻訳カタログのマッチング・マージエンジン (DTD / CSV → gettext PO)
//!
//! The engine matches an incoming unit sequence against a reference catalog
//! by location, exact source text, and normalized source text, then merges
//! translations while preserving the incoming order and provenance.

pub mod accel;
pub mod cli;
pub mod config;
pub mod convert;
pub mod formats;
pub mod header;
pub mod matching;
pub mod unit;

// よく使う型を再エクスポート
pub use convert::{
    Conversion,
    csv_to_po,
    dtd_to_po,
};
pub use unit::TranslationUnit;
