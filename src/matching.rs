//! The matching-and-merge engine: index building, single-unit resolution,
//! and ordered catalog merging.

mod index;
mod merge;
mod normalize;
mod resolve;

pub use index::{
    MatchIndex,
    build_index,
};
pub use merge::{
    MergeOutcome,
    merge,
};
pub use normalize::simplify;
pub use resolve::{
    MatchResult,
    PluralSlot,
    resolve,
    resolve_plural_slot,
};
