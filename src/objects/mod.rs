//! Objects Module
//!
//! Typed handles over remote collections. Every adapter wraps an
//! [`EntityHandle`] and derefs to it for the shared key operations.
//!
//! ## Adapters
//! - [`Scalar`]: one value under a string key
//! - [`Hash`]: field/value map with per-field marshalling
//! - [`List`]: ordered sequence with an optional length bound
//! - [`Set`]: unordered unique members
//! - [`OrderedSet`]: members ranked by score, queried through [`range`]

mod entity;
mod hash;
mod list;
mod ordered_set;
pub mod range;
mod scalar;
mod set;

pub use entity::{EntityHandle, RenameOptions};
pub use hash::{FieldValues, Hash};
pub use list::{List, Position};
pub use ordered_set::OrderedSet;
pub use range::{
    IndexWindow, LimitWindow, RangeEntries, RangeOptions, ScoreBound, ScoreRangeOptions,
    ScoredMember,
};
pub use scalar::Scalar;
pub use set::Set;
