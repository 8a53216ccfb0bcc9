//! Codec Module
//!
//! Converts language-level values to and from the store's string wire form.
//!
//! ## Resolution
//! Every adapter embeds a [`ValueCodec`] carrying the collection-wide
//! default. Each call picks its spec with this precedence (highest first):
//!
//! 1. an explicit per-call spec
//! 2. the per-field spec from `Config::marshal_keys` (hashes only)
//! 3. `Config::marshal`
//! 4. [`MarshalSpec::None`] (pass-through)
//!
//! Levels 1 and 2 are both handed to the codec as `Option<&MarshalSpec>`;
//! the adapter decides which one applies.

mod marshal;
mod value_codec;

pub use marshal::{MarshalSpec, Marshaller};
pub use value_codec::{decode, decode_all, encode, encode_all, ValueCodec};
