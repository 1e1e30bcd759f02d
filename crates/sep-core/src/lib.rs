#![deny(missing_docs)]
#![doc = "Core error, seeding, and provenance types shared by the flowsheet engine crates."]

pub mod errors;
/// Canonical hashing helpers.
pub mod hash;
pub mod provenance;
pub mod rng;
/// Canonical JSON and YAML serde helpers.
pub mod serde;

pub use errors::{ErrorInfo, SepError};
pub use hash::stable_hash_string;
pub use provenance::{RunProvenance, SchemaVersion};
pub use rng::{derive_substream_seed, RngHandle};
pub use self::serde::{
    from_json_slice, from_yaml_slice, to_canonical_json_bytes, to_json_pretty, to_yaml_string,
};

/// Value returned to the numeric search in place of a failed trial evaluation.
pub const FAILURE_PENALTY: f64 = 1e9;
