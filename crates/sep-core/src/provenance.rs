//! Provenance and schema descriptors attached to emitted reports.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Semantic version describing the schema of serialized payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Major version incremented for breaking changes.
    pub major: u32,
    /// Minor version incremented for additive changes.
    pub minor: u32,
    /// Patch version incremented for bug fixes and documentation updates.
    pub patch: u32,
}

impl SchemaVersion {
    /// Creates a new schema version descriptor.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::new(1, 0, 0)
    }
}

/// Provenance information attached to every persisted report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RunProvenance {
    /// Schema version of the report payload.
    #[serde(default)]
    pub schema_version: SchemaVersion,
    /// Canonical hash of the flowsheet or design configuration that was run.
    pub input_hash: String,
    /// Master deterministic seed, when randomness was involved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// RFC 3339 timestamp recording when the report was generated.
    pub created_at: String,
    /// Version map for all tools involved in the run.
    #[serde(default)]
    pub tool_versions: BTreeMap<String, String>,
}

impl RunProvenance {
    /// Creates a provenance record for the given input hash and timestamp.
    pub fn new(input_hash: impl Into<String>, created_at: impl Into<String>) -> Self {
        Self {
            schema_version: SchemaVersion::default(),
            input_hash: input_hash.into(),
            seed: None,
            created_at: created_at.into(),
            tool_versions: BTreeMap::new(),
        }
    }

    /// Records the master seed used by the run.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Records the version of a tool that contributed to the run.
    pub fn with_tool(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.tool_versions.insert(name.into(), version.into());
        self
    }
}
