pub mod cost;
pub mod design;
pub mod flowsheet;

use std::error::Error;
use std::fs;
use std::path::Path;

use chrono::Utc;
use sep_core::{to_json_pretty, RunProvenance};
use serde::Serialize;

/// A command result stamped with where it came from.
#[derive(Debug, Serialize)]
pub struct Stamped<'a, T: Serialize> {
    pub provenance: RunProvenance,
    pub report: &'a T,
}

pub fn provenance(input_hash: String, seed: Option<u64>) -> RunProvenance {
    let record = RunProvenance::new(input_hash, Utc::now().to_rfc3339())
        .with_tool(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    match seed {
        Some(seed) => record.with_seed(seed),
        None => record,
    }
}

/// Writes pretty JSON to `out`, or to stdout when no path is given.
///
/// Map order is preserved, so KPIs appear in unit declaration order.
pub fn emit<T: Serialize>(value: &T, out: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let json = to_json_pretty(value)?;
    match out {
        Some(path) => write_file(path, &json),
        None => {
            println!("{json}");
            Ok(())
        }
    }
}

pub fn write_file(path: &Path, contents: &str) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, contents)?;
    Ok(())
}
