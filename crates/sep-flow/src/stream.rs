use std::collections::BTreeMap;

use sep_core::errors::{ErrorInfo, SepError};
use serde::{Deserialize, Serialize};

/// Lower bound accepted for the sum of PSD mass fractions.
pub const PSD_SUM_MIN: f64 = 0.99;
/// Upper bound accepted for the sum of PSD mass fractions.
pub const PSD_SUM_MAX: f64 = 1.01;

/// Physical phase of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Dry or slurried solids.
    Solid,
    /// Aqueous or organic liquor.
    Liquid,
    /// Gas phase.
    Gas,
}

/// Particle-size distribution carried by a stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Psd {
    /// Upper size in microns for each bin.
    pub bins_um: Vec<f64>,
    /// Mass fraction per bin, summing to one within tolerance.
    pub mass_frac: Vec<f64>,
}

impl Psd {
    /// Creates a validated distribution.
    pub fn new(bins_um: Vec<f64>, mass_frac: Vec<f64>) -> Result<Self, SepError> {
        let psd = Self { bins_um, mass_frac };
        psd.validate()?;
        Ok(psd)
    }

    /// Checks bin/fraction alignment and the mass-fraction sum tolerance.
    pub fn validate(&self) -> Result<(), SepError> {
        if self.bins_um.len() != self.mass_frac.len() {
            return Err(SepError::Schema(
                ErrorInfo::new(
                    "psd-shape",
                    "PSD bins and mass fractions have different lengths",
                )
                .with_context("bins", self.bins_um.len().to_string())
                .with_context("mass_frac", self.mass_frac.len().to_string()),
            ));
        }
        let total = self.total_mass();
        if !(PSD_SUM_MIN..=PSD_SUM_MAX).contains(&total) {
            return Err(SepError::Schema(
                ErrorInfo::new(
                    "psd-sum",
                    format!("PSD mass fractions sum to {total:.3}, expected ~1.0"),
                )
                .with_context("sum", format!("{total}"))
                .with_hint(format!("fractions must sum to [{PSD_SUM_MIN}, {PSD_SUM_MAX}]")),
            ));
        }
        Ok(())
    }

    /// Sum of the mass fractions.
    pub fn total_mass(&self) -> f64 {
        self.mass_frac.iter().sum()
    }

    /// Returns a copy with every bin edge multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            bins_um: self.bins_um.iter().map(|edge| edge * factor).collect(),
            mass_frac: self.mass_frac.clone(),
        }
    }
}

/// Liberated mass fraction per mineral per PSD bin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiberationMatrix {
    /// Mineral labels, one per column.
    pub minerals: Vec<String>,
    /// Rows follow PSD bins, columns follow `minerals`.
    pub matrix: Vec<Vec<f64>>,
}

impl LiberationMatrix {
    /// Checks that every row has one entry per mineral.
    pub fn validate(&self) -> Result<(), SepError> {
        for (row_idx, row) in self.matrix.iter().enumerate() {
            if row.len() != self.minerals.len() {
                return Err(SepError::Schema(
                    ErrorInfo::new(
                        "liberation-shape",
                        "liberation row width does not match the mineral list",
                    )
                    .with_context("row", row_idx.to_string())
                    .with_context("expected", self.minerals.len().to_string())
                    .with_context("found", row.len().to_string()),
                ));
            }
        }
        Ok(())
    }
}

fn default_temperature() -> f64 {
    298.15
}

fn default_pressure() -> f64 {
    101_325.0
}

/// A material flow between unit operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stream {
    /// Unique name within the owning flowsheet.
    pub name: String,
    /// Physical phase.
    pub phase: Phase,
    /// Temperature in kelvin.
    #[serde(rename = "temperature_K", default = "default_temperature")]
    pub temperature_k: f64,
    /// Pressure in pascal.
    #[serde(rename = "pressure_Pa", default = "default_pressure")]
    pub pressure_pa: f64,
    /// Element or mineral basis weight fractions.
    #[serde(default)]
    pub composition_wt: BTreeMap<String, f64>,
    /// Optional particle-size distribution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub psd: Option<Psd>,
    /// Optional mineral liberation data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liberation: Option<LiberationMatrix>,
    /// Optional pH.
    #[serde(rename = "pH", default, skip_serializing_if = "Option::is_none")]
    pub ph: Option<f64>,
    /// Optional redox potential in millivolts.
    #[serde(rename = "Eh_mV", default, skip_serializing_if = "Option::is_none")]
    pub eh_mv: Option<f64>,
    /// Optional solids weight fraction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solids_wtfrac: Option<f64>,
}

impl Stream {
    /// Creates a stream at ambient conditions with no composition data.
    pub fn new(name: impl Into<String>, phase: Phase) -> Self {
        Self {
            name: name.into(),
            phase,
            temperature_k: default_temperature(),
            pressure_pa: default_pressure(),
            composition_wt: BTreeMap::new(),
            psd: None,
            liberation: None,
            ph: None,
            eh_mv: None,
            solids_wtfrac: None,
        }
    }

    /// Attaches a particle-size distribution.
    pub fn with_psd(mut self, psd: Psd) -> Self {
        self.psd = Some(psd);
        self
    }

    /// Validates the optional PSD and liberation payloads.
    pub fn validate(&self) -> Result<(), SepError> {
        let tag = |err: SepError| match err {
            SepError::Schema(info) => SepError::Schema(info.with_context("stream", &self.name)),
            other => other,
        };
        if let Some(psd) = &self.psd {
            psd.validate().map_err(tag)?;
        }
        if let Some(liberation) = &self.liberation {
            liberation.validate().map_err(tag)?;
        }
        Ok(())
    }

    /// Returns a copy of the stream under a different name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        let mut copy = self.clone();
        copy.name = name.into();
        copy
    }
}
