use std::convert::TryFrom;

use sep_core::errors::{ErrorInfo, SepError};
use serde::{Deserialize, Serialize};

use crate::params::{contract_for, Params};

/// Declarative description of a unit operation, prior to validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitDescription {
    /// Unit identifier.
    pub id: String,
    /// Unit type tag.
    #[serde(rename = "type")]
    pub unit_type: String,
    /// Parameter mapping.
    #[serde(default)]
    pub params: Params,
    /// Ordered input stream names.
    #[serde(default)]
    pub inputs: Vec<String>,
    /// Ordered output stream names.
    #[serde(default)]
    pub outputs: Vec<String>,
}

/// A validated process step.
///
/// Construction checks the parameter mapping against the contract registered
/// for the type tag: every required key present and nothing outside the
/// required and optional sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UnitDescription")]
pub struct UnitOp {
    /// Unit identifier.
    pub id: String,
    /// Unit type tag.
    #[serde(rename = "type")]
    pub unit_type: String,
    /// Parameter mapping, in declaration order.
    pub params: Params,
    /// Ordered input stream names.
    pub inputs: Vec<String>,
    /// Ordered output stream names.
    pub outputs: Vec<String>,
}

impl UnitOp {
    /// Builds a unit and validates its parameters against the contract table.
    pub fn new(
        id: impl Into<String>,
        unit_type: impl Into<String>,
        params: Params,
        inputs: Vec<String>,
        outputs: Vec<String>,
    ) -> Result<Self, SepError> {
        let id = id.into();
        let unit_type = unit_type.into();
        let Some(contract) = contract_for(&unit_type) else {
            return Err(SepError::Schema(
                ErrorInfo::new(
                    "unknown-unit-type",
                    format!("unit '{id}' has unknown unit type '{unit_type}'"),
                )
                .with_context("unit", id.as_str())
                .with_context("type", unit_type.as_str()),
            ));
        };
        contract.check(&id, &params)?;
        Ok(Self {
            id,
            unit_type,
            params,
            inputs,
            outputs,
        })
    }

    /// Name of the first declared input, which the engine treats as the feed.
    pub fn feed_name(&self) -> Option<&str> {
        self.inputs.first().map(String::as_str)
    }
}

impl TryFrom<UnitDescription> for UnitOp {
    type Error = SepError;

    fn try_from(desc: UnitDescription) -> Result<Self, Self::Error> {
        UnitOp::new(
            desc.id,
            desc.unit_type,
            desc.params,
            desc.inputs,
            desc.outputs,
        )
    }
}
