use indexmap::IndexMap;
use sep_core::errors::{ErrorInfo, SepError};
use serde::{Deserialize, Serialize};

/// A single unit parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Numeric parameter, eligible for perturbation and search.
    Number(f64),
    /// Free-form label such as a media type.
    Text(String),
}

impl ParamValue {
    /// Returns the numeric value, if any.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Number(value) => Some(*value),
            ParamValue::Text(_) => None,
        }
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Number(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

/// Ordered parameter mapping of a unit operation.
pub type Params = IndexMap<String, ParamValue>;

/// Expected value kind of a registered parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Must be a number.
    Number,
    /// Must be text.
    Text,
}

/// Registered parameter name and kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    /// Parameter name as written in descriptions.
    pub name: &'static str,
    /// Expected value kind.
    pub kind: ParamKind,
}

const fn number(name: &'static str) -> ParamSpec {
    ParamSpec {
        name,
        kind: ParamKind::Number,
    }
}

const fn text(name: &'static str) -> ParamSpec {
    ParamSpec {
        name,
        kind: ParamKind::Text,
    }
}

/// Required and optional parameters registered for one unit type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitContract {
    /// Unit type tag.
    pub unit_type: &'static str,
    /// Parameters that must be present.
    pub required: &'static [ParamSpec],
    /// Parameters that may be present.
    pub optional: &'static [ParamSpec],
}

const FLOTATION_REQUIRED: &[ParamSpec] = &[number("k_s_1ps"), number("R_inf")];
const FLOTATION_OPTIONAL: &[ParamSpec] = &[
    number("air_rate_m3m2s"),
    number("froth_recovery"),
    number("stages"),
];

/// Static parameter contract table. Extend by adding entries.
pub const UNIT_CONTRACTS: &[UnitContract] = &[
    UnitContract {
        unit_type: "mill",
        required: &[number("fineness_factor")],
        optional: &[number("E_specific_kWhpt"), text("media_type")],
    },
    UnitContract {
        unit_type: "cyclone",
        required: &[number("d50c_um")],
        optional: &[number("sharpness_alpha"), number("pressure_kPa")],
    },
    UnitContract {
        unit_type: "lims",
        required: &[number("magnetic_recovery")],
        optional: &[number("field_T")],
    },
    UnitContract {
        unit_type: "flotation_bank",
        required: FLOTATION_REQUIRED,
        optional: FLOTATION_OPTIONAL,
    },
    UnitContract {
        unit_type: "flotation",
        required: FLOTATION_REQUIRED,
        optional: FLOTATION_OPTIONAL,
    },
    UnitContract {
        unit_type: "leach",
        required: &[number("extraction")],
        optional: &[
            number("residence_h"),
            number("acid_kgpt"),
            number("temperature_C"),
        ],
    },
    UnitContract {
        unit_type: "thickener",
        required: &[],
        optional: &[number("unit_area_m2tpd"), number("underflow_solids")],
    },
];

/// Looks up the contract registered for `unit_type`.
pub fn contract_for(unit_type: &str) -> Option<&'static UnitContract> {
    UNIT_CONTRACTS
        .iter()
        .find(|contract| contract.unit_type == unit_type)
}

impl UnitContract {
    fn spec(&self, name: &str) -> Option<&ParamSpec> {
        self.required
            .iter()
            .chain(self.optional.iter())
            .find(|spec| spec.name == name)
    }

    /// Exact-set check of `params` against this contract.
    pub fn check(&self, unit_id: &str, params: &Params) -> Result<(), SepError> {
        for spec in self.required {
            if !params.contains_key(spec.name) {
                return Err(SepError::Schema(
                    ErrorInfo::new(
                        "missing-param",
                        format!(
                            "unit '{unit_id}' lacks required parameter '{}' ({})",
                            spec.name, self.unit_type
                        ),
                    )
                    .with_context("unit", unit_id)
                    .with_context("param", spec.name),
                ));
            }
        }
        for (name, value) in params {
            let Some(spec) = self.spec(name) else {
                return Err(SepError::Schema(
                    ErrorInfo::new(
                        "unregistered-param",
                        format!(
                            "unit '{unit_id}' has unknown parameter '{name}' for unit type '{}'",
                            self.unit_type
                        ),
                    )
                    .with_context("unit", unit_id)
                    .with_context("param", name.as_str())
                    .with_hint(format!("registered: {}", self.registered_names().join(", "))),
                ));
            };
            let matches = matches!(
                (spec.kind, value),
                (ParamKind::Number, ParamValue::Number(_)) | (ParamKind::Text, ParamValue::Text(_))
            );
            if !matches {
                return Err(SepError::Schema(
                    ErrorInfo::new(
                        "param-type",
                        format!("unit '{unit_id}' parameter '{name}' has the wrong value kind"),
                    )
                    .with_context("unit", unit_id)
                    .with_context("param", name.as_str())
                    .with_context("expected", format!("{:?}", spec.kind)),
                ));
            }
        }
        Ok(())
    }

    /// All registered parameter names, required first.
    pub fn registered_names(&self) -> Vec<&'static str> {
        self.required
            .iter()
            .chain(self.optional.iter())
            .map(|spec| spec.name)
            .collect()
    }
}

/// Reads a numeric parameter, falling back to `default` when absent or textual.
pub fn numeric_param(params: &Params, key: &str, default: f64) -> f64 {
    params
        .get(key)
        .and_then(ParamValue::as_f64)
        .unwrap_or(default)
}
