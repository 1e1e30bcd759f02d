//! Unit dispatch registry and the simplified unit behaviors.
//!
//! Every behavior consumes a feed stream by reference and returns fresh output
//! streams keyed by role plus a KPI mapping. Behaviors hold only their own
//! parameters, so one instance can be simulated any number of times.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::stream::Stream;
use crate::unit::UnitOp;

mod classification;
mod comminution;
mod flotation;
mod hydromet;
mod magnetic;
mod thickening;

pub use classification::Cyclone;
pub use comminution::Mill;
pub use flotation::Flotation;
pub use hydromet::Leach;
pub use magnetic::Lims;
pub use thickening::Thickener;

/// Output of simulating one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitResult {
    /// Output streams keyed by role, in role order.
    pub outputs: IndexMap<String, Stream>,
    /// Local KPIs keyed by KPI name.
    pub kpis: IndexMap<String, f64>,
}

impl UnitResult {
    pub(crate) fn new<const R: usize, const K: usize>(
        outputs: [(&str, Stream); R],
        kpis: [(&str, f64); K],
    ) -> Self {
        Self {
            outputs: outputs
                .into_iter()
                .map(|(role, stream)| (role.to_string(), stream))
                .collect(),
            kpis: kpis
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
        }
    }
}

/// Simulation capability shared by every unit type.
pub trait UnitBehavior: Send + Sync {
    /// Simulates the unit on `feed` without mutating it.
    fn simulate(&self, feed: &Stream) -> UnitResult;
}

/// Constructor producing a behavior from a validated unit declaration.
pub type UnitFactory = fn(&UnitOp) -> Box<dyn UnitBehavior>;

fn boxed<B: UnitBehavior + 'static>(behavior: B) -> Box<dyn UnitBehavior> {
    Box::new(behavior)
}

/// Mapping from unit type tag to behavior constructor.
#[derive(Clone)]
pub struct UnitRegistry {
    factories: BTreeMap<String, UnitFactory>,
}

impl std::fmt::Debug for UnitRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnitRegistry")
            .field("types", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl UnitRegistry {
    /// Creates an empty registry.
    pub fn empty() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Registry with every built-in behavior.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry.register("mill", |unit: &UnitOp| boxed(Mill::from_unit(unit)));
        registry.register("cyclone", |unit: &UnitOp| boxed(Cyclone::from_unit(unit)));
        registry.register("lims", |unit: &UnitOp| boxed(Lims::from_unit(unit)));
        registry.register("flotation", |unit: &UnitOp| {
            boxed(Flotation::from_unit(unit))
        });
        registry.register("flotation_bank", |unit: &UnitOp| {
            boxed(Flotation::from_unit(unit))
        });
        registry.register("leach", |unit: &UnitOp| boxed(Leach::from_unit(unit)));
        registry.register("thickener", |unit: &UnitOp| {
            boxed(Thickener::from_unit(unit))
        });
        registry
    }

    /// Registers or replaces the behavior for `unit_type`.
    pub fn register(&mut self, unit_type: impl Into<String>, factory: UnitFactory) {
        self.factories.insert(unit_type.into(), factory);
    }

    /// Removes the behavior for `unit_type`, returning whether one existed.
    pub fn unregister(&mut self, unit_type: &str) -> bool {
        self.factories.remove(unit_type).is_some()
    }

    /// Returns whether a behavior is registered for `unit_type`.
    pub fn contains(&self, unit_type: &str) -> bool {
        self.factories.contains_key(unit_type)
    }

    /// Instantiates the behavior for `unit`, if its type is registered.
    pub fn instantiate(&self, unit: &UnitOp) -> Option<Box<dyn UnitBehavior>> {
        self.factories
            .get(unit.unit_type.as_str())
            .map(|factory| factory(unit))
    }
}

impl Default for UnitRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
