use std::collections::BTreeSet;
use std::convert::TryFrom;

use indexmap::IndexSet;
use sep_core::errors::{ErrorInfo, SepError};
use sep_core::hash::stable_hash_string;
use serde::{Deserialize, Serialize};

use crate::params::Params;
use crate::stream::Stream;
use crate::unit::{UnitDescription, UnitOp};

fn default_name() -> String {
    "fs".to_string()
}

/// Declarative flowsheet description as parsed from YAML or JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowsheetDescription {
    /// Flowsheet name.
    #[serde(default = "default_name")]
    pub name: String,
    /// Units in declaration order.
    pub units: Vec<UnitDescription>,
    /// Streams in declaration order.
    #[serde(default)]
    pub streams: Vec<Stream>,
}

/// The full declared network of units and streams for one process design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FlowsheetDescription")]
pub struct Flowsheet {
    /// Flowsheet name.
    pub name: String,
    /// Units in declaration order; this is also the execution order.
    pub units: Vec<UnitOp>,
    /// Streams in declaration order.
    pub streams: Vec<Stream>,
}

/// Feed and sink streams reported by [`Flowsheet::validate_graph`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSummary {
    /// Streams never produced by any unit.
    pub feeds: Vec<String>,
    /// Streams never consumed by any unit.
    pub sinks: Vec<String>,
}

/// Kind of node in the inspection graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum GraphNode {
    /// A unit operation node.
    Unit {
        /// Unit identifier.
        id: String,
        /// Unit type tag.
        unit_type: String,
        /// Unit parameters.
        params: Params,
    },
    /// A stream node.
    Stream {
        /// Stream name.
        id: String,
    },
}

impl GraphNode {
    /// Identifier of the node.
    pub fn id(&self) -> &str {
        match self {
            GraphNode::Unit { id, .. } | GraphNode::Stream { id } => id,
        }
    }
}

/// Directed inspection graph: stream → unit for inputs, unit → stream for outputs.
///
/// Execution never consults this view; units always run in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowsheetGraph {
    /// Nodes in first-seen order.
    pub nodes: Vec<GraphNode>,
    /// Deduplicated edges in declaration order.
    pub edges: Vec<(String, String)>,
}

impl FlowsheetGraph {
    /// Nodes with an edge into `id`.
    pub fn predecessors(&self, id: &str) -> Vec<&str> {
        self.edges
            .iter()
            .filter(|(_, to)| to == id)
            .map(|(from, _)| from.as_str())
            .collect()
    }

    /// Nodes reached by an edge out of `id`.
    pub fn successors(&self, id: &str) -> Vec<&str> {
        self.edges
            .iter()
            .filter(|(from, _)| from == id)
            .map(|(_, to)| to.as_str())
            .collect()
    }
}

fn add_stream_node(name: &str, nodes: &mut Vec<GraphNode>, seen: &mut IndexSet<String>) {
    if seen.insert(name.to_string()) {
        nodes.push(GraphNode::Stream {
            id: name.to_string(),
        });
    }
}

impl Flowsheet {
    /// Builds a flowsheet from already validated units, validating each stream.
    ///
    /// Graph invariants are not checked here; call [`Flowsheet::validate_graph`].
    pub fn new(
        name: impl Into<String>,
        units: Vec<UnitOp>,
        streams: Vec<Stream>,
    ) -> Result<Self, SepError> {
        for stream in &streams {
            stream.validate()?;
        }
        Ok(Self {
            name: name.into(),
            units,
            streams,
        })
    }

    /// Validates a parsed description into a flowsheet.
    pub fn from_description(desc: FlowsheetDescription) -> Result<Self, SepError> {
        let units = desc
            .units
            .into_iter()
            .map(UnitOp::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(desc.name, units, desc.streams)
    }

    /// Looks up a declared stream by name.
    pub fn stream(&self, name: &str) -> Option<&Stream> {
        self.streams.iter().find(|stream| stream.name == name)
    }

    /// Looks up a unit by identifier.
    pub fn unit(&self, id: &str) -> Option<&UnitOp> {
        self.units.iter().find(|unit| unit.id == id)
    }

    /// Builds the inspection graph.
    pub fn graph(&self) -> FlowsheetGraph {
        let mut nodes: Vec<GraphNode> = Vec::new();
        let mut seen = IndexSet::new();
        let mut edges = IndexSet::new();
        for unit in &self.units {
            if seen.insert(unit.id.clone()) {
                nodes.push(GraphNode::Unit {
                    id: unit.id.clone(),
                    unit_type: unit.unit_type.clone(),
                    params: unit.params.clone(),
                });
            }
            for input in &unit.inputs {
                add_stream_node(input, &mut nodes, &mut seen);
                edges.insert((input.clone(), unit.id.clone()));
            }
            for output in &unit.outputs {
                add_stream_node(output, &mut nodes, &mut seen);
                edges.insert((unit.id.clone(), output.clone()));
            }
        }
        FlowsheetGraph {
            nodes,
            edges: edges.into_iter().collect(),
        }
    }

    /// Checks structural invariants and reports feed and sink streams.
    ///
    /// Fails on duplicate stream names, dangling stream references, a network
    /// with no feed (every stream is produced by some unit), or a network with
    /// no sink (every stream is consumed by some unit).
    pub fn validate_graph(&self) -> Result<GraphSummary, SepError> {
        let mut names = BTreeSet::new();
        for stream in &self.streams {
            if !names.insert(stream.name.as_str()) {
                return Err(SepError::Graph(
                    ErrorInfo::new(
                        "duplicate-stream",
                        format!("stream '{}' is declared more than once", stream.name),
                    )
                    .with_context("stream", stream.name.as_str()),
                ));
            }
        }
        for unit in &self.units {
            for reference in unit.inputs.iter().chain(unit.outputs.iter()) {
                if !names.contains(reference.as_str()) {
                    return Err(SepError::Graph(
                        ErrorInfo::new(
                            "dangling-stream",
                            format!("unit {} references unknown stream '{reference}'", unit.id),
                        )
                        .with_context("unit", unit.id.as_str())
                        .with_context("stream", reference.as_str()),
                    ));
                }
            }
        }

        let consumed: BTreeSet<&str> = self
            .units
            .iter()
            .flat_map(|unit| unit.inputs.iter().map(String::as_str))
            .collect();
        let produced: BTreeSet<&str> = self
            .units
            .iter()
            .flat_map(|unit| unit.outputs.iter().map(String::as_str))
            .collect();
        let feeds: Vec<String> = self
            .streams
            .iter()
            .filter(|stream| !produced.contains(stream.name.as_str()))
            .map(|stream| stream.name.clone())
            .collect();
        let sinks: Vec<String> = self
            .streams
            .iter()
            .filter(|stream| !consumed.contains(stream.name.as_str()))
            .map(|stream| stream.name.clone())
            .collect();
        if feeds.is_empty() {
            return Err(SepError::Graph(ErrorInfo::new(
                "no-feed",
                "no feed streams (not produced by any unit)",
            )));
        }
        if sinks.is_empty() {
            return Err(SepError::Graph(ErrorInfo::new(
                "no-sink",
                "no product/sink streams (not consumed by any unit)",
            )));
        }
        Ok(GraphSummary { feeds, sinks })
    }

    /// Canonical SHA-256 hash of the flowsheet contents.
    pub fn canonical_hash(&self) -> Result<String, SepError> {
        stable_hash_string(self)
    }
}

impl TryFrom<FlowsheetDescription> for Flowsheet {
    type Error = SepError;

    fn try_from(desc: FlowsheetDescription) -> Result<Self, Self::Error> {
        Flowsheet::from_description(desc)
    }
}
