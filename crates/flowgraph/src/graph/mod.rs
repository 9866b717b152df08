use crate::error::{Error, Result};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

mod adjacency;
pub mod alg;

pub use adjacency::Adjacency;

/// A flow graph: nodes with named slots, plus slot-to-slot connections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

/// A graph vertex with ordered input/output slot names and simulation state.
///
/// Position and velocity are plain fields so the renderer can read them between ticks. While a
/// [`Simulation`](crate::Simulation) owns the nodes, writes go through it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<String>,
    #[serde(default)]
    pub outputs: Vec<String>,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default, skip_serializing)]
    pub vx: f64,
    #[serde(default, skip_serializing)]
    pub vy: f64,
    #[serde(default, skip_serializing)]
    pub dragging: bool,
}

impl Node {
    pub fn new<I, O>(name: impl Into<String>, inputs: I, outputs: O) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        O: IntoIterator,
        O::Item: Into<String>,
    {
        Self {
            name: name.into(),
            inputs: inputs.into_iter().map(Into::into).collect(),
            outputs: outputs.into_iter().map(Into::into).collect(),
            x: 0.0,
            y: 0.0,
            vx: 0.0,
            vy: 0.0,
            dragging: false,
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Number of slot rows the node needs (the longer of its two slot lists).
    pub fn slot_rows(&self) -> usize {
        self.inputs.len().max(self.outputs.len())
    }

    pub fn slot_index(&self, kind: SlotKind, slot: &str) -> Option<usize> {
        let slots = match kind {
            SlotKind::Input => &self.inputs,
            SlotKind::Output => &self.outputs,
        };
        slots.iter().position(|s| s == slot)
    }
}

/// A directed edge from an output slot of `out_node` to an input slot of `in_node`.
///
/// Field names on the wire follow the flow-graph JSON shape: `out`, `out_slot`, `in`, `in_slot`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    #[serde(rename = "out")]
    pub out_node: String,
    pub out_slot: String,
    #[serde(rename = "in")]
    pub in_node: String,
    pub in_slot: String,
}

impl Connection {
    pub fn new(
        out_node: impl Into<String>,
        out_slot: impl Into<String>,
        in_node: impl Into<String>,
        in_slot: impl Into<String>,
    ) -> Self {
        Self {
            out_node: out_node.into(),
            out_slot: out_slot.into(),
            in_node: in_node.into(),
            in_slot: in_slot.into(),
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.out_node == self.in_node
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKind {
    Input,
    Output,
}

impl std::fmt::Display for SlotKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlotKind::Input => f.write_str("input"),
            SlotKind::Output => f.write_str("output"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Graph {
    pub fn new(nodes: Vec<Node>, connections: Vec<Connection>) -> Self {
        Self { nodes, connections }
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Checks node name uniqueness and that every connection names existing nodes and slots.
    pub fn validate(&self) -> Result<()> {
        let mut names: FxHashSet<&str> = FxHashSet::default();
        for n in &self.nodes {
            if !names.insert(n.name.as_str()) {
                return Err(Error::DuplicateNode {
                    name: n.name.clone(),
                });
            }
        }

        let index = self.name_index();
        for (i, c) in self.connections.iter().enumerate() {
            let checks = [
                (&c.out_node, &c.out_slot, SlotKind::Output),
                (&c.in_node, &c.in_slot, SlotKind::Input),
            ];
            for (node, slot, kind) in checks {
                let Some(&idx) = index.get(node.as_str()) else {
                    return Err(Error::MissingEndpoint {
                        index: i,
                        node: node.clone(),
                    });
                };
                if self.nodes[idx].slot_index(kind, slot).is_none() {
                    return Err(Error::UnknownSlot {
                        index: i,
                        node: node.clone(),
                        slot: slot.clone(),
                        kind,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.name == name)
    }

    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Name to index lookup table. On duplicate names the first node wins.
    pub fn name_index(&self) -> FxHashMap<&str, usize> {
        let mut out: FxHashMap<&str, usize> = FxHashMap::default();
        out.reserve(self.nodes.len());
        for (idx, n) in self.nodes.iter().enumerate() {
            out.entry(n.name.as_str()).or_insert(idx);
        }
        out
    }

    pub fn adjacency(&self) -> Adjacency {
        Adjacency::build(self)
    }

    /// Distinct successors of `name`, in connection-list order. Includes `name` on a self-loop.
    pub fn successors(&self, name: &str) -> Vec<&str> {
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        self.connections
            .iter()
            .filter(|c| c.out_node == name)
            .map(|c| c.in_node.as_str())
            .filter(|n| seen.insert(*n))
            .collect()
    }

    /// Distinct predecessors of `name`, in connection-list order. Includes `name` on a self-loop.
    pub fn predecessors(&self, name: &str) -> Vec<&str> {
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        self.connections
            .iter()
            .filter(|c| c.in_node == name)
            .map(|c| c.out_node.as_str())
            .filter(|n| seen.insert(*n))
            .collect()
    }

    /// Nodes without predecessors, in node order.
    pub fn roots(&self) -> Vec<&str> {
        let adj = self.adjacency();
        self.nodes
            .iter()
            .enumerate()
            .filter(|(idx, _)| adj.predecessors(*idx).is_empty())
            .map(|(_, n)| n.name.as_str())
            .collect()
    }

    /// Nodes without successors, in node order.
    pub fn leaves(&self) -> Vec<&str> {
        let adj = self.adjacency();
        self.nodes
            .iter()
            .enumerate()
            .filter(|(idx, _)| adj.successors(*idx).is_empty())
            .map(|(_, n)| n.name.as_str())
            .collect()
    }

    /// Returns the names along one directed cycle, if any. Self-loops do not count.
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        let adj = self.adjacency();
        alg::find_cycle(&adj).map(|cycle| {
            cycle
                .into_iter()
                .map(|idx| self.nodes[idx].name.clone())
                .collect()
        })
    }
}
