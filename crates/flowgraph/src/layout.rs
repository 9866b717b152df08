//! Topological (rank) placement on the X axis.
//!
//! A node's rank is the length of the longest chain of connections leading to it from a root,
//! then a backward pass pulls leaf ancestors toward their leaves, and the whole range is
//! centered on zero. Vertical placement is not computed: `y` is left `NaN` for the caller.

use crate::error::{Error, Result};
use crate::graph::{Graph, Node, Point, alg};
use indexmap::IndexMap;
use serde::Serialize;

/// Layout positions keyed by node name, in input node order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LayoutResult {
    positions: IndexMap<String, Point>,
}

impl LayoutResult {
    pub fn get(&self, name: &str) -> Option<Point> {
        self.positions.get(name).copied()
    }

    pub fn x(&self, name: &str) -> Option<f64> {
        self.get(name).map(|p| p.x)
    }

    /// `false` for unknown names and for nodes the passes never reached (`x` is `NaN`).
    pub fn is_placed(&self, name: &str) -> bool {
        self.x(name).is_some_and(|x| !x.is_nan())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Point)> + '_ {
        self.positions.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Computes the centered horizontal rank of every node.
///
/// The graph must be acyclic (self-loops are allowed and ignored); a cycle is reported as
/// [`Error::Cycle`]. Nodes that are neither reachable from a root nor ancestors of a leaf keep
/// `x = NaN`.
pub fn layout(graph: &Graph) -> Result<LayoutResult> {
    graph.validate()?;

    let adj = graph.adjacency();
    let Some(order) = alg::topological_order(&adj) else {
        let nodes = graph.find_cycle().unwrap_or_default();
        return Err(Error::Cycle { nodes });
    };

    let n = graph.nodes.len();
    let mut xs: Vec<f64> = vec![f64::NAN; n];

    // Forward: longest distance from any root.
    for v in 0..n {
        if adj.is_root(v) {
            xs[v] = 0.0;
        }
    }
    for &v in &order {
        if xs[v].is_nan() {
            continue;
        }
        let next = xs[v] + 1.0;
        for &w in adj.successors(v) {
            if w != v && (xs[w].is_nan() || xs[w] < next) {
                xs[w] = next;
            }
        }
    }

    // Backward: only leaves and their ancestors pull predecessors to the left.
    let mut reaches_leaf: Vec<bool> = vec![false; n];
    for &v in order.iter().rev() {
        reaches_leaf[v] =
            adj.is_leaf(v) || adj.successors(v).iter().any(|&w| w != v && reaches_leaf[w]);
        if !reaches_leaf[v] || xs[v].is_nan() {
            continue;
        }
        let prev = xs[v] - 1.0;
        for &p in adj.predecessors(v) {
            if p != v && (xs[p].is_nan() || xs[p] > prev) {
                xs[p] = prev;
            }
        }
    }

    let (min, max) = xs
        .iter()
        .filter(|x| !x.is_nan())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
            (lo.min(x), hi.max(x))
        });
    let placed = xs.iter().filter(|x| !x.is_nan()).count();
    if placed > 0 {
        // Midpoint, not half the span: nodes placed only by the backward pass can sit below 0.
        let shift = (max + min) / 2.0;
        for x in xs.iter_mut() {
            *x -= shift;
        }
    }

    tracing::debug!(
        nodes = n,
        placed,
        unplaced = n - placed,
        columns = if placed > 0 { max - min + 1.0 } else { 0.0 },
        "flow layout computed"
    );

    let positions = graph
        .nodes
        .iter()
        .zip(xs)
        .map(|(node, x)| (node.name.clone(), Point::new(x, f64::NAN)))
        .collect();
    Ok(LayoutResult { positions })
}

/// Seeds node positions from a layout: `x = spacing * rank`, `y = 0`.
///
/// Unplaced nodes (and names missing from `layout`) start at `x = 0`.
pub fn seed_positions(nodes: &mut [Node], layout: &LayoutResult, spacing: f64) {
    for node in nodes.iter_mut() {
        let rank = layout.x(&node.name).filter(|x| !x.is_nan()).unwrap_or(0.0);
        node.x = spacing * rank;
        node.y = 0.0;
    }
}
