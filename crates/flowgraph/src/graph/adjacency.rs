//! Index-based adjacency for [`Graph`](super::Graph).
//!
//! Layout queries successors/predecessors of every node repeatedly; scanning all connections for
//! each query is O(E), so neighbors are flattened once into offset tables.

use super::Graph;
use rustc_hash::FxHashSet;

/// Distinct successors/predecessors per node, in connection-list order.
///
/// Connections naming unknown nodes are skipped. Self-loops are kept so that root/leaf
/// classification sees them; propagation code skips them explicitly.
#[derive(Debug, Clone)]
pub struct Adjacency {
    out_offsets: Vec<usize>,
    out_nodes: Vec<usize>,
    in_offsets: Vec<usize>,
    in_nodes: Vec<usize>,
}

impl Adjacency {
    pub fn build(g: &Graph) -> Self {
        let n = g.nodes.len();
        let index = g.name_index();

        let mut succ: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut pred: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut seen: FxHashSet<(usize, usize)> = FxHashSet::default();
        for c in &g.connections {
            let (Some(&v), Some(&w)) = (
                index.get(c.out_node.as_str()),
                index.get(c.in_node.as_str()),
            ) else {
                continue;
            };
            if seen.insert((v, w)) {
                succ[v].push(w);
                pred[w].push(v);
            }
        }

        let (out_offsets, out_nodes) = flatten(succ);
        let (in_offsets, in_nodes) = flatten(pred);
        Self {
            out_offsets,
            out_nodes,
            in_offsets,
            in_nodes,
        }
    }

    pub fn len(&self) -> usize {
        self.out_offsets.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn successors(&self, v: usize) -> &[usize] {
        let start = self.out_offsets[v];
        let end = self.out_offsets[v + 1];
        &self.out_nodes[start..end]
    }

    pub fn predecessors(&self, v: usize) -> &[usize] {
        let start = self.in_offsets[v];
        let end = self.in_offsets[v + 1];
        &self.in_nodes[start..end]
    }

    pub fn is_root(&self, v: usize) -> bool {
        self.predecessors(v).is_empty()
    }

    pub fn is_leaf(&self, v: usize) -> bool {
        self.successors(v).is_empty()
    }
}

fn flatten(lists: Vec<Vec<usize>>) -> (Vec<usize>, Vec<usize>) {
    let mut offsets = Vec::with_capacity(lists.len() + 1);
    let mut flat = Vec::with_capacity(lists.iter().map(Vec::len).sum());
    offsets.push(0);
    for list in lists {
        flat.extend(list);
        offsets.push(flat.len());
    }
    (offsets, flat)
}
