//! Node box geometry shared by the collision force and renderers.

use crate::error::{Error, Result};
use crate::force::BBox;
use crate::graph::{Connection, Graph, Node, Point, SlotKind};
use serde::{Deserialize, Serialize};

/// Visual dimensions of a node card: a title bar, a dashed separator, then one row per slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NodeMetrics {
    pub node_width: f64,
    /// Clearance kept around every box by the collision force.
    pub node_padding: f64,
    pub slot_height: f64,
    pub slot_radius: f64,
    pub title_height: f64,
    pub separator_height: f64,
    /// Horizontal reach of the Bézier control points at each edge endpoint.
    pub edge_strength: f64,
    /// Distance between layout ranks, as a multiple of `node_width`.
    pub rank_spacing: f64,
}

impl Default for NodeMetrics {
    fn default() -> Self {
        Self {
            node_width: 170.0,
            node_padding: 10.0,
            slot_height: 40.0,
            slot_radius: 10.0,
            title_height: 40.0,
            separator_height: 10.0,
            edge_strength: 60.0,
            rank_spacing: 1.6,
        }
    }
}

/// A cubic Bézier from an output slot to an input slot, in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EdgeCurve {
    pub from: Point,
    pub ctrl1: Point,
    pub ctrl2: Point,
    pub to: Point,
}

impl NodeMetrics {
    pub fn validate(&self) -> Result<()> {
        let strictly_positive = [
            ("nodeWidth", self.node_width),
            ("slotHeight", self.slot_height),
            ("titleHeight", self.title_height),
            ("rankSpacing", self.rank_spacing),
        ];
        for (key, v) in strictly_positive {
            if !(v.is_finite() && v > 0.0) {
                return Err(Error::InvalidConfig {
                    key,
                    message: format!("expected a positive number, got {v}"),
                });
            }
        }
        let non_negative = [
            ("nodePadding", self.node_padding),
            ("slotRadius", self.slot_radius),
            ("separatorHeight", self.separator_height),
            ("edgeStrength", self.edge_strength),
        ];
        for (key, v) in non_negative {
            if !(v.is_finite() && v >= 0.0) {
                return Err(Error::InvalidConfig {
                    key,
                    message: format!("expected a non-negative number, got {v}"),
                });
            }
        }
        Ok(())
    }

    /// Card height: title, separator, and as many rows as the longer slot list.
    pub fn height(&self, node: &Node) -> f64 {
        self.title_height + self.separator_height + self.slot_height * node.slot_rows() as f64
    }

    /// Collision footprint relative to the node position: the card grown by the padding plus the
    /// slot circles that stick out on each side.
    pub fn bbox(&self, node: &Node) -> BBox {
        let pad = self.node_padding;
        let r = self.slot_radius;
        BBox::new(
            -pad - 2.0 * r,
            -pad - r,
            pad + self.node_width + 2.0 * r,
            pad + r + self.height(node),
        )
    }

    /// Box function for [`BBoxCollide`](crate::BBoxCollide).
    pub fn box_fn(self) -> impl Fn(&Node, usize, &[Node]) -> BBox + 'static {
        move |node: &Node, _: usize, _: &[Node]| self.bbox(node)
    }

    /// World distance between two adjacent layout ranks.
    pub fn rank_offset(&self) -> f64 {
        self.rank_spacing * self.node_width
    }

    /// Centre of a slot circle, relative to the node position.
    ///
    /// Inputs sit on the left edge, outputs on the right edge.
    pub fn slot_anchor(&self, slot_index: usize, kind: SlotKind) -> Point {
        let x = match kind {
            SlotKind::Input => 0.0,
            SlotKind::Output => self.node_width,
        };
        let y = self.title_height
            + self.separator_height
            + self.slot_height * slot_index as f64
            + self.slot_height / 2.0;
        Point::new(x, y)
    }

    /// Curve for one connection using the current node positions; `None` if an endpoint
    /// node or slot does not exist.
    pub fn edge_curve(&self, graph: &Graph, connection: &Connection) -> Option<EdgeCurve> {
        let src = graph.node(&connection.out_node)?;
        let dst = graph.node(&connection.in_node)?;
        let src_slot = src.slot_index(SlotKind::Output, &connection.out_slot)?;
        let dst_slot = dst.slot_index(SlotKind::Input, &connection.in_slot)?;

        let from = src.position() + self.slot_anchor(src_slot, SlotKind::Output);
        let to = dst.position() + self.slot_anchor(dst_slot, SlotKind::Input);
        let reach = Point::new(self.edge_strength, 0.0);
        Some(EdgeCurve {
            from,
            ctrl1: from + reach,
            ctrl2: to - reach,
            to,
        })
    }
}
