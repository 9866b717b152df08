use super::{BBox, Force};
use crate::error::{Error, Result};
use crate::graph::{Node, Point};

/// Computes a node's local bounding box from the node, its index, and the full node list.
pub type BoxFn = dyn Fn(&Node, usize, &[Node]) -> BBox;

/// Pairwise bounding-box collision: pushes overlapping node boxes apart along the axis of
/// least penetration.
///
/// Boxes are computed once in [`Force::initialize`]; call it again whenever slot counts or node
/// membership change. The pass is O(n²) over node pairs.
pub struct BBoxCollide {
    bbox: Box<BoxFn>,
    boxes: Vec<BBox>,
    strength: f64,
}

impl std::fmt::Debug for BBoxCollide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BBoxCollide")
            .field("boxes", &self.boxes)
            .field("strength", &self.strength)
            .finish_non_exhaustive()
    }
}

impl BBoxCollide {
    pub const DEFAULT_STRENGTH: f64 = 10.0;

    pub fn new(bbox: impl Fn(&Node, usize, &[Node]) -> BBox + 'static) -> Self {
        Self {
            bbox: Box::new(bbox),
            boxes: Vec::new(),
            strength: Self::DEFAULT_STRENGTH,
        }
    }

    pub fn with_strength(mut self, strength: f64) -> Self {
        self.strength = strength;
        self
    }

    pub fn strength(&self) -> f64 {
        self.strength
    }

    /// Cached local boxes, one per node, from the last successful `initialize`.
    pub fn boxes(&self) -> &[BBox] {
        &self.boxes
    }
}

impl Force for BBoxCollide {
    fn initialize(&mut self, nodes: &[Node]) -> Result<()> {
        let mut boxes = Vec::with_capacity(nodes.len());
        for (idx, node) in nodes.iter().enumerate() {
            let b = (self.bbox)(node, idx, nodes);
            if !b.is_proper() {
                return Err(Error::DegenerateBox {
                    node: node.name.clone(),
                    width: b.width(),
                    height: b.height(),
                });
            }
            boxes.push(b);
        }
        tracing::debug!(nodes = boxes.len(), "collision boxes initialized");
        self.boxes = boxes;
        Ok(())
    }

    fn apply(&mut self, nodes: &mut [Node], _alpha: f64) {
        debug_assert_eq!(
            nodes.len(),
            self.boxes.len(),
            "collision force applied to a node list it was not initialized with"
        );
        let n = nodes.len().min(self.boxes.len());
        for i in 0..n {
            for j in (i + 1)..n {
                let a = self.boxes[i].translate(nodes[i].position());
                let b = self.boxes[j].translate(nodes[j].position());
                let (fa, fb) = collision_force(&a, &b);

                let (left, right) = nodes.split_at_mut(j);
                let (na, nb) = (&mut left[i], &mut right[0]);
                na.vx += self.strength * fa.x;
                na.vy += self.strength * fa.y;
                nb.vx += self.strength * fb.x;
                nb.vy += self.strength * fb.y;
            }
        }
    }
}

/// Impulses for two world-space boxes, `(on a, on b)`.
///
/// Zero unless the boxes overlap on both axes. Otherwise the pair is pushed apart along the
/// axis with the smaller penetration (X on ties), each side scaled by the inverse of its own
/// extent on that axis.
pub fn collision_force(a: &BBox, b: &BBox) -> (Point, Point) {
    let left = b.max.x - a.min.x;
    let right = a.max.x - b.min.x;
    let top = b.max.y - a.min.y;
    let bottom = a.max.y - b.min.y;

    let intersect_x = left > 0.0 && right > 0.0;
    let intersect_y = top > 0.0 && bottom > 0.0;
    if !(intersect_x && intersect_y) {
        return (Point::ZERO, Point::ZERO);
    }

    let dx = if left > right { right } else { -left };
    let dy = if top > bottom { bottom } else { -top };
    if dx.abs() <= dy.abs() {
        (
            Point::new(-dx / a.width(), 0.0),
            Point::new(dx / b.width(), 0.0),
        )
    } else {
        (
            Point::new(0.0, -dy / a.height()),
            Point::new(0.0, dy / b.height()),
        )
    }
}
