//! Forces applied by the [`Simulation`](crate::Simulation) on every tick.

mod collide;

pub use collide::{BBoxCollide, BoxFn, collision_force};

use crate::error::Result;
use crate::graph::{Node, Point};
use serde::{Deserialize, Serialize};

/// A velocity-contributing force, in the d3-force sense.
///
/// `initialize` is called whenever node membership or node geometry changes; `apply` is called
/// once per tick and adds impulses into `vx`/`vy`. `alpha` is the current simulation
/// temperature; forces are free to ignore it.
pub trait Force {
    fn initialize(&mut self, nodes: &[Node]) -> Result<()>;

    fn apply(&mut self, nodes: &mut [Node], alpha: f64);
}

impl<F: Force + ?Sized> Force for Box<F> {
    fn initialize(&mut self, nodes: &[Node]) -> Result<()> {
        (**self).initialize(nodes)
    }

    fn apply(&mut self, nodes: &mut [Node], alpha: f64) {
        (**self).apply(nodes, alpha)
    }
}

/// Axis-aligned box given by its `min` (top-left) and `max` (bottom-right) corners.
///
/// Box functions return it relative to the node position; [`BBox::translate`] moves it into
/// world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BBox {
    pub min: Point,
    pub max: Point,
}

impl BBox {
    pub const fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min: Point::new(min_x, min_y),
            max: Point::new(max_x, max_y),
        }
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn translate(&self, by: Point) -> BBox {
        BBox {
            min: self.min + by,
            max: self.max + by,
        }
    }

    pub fn intersects(&self, other: &BBox) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    /// Both extents strictly positive and finite.
    pub fn is_proper(&self) -> bool {
        let (w, h) = (self.width(), self.height());
        w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0
    }
}
