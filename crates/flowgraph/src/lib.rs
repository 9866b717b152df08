#![forbid(unsafe_code)]

//! Headless layout engine for flow graphs (nodes with named input/output slots).
//!
//! Two stages:
//! - [`layout`] ranks nodes on the X axis from connectivity, once.
//! - [`Simulation`] keeps node boxes from overlapping with a [`BBoxCollide`] force, ticking on a
//!   cooperative timer until its temperature (alpha) cools down.
//!
//! Drawing, pointer handling and vertical placement are left to the caller.

pub mod config;
pub mod error;
pub mod force;
pub mod graph;
pub mod layout;
pub mod metrics;
pub mod simulation;

pub use config::{FlowConfig, SimulationOptions};
pub use error::{Error, Result};
pub use force::{BBox, BBoxCollide, Force, collision_force};
pub use graph::{Connection, Graph, Node, Point, SlotKind};
pub use layout::{LayoutResult, layout, seed_positions};
pub use metrics::{EdgeCurve, NodeMetrics};
pub use simulation::Simulation;

/// Lays out `graph`, seeds node positions from the ranks, and hands the nodes to a
/// collision-resolving simulation that is already cooling.
pub fn simulate(graph: Graph, config: &FlowConfig) -> Result<Simulation> {
    config.validate()?;
    let ranks = layout(&graph)?;
    let mut nodes = graph.nodes;
    seed_positions(&mut nodes, &ranks, config.metrics.rank_offset());
    Simulation::with_metrics(nodes, &config.metrics, &config.simulation)
}
