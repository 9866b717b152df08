use crate::graph::SlotKind;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("duplicate node name: {name}")]
    DuplicateNode { name: String },

    #[error("connection {index} references a missing node: {node}")]
    MissingEndpoint { index: usize, node: String },

    #[error("connection {index} references unknown {kind} slot `{slot}` on node `{node}`")]
    UnknownSlot {
        index: usize,
        node: String,
        slot: String,
        kind: SlotKind,
    },

    #[error("graph contains a cycle through: {}", nodes.join(" -> "))]
    Cycle { nodes: Vec<String> },

    #[error("node `{node}` has a degenerate bounding box ({width} x {height})")]
    DegenerateBox {
        node: String,
        width: f64,
        height: f64,
    },

    #[error("invalid config value for `{key}`: {message}")]
    InvalidConfig { key: &'static str, message: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
