use crate::Point;
use serde::{Deserialize, Serialize};

/// Position of one node in a [`Snapshot`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodePosition {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub pinned: bool,
}

/// Endpoints of one link in a [`Snapshot`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkSegment {
    pub source: String,
    pub target: String,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    /// Stroke width from the link width scale
    pub width: f64,
}

/// Copy of the simulation state handed to renderers
///
/// Nodes and links keep the order of the input data. `generation` identifies
/// the data set the snapshot belongs to, snapshots from an older generation
/// are stale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub generation: u64,
    pub tick: usize,
    pub alpha: f64,
    pub nodes: Vec<NodePosition>,
    pub links: Vec<LinkSegment>,
}

impl Snapshot {
    pub fn node(&self, name: &str) -> Option<&NodePosition> {
        self.nodes.iter().find(|n| n.name == name)
    }

    pub fn position(&self, name: &str) -> Option<Point> {
        self.node(name).map(NodePosition::position)
    }
}

impl NodePosition {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}
