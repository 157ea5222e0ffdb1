//! Layout engines for data visualisation
//!
//! This crate computes geometry only, drawing is left to the caller.
//!
//! # Layout Engines
//!
//! - [`force::ForceLayout`] / [`force::Simulation`]: damped force-directed
//!   placement of a weighted node-link graph, with pinning and dragging
//! - [`treemap::TreemapLayout`]: squarified treemap of a weighted tree with
//!   outer, top and inner padding
//!
//! # Example
//!
//! ```
//! use vislayout::force::{ForceConfig, GraphData, LinkSpec, NodeSpec, Simulation};
//! use vislayout::treemap::{TreeNode, TreemapLayout};
//! use vislayout::{Canvas, LayoutEngine};
//!
//! let canvas = Canvas::new(800.0, 600.0).unwrap();
//!
//! // Force layout, driven tick by tick or run to rest
//! let graph = GraphData::new(
//!     vec![NodeSpec::new("A", 10.0), NodeSpec::new("B", 1.0)],
//!     vec![LinkSpec::new("A", "B", 2.0)],
//! );
//! let mut simulation = Simulation::new(&graph, canvas, ForceConfig::default()).unwrap();
//! simulation.tick();
//! simulation.run();
//! let snapshot = simulation.snapshot();
//! assert_eq!(snapshot.nodes.len(), 2);
//!
//! // Treemap, every node gets a rectangle nested in its parent's
//! let tree = TreeNode::group(
//!     "root",
//!     vec![TreeNode::leaf("a", 3.0), TreeNode::leaf("b", 1.0)],
//! );
//! let treemap = TreemapLayout::default().layout(&tree, canvas).unwrap();
//! assert_eq!(treemap.len(), 3);
//! ```

mod engine;
mod geometry;
mod scale;

pub mod force;
pub mod treemap;

// Re-export core types and traits
pub use engine::LayoutEngine;
pub use geometry::{Canvas, InvalidCanvas, Point, Rect};
pub use scale::LinearScale;
