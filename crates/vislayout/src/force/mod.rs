mod forces;
mod graph;
mod simulation;
mod snapshot;

use crate::{Canvas, InvalidCanvas, LayoutEngine};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use graph::{GraphData, LinkSpec, NodeSpec};
pub use simulation::{Body, Simulation, Spring};
pub use snapshot::{LinkSegment, NodePosition, Snapshot};

/// Errors that can occur while setting up or driving a force simulation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ForceLayoutError {
    #[error(transparent)]
    InvalidCanvas(#[from] InvalidCanvas),

    /// Two nodes share the same name
    #[error("duplicate node name {0:?}")]
    DuplicateNode(String),

    /// A link references a name that is not in the node set
    #[error("link #{link} references unknown node {name:?}")]
    UnknownEndpoint { link: usize, name: String },

    /// A pin or drag request names a node that is not in the simulation
    #[error("unknown node {0:?}")]
    UnknownNode(String),
}

/// Parameters of the force simulation
///
/// Defaults reproduce the classic d3-force setup: link, many-body, center,
/// vertical and collision forces with the usual cooling schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceConfig {
    /// Numerator of the link target distance, `link_distance / link.value`
    pub link_distance: f64,

    /// Target distance for links whose value is not positive
    pub fallback_link_distance: f64,

    /// Many-body strength, negative values repel
    pub charge: f64,

    /// Distances below this are clamped when computing many-body forces
    pub distance_min: f64,

    /// Strength of the centroid correction towards the canvas center
    pub center_strength: f64,

    /// Strength of the pull towards the horizontal midline
    pub vertical_strength: f64,

    /// Extra gap kept between the circles of two nodes
    pub collision_padding: f64,

    pub collision_strength: f64,

    /// Output range of the node radius scale
    pub radius_range: (f64, f64),

    /// Output range of the link width scale
    pub width_range: (f64, f64),

    pub alpha_min: f64,
    pub alpha_decay: f64,

    /// Alpha target applied while a node is being dragged
    pub drag_alpha_target: f64,

    /// Fraction of velocity lost at every tick
    pub velocity_decay: f64,

    /// Maximum number of ticks a single [`Simulation::run`] performs
    pub max_ticks: usize,

    /// Kinetic energy below which a cooled simulation counts as settled
    pub energy_threshold: f64,
}

impl Default for ForceConfig {
    fn default() -> Self {
        let alpha_min: f64 = 0.001;
        Self {
            link_distance: 20.0,
            fallback_link_distance: 30.0,
            charge: -30.0,
            distance_min: 1.0,
            center_strength: 1.0,
            vertical_strength: 0.02,
            collision_padding: 20.0,
            collision_strength: 1.0,
            radius_range: (10.0, 50.0),
            width_range: (2.0, 6.0),
            alpha_min,
            alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
            drag_alpha_target: 0.3,
            velocity_decay: 0.4,
            max_ticks: 3000,
            energy_threshold: 1e-6,
        }
    }
}

/// One-shot force layout: builds a fresh simulation and runs it to rest
#[derive(Debug, Clone, Default)]
pub struct ForceLayout {
    pub config: ForceConfig,
}

impl ForceLayout {
    pub fn new(config: ForceConfig) -> Self {
        Self { config }
    }
}

impl<'a> LayoutEngine<&'a GraphData> for ForceLayout {
    type Output = Snapshot;
    type Error = ForceLayoutError;

    fn layout(&self, graph: &'a GraphData, canvas: Canvas) -> Result<Snapshot, ForceLayoutError> {
        let mut simulation = Simulation::new(graph, canvas, self.config.clone())?;
        simulation.run();
        Ok(simulation.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn partial_config_keeps_defaults() {
        let config: ForceConfig = ron::from_str("(max_ticks: 500, charge: -60.0)").unwrap();
        assert_eq!(config.max_ticks, 500);
        assert_eq!(config.charge, -60.0);
        assert_eq!(config.radius_range, (10.0, 50.0));
        assert_eq!(config.vertical_strength, 0.02);
    }

    #[test]
    fn alpha_decay_cools_in_three_hundred_ticks() {
        let config = ForceConfig::default();
        let alpha = (0..300).fold(1.0_f64, |a, _| a + (0.0 - a) * config.alpha_decay);
        assert!((alpha - config.alpha_min).abs() < 1e-9);
    }

    #[test]
    fn unknown_node_message_names_the_link() {
        let err = ForceLayoutError::UnknownEndpoint {
            link: 3,
            name: "X".into(),
        };
        assert_eq!(err.to_string(), "link #3 references unknown node \"X\"");
    }
}
