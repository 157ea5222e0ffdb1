use super::forces::{self, Lcg};
use super::snapshot::{LinkSegment, NodePosition, Snapshot};
use super::{ForceConfig, ForceLayoutError, GraphData};
use crate::{Canvas, LinearScale, Point};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{BTreeMap, HashMap};
use std::f64::consts::PI;
use tracing::{debug, trace, warn};

pub(crate) type BodyGraph = DiGraph<Body, Spring>;

const INITIAL_RADIUS: f64 = 10.0;

/// Live state of a node during the simulation
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub name: String,
    pub value: f64,
    /// Output of the radius scale for `value`
    pub radius: f64,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    /// Fixed position, set while the node is pinned
    pub pin: Option<Point>,
}

impl Body {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn is_pinned(&self) -> bool {
        self.pin.is_some()
    }

    fn integrate(&mut self, decay: f64) {
        match self.pin {
            Some(pin) => {
                self.x = pin.x;
                self.y = pin.y;
                self.vx = 0.0;
                self.vy = 0.0;
            }
            None => {
                self.vx *= decay;
                self.vy *= decay;
                self.x += self.vx;
                self.y += self.vy;
            }
        }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.vx.is_finite() && self.vy.is_finite()
    }
}

/// A link resolved to simulation nodes
#[derive(Debug, Clone, PartialEq)]
pub struct Spring {
    pub value: f64,
    /// Target separation of the endpoints
    pub distance: f64,
    pub strength: f64,
    /// Share of the correction applied to the target
    pub bias: f64,
    /// Output of the link width scale for `value`
    pub width: f64,
}

/// A damped force simulation over one generation of graph data
///
/// Ticks are explicit: drive the simulation with [`Simulation::tick`] for
/// progressive rendering, or with [`Simulation::run`] to reach a resting
/// configuration in one call. All state lives in the struct, so several
/// simulations can coexist and dropping one releases everything.
#[derive(Debug, Clone)]
pub struct Simulation {
    graph: BodyGraph,
    index: HashMap<String, NodeIndex>,
    canvas: Canvas,
    config: ForceConfig,
    radius: LinearScale,
    width: LinearScale,
    alpha: f64,
    alpha_target: f64,
    ticks: usize,
    generation: u64,
    stopped: bool,
    random: Lcg,
}

impl Simulation {
    /// Validate the input and place the nodes at their initial positions
    ///
    /// # Errors
    /// Returns an error if the canvas is degenerate, two nodes share a name,
    /// or a link references an unknown node. No simulation is built then.
    pub fn new(
        data: &GraphData,
        canvas: Canvas,
        config: ForceConfig,
    ) -> Result<Self, ForceLayoutError> {
        Self::build(data, canvas, config, 0)
    }

    fn build(
        data: &GraphData,
        canvas: Canvas,
        config: ForceConfig,
        generation: u64,
    ) -> Result<Self, ForceLayoutError> {
        canvas.validate()?;

        let radius =
            LinearScale::from_values(data.nodes.iter().map(|n| n.value), config.radius_range);
        let width =
            LinearScale::from_values(data.links.iter().map(|l| l.value), config.width_range);

        let mut graph = BodyGraph::with_capacity(data.nodes.len(), data.links.len());
        let mut index = HashMap::with_capacity(data.nodes.len());

        // Phyllotaxis arrangement around the origin, centering moves it later
        let initial_angle = PI * (3.0 - 5.0_f64.sqrt());
        for (i, node) in data.nodes.iter().enumerate() {
            if index.contains_key(&node.name) {
                return Err(ForceLayoutError::DuplicateNode(node.name.clone()));
            }
            let r = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
            let angle = i as f64 * initial_angle;
            let idx = graph.add_node(Body {
                name: node.name.clone(),
                value: node.value,
                radius: radius.apply(node.value),
                x: r * angle.cos(),
                y: r * angle.sin(),
                vx: 0.0,
                vy: 0.0,
                pin: None,
            });
            index.insert(node.name.clone(), idx);
        }

        let resolve = |link: usize, name: &str| {
            index
                .get(name)
                .copied()
                .ok_or_else(|| ForceLayoutError::UnknownEndpoint {
                    link,
                    name: name.to_string(),
                })
        };
        let endpoints = data
            .links
            .iter()
            .enumerate()
            .map(|(i, link)| Ok((resolve(i, &link.source)?, resolve(i, &link.target)?)))
            .collect::<Result<Vec<_>, ForceLayoutError>>()?;

        // Self links count twice, which keeps their bias at one half
        let mut degree = vec![0usize; graph.node_count()];
        for &(source, target) in &endpoints {
            degree[source.index()] += 1;
            degree[target.index()] += 1;
        }

        for (link, &(source, target)) in data.links.iter().zip(&endpoints) {
            let (ds, dt) = (degree[source.index()] as f64, degree[target.index()] as f64);
            let distance = if link.value > 0.0 && link.value.is_finite() {
                config.link_distance / link.value
            } else {
                config.fallback_link_distance
            };
            graph.add_edge(
                source,
                target,
                Spring {
                    value: link.value,
                    distance,
                    strength: 1.0 / ds.min(dt),
                    bias: ds / (ds + dt),
                    width: width.apply(link.value),
                },
            );
        }

        debug!(
            generation,
            nodes = graph.node_count(),
            links = graph.edge_count(),
            "force simulation ready"
        );

        Ok(Self {
            graph,
            index,
            canvas,
            config,
            radius,
            width,
            alpha: 1.0,
            alpha_target: 0.0,
            ticks: 0,
            generation,
            stopped: false,
            random: Lcg::new(),
        })
    }

    /// Discard every node and start over with new data or a new canvas
    ///
    /// On error the current simulation is left untouched.
    pub fn restart(&mut self, data: &GraphData, canvas: Canvas) -> Result<(), ForceLayoutError> {
        *self = Self::build(data, canvas, self.config.clone(), self.generation + 1)?;
        Ok(())
    }

    /// Advance the simulation by one step
    ///
    /// Does nothing once the simulation has been stopped.
    pub fn tick(&mut self) -> &mut Self {
        if self.stopped {
            return self;
        }
        self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;
        let alpha = self.alpha;
        let before: Vec<Point> = self.graph.node_weights().map(Body::position).collect();

        let config = &self.config;
        let center = self.canvas.center();
        forces::apply_links(&mut self.graph, alpha, &mut self.random);
        forces::apply_many_body(
            &mut self.graph,
            config.charge,
            config.distance_min,
            alpha,
            &mut self.random,
        );
        forces::apply_center(&mut self.graph, center, config.center_strength);
        forces::apply_vertical(&mut self.graph, center.y, config.vertical_strength, alpha);
        forces::apply_collision(
            &mut self.graph,
            config.collision_padding,
            config.collision_strength,
            &mut self.random,
        );

        let decay = 1.0 - config.velocity_decay;
        for (body, previous) in self.graph.node_weights_mut().zip(before) {
            body.integrate(decay);
            if !body.is_finite() {
                let reset = if previous.is_finite() { previous } else { center };
                warn!(
                    node = %body.name,
                    x = reset.x,
                    y = reset.y,
                    "non-finite position, resetting node"
                );
                body.x = reset.x;
                body.y = reset.y;
                body.vx = 0.0;
                body.vy = 0.0;
            }
        }

        self.ticks += 1;
        trace!(tick = self.ticks, alpha, "tick");
        self
    }

    /// Tick until the simulation settles, at most `max_ticks` times
    ///
    /// Returns the number of ticks performed.
    pub fn run(&mut self) -> usize {
        self.run_with(None)
    }

    /// Like [`Simulation::run`], handing a snapshot to `observer` after every tick
    pub fn run_observed<F>(&mut self, mut observer: F) -> usize
    where
        F: FnMut(&Snapshot),
    {
        let observer: &mut dyn FnMut(&Snapshot) = &mut observer;
        self.run_with(Some(observer))
    }

    fn run_with(&mut self, mut observer: Option<&mut dyn FnMut(&Snapshot)>) -> usize {
        if self.graph.node_count() == 0 {
            return 0;
        }
        let mut performed = 0;
        while !self.stopped && performed < self.config.max_ticks {
            self.tick();
            performed += 1;
            if let Some(observer) = observer.as_mut() {
                observer(&self.snapshot());
            }
            if self.is_settled() {
                break;
            }
        }
        debug!(
            generation = self.generation,
            ticks = performed,
            alpha = self.alpha,
            energy = self.kinetic_energy(),
            "force simulation finished"
        );
        performed
    }

    /// Stop ticking, further calls to [`Simulation::tick`] are ignored
    ///
    /// Lasts until [`Simulation::resume`], [`Simulation::restart`] or
    /// [`Simulation::drag_start`].
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    /// Undo [`Simulation::stop`]
    pub fn resume(&mut self) {
        self.stopped = false;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Whether the simulation has cooled down and the nodes stopped moving
    pub fn is_settled(&self) -> bool {
        self.alpha < self.config.alpha_min && self.kinetic_energy() < self.config.energy_threshold
    }

    /// Sum of squared velocities of the free nodes
    pub fn kinetic_energy(&self) -> f64 {
        self.graph
            .node_weights()
            .filter(|b| !b.is_pinned())
            .map(|b| b.vx * b.vx + b.vy * b.vy)
            .sum()
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn set_alpha(&mut self, alpha: f64) {
        self.alpha = alpha;
    }

    pub fn alpha_target(&self) -> f64 {
        self.alpha_target
    }

    pub fn set_alpha_target(&mut self, target: f64) {
        self.alpha_target = target;
    }

    pub fn ticks(&self) -> usize {
        self.ticks
    }

    /// Incremented by every [`Simulation::restart`]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn config(&self) -> &ForceConfig {
        &self.config
    }

    /// Radius of a node with the given value under the current data
    pub fn node_radius(&self, value: f64) -> f64 {
        self.radius.apply(value)
    }

    /// Stroke width of a link with the given value under the current data
    pub fn link_width(&self, value: f64) -> f64 {
        self.width.apply(value)
    }

    pub fn bodies(&self) -> impl Iterator<Item = &Body> {
        self.graph.node_weights()
    }

    pub fn body(&self, name: &str) -> Option<&Body> {
        self.index.get(name).map(|&idx| &self.graph[idx])
    }

    fn body_mut(&mut self, name: &str) -> Result<&mut Body, ForceLayoutError> {
        let idx = *self
            .index
            .get(name)
            .ok_or_else(|| ForceLayoutError::UnknownNode(name.to_string()))?;
        Ok(&mut self.graph[idx])
    }

    /// Fix a node at the given position, it keeps zero velocity until unpinned
    pub fn pin(&mut self, name: &str, x: f64, y: f64) -> Result<(), ForceLayoutError> {
        let body = self.body_mut(name)?;
        body.pin = Some(Point::new(x, y));
        body.x = x;
        body.y = y;
        body.vx = 0.0;
        body.vy = 0.0;
        Ok(())
    }

    /// Hand a node back to the physics
    pub fn unpin(&mut self, name: &str) -> Result<(), ForceLayoutError> {
        self.body_mut(name)?.pin = None;
        Ok(())
    }

    /// Pin a node where it is and reheat the simulation
    pub fn drag_start(&mut self, name: &str) -> Result<(), ForceLayoutError> {
        let position = self
            .body(name)
            .map(Body::position)
            .ok_or_else(|| ForceLayoutError::UnknownNode(name.to_string()))?;
        self.pin(name, position.x, position.y)?;
        self.alpha_target = self.config.drag_alpha_target;
        self.resume();
        Ok(())
    }

    pub fn drag_move(&mut self, name: &str, x: f64, y: f64) -> Result<(), ForceLayoutError> {
        self.pin(name, x, y)
    }

    /// Release a dragged node and let the simulation cool down again
    pub fn drag_end(&mut self, name: &str) -> Result<(), ForceLayoutError> {
        self.unpin(name)?;
        self.alpha_target = 0.0;
        Ok(())
    }

    /// Name of the topmost node whose circle contains the point
    pub fn node_at(&self, x: f64, y: f64) -> Option<&str> {
        let point = Point::new(x, y);
        self.graph
            .node_weights()
            .filter(|b| b.position().distance(point) <= b.radius)
            .last()
            .map(|b| b.name.as_str())
    }

    /// Current positions keyed by node name
    pub fn positions(&self) -> BTreeMap<String, Point> {
        self.graph
            .node_weights()
            .map(|b| (b.name.clone(), b.position()))
            .collect()
    }

    /// Everything a renderer needs to draw the current state
    pub fn snapshot(&self) -> Snapshot {
        let nodes = self
            .graph
            .node_weights()
            .map(|b| NodePosition {
                name: b.name.clone(),
                x: b.x,
                y: b.y,
                radius: b.radius,
                pinned: b.is_pinned(),
            })
            .collect();
        let links = self
            .graph
            .edge_indices()
            .filter_map(|e| {
                let (s, t) = self.graph.edge_endpoints(e)?;
                let (s, t) = (&self.graph[s], &self.graph[t]);
                Some(LinkSegment {
                    source: s.name.clone(),
                    target: t.name.clone(),
                    x1: s.x,
                    y1: s.y,
                    x2: t.x,
                    y2: t.y,
                    width: self.graph[e].width,
                })
            })
            .collect();
        Snapshot {
            generation: self.generation,
            tick: self.ticks,
            alpha: self.alpha,
            nodes,
            links,
        }
    }
}
