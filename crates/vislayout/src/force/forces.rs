use super::simulation::BodyGraph;
use crate::Point;
use petgraph::graph::NodeIndex;

/// Linear congruential generator used to separate coincident nodes
///
/// Same parameters and seed as d3's `lcg`, so a simulation is reproducible
/// from its initial configuration.
#[derive(Debug, Clone)]
pub(crate) struct Lcg(u64);

impl Lcg {
    const A: u64 = 1_664_525;
    const C: u64 = 1_013_904_223;
    const M: u64 = 1 << 32;

    pub(crate) fn new() -> Self {
        Self(1)
    }

    /// Next value in `[0, 1)`
    pub(crate) fn next_f64(&mut self) -> f64 {
        self.0 = (Self::A * self.0 + Self::C) % Self::M;
        self.0 as f64 / Self::M as f64
    }

    /// A tiny non-zero offset
    pub(crate) fn jiggle(&mut self) -> f64 {
        (self.next_f64() - 0.5) * 1e-6
    }
}

/// Pull linked nodes towards their target distance
///
/// The displacement is measured on the positions the nodes will have after
/// integration. Each side moves according to the spring's bias, so the
/// endpoint with more links moves less.
pub(crate) fn apply_links(graph: &mut BodyGraph, alpha: f64, random: &mut Lcg) {
    for edge in graph.edge_indices() {
        let Some((source, target)) = graph.edge_endpoints(edge) else {
            continue;
        };
        let spring = graph[edge].clone();
        let (s, t) = (&graph[source], &graph[target]);

        let mut x = t.x + t.vx - s.x - s.vx;
        let mut y = t.y + t.vy - s.y - s.vy;
        if x == 0.0 {
            x = random.jiggle();
        }
        if y == 0.0 {
            y = random.jiggle();
        }
        let length = (x * x + y * y).sqrt();
        let l = (length - spring.distance) / length * alpha * spring.strength;
        if !l.is_finite() {
            continue;
        }
        x *= l;
        y *= l;

        let t = &mut graph[target];
        t.vx -= x * spring.bias;
        t.vy -= y * spring.bias;
        let s = &mut graph[source];
        s.vx += x * (1.0 - spring.bias);
        s.vy += y * (1.0 - spring.bias);
    }
}

/// Charge-style interaction between every pair of nodes
pub(crate) fn apply_many_body(
    graph: &mut BodyGraph,
    strength: f64,
    distance_min: f64,
    alpha: f64,
    random: &mut Lcg,
) {
    let positions: Vec<(f64, f64)> = graph.node_weights().map(|b| (b.x, b.y)).collect();
    let min2 = distance_min * distance_min;

    for (i, body) in graph.node_weights_mut().enumerate() {
        let (xi, yi) = positions[i];
        for (j, &(xj, yj)) in positions.iter().enumerate() {
            if i == j {
                continue;
            }
            let mut x = xj - xi;
            let mut y = yj - yi;
            let mut l = x * x + y * y;
            if x == 0.0 {
                x = random.jiggle();
                l += x * x;
            }
            if y == 0.0 {
                y = random.jiggle();
                l += y * y;
            }
            if l < min2 {
                l = (min2 * l).sqrt();
            }
            let w = strength * alpha / l;
            body.vx += x * w;
            body.vy += y * w;
        }
    }
}

/// Translate every node so that the centroid moves towards `center`
pub(crate) fn apply_center(graph: &mut BodyGraph, center: Point, strength: f64) {
    let n = graph.node_count();
    if n == 0 {
        return;
    }
    let (sx, sy) = graph
        .node_weights()
        .fold((0.0, 0.0), |(sx, sy), b| (sx + b.x, sy + b.y));
    let dx = (sx / n as f64 - center.x) * strength;
    let dy = (sy / n as f64 - center.y) * strength;
    for body in graph.node_weights_mut() {
        body.x -= dx;
        body.y -= dy;
    }
}

/// Weak pull of every node towards the line `y = target`
pub(crate) fn apply_vertical(graph: &mut BodyGraph, target: f64, strength: f64, alpha: f64) {
    for body in graph.node_weights_mut() {
        body.vy += (target - body.y) * strength * alpha;
    }
}

/// Push apart pairs whose circles (grown by `padding / 2`) overlap
///
/// Works on predicted positions. The lighter node of a pair, in terms of
/// squared radius, takes the larger share of the correction.
pub(crate) fn apply_collision(
    graph: &mut BodyGraph,
    padding: f64,
    strength: f64,
    random: &mut Lcg,
) {
    let n = graph.node_count();
    let radii: Vec<f64> = graph
        .node_weights()
        .map(|b| b.radius + padding / 2.0)
        .collect();

    for i in 0..n {
        let ri = radii[i];
        let ri2 = ri * ri;
        let (xi, yi) = {
            let b = &graph[NodeIndex::new(i)];
            (b.x + b.vx, b.y + b.vy)
        };

        for (j, &rj) in radii.iter().enumerate().skip(i + 1) {
            let r = ri + rj;
            let other = &graph[NodeIndex::new(j)];
            let mut x = xi - other.x - other.vx;
            let mut y = yi - other.y - other.vy;
            let mut l = x * x + y * y;
            // also skips pairs with a non-finite prediction
            if !(l < r * r) {
                continue;
            }
            if x == 0.0 {
                x = random.jiggle();
                l += x * x;
            }
            if y == 0.0 {
                y = random.jiggle();
                l += y * y;
            }
            let distance = l.sqrt();
            let push = (r - distance) / distance * strength;
            x *= push;
            y *= push;

            let rj2 = rj * rj;
            let share = rj2 / (ri2 + rj2);
            let a = &mut graph[NodeIndex::new(i)];
            a.vx += x * share;
            a.vy += y * share;
            let b = &mut graph[NodeIndex::new(j)];
            b.vx -= x * (1.0 - share);
            b.vy -= y * (1.0 - share);
        }
    }
}
