use test_log::test;
use vislayout::force::{ForceConfig, ForceLayout, ForceLayoutError, GraphData, LinkSpec, NodeSpec};
use vislayout::force::{Simulation, Snapshot};
use vislayout::{Canvas, LayoutEngine};

fn canvas() -> Canvas {
    Canvas::new(800.0, 600.0).unwrap()
}

fn abc() -> GraphData {
    GraphData::new(
        vec![
            NodeSpec::new("A", 10.0),
            NodeSpec::new("B", 5.0),
            NodeSpec::new("C", 1.0),
        ],
        vec![LinkSpec::new("A", "B", 2.0)],
    )
}

fn chain(n: usize) -> GraphData {
    let nodes = (0..n)
        .map(|i| NodeSpec::new(format!("n{i}"), (i % 4 + 1) as f64))
        .collect();
    let links = (1..n)
        .map(|i| LinkSpec::new(format!("n{}", i - 1), format!("n{i}"), (i % 3 + 1) as f64))
        .collect();
    GraphData::new(nodes, links)
}

fn assert_separated(snapshot: &Snapshot) {
    for (i, a) in snapshot.nodes.iter().enumerate() {
        for b in &snapshot.nodes[i + 1..] {
            let distance = a.position().distance(b.position());
            // collision keeps 20 units of padding between circles
            let target = a.radius + b.radius + 20.0;
            assert!(
                distance >= target - 0.01,
                "{} and {} too close: {distance} < {target}",
                a.name,
                b.name,
            );
        }
    }
}

#[test]
fn abc_scenario() {
    let mut simulation = Simulation::new(&abc(), canvas(), ForceConfig::default()).unwrap();
    assert_eq!(simulation.node_radius(10.0), 50.0);
    assert_eq!(simulation.node_radius(1.0), 10.0);
    let b_radius = simulation.body("B").unwrap().radius;
    assert!((b_radius - (10.0 + 40.0 * 4.0 / 9.0)).abs() < 1e-9);

    simulation.run();
    let snapshot = simulation.snapshot();
    let a = snapshot.position("A").unwrap();
    let b = snapshot.position("B").unwrap();
    assert!(a.distance(b) >= 60.0, "A-B distance {}", a.distance(b));
    assert_separated(&snapshot);

    let link = &snapshot.links[0];
    assert_eq!((link.source.as_str(), link.target.as_str()), ("A", "B"));
    assert_eq!((link.x1, link.y1), (a.x, a.y));
    assert_eq!((link.x2, link.y2), (b.x, b.y));
}

#[test]
fn layout_is_deterministic() {
    let data = chain(12);
    let engine = ForceLayout::default();
    let first = engine.layout(&data, canvas()).unwrap();
    let second = engine.layout(&data, canvas()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn converged_layout_has_no_overlaps() {
    let snapshot = ForceLayout::default().layout(&chain(15), canvas()).unwrap();
    assert_eq!(snapshot.nodes.len(), 15);
    assert_eq!(snapshot.links.len(), 14);
    assert_separated(&snapshot);
    for node in &snapshot.nodes {
        assert!(node.position().is_finite());
    }
}

#[test]
fn single_node_sits_at_center() {
    let data = GraphData::new(vec![NodeSpec::new("solo", 3.0)], vec![]);
    let snapshot = ForceLayout::default().layout(&data, canvas()).unwrap();
    let position = snapshot.position("solo").unwrap();
    assert!(position.distance(canvas().center()) < 1.0, "{position:?}");
    // degenerate value domain maps to the middle of the radius range
    assert_eq!(snapshot.nodes[0].radius, 30.0);
}

#[test]
fn self_link_lays_out() {
    let data = GraphData::new(
        vec![NodeSpec::new("a", 1.0), NodeSpec::new("b", 2.0)],
        vec![LinkSpec::new("a", "a", 1.0), LinkSpec::new("a", "b", 1.0)],
    );
    let snapshot = ForceLayout::default().layout(&data, canvas()).unwrap();
    for node in &snapshot.nodes {
        assert!(node.position().is_finite());
    }
    assert_separated(&snapshot);
}

#[test]
fn unknown_endpoint_is_rejected() {
    let data = GraphData::new(
        vec![NodeSpec::new("a", 1.0)],
        vec![LinkSpec::new("a", "ghost", 1.0)],
    );
    assert_eq!(
        ForceLayout::default().layout(&data, canvas()),
        Err(ForceLayoutError::UnknownEndpoint {
            link: 0,
            name: "ghost".into()
        })
    );
}

#[test]
fn reads_graph_from_ron() {
    let data: GraphData = ron::from_str(
        r#"(
            nodes: [(name: "A", value: 10.0), (name: "B", value: 5.0)],
            links: [(source: "A", target: "B", value: 2.0)],
        )"#,
    )
    .unwrap();
    assert_eq!(data.nodes.len(), 2);
    let snapshot = ForceLayout::default().layout(&data, canvas()).unwrap();
    assert_eq!(snapshot.generation, 0);
    assert!(snapshot.tick > 0);
}
