use test_log::test;
use vislayout::treemap::{toggle_selection, Padding, TreeNode, Treemap, TreemapLayout};
use vislayout::{Canvas, LayoutEngine, Point};

fn canvas() -> Canvas {
    Canvas::new(960.0, 540.0).unwrap()
}

fn cities() -> TreeNode {
    TreeNode::group(
        "world",
        vec![
            TreeNode::group(
                "Europe",
                vec![
                    TreeNode::leaf("Paris", 11.0).with_attr("city"),
                    TreeNode::leaf("Berlin", 3.6).with_attr("city"),
                    TreeNode::leaf("Madrid", 6.6).with_attr("city"),
                    TreeNode::leaf("Rome", 4.3).with_attr("city"),
                ],
            )
            .with_attr("continent"),
            TreeNode::group(
                "Asia",
                vec![
                    TreeNode::leaf("Tokyo", 37.0),
                    TreeNode::leaf("Delhi", 31.0),
                    TreeNode::leaf("Atlantis", 0.0),
                ],
            )
            .with_attr("continent"),
            TreeNode::leaf("Reykjavik", 0.2),
        ],
    )
}

fn assert_siblings_disjoint(treemap: &Treemap<'_>) {
    for (id, _) in treemap.iter() {
        let children: Vec<_> = treemap.children(id).map(|(_, r)| r.rect()).collect();
        for (i, a) in children.iter().enumerate() {
            for b in &children[i + 1..] {
                assert!(!a.overlaps(b), "{a:?} overlaps {b:?}");
            }
        }
    }
}

fn assert_nested(treemap: &Treemap<'_>) {
    for (id, rect) in treemap.cells() {
        let parent = treemap.parent(id).unwrap();
        let eps = 1e-9;
        assert!(
            rect.x0 >= parent.x0 - eps && rect.x1 <= parent.x1 + eps,
            "{rect:?} in {parent:?}"
        );
        assert!(
            rect.y0 >= parent.y0 - eps && rect.y1 <= parent.y1 + eps,
            "{rect:?} in {parent:?}"
        );
    }
}

#[test]
fn leaf_areas_are_proportional_without_padding() {
    let tree = cities();
    let layout = TreemapLayout::new(Padding {
        outer: 0.0,
        top: 0.0,
        inner: 0.0,
    })
    .with_round(false);
    let treemap = layout.layout(&tree, canvas()).unwrap();

    let root = treemap.root().unwrap();
    let total = root.value;
    assert!((total - 93.7).abs() < 1e-9);
    for (_, rect) in treemap.cells() {
        let expected = 960.0 * 540.0 * rect.value / total;
        assert!(
            (rect.area() - expected).abs() < 1e-6,
            "{}: {} vs {expected}",
            rect.node.name,
            rect.area()
        );
    }
    assert_siblings_disjoint(&treemap);
    assert_nested(&treemap);
}

#[test]
fn areas_are_proportional_within_padded_parent() {
    let tree = TreeNode::group(
        "root",
        vec![
            TreeNode::group("g", vec![TreeNode::leaf("a", 3.0), TreeNode::leaf("b", 1.0)]),
            TreeNode::leaf("c", 4.0),
        ],
    );
    let padding = Padding {
        outer: 3.0,
        top: 20.0,
        inner: 0.0,
    };
    let layout = TreemapLayout::new(padding).with_round(false);
    let treemap = layout.layout(&tree, Canvas::new(400.0, 300.0).unwrap()).unwrap();
    assert_eq!(treemap.len(), 5);

    for (id, rect) in treemap.cells() {
        let parent = treemap.parent(id).unwrap();
        let inner_area = (parent.width() - 2.0 * padding.outer)
            * (parent.height() - padding.outer - padding.top);
        let share = rect.area() / inner_area;
        let expected = rect.value / parent.value;
        assert!(
            (share - expected).abs() < 1e-9,
            "{}: {share} vs {expected}",
            rect.node.name
        );
    }
    assert_siblings_disjoint(&treemap);
    assert_nested(&treemap);
}

#[test]
fn rounded_layout_stays_disjoint_and_nested() {
    let tree = cities();
    let treemap = TreemapLayout::default().layout(&tree, canvas()).unwrap();
    assert_eq!(treemap.len(), 11);
    for (_, rect) in treemap.iter() {
        for v in [rect.x0, rect.y0, rect.x1, rect.y1] {
            assert_eq!(v, v.round(), "{rect:?}");
        }
    }
    assert_siblings_disjoint(&treemap);
    assert_nested(&treemap);
}

#[test]
fn output_is_breadth_first_with_parent_links() {
    let tree = cities();
    let treemap = TreemapLayout::default().layout(&tree, canvas()).unwrap();
    let depths: Vec<usize> = treemap.rects().iter().map(|r| r.depth).collect();
    assert!(depths.windows(2).all(|w| w[0] <= w[1]));

    let root = treemap.root().unwrap();
    assert_eq!(root.parent, None);
    assert_eq!(root.parent_value, None);
    assert_eq!(root.label(), "world");

    let europe = treemap.find("Europe").unwrap();
    let names: Vec<&str> = treemap
        .children(europe)
        .map(|(_, r)| r.node.name.as_str())
        .collect();
    assert_eq!(names, ["Paris", "Berlin", "Madrid", "Rome"]);

    let paris = treemap.find("Paris").unwrap();
    let rect = treemap.get(paris).unwrap();
    assert_eq!(rect.label(), "city:Paris");
    assert_eq!(rect.parent, Some(europe));
    let share = treemap.percentage_of_parent(paris).unwrap();
    assert!((share - 11.0 / 25.5 * 100.0).abs() < 1e-9);
}

#[test]
fn layout_is_deterministic() {
    let tree = cities();
    let layout = TreemapLayout::default();
    assert_eq!(
        layout.layout(&tree, canvas()).unwrap(),
        layout.layout(&tree, canvas()).unwrap()
    );
}

#[test]
fn zero_value_leaf_has_zero_area() {
    let tree = cities();
    let treemap = TreemapLayout::default().layout(&tree, canvas()).unwrap();
    let atlantis = treemap.get(treemap.find("Atlantis").unwrap()).unwrap();
    assert_eq!(atlantis.area(), 0.0);
    assert_eq!(atlantis.percentage_of_parent(), Some(0.0));

    let lonely = TreeNode::group("root", vec![TreeNode::leaf("nothing", 0.0)]);
    let treemap = TreemapLayout::default().layout(&lonely, canvas()).unwrap();
    assert_eq!(treemap.len(), 2);
    let (_, leaf) = treemap.cells().next().unwrap();
    assert_eq!(leaf.area(), 0.0);
    assert_eq!(leaf.percentage_of_parent(), None);
    assert!(leaf.rect().x0.is_finite() && leaf.rect().y1.is_finite());
}

#[test]
fn empty_tree_yields_no_rects() {
    let tree = TreeNode::new("root");
    let treemap = TreemapLayout::default().layout(&tree, canvas()).unwrap();
    assert!(treemap.is_empty());
    assert_eq!(treemap.hit_test(10.0, 10.0), None);
}

#[test]
fn hit_test_finds_deepest_cell() {
    let tree = cities();
    let treemap = TreemapLayout::default().layout(&tree, canvas()).unwrap();

    let tokyo = treemap.find("Tokyo").unwrap();
    let rect = treemap.get(tokyo).unwrap().rect();
    let center = Point::new((rect.x0 + rect.x1) / 2.0, (rect.y0 + rect.y1) / 2.0);
    assert_eq!(treemap.hit_test(center.x, center.y), Some(tokyo));

    // the header strip of a group belongs to the group itself
    let asia = treemap.find("Asia").unwrap();
    let header = treemap.get(asia).unwrap();
    assert_eq!(treemap.hit_test(header.x0 + 5.0, header.y0 + 5.0), Some(asia));

    // outer padding of the root is not a cell
    assert_eq!(treemap.hit_test(1.0, 1.0), None);
}

#[test]
fn clicking_twice_clears_selection() {
    let tree = cities();
    let treemap = TreemapLayout::default().layout(&tree, canvas()).unwrap();
    let paris = treemap.find("Paris").unwrap();
    let rome = treemap.find("Rome").unwrap();

    let selected = toggle_selection(None, paris);
    assert_eq!(selected, Some(paris));
    assert_eq!(toggle_selection(selected, rome), Some(rome));
    assert_eq!(toggle_selection(selected, paris), None);
}
