use super::hierarchy::Hierarchy;
use super::TreeNode;
use crate::{Point, Rect};
use std::ops::Range;

/// Index of a rectangle inside a [`Treemap`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RectId(pub(crate) usize);

impl RectId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// The rectangle computed for one node of the tree
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutRect<'a> {
    /// The source node
    pub node: &'a TreeNode,
    /// Distance from the root, the root has depth 0
    pub depth: usize,
    pub parent: Option<RectId>,
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    /// Summed value of the node
    pub value: f64,
    /// Value of the parent, `None` for the root
    pub parent_value: Option<f64>,
    children: Range<usize>,
}

impl LayoutRect<'_> {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x0, self.y0, self.x1, self.y1)
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    pub fn area(&self) -> f64 {
        self.rect().area()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Share of the parent's value, `None` for the root or an empty parent
    pub fn percentage_of_parent(&self) -> Option<f64> {
        self.parent_value
            .filter(|&total| total > 0.0)
            .map(|total| self.value / total * 100.0)
    }

    /// `attr:name` when the node has a grouping attribute, `name` otherwise
    pub fn label(&self) -> String {
        match &self.node.attr {
            Some(attr) => format!("{attr}:{}", self.node.name),
            None => self.node.name.clone(),
        }
    }

    /// Whether the rectangle is at least `min_width` by `min_height`
    pub fn fits(&self, min_width: f64, min_height: f64) -> bool {
        self.width() >= min_width && self.height() >= min_height
    }
}

/// Nested rectangles for a whole tree, in breadth-first order
///
/// The root comes first when the layout is not empty. Parent and child links
/// are indices into the same arena.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Treemap<'a> {
    rects: Vec<LayoutRect<'a>>,
}

impl<'a> Treemap<'a> {
    pub(crate) fn from_parts(hierarchy: Hierarchy<'a>, rects: Vec<Rect>) -> Self {
        let values: Vec<f64> = hierarchy.nodes.iter().map(|n| n.value).collect();
        let rects = hierarchy
            .nodes
            .into_iter()
            .zip(rects)
            .map(|(node, rect)| LayoutRect {
                node: node.data,
                depth: node.depth,
                parent: node.parent.map(RectId),
                x0: rect.x0,
                y0: rect.y0,
                x1: rect.x1,
                y1: rect.y1,
                value: node.value,
                parent_value: node.parent.map(|p| values[p]),
                children: node.children,
            })
            .collect();
        Self { rects }
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    /// All rectangles, root included
    pub fn rects(&self) -> &[LayoutRect<'a>] {
        &self.rects
    }

    pub fn iter(&self) -> impl Iterator<Item = (RectId, &LayoutRect<'a>)> {
        self.rects.iter().enumerate().map(|(i, r)| (RectId(i), r))
    }

    /// Every rectangle except the root, the ones usually drawn
    pub fn cells(&self) -> impl Iterator<Item = (RectId, &LayoutRect<'a>)> {
        self.iter().skip(1)
    }

    pub fn root(&self) -> Option<&LayoutRect<'a>> {
        self.rects.first()
    }

    pub fn get(&self, id: RectId) -> Option<&LayoutRect<'a>> {
        self.rects.get(id.0)
    }

    pub fn parent(&self, id: RectId) -> Option<&LayoutRect<'a>> {
        self.get(id)?.parent.and_then(|p| self.get(p))
    }

    pub fn children(&self, id: RectId) -> impl Iterator<Item = (RectId, &LayoutRect<'a>)> {
        let range = self.get(id).map(|r| r.children.clone()).unwrap_or(0..0);
        range.filter_map(move |i| self.rects.get(i).map(|r| (RectId(i), r)))
    }

    pub fn percentage_of_parent(&self, id: RectId) -> Option<f64> {
        self.get(id)?.percentage_of_parent()
    }

    /// First rectangle, in breadth-first order, whose node has this name
    pub fn find(&self, name: &str) -> Option<RectId> {
        self.rects
            .iter()
            .position(|r| r.node.name == name)
            .map(RectId)
    }

    /// The deepest non-root rectangle with a non-zero area containing the point
    pub fn hit_test(&self, x: f64, y: f64) -> Option<RectId> {
        let point = Point::new(x, y);
        self.cells()
            .filter(|(_, r)| r.area() > 0.0 && r.rect().contains(point))
            .max_by_key(|(id, r)| (r.depth, *id))
            .map(|(id, _)| id)
    }
}

/// Selection after a click: clicking the selected cell clears the selection
pub fn toggle_selection(current: Option<RectId>, clicked: RectId) -> Option<RectId> {
    if current == Some(clicked) {
        None
    } else {
        Some(clicked)
    }
}
