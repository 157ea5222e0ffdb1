mod hierarchy;
mod rects;
mod squarify;

use crate::{Canvas, InvalidCanvas, LayoutEngine, Rect};
use hierarchy::Hierarchy;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub use rects::{toggle_selection, LayoutRect, RectId, Treemap};
pub use squarify::PHI;

/// Errors that can occur while computing a treemap
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TreemapError {
    #[error(transparent)]
    InvalidCanvas(#[from] InvalidCanvas),

    #[error("padding must be non-negative and finite, got {0:?}")]
    InvalidPadding(Padding),
}

/// A node of the weighted input tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub name: String,
    /// Grouping attribute shown in labels as `attr:name`
    #[serde(default)]
    pub attr: Option<String>,
    /// Weight of a leaf, ignored on internal nodes
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attr: None,
            value: None,
            children: Vec::new(),
        }
    }

    pub fn leaf(name: impl Into<String>, value: f64) -> Self {
        Self::new(name).with_value(value)
    }

    pub fn group(name: impl Into<String>, children: Vec<TreeNode>) -> Self {
        Self {
            children,
            ..Self::new(name)
        }
    }

    pub fn with_attr(mut self, attr: impl Into<String>) -> Self {
        self.attr = Some(attr.into());
        self
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Space kept around and between nested rectangles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Padding {
    /// Gap between a parent's edge and its children, left, right and bottom
    pub outer: f64,
    /// Gap above the children, leaves room for the parent's label
    pub top: f64,
    /// Gap between siblings
    pub inner: f64,
}

impl Default for Padding {
    fn default() -> Self {
        Self {
            outer: 3.0,
            top: 20.0,
            inner: 1.0,
        }
    }
}

impl Padding {
    pub fn validate(&self) -> Result<(), TreemapError> {
        let valid = |v: f64| v.is_finite() && v >= 0.0;
        if valid(self.outer) && valid(self.top) && valid(self.inner) {
            Ok(())
        } else {
            Err(TreemapError::InvalidPadding(*self))
        }
    }
}

/// Squarified treemap layout
///
/// Every node gets a rectangle nested inside its parent's, with areas
/// proportional to the summed leaf values. Children are tiled in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreemapLayout {
    pub padding: Padding,
    /// Snap every edge to whole pixels after layout
    pub round: bool,
    /// Target aspect ratio of the squarified rows
    pub ratio: f64,
}

impl Default for TreemapLayout {
    fn default() -> Self {
        Self {
            padding: Padding::default(),
            round: true,
            ratio: PHI,
        }
    }
}

impl TreemapLayout {
    pub fn new(padding: Padding) -> Self {
        Self {
            padding,
            ..Self::default()
        }
    }

    pub fn with_round(mut self, round: bool) -> Self {
        self.round = round;
        self
    }

    /// Lay out `root` over the whole canvas
    ///
    /// A root without children yields an empty treemap.
    pub fn compute<'a>(
        &self,
        root: &'a TreeNode,
        canvas: Canvas,
    ) -> Result<Treemap<'a>, TreemapError> {
        canvas.validate()?;
        self.padding.validate()?;

        if root.is_leaf() {
            debug!(name = %root.name, "root has no children, empty treemap");
            return Ok(Treemap::default());
        }

        let hierarchy = Hierarchy::build(root);
        let mut rects = vec![Rect::default(); hierarchy.len()];
        rects[0] = canvas.bounds();

        let ratio = if self.ratio > 1.0 { self.ratio } else { 1.0 };
        let half_inner = self.padding.inner / 2.0;

        // Breadth-first order puts every parent before its children
        for (i, node) in hierarchy.nodes.iter().enumerate() {
            let own = if node.depth == 0 { 0.0 } else { half_inner };
            let rect = shrink(rects[i], own, own, own, own);
            rects[i] = rect;

            if node.children.is_empty() {
                continue;
            }
            let area = shrink(
                rect,
                self.padding.outer - half_inner,
                self.padding.top - half_inner,
                self.padding.outer - half_inner,
                self.padding.outer - half_inner,
            );
            let values: Vec<f64> = hierarchy.nodes[node.children.clone()]
                .iter()
                .map(|c| c.value)
                .collect();
            let tiles = squarify::squarify(ratio, &values, node.value, area);
            for (slot, tile) in rects[node.children.clone()].iter_mut().zip(tiles) {
                *slot = tile;
            }
        }

        if self.round {
            for rect in &mut rects {
                *rect = round(*rect);
            }
        }

        debug!(
            nodes = hierarchy.len(),
            total = hierarchy.nodes[0].value,
            round = self.round,
            "treemap computed"
        );
        Ok(Treemap::from_parts(hierarchy, rects))
    }
}

impl<'a> LayoutEngine<&'a TreeNode> for TreemapLayout {
    type Output = Treemap<'a>;
    type Error = TreemapError;

    fn layout(&self, root: &'a TreeNode, canvas: Canvas) -> Result<Treemap<'a>, TreemapError> {
        self.compute(root, canvas)
    }
}

/// Move each edge inwards, collapsing to the midpoint when the rect would invert
fn shrink(rect: Rect, left: f64, top: f64, right: f64, bottom: f64) -> Rect {
    let (mut x0, mut y0) = (rect.x0 + left, rect.y0 + top);
    let (mut x1, mut y1) = (rect.x1 - right, rect.y1 - bottom);
    if x1 < x0 {
        x0 = (x0 + x1) / 2.0;
        x1 = x0;
    }
    if y1 < y0 {
        y0 = (y0 + y1) / 2.0;
        y1 = y0;
    }
    Rect::new(x0, y0, x1, y1)
}

fn round(rect: Rect) -> Rect {
    let half_up = |v: f64| (v + 0.5).floor();
    Rect::new(
        half_up(rect.x0),
        half_up(rect.y0),
        half_up(rect.x1),
        half_up(rect.y1),
    )
}
