use super::TreeNode;
use std::ops::Range;
use tracing::debug;

/// A tree node flattened into breadth-first order
#[derive(Debug, Clone)]
pub(crate) struct HierarchyNode<'a> {
    pub data: &'a TreeNode,
    pub depth: usize,
    pub parent: Option<usize>,
    /// Children are contiguous in breadth-first order
    pub children: Range<usize>,
    pub value: f64,
}

/// Arena of the input tree with summed values
#[derive(Debug, Clone)]
pub(crate) struct Hierarchy<'a> {
    pub nodes: Vec<HierarchyNode<'a>>,
}

impl<'a> Hierarchy<'a> {
    /// Flatten `root` breadth-first and sum values bottom-up
    ///
    /// Leaves weigh their own value when it is positive and finite, zero
    /// otherwise. Internal nodes weigh the sum of their children.
    pub fn build(root: &'a TreeNode) -> Self {
        let mut nodes = vec![HierarchyNode {
            data: root,
            depth: 0,
            parent: None,
            children: 0..0,
            value: 0.0,
        }];

        let mut i = 0;
        while i < nodes.len() {
            let (data, depth) = (nodes[i].data, nodes[i].depth);
            let start = nodes.len();
            nodes.extend(data.children.iter().map(|child| HierarchyNode {
                data: child,
                depth: depth + 1,
                parent: Some(i),
                children: 0..0,
                value: 0.0,
            }));
            nodes[i].children = start..nodes.len();
            i += 1;
        }

        for i in (0..nodes.len()).rev() {
            let node = &nodes[i];
            let value = if node.children.is_empty() {
                leaf_value(node.data.value)
            } else {
                let sum: f64 = nodes[node.children.clone()].iter().map(|c| c.value).sum();
                if let Some(given) = node.data.value {
                    if given != sum {
                        let name = &node.data.name;
                        debug!(%name, given, sum, "ignoring value of internal node");
                    }
                }
                sum
            };
            nodes[i].value = value;
        }

        Self { nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}

fn leaf_value(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}
