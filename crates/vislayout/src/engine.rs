use crate::Canvas;

/// A layout engine that computes geometry for some input on a canvas
///
/// This trait is generic over the input type `G`, allowing different layout
/// engines to work with different data shapes:
/// - The force layout implements `LayoutEngine<&GraphData>` and produces node
///   positions and link segments
/// - The treemap layout implements `LayoutEngine<&TreeNode>` and produces a
///   tree of nested rectangles borrowing the input
pub trait LayoutEngine<G> {
    /// The computed geometry
    type Output;

    /// The error returned when the input or canvas is unusable
    type Error: std::error::Error;

    /// Compute the layout of `input` for the given canvas
    ///
    /// # Errors
    /// Returns an error if the layout cannot be built (e.g., the canvas has
    /// a non-positive dimension, or a link references an unknown node)
    fn layout(&self, input: G, canvas: Canvas) -> Result<Self::Output, Self::Error>;
}
