use crate::graph::node::Node;

/// Depth-first preorder: a node, then each input left to right.
///
/// The compiler assigns parameter and texture slots in this order and the resolver feeds values
/// in it, so both must use this walk.
pub(crate) fn preorder(root: &Node) -> Vec<&Node> {
    let mut out = Vec::new();
    let mut stack = vec![root];
    while let Some(n) = stack.pop() {
        out.push(n);
        stack.extend(n.inputs().iter().rev());
    }
    out
}
