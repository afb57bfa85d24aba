use super::Tree;
use crate::libs::phylo::node::NodeId;

/// Get node IDs in preorder traversal (Root -> Children).
/// Siblings of `start_node` are not visited.
pub fn preorder(tree: &Tree, start_node: NodeId) -> Vec<NodeId> {
    let mut result = Vec::new();
    if tree.get_node(start_node).is_none() {
        return result;
    }
    let mut stack = vec![start_node];

    while let Some(id) = stack.pop() {
        result.push(id);
        // Push children in reverse order so they are processed in order
        let children: Vec<NodeId> = tree.children(id).collect();
        for &child in children.iter().rev() {
            stack.push(child);
        }
    }

    result
}

/// Get node IDs in postorder traversal (Children -> Root).
/// Siblings of `start_node` are not visited.
pub fn postorder(tree: &Tree, start_node: NodeId) -> Vec<NodeId> {
    let mut result = Vec::new();
    if tree.get_node(start_node).is_none() {
        return result;
    }

    // (node, children already expanded)
    let mut stack = vec![(start_node, false)];
    while let Some((id, expanded)) = stack.pop() {
        if expanded {
            result.push(id);
        } else {
            stack.push((id, true));
            let children: Vec<NodeId> = tree.children(id).collect();
            for &child in children.iter().rev() {
                stack.push((child, false));
            }
        }
    }

    result
}
