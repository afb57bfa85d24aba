use super::Tree;
use crate::libs::phylo::node::{Node, NodeId};

/// Iterator over the direct children of a node, oldest first.
pub struct Children<'a> {
    tree: &'a Tree,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = self.tree.nodes[id].sibling;
        Some(id)
    }
}

pub fn children(tree: &Tree, id: NodeId) -> Children<'_> {
    Children {
        tree,
        next: tree.get_node(id).and_then(|n| n.child),
    }
}

/// True if `id` is the first child of its ancestor.
pub fn is_the_child(tree: &Tree, id: NodeId) -> bool {
    match tree.nodes[id].ancestor {
        Some(anc) => tree.nodes[anc].child == Some(id),
        None => false,
    }
}

/// The sibling immediately to the left of `id`.
/// None for first children and for nodes without an ancestor.
pub fn left_sibling_of(tree: &Tree, id: NodeId) -> Option<NodeId> {
    let anc = tree.nodes[id].ancestor?;
    let mut q = tree.nodes[anc].child?;
    if q == id {
        return None;
    }
    while let Some(next) = tree.nodes[q].sibling {
        if next == id {
            return Some(q);
        }
        q = next;
    }
    None
}

/// The last node of the sibling chain starting at `id`.
pub fn rightmost_sibling(tree: &Tree, id: NodeId) -> NodeId {
    let mut p = id;
    while let Some(next) = tree.nodes[p].sibling {
        p = next;
    }
    p
}

/// True if `id` lies in the subtree of the first child of `q`.
pub fn is_left_descendant_of(tree: &Tree, id: NodeId, q: NodeId) -> bool {
    let first = tree.nodes[q].child;
    let mut r = Some(id);
    while let Some(cur) = r {
        if Some(cur) == first || cur == q {
            break;
        }
        r = tree.nodes[cur].ancestor;
    }
    r.is_some() && r == first
}

/// Get IDs of all leaves in subtree rooted at `id`, left to right.
pub fn get_leaves(tree: &Tree, id: NodeId) -> Vec<NodeId> {
    super::traversal::preorder(tree, id)
        .into_iter()
        .filter(|&n| tree.nodes[n].is_leaf)
        .collect()
}

/// Find nodes matching a predicate.
pub fn find_nodes<F>(tree: &Tree, predicate: F) -> Vec<NodeId>
where
    F: Fn(&Node) -> bool,
{
    tree.nodes
        .iter()
        .filter(|n| !n.deleted && predicate(n))
        .map(|n| n.id)
        .collect()
}

/// Get node ID by label, scanning the arena. Returns first match.
pub fn get_node_by_label(tree: &Tree, label: &str) -> Option<NodeId> {
    tree.nodes
        .iter()
        .find(|n| !n.deleted && n.label == label)
        .map(|n| n.id)
}
