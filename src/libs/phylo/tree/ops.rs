use super::Tree;
use crate::libs::phylo::error::TreeError;
use crate::libs::phylo::node::{Node, NodeId};
use std::collections::HashMap;

/// Branch lengths below this count as zero in path lengths
pub const MIN_EDGE_LENGTH: f64 = 0.000001;

/// Recompute weight and degree of every node and the leaf/internal totals.
/// Labels and branch lengths are left alone.
pub fn refresh_derived(tree: &mut Tree) {
    tree.leaves = 0;
    tree.internals = 0;

    let root = match tree.root {
        Some(r) => r,
        None => return,
    };

    let order = super::traversal::postorder(tree, root);
    for &id in &order {
        let node = &mut tree.nodes[id];
        node.weight = 0;
        node.degree = 0;
    }

    // Children come before their ancestor, so each node is complete when reached
    for &id in &order {
        if tree.nodes[id].is_leaf {
            tree.leaves += 1;
            tree.nodes[id].weight = 1;
        } else {
            tree.internals += 1;
        }

        if id != root {
            if let Some(anc) = tree.nodes[id].ancestor {
                let weight = tree.nodes[id].weight;
                tree.nodes[anc].weight += weight;
                tree.nodes[anc].degree += 1;
            }
        }
    }
}

/// Cumulative branch length from the root for every node.
/// Lengths below [`MIN_EDGE_LENGTH`] (negative ones included) count as zero.
pub fn compute_path_lengths(tree: &mut Tree) {
    tree.max_path_length = 0.0;
    let root = match tree.root {
        Some(r) => r,
        None => return,
    };

    for id in super::traversal::preorder(tree, root) {
        let path_length = match tree.nodes[id].ancestor {
            Some(anc) if id != root => {
                let mut l = tree.nodes[id].edge_length;
                if l < MIN_EDGE_LENGTH {
                    l = 0.0;
                }
                tree.nodes[anc].path_length + l
            }
            _ => 0.0,
        };
        tree.nodes[id].path_length = path_length;
        if path_length > tree.max_path_length {
            tree.max_path_length = path_length;
        }
    }
}

/// Number of edges between each node and the root.
pub fn node_depths(tree: &mut Tree) {
    let root = match tree.root {
        Some(r) => r,
        None => return,
    };

    for id in super::traversal::preorder(tree, root) {
        let depth = match tree.nodes[id].ancestor {
            Some(anc) if id != root => tree.nodes[anc].depth + 1,
            _ => 0,
        };
        tree.nodes[id].depth = depth;
    }
}

pub fn mark_nodes(tree: &mut Tree, on: bool) {
    if let Some(root) = tree.root {
        for id in super::traversal::preorder(tree, root) {
            tree.nodes[id].marked = on;
        }
    }
}

fn check_live(tree: &Tree, id: NodeId) -> Result<(), TreeError> {
    match tree.get_node(id) {
        Some(_) => Ok(()),
        None => Err(TreeError::Logic(format!("Node {} not found or deleted", id))),
    }
}

/// True if walking up from `id` ends at the root of the tree.
fn is_attached(tree: &Tree, id: NodeId) -> bool {
    let mut cur = id;
    while let Some(anc) = tree.nodes[cur].ancestor {
        cur = anc;
    }
    tree.root == Some(cur)
}

/// Splice a new ancestor in where `anchor` is, with `node` as its first
/// child and `anchor` as its second. Returns the new ancestor.
///
/// `node` must be detached (no ancestor, no sibling, not the root).
/// Only the leaf/internal totals are updated; call
/// [`Tree::refresh_derived`] for accurate weights elsewhere.
pub fn insert_below(tree: &mut Tree, node: NodeId, anchor: NodeId) -> Result<NodeId, TreeError> {
    check_live(tree, node)?;
    check_live(tree, anchor)?;
    if tree.nodes[node].ancestor.is_some()
        || tree.nodes[node].sibling.is_some()
        || tree.root == Some(node)
    {
        return Err(TreeError::Logic(format!("Node {} is still attached", node)));
    }
    if !is_attached(tree, anchor) {
        return Err(TreeError::Logic(format!(
            "Node {} is not part of the tree",
            anchor
        )));
    }

    let q = tree.nodes[anchor].ancestor;
    let left = super::query::left_sibling_of(tree, anchor);

    let new_anc = tree.new_node();
    tree.internals += 1;
    if tree.nodes[node].is_leaf {
        tree.leaves += 1;
    }

    tree.nodes[new_anc].child = Some(node);
    tree.nodes[node].ancestor = Some(new_anc);
    tree.nodes[node].sibling = Some(anchor);

    tree.nodes[new_anc].ancestor = q;
    tree.nodes[new_anc].sibling = tree.nodes[anchor].sibling;
    tree.nodes[anchor].sibling = None;
    tree.nodes[anchor].ancestor = Some(new_anc);

    match (q, left) {
        (None, _) => tree.root = Some(new_anc),
        (Some(q), None) => tree.nodes[q].child = Some(new_anc),
        (Some(_), Some(r)) => tree.nodes[r].sibling = Some(new_anc),
    }

    tree.nodes[new_anc].degree = 2;
    tree.nodes[new_anc].weight = tree.nodes[node].weight + tree.nodes[anchor].weight;

    Ok(new_anc)
}

/// Cut `node` out of the tree.
///
/// * Ancestor with two children: the ancestor goes too (it is released)
///   and the remaining child takes its place. Returns that child.
/// * Ancestor with `node` as its only child: the ancestor is removed in
///   turn by these same rules, and released. Returns what that removal
///   returns.
/// * Otherwise only `node` leaves the sibling chain. Returns the node
///   now in its place, or its left neighbour, if any.
///
/// The removed node stays in the arena, detached. Removing the only leaf
/// of a single-leaf tree empties the tree; removing the root of any other
/// tree is refused.
pub fn remove_node(tree: &mut Tree, node: NodeId) -> Result<Option<NodeId>, TreeError> {
    check_live(tree, node)?;
    if !is_attached(tree, node) {
        return Err(TreeError::Logic(format!(
            "Node {} is not part of the tree",
            node
        )));
    }

    let anc = match tree.nodes[node].ancestor {
        Some(anc) => anc,
        None => {
            // node is the root
            if !tree.nodes[node].is_leaf {
                return Err(TreeError::Logic(
                    "Cannot remove the root of a multi-leaf tree".to_string(),
                ));
            }
            tree.root = None;
            tree.leaves = 0;
            tree.internals = 0;
            return Ok(None);
        }
    };

    let is_leaf = tree.nodes[node].is_leaf;
    let n_children = tree.children(anc).count();

    if n_children == 1 {
        // ancestor would be left childless, so it goes as well
        let result = if tree.nodes[anc].ancestor.is_some() {
            remove_node(tree, anc)?
        } else {
            tree.root = None;
            tree.leaves = 0;
            tree.internals = 0;
            None
        };

        if is_leaf {
            tree.leaves = tree.leaves.saturating_sub(1);
        }
        tree.nodes[node].ancestor = None;
        tree.nodes[node].sibling = None;

        let released = &mut tree.nodes[anc];
        released.deleted = true;
        released.child = None;
        released.degree = 0;
        tree.internals = tree.internals.saturating_sub(1);

        return Ok(result);
    }

    let result = if n_children == 2 {
        // ancestor is binary, so remove node and its ancestor
        let p = if super::query::is_the_child(tree, node) {
            tree.nodes[node].sibling
        } else {
            tree.nodes[anc].child
        };
        let p = p.ok_or_else(|| TreeError::Logic(format!("Node {} has no sibling", node)))?;

        let q = tree.nodes[anc].ancestor;
        let anc_is_child = super::query::is_the_child(tree, anc);
        let anc_left = super::query::left_sibling_of(tree, anc);

        tree.nodes[p].ancestor = q;
        match q {
            Some(q) => {
                if anc_is_child {
                    tree.nodes[q].child = Some(p);
                } else if let Some(r) = anc_left {
                    tree.nodes[r].sibling = Some(p);
                }
                tree.nodes[p].sibling = tree.nodes[anc].sibling;
            }
            None => {
                // Ancestor is the root
                tree.root = Some(p);
                tree.nodes[p].sibling = None;
            }
        }

        let released = &mut tree.nodes[anc];
        released.deleted = true;
        released.child = None;
        released.sibling = None;
        released.ancestor = None;
        tree.internals = tree.internals.saturating_sub(1);

        Some(p)
    } else {
        // polytomy, just remove node
        let q = if super::query::is_the_child(tree, node) {
            tree.nodes[anc].child = tree.nodes[node].sibling;
            tree.nodes[node].sibling
        } else {
            let left = super::query::left_sibling_of(tree, node);
            if let Some(r) = left {
                tree.nodes[r].sibling = tree.nodes[node].sibling;
            }
            left
        };
        tree.nodes[anc].degree = tree.nodes[anc].degree.saturating_sub(1);
        q
    };

    if is_leaf {
        tree.leaves = tree.leaves.saturating_sub(1);
    }
    tree.nodes[node].ancestor = None;
    tree.nodes[node].sibling = None;

    Ok(result)
}

/// Copies of the nodes of the subtree at `start`, numbered from `base`.
/// Links are remapped into the copy; siblings of `start` are not followed.
fn copy_nodes(tree: &Tree, start: NodeId, base: NodeId) -> Vec<Node> {
    let order = super::traversal::preorder(tree, start);
    let new_id: HashMap<NodeId, NodeId> = order
        .iter()
        .enumerate()
        .map(|(i, &old)| (old, base + i))
        .collect();
    let remap = |id: Option<NodeId>| id.and_then(|i| new_id.get(&i).copied());

    order
        .iter()
        .enumerate()
        .map(|(i, &old)| {
            let src = &tree.nodes[old];
            let mut node = Node::new(base + i);
            src.copy_payload_to(&mut node);
            node.child = remap(src.child);
            if old != start {
                node.ancestor = remap(src.ancestor);
                node.sibling = remap(src.sibling);
            }
            node
        })
        .collect()
}

/// A structurally independent copy of the subtree rooted at `id`.
///
/// Leaf numbers are copied as they are, so a copy that does not start at
/// leaf 1 needs [`Tree::renumber_leaves`] before [`Tree::rebuild_index`].
pub fn copy_subtree(tree: &Tree, id: NodeId) -> Result<Tree, TreeError> {
    check_live(tree, id)?;

    let mut copy = Tree::new();
    copy.nodes = copy_nodes(tree, id, 0);
    copy.root = Some(0);
    copy.has_internal_labels = tree.has_internal_labels;
    copy.has_edge_lengths = tree.has_edge_lengths;
    copy.rooted = tree.rooted;

    refresh_derived(&mut copy);
    compute_path_lengths(&mut copy);

    Ok(copy)
}

/// Copy the subtree rooted at `id` into this arena, detached.
/// Returns the root of the copy, ready for [`insert_below`].
pub fn duplicate_subtree(tree: &mut Tree, id: NodeId) -> Result<NodeId, TreeError> {
    check_live(tree, id)?;

    let base = tree.nodes.len();
    let copies = copy_nodes(tree, id, base);
    tree.nodes.extend(copies);

    Ok(base)
}

/// Compact the arena by removing released nodes and remapping IDs.
/// This invalidates all existing NodeIds held outside, and the node index.
pub fn compact(tree: &mut Tree) {
    let mut old_to_new = HashMap::new();
    let mut new_nodes = Vec::with_capacity(tree.nodes.len());

    for old_node in tree.nodes.iter().filter(|n| !n.deleted) {
        old_to_new.insert(old_node.id, new_nodes.len());
        let mut node = old_node.clone();
        node.id = new_nodes.len();
        new_nodes.push(node);
    }

    let remap = |id: Option<NodeId>| id.and_then(|i| old_to_new.get(&i).copied());
    for node in new_nodes.iter_mut() {
        node.child = remap(node.child);
        node.sibling = remap(node.sibling);
        node.ancestor = remap(node.ancestor);
    }

    tree.root = remap(tree.root);
    tree.nodes = new_nodes;
    tree.index.clear();
    tree.leaf_by_label.clear();
}
