use super::Tree;
use crate::libs::phylo::error::TreeError;
use crate::libs::phylo::node::NodeId;
use std::collections::BTreeMap;

/// Nodes in build order: first the child chain, then the sibling chain,
/// then the node itself.
fn collect(tree: &Tree, p: Option<NodeId>, out: &mut Vec<NodeId>) {
    if let Some(id) = p {
        collect(tree, tree.nodes[id].child, out);
        collect(tree, tree.nodes[id].sibling, out);
        out.push(id);
    }
}

/// Rebuild the node index and the leaf-label map.
///
/// Leaf `n` (by `leaf_number`) lands at position `n - 1`; internal nodes
/// follow from position `num_leaves()`. Every node's `index` field is set
/// to its position. Fails, leaving the old index in place, when leaf
/// numbers are not a permutation of `1..=num_leaves()`.
pub fn rebuild_index(tree: &mut Tree) -> Result<(), TreeError> {
    super::ops::refresh_derived(tree);

    let total = tree.leaves + tree.internals;
    let mut slots: Vec<Option<NodeId>> = vec![None; total];
    let mut by_label = BTreeMap::new();

    let mut order = Vec::with_capacity(total);
    if let Some(root) = tree.root {
        collect(tree, Some(root), &mut order);
    }

    let mut count = tree.leaves;
    let mut positions = Vec::with_capacity(order.len());
    for &id in &order {
        let node = &tree.nodes[id];
        let pos = if node.is_leaf {
            let n = node.leaf_number;
            if n == 0 || n > tree.leaves {
                return Err(TreeError::Logic(format!(
                    "Leaf {} has number {}, expected 1..={}",
                    node.label, n, tree.leaves
                )));
            }
            by_label.insert(node.label.clone(), n - 1);
            n - 1
        } else {
            count += 1;
            count - 1
        };

        if pos >= total || slots[pos].is_some() {
            return Err(TreeError::Logic(format!(
                "Index position {} assigned twice",
                pos
            )));
        }
        slots[pos] = Some(id);
        positions.push((id, pos));
    }

    for (id, pos) in positions {
        tree.nodes[id].index = pos;
    }
    tree.index = slots.into_iter().flatten().collect();
    tree.leaf_by_label = by_label;

    log::debug!("Indexed {} nodes", tree.index.len());
    Ok(())
}

/// Number the leaves `1..=n` from left to right.
pub fn renumber_leaves(tree: &mut Tree) {
    let leaves = tree.get_leaves();
    for (i, id) in leaves.into_iter().enumerate() {
        tree.nodes[id].leaf_number = i + 1;
    }
}

/// Look up a leaf by label through the index.
/// Only meaningful right after [`rebuild_index`].
pub fn find_leaf(tree: &Tree, label: &str) -> Option<NodeId> {
    tree.leaf_by_label
        .get(label)
        .and_then(|&pos| tree.index.get(pos))
        .copied()
}
