pub mod draw;
pub mod index;
pub mod io;
pub mod ops;
pub mod query;
pub mod traversal;

use super::error::{ParseErrorKind, TreeError};
use super::node::{Node, NodeId};
use std::collections::BTreeMap;

pub use query::Children;

/// A rooted multiway tree stored as an arena of first-child/next-sibling nodes.
///
/// Counters (`num_leaves`, `num_internals`) are maintained by the parser and
/// the edit operations; call [`Tree::refresh_derived`] after a run of edits
/// before relying on them. The node index behind [`Tree::find_leaf`] is a
/// cache, valid only right after [`Tree::rebuild_index`].
#[derive(Debug, Clone)]
pub struct Tree {
    /// Arena storage for all nodes
    pub(super) nodes: Vec<Node>,

    /// Optional root ID (a tree might be empty or in construction)
    pub(super) root: Option<NodeId>,

    pub(super) leaves: usize,
    pub(super) internals: usize,
    pub(super) max_path_length: f64,
    pub(super) max_height: usize,

    pub(super) has_internal_labels: bool,
    pub(super) has_edge_lengths: bool,
    pub(super) rooted: bool,
    pub(super) weight: f64,
    pub(super) name: String,

    /// Leaves by leaf number, then internal nodes
    pub(super) index: Vec<NodeId>,
    /// Leaf label -> position in `index`
    pub(super) leaf_by_label: BTreeMap<String, usize>,

    pub(super) error: Option<ParseErrorKind>,
}

impl Default for Tree {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
            leaves: 0,
            internals: 0,
            max_path_length: 0.0,
            max_height: 0,
            has_internal_labels: false,
            has_edge_lengths: false,
            rooted: false,
            weight: 1.0,
            name: String::new(),
            index: Vec::new(),
            leaf_by_label: BTreeMap::new(),
            error: None,
        }
    }
}

impl Tree {
    /// Create a new empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every node and counter, keeping name, weight and rootedness.
    pub(super) fn reset(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.leaves = 0;
        self.internals = 0;
        self.max_path_length = 0.0;
        self.max_height = 0;
        self.has_internal_labels = false;
        self.has_edge_lengths = false;
        self.index.clear();
        self.leaf_by_label.clear();
        self.error = None;
    }

    /// Add a new detached node to the arena. Returns the new node's ID.
    pub fn new_node(&mut self) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node::new(id));
        id
    }

    /// Number of live nodes in the arena, attached or not
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| !n.deleted).count()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn get_root(&self) -> Option<NodeId> {
        self.root
    }

    /// Get a reference to a node by ID.
    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id).filter(|n| !n.deleted)
    }

    /// Get a mutable reference to a node by ID.
    pub fn get_node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id).filter(|n| !n.deleted)
    }

    /// Set a node as the root of the tree.
    pub fn set_root(&mut self, id: NodeId) {
        if self.get_node(id).is_some() {
            self.root = Some(id);
        }
    }

    // --- Counters and flags ---

    pub fn num_leaves(&self) -> usize {
        self.leaves
    }

    pub fn num_internals(&self) -> usize {
        self.internals
    }

    pub fn max_path_length(&self) -> f64 {
        self.max_path_length
    }

    /// Largest rendering column seen by the last [`Tree::draw`]
    pub fn max_height(&self) -> usize {
        self.max_height
    }

    pub fn has_internal_labels(&self) -> bool {
        self.has_internal_labels
    }

    pub fn set_has_internal_labels(&mut self, on: bool) {
        self.has_internal_labels = on;
    }

    pub fn has_edge_lengths(&self) -> bool {
        self.has_edge_lengths
    }

    pub fn set_has_edge_lengths(&mut self, on: bool) {
        self.has_edge_lengths = on;
    }

    pub fn is_rooted(&self) -> bool {
        self.rooted
    }

    pub fn set_rooted(&mut self, on: bool) {
        self.rooted = on;
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn set_weight(&mut self, weight: f64) {
        self.weight = weight;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Kind of the last failed parse, None if the last parse succeeded
    pub fn error(&self) -> Option<ParseErrorKind> {
        self.error
    }

    pub fn error_message(&self) -> String {
        match self.error {
            Some(kind) => kind.to_string(),
            None => "No error".to_string(),
        }
    }

    // --- Delegation to ops ---

    pub fn refresh_derived(&mut self) {
        ops::refresh_derived(self)
    }

    pub fn compute_path_lengths(&mut self) {
        ops::compute_path_lengths(self)
    }

    pub fn node_depths(&mut self) {
        ops::node_depths(self)
    }

    pub fn mark_nodes(&mut self, on: bool) {
        ops::mark_nodes(self, on)
    }

    pub fn insert_below(&mut self, node: NodeId, anchor: NodeId) -> Result<NodeId, TreeError> {
        ops::insert_below(self, node, anchor)
    }

    pub fn remove_node(&mut self, node: NodeId) -> Result<Option<NodeId>, TreeError> {
        ops::remove_node(self, node)
    }

    pub fn copy_subtree(&self, node: NodeId) -> Result<Tree, TreeError> {
        ops::copy_subtree(self, node)
    }

    pub fn duplicate_subtree(&mut self, node: NodeId) -> Result<NodeId, TreeError> {
        ops::duplicate_subtree(self, node)
    }

    pub fn compact(&mut self) {
        ops::compact(self)
    }

    // --- Delegation to index ---

    pub fn rebuild_index(&mut self) -> Result<(), TreeError> {
        index::rebuild_index(self)
    }

    pub fn renumber_leaves(&mut self) {
        index::renumber_leaves(self)
    }

    pub fn find_leaf(&self, label: &str) -> Option<NodeId> {
        index::find_leaf(self, label)
    }

    /// Node ids in index order, as of the last [`Tree::rebuild_index`]
    pub fn node_index(&self) -> &[NodeId] {
        &self.index
    }

    // --- Delegation to query ---

    pub fn children(&self, id: NodeId) -> Children<'_> {
        query::children(self, id)
    }

    pub fn is_the_child(&self, id: NodeId) -> bool {
        query::is_the_child(self, id)
    }

    pub fn left_sibling_of(&self, id: NodeId) -> Option<NodeId> {
        query::left_sibling_of(self, id)
    }

    pub fn rightmost_sibling(&self, id: NodeId) -> NodeId {
        query::rightmost_sibling(self, id)
    }

    pub fn is_left_descendant_of(&self, id: NodeId, q: NodeId) -> bool {
        query::is_left_descendant_of(self, id, q)
    }

    pub fn find_nodes<F>(&self, predicate: F) -> Vec<NodeId>
    where
        F: Fn(&Node) -> bool,
    {
        query::find_nodes(self, predicate)
    }

    pub fn get_node_by_label(&self, label: &str) -> Option<NodeId> {
        query::get_node_by_label(self, label)
    }

    pub fn get_leaves(&self) -> Vec<NodeId> {
        match self.root {
            Some(root) => query::get_leaves(self, root),
            None => Vec::new(),
        }
    }

    pub fn get_leaf_labels(&self) -> Vec<String> {
        self.get_leaves()
            .into_iter()
            .map(|id| self.nodes[id].label.clone())
            .collect()
    }

    // --- Delegation to traversal ---

    pub fn preorder(&self, start_node: NodeId) -> Vec<NodeId> {
        traversal::preorder(self, start_node)
    }

    pub fn postorder(&self, start_node: NodeId) -> Vec<NodeId> {
        traversal::postorder(self, start_node)
    }

    // --- Delegation to io ---

    pub fn to_newick(&self) -> String {
        io::to_newick(self, &io::WriteOptions::default())
    }

    pub fn to_newick_with(&self, options: &io::WriteOptions) -> String {
        io::to_newick(self, options)
    }

    pub fn write_newick<W: std::io::Write>(
        &self,
        sink: &mut W,
        options: &io::WriteOptions,
    ) -> std::io::Result<()> {
        io::write_newick(self, sink, options)
    }

    // --- Delegation to draw ---

    pub fn draw<W: std::io::Write>(&mut self, sink: &mut W) -> std::io::Result<()> {
        draw::draw(self, sink, &draw::DrawStyle::default())
    }

    pub fn draw_with<W: std::io::Write>(
        &mut self,
        sink: &mut W,
        style: &draw::DrawStyle,
    ) -> std::io::Result<()> {
        draw::draw(self, sink, style)
    }

    pub fn to_ascii(&mut self) -> String {
        draw::to_ascii(self, &draw::DrawStyle::default())
    }
}
