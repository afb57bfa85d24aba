/// NodeId is an index into the Tree's node vector.
/// It is lightweight (Copy) and safe (no pointers).
pub type NodeId = usize;

/// SIMMAP annotation of one branch.
///
/// `order[i]` is the i-th state visited along the branch (root end first)
/// and `times[i]` the time spent in it. `total_time[s]` accumulates the
/// time spent in state `s` over the whole branch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateHistory {
    pub total_time: Vec<f64>,
    pub order: Vec<usize>,
    pub times: Vec<f64>,
}

impl StateHistory {
    /// An empty history whose state table holds `capacity` states.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            total_time: vec![0.0; capacity],
            order: Vec::new(),
            times: Vec::new(),
        }
    }

    /// The summary of a plain branch length: one segment in state 0.
    pub fn single(length: f64) -> Self {
        Self {
            total_time: vec![length],
            order: vec![0],
            times: vec![length],
        }
    }

    /// Append a segment. Returns `false`, leaving the history untouched,
    /// when `state` does not fit in the state table.
    pub fn push(&mut self, state: usize, time: f64) -> bool {
        match self.total_time.get_mut(state) {
            Some(slot) => {
                *slot += time;
                self.order.push(state);
                self.times.push(time);
                true
            }
            None => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of segments
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Sum of all segment times, i.e. the branch length.
    pub fn total(&self) -> f64 {
        self.times.iter().sum()
    }

    /// Time spent in `state`; zero for states outside the table.
    pub fn time_in(&self, state: usize) -> f64 {
        self.total_time.get(state).copied().unwrap_or(0.0)
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    /// Unique identifier for the node (index in the arena)
    pub id: NodeId,

    /// First offspring
    pub child: Option<NodeId>,
    /// Next node at the same level
    pub sibling: Option<NodeId>,
    /// Back reference, None for the root and for detached nodes
    pub ancestor: Option<NodeId>,

    // --- Payload ---
    pub label: String,
    pub is_leaf: bool,
    /// Length of the branch leading to this node
    pub edge_length: f64,
    pub history: StateHistory,
    pub marked: bool,

    // --- Derived, see Tree::refresh_derived and friends ---
    /// Number of leaves in the subtree
    pub weight: usize,
    /// Number of direct children
    pub degree: usize,
    /// Column in the ASCII rendering
    pub height: usize,
    /// Edges from the root
    pub depth: usize,
    /// Cumulative branch length from the root
    pub path_length: f64,

    // --- Positional identifiers ---
    pub leaf_number: usize,
    pub label_number: usize,
    pub index: usize,

    /// Soft deletion flag.
    /// Use Tree::compact() to permanently remove deleted nodes and reclaim memory.
    pub deleted: bool,
}

impl Node {
    /// Create a new empty node with a specific ID
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            child: None,
            sibling: None,
            ancestor: None,
            label: String::new(),
            is_leaf: false,
            edge_length: 0.0,
            history: StateHistory::default(),
            marked: false,
            weight: 0,
            degree: 0,
            height: 0,
            depth: 0,
            path_length: 0.0,
            leaf_number: 0,
            label_number: 0,
            index: 0,
            deleted: false,
        }
    }

    /// Set the label of the node
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    /// Set the label of the node (builder pattern)
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set the branch length together with its one-segment SIMMAP summary
    pub fn set_edge_length(&mut self, length: f64) {
        self.edge_length = length;
        self.history = StateHistory::single(length);
    }

    /// Set the branch length (builder pattern)
    pub fn with_edge_length(mut self, length: f64) -> Self {
        self.set_edge_length(length);
        self
    }

    /// Replace the SIMMAP history; the branch length becomes its total.
    pub fn set_history(&mut self, history: StateHistory) {
        self.edge_length = history.total();
        self.history = history;
    }

    /// Copy the payload of this node onto `other`, leaving its links alone.
    pub fn copy_payload_to(&self, other: &mut Node) {
        other.is_leaf = self.is_leaf;
        other.label = self.label.clone();
        other.index = self.index;
        other.leaf_number = self.leaf_number;
        other.label_number = self.label_number;
        other.edge_length = self.edge_length;
        other.history = self.history.clone();
    }

    pub fn has_label(&self) -> bool {
        !self.label.is_empty()
    }
}
