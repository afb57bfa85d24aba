use super::Tree;
use crate::libs::phylo::node::NodeId;
use std::io::Write;

/// Glyphs used by the ASCII renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawStyle {
    pub horizontal: char,
    pub vertical: char,
    /// Where an internal node meets the edges to its children
    pub tee: char,
    /// Start of the edge to a first child
    pub left_turn: char,
    /// Start of the edge to a middle child
    pub sibling: char,
    /// Start of the edge to a last child
    pub right_turn: char,
}

impl Default for DrawStyle {
    fn default() -> Self {
        Self {
            horizontal: '-',
            vertical: '|',
            tee: '+',
            left_turn: '/',
            sibling: '+',
            right_turn: '\\',
        }
    }
}

impl DrawStyle {
    /// Unicode box-drawing glyphs
    pub fn boxed() -> Self {
        Self {
            horizontal: '─',
            vertical: '│',
            tee: '┤',
            left_turn: '┌',
            sibling: '├',
            right_turn: '└',
        }
    }
}

/// Column of every node: leaves sit at the far right, each internal node
/// as far left as the size of its subtree allows.
fn compute_heights(tree: &mut Tree) {
    super::ops::refresh_derived(tree);
    tree.max_height = 0;
    let root = match tree.root {
        Some(r) => r,
        None => return,
    };

    let leaves = tree.leaves;
    for id in super::traversal::postorder(tree, root) {
        let height = leaves.saturating_sub(tree.nodes[id].weight);
        tree.nodes[id].height = height;
        if height > tree.max_height {
            tree.max_height = height;
        }
    }
}

struct Drawer<'a, W: Write> {
    tree: &'a Tree,
    style: &'a DrawStyle,
    sink: &'a mut W,
    line: Vec<char>,
}

impl<W: Write> Drawer<'_, W> {
    fn blank(&mut self) {
        for c in self.line.iter_mut() {
            *c = ' ';
        }
    }

    fn emit(&mut self, stop: usize, label: &str) -> std::io::Result<()> {
        let mut s: String = self.line[..=stop].iter().collect();
        if !label.is_empty() {
            s.push(' ');
            s.push_str(label);
        }
        writeln!(self.sink, "{}", s)?;
        self.blank();
        Ok(())
    }

    fn is_the_child(&self, id: NodeId) -> bool {
        super::query::is_the_child(self.tree, id)
    }

    fn height(&self, id: NodeId) -> usize {
        self.tree.nodes[id].height
    }

    // child subtree, then the node itself, then the younger siblings
    fn traverse(&mut self, p: Option<NodeId>) -> std::io::Result<()> {
        if let Some(id) = p {
            let node = &self.tree.nodes[id];
            let (child, sibling, is_leaf) = (node.child, node.sibling, node.is_leaf);

            self.traverse(child)?;
            if is_leaf {
                self.pendant_edge(id)?;
            }
            if sibling.is_some() {
                self.interior_edge(id)?;
            }
            self.traverse(sibling)?;
        }
        Ok(())
    }

    /// Vertical lines of ancestors whose edges pass by the current line.
    fn fill_in_ancestors(&mut self, p: NodeId) {
        let tree = self.tree;
        let mut r = p;
        let mut q = tree.nodes[p].ancestor;

        while let Some(qid) = q {
            if tree.root == Some(qid) {
                break;
            }
            let q_anc = match tree.nodes[qid].ancestor {
                Some(a) => a,
                None => break,
            };

            let q_has_sibling = tree.nodes[qid].sibling.is_some();
            if (q_has_sibling && !self.is_the_child(r))
                || (!self.is_the_child(qid) && self.is_the_child(r))
            {
                let col = self.height(q_anc);
                let glyph = if r == p && self.height(qid) == col {
                    self.style.sibling
                } else {
                    self.style.vertical
                };
                self.line[col] = glyph;
            }

            r = qid;
            q = Some(q_anc);
        }
    }

    fn pendant_edge(&mut self, p: NodeId) -> std::io::Result<()> {
        let tree = self.tree;
        let node = &tree.nodes[p];
        let anc = match node.ancestor {
            Some(a) => a,
            None => {
                // single-leaf tree
                let line = format!("{} {}", self.style.horizontal, node.label);
                return writeln!(self.sink, "{}", line);
            }
        };

        let start = self.height(anc);
        let stop = self.height(p);
        for i in (start + 1)..=stop {
            self.line[i] = self.style.horizontal;
        }
        let glyph = if self.is_the_child(p) {
            self.style.left_turn
        } else if node.sibling.is_some() {
            self.style.sibling
        } else {
            self.style.right_turn
        };
        self.line[start] = glyph;
        self.fill_in_ancestors(p);

        self.emit(stop, &node.label)
    }

    fn interior_edge(&mut self, p: NodeId) -> std::io::Result<()> {
        let tree = self.tree;
        let r = match tree.nodes[p].ancestor {
            Some(a) => a,
            None => return Ok(()),
        };
        let stop = self.height(r);
        let first = self.is_the_child(p);

        if first {
            self.line[stop] = self.style.tee;

            if tree.root != Some(r) {
                if let Some(r_anc) = tree.nodes[r].ancestor {
                    let start = self.height(r_anc);
                    for i in (start + 1)..stop {
                        self.line[i] = self.style.horizontal;
                    }
                    let glyph = if start == stop {
                        self.style.vertical
                    } else if self.is_the_child(r) {
                        self.style.left_turn
                    } else if tree.nodes[r].sibling.is_some() {
                        self.style.sibling
                    } else {
                        self.style.right_turn
                    };
                    self.line[start] = glyph;
                    self.fill_in_ancestors(r);
                }
            }
        } else {
            self.line[stop] = self.style.vertical;
            if let Some(s) = tree.nodes[p].sibling {
                self.fill_in_ancestors(s);
            }
        }

        let label = if first {
            tree.nodes[r].label.as_str()
        } else {
            ""
        };
        self.emit(stop, label)
    }
}

/// Render the tree as ASCII art, one line per leaf and per internal edge.
///
/// Weights and column positions are recomputed first. An empty tree is
/// drawn as `(No tree)`.
pub fn draw<W: Write>(tree: &mut Tree, sink: &mut W, style: &DrawStyle) -> std::io::Result<()> {
    compute_heights(tree);

    let root = match tree.root {
        Some(r) => r,
        None => return writeln!(sink, "(No tree)"),
    };

    let width = tree.max_height + 2;
    let mut drawer = Drawer {
        tree,
        style,
        sink,
        line: vec![' '; width],
    };
    drawer.traverse(Some(root))
}

pub fn to_ascii(tree: &mut Tree, style: &DrawStyle) -> String {
    let mut buf = Vec::new();
    // writing to a Vec<u8> does not fail
    let _ = draw(tree, &mut buf, style);
    String::from_utf8_lossy(&buf).into_owned()
}
