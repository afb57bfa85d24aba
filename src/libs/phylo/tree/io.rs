use super::Tree;
use crate::libs::phylo::node::{Node, NodeId};

/// Options for Newick serialization.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// NEXUS-quote labels; when off, quote characters are stripped
    pub quoting: bool,
    /// Write SIMMAP histories `{state,time:state,time}` instead of plain lengths
    pub simmap: bool,
    /// Indentation unit for pretty printing (empty for single line)
    pub indent: String,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            quoting: true,
            simmap: false,
            indent: String::new(),
        }
    }
}

impl WriteOptions {
    pub fn with_quoting(mut self, on: bool) -> Self {
        self.quoting = on;
        self
    }

    pub fn with_simmap(mut self, on: bool) -> Self {
        self.simmap = on;
        self
    }

    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }
}

/// Quote a label following NEXUS rules.
///
/// A label is quoted if its first character is not a letter, or any later
/// character is not a letter, digit, space, `_` or `.`. Embedded single
/// quotes are doubled. Unquoted labels have their spaces written as `_`.
///
/// ```
/// use simtree::libs::phylo::tree::io::nexus_string;
///
/// assert_eq!(nexus_string("Homo sapiens"), "Homo_sapiens");
/// assert_eq!(nexus_string("func(x)"), "'func(x)'");
/// assert_eq!(nexus_string("it's"), "'it''s'");
/// assert_eq!(nexus_string("1abc"), "'1abc'");
/// ```
pub fn nexus_string(label: &str) -> String {
    let mut chars = label.chars();
    let need_quotes = match chars.next() {
        None => return String::new(),
        Some(first) => {
            !first.is_alphabetic()
                || chars.any(|c| !(c.is_alphanumeric() || c == ' ' || c == '_' || c == '.'))
        }
    };

    if need_quotes {
        format!("'{}'", label.replace('\'', "''"))
    } else {
        label.replace(' ', "_")
    }
}

fn format_label(label: &str, options: &WriteOptions) -> String {
    let s = nexus_string(label);
    if options.quoting {
        s
    } else {
        s.replace('\'', "")
    }
}

fn format_branch(node: &Node, options: &WriteOptions) -> String {
    if options.simmap && !node.history.is_empty() {
        let segments: Vec<String> = node
            .history
            .order
            .iter()
            .zip(node.history.times.iter())
            .map(|(state, time)| format!("{},{}", state, time))
            .collect();
        format!(":{{{}}}", segments.join(":"))
    } else {
        format!(":{}", node.edge_length)
    }
}

/// Serialize tree to a Newick string.
pub fn to_newick(tree: &Tree, options: &WriteOptions) -> String {
    match tree.get_root() {
        Some(root) => {
            let mut s = to_newick_recursive(tree, root, options, 0);
            s.push(';');
            s
        }
        None => ";".to_string(),
    }
}

/// Serialize tree to a sink, followed by a newline.
pub fn write_newick<W: std::io::Write>(
    tree: &Tree,
    sink: &mut W,
    options: &WriteOptions,
) -> std::io::Result<()> {
    writeln!(sink, "{}", to_newick(tree, options))
}

/// Serialize a specific subtree to a Newick string.
/// The branch leading to `id` is not written.
pub fn to_newick_subtree(tree: &Tree, id: NodeId, options: &WriteOptions) -> String {
    if tree.get_node(id).is_none() {
        return ";".to_string();
    }
    let mut s = to_newick_recursive(tree, id, options, 0);
    s.push(';');
    s
}

fn to_newick_recursive(tree: &Tree, id: NodeId, options: &WriteOptions, depth: usize) -> String {
    let node = &tree.nodes[id];
    let is_pretty = !options.indent.is_empty();
    let my_indent = if is_pretty {
        options.indent.repeat(depth)
    } else {
        String::new()
    };

    // The branch below the subtree root is never written
    let branch = if tree.has_edge_lengths && depth > 0 {
        format_branch(node, options)
    } else {
        String::new()
    };

    let children: Vec<NodeId> = tree.children(id).collect();
    if children.is_empty() {
        return format!("{}{}{}", my_indent, format_label(&node.label, options), branch);
    }

    let mut node_info = String::new();
    if tree.has_internal_labels && node.has_label() {
        node_info.push_str(&format_label(&node.label, options));
    }
    node_info.push_str(&branch);

    let children_strs: Vec<String> = children
        .into_iter()
        .map(|child| to_newick_recursive(tree, child, options, depth + 1))
        .collect();

    if is_pretty {
        format!(
            "{}(\n{}\n{}){}",
            my_indent,
            children_strs.join(",\n"),
            my_indent,
            node_info
        )
    } else {
        format!("({}){}", children_strs.join(","), node_info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_newick() {
        let tree = Tree::from_newick("(A:0.1,B:0.2)Root;").unwrap();
        assert_eq!(tree.to_newick(), "(A:0.1,B:0.2)Root;");

        // Pretty output
        let opt = WriteOptions::default().with_indent("  ");
        let expected_pretty = "(\n  A:0.1,\n  B:0.2\n)Root;";
        assert_eq!(to_newick(&tree, &opt), expected_pretty);
    }

    #[test]
    fn test_to_newick_nested_pretty() {
        let tree = Tree::from_newick("((A,B)I1,C)Root;").unwrap();

        let opt = WriteOptions::default().with_indent("\t");
        let expected = "(\n\t(\n\t\tA,\n\t\tB\n\t)I1,\n\tC\n)Root;";
        assert_eq!(to_newick(&tree, &opt), expected);
    }

    #[test]
    fn test_to_newick_flags() {
        // No lengths anywhere, no internal labels
        let tree = Tree::from_newick("((A,B),C);").unwrap();
        assert_eq!(tree.to_newick(), "((A,B),C);");

        // Internal labels are dropped when the flag is cleared
        let mut tree = Tree::from_newick("((A:1,B:2)AB:3,C:4)R;").unwrap();
        tree.set_has_internal_labels(false);
        assert_eq!(tree.to_newick(), "((A:1,B:2):3,C:4);");

        tree.set_has_edge_lengths(false);
        assert_eq!(tree.to_newick(), "((A,B),C);");
    }

    #[test]
    fn test_root_length_not_written() {
        let tree = Tree::from_newick("(A:1,B:2):5;").unwrap();
        assert_eq!(tree.to_newick(), "(A:1,B:2);");
    }

    #[test]
    fn test_to_newick_special_chars() {
        let tree = Tree::from_newick("('Homo sapiens','func(x)',Pan_paniscus);").unwrap();
        assert_eq!(tree.to_newick(), "(Homo_sapiens,'func(x)',Pan_paniscus);");

        let opt = WriteOptions::default().with_quoting(false);
        assert_eq!(
            to_newick(&tree, &opt),
            "(Homo_sapiens,func(x),Pan_paniscus);"
        );
    }

    #[test]
    fn test_to_newick_simmap() {
        let tree = Tree::from_newick("(A:{0,1.5:1,0.5},B:2);").unwrap();
        assert_eq!(tree.to_newick(), "(A:2,B:2);");

        let opt = WriteOptions::default().with_simmap(true);
        assert_eq!(to_newick(&tree, &opt), "(A:{0,1.5:1,0.5},B:{0,2});");
    }

    #[test]
    fn test_empty_tree() {
        let tree = Tree::new();
        assert_eq!(tree.to_newick(), ";");

        let mut buf = Vec::new();
        tree.write_newick(&mut buf, &WriteOptions::default()).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), ";\n");
    }

    #[test]
    fn test_subtree() {
        let tree = Tree::from_newick("((A:1,B:2)AB:3,C:4);").unwrap();
        let ab = tree.get_node_by_label("AB").unwrap();
        assert_eq!(
            to_newick_subtree(&tree, ab, &WriteOptions::default()),
            "(A:1,B:2)AB;"
        );
    }
}
