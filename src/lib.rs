//! `simtree` - phylogenetic trees with SIMMAP state histories.
//!
//! The library lives in [`libs::phylo`]: a finite-state Newick parser,
//! an arena of first-child/next-sibling nodes, structural edits that keep
//! the cached counters honest, a Newick writer and an ASCII renderer.
//!
//! ```
//! use simtree::libs::phylo::Tree;
//!
//! let tree = Tree::from_newick("((A:1,B:2)AB:0.5,C:3);").unwrap();
//! assert_eq!(tree.num_leaves(), 3);
//! assert_eq!(tree.to_newick(), "((A:1,B:2)AB:0.5,C:3);");
//! ```

pub mod libs;
