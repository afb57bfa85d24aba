//! Subcommand modules for the `simtree` binary.

pub mod draw;
pub mod label;
pub mod prune;
pub mod simmap;
pub mod stat;
pub mod subtree;
pub mod utils;
pub mod write;
