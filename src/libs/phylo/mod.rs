pub mod error;
pub mod node;
pub mod parser;
pub mod reader;
pub mod token;
pub mod tree;

pub use error::{ParseError, ParseErrorKind, TreeError};
pub use node::{Node, NodeId, StateHistory};
pub use parser::ParserConfig;
pub use tree::draw::DrawStyle;
pub use tree::io::WriteOptions;
pub use tree::Tree;
