mod braces;
mod error;
mod tree;


pub use braces::match_braces;
pub use error::ParseError;
pub use tree::{parse, parse_with_diagnostics, Function, Local, Node, Operand, Var};
