pub mod diag;
pub mod index;
pub mod order;
pub mod parse;
pub mod scan;
pub mod source;
pub mod util;

pub use diag::{extract_diagnostics, IrDiagnostic};
pub use index::{ExprRef, SymbolIndex};
pub use parse::{parse, parse_with_diagnostics, Function, Local, Node, Operand, ParseError, Var};
pub use source::{Position, Range};
