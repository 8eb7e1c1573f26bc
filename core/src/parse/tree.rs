use serde::Serialize;
use tracing::{debug, warn};

use crate::parse::{match_braces, ParseError};
use crate::scan::percent_tokens;
use crate::source::{Position, Range};
use crate::util::fast_map::FastHashMap;

/// A use-site reference: one `%name` token inside a call line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Operand {
    pub name: String,
    pub pos: Position,
}

/// A single-line assignment. `children` holds every `%` token on the line
/// except the first, which is the assigned name's own echo.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Local {
    pub name: String,
    pub define: String,
    pub children: Vec<Operand>,
    pub range: Range,
}

/// A declared parameter of a function header. `typ` is heuristically
/// recovered text, not a verified type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Var {
    pub name: String,
    pub typ: String,
    pub range: Range,
}

/// A brace-delimited block with its own parameter list and body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Function {
    pub name: String,
    pub define: String,
    pub body: Vec<Node>,
    pub vars: Vec<Var>,
    pub range: Range,
}

/// Name of the synthetic wrapper produced when the top level is not exactly
/// one function.
pub const SYNTHETIC_ROOT: &str = "empty";

impl Function {
    /// True for the wrapper function synthesized around a bare top-level
    /// sequence.
    pub fn is_synthetic(&self) -> bool {
        self.name == SYNTHETIC_ROOT && self.define.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Node {
    Local(Local),
    Function(Function),
}

impl Node {
    pub fn as_local(&self) -> Option<&Local> {
        match self {
            Node::Local(l) => Some(l),
            Node::Function(_) => None,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Node::Function(f) => Some(f),
            Node::Local(_) => None,
        }
    }
}

/// Full-reparse entry point. Structurally broken input degrades to a
/// partial tree instead of failing; see [`parse_with_diagnostics`] for the
/// recorded failures.
pub fn parse(text: &str) -> Function {
    parse_with_diagnostics(text).0
}

/// Like [`parse`], also returning the structural malformations encountered.
/// Each failure is contained to its enclosing block: the remainder of that
/// block stays unparsed, siblings and ancestors are kept.
pub fn parse_with_diagnostics(text: &str) -> (Function, Vec<ParseError>) {
    let lines: Vec<&str> = text.split('\n').collect();
    let braces = match_braces(&lines);
    let mut builder = TreeBuilder {
        lines: &lines,
        braces,
        errors: Vec::new(),
    };
    let nodes = builder.parse_range(0, lines.len());
    debug!(
        lines = lines.len(),
        nodes = nodes.len(),
        errors = builder.errors.len(),
        "parsed IR document"
    );
    let root = into_root(nodes, &lines);
    (root, builder.errors)
}

/// Exactly one top-level function is returned unwrapped; anything else is
/// wrapped in a synthetic function spanning the whole document.
fn into_root(mut nodes: Vec<Node>, lines: &[&str]) -> Function {
    if nodes.len() == 1 && matches!(nodes[0], Node::Function(_)) {
        match nodes.pop() {
            Some(Node::Function(f)) => return f,
            _ => unreachable!(),
        }
    }
    let last = lines.len().saturating_sub(1);
    Function {
        name: SYNTHETIC_ROOT.to_string(),
        define: String::new(),
        body: nodes,
        vars: Vec::new(),
        range: Range::of_lines(0, last, lines.get(last).copied().unwrap_or("")),
    }
}

struct TreeBuilder<'a> {
    lines: &'a [&'a str],
    braces: FastHashMap<usize, usize>,
    errors: Vec<ParseError>,
}

impl<'a> TreeBuilder<'a> {
    fn parse_range(&mut self, mut i: usize, end: usize) -> Vec<Node> {
        let mut nodes = Vec::new();
        while i < end {
            let line = self.lines[i];
            if line.trim().is_empty() {
                i += 1;
                continue;
            }
            if line.contains("->") {
                match self.parse_function(i) {
                    Some((f, next)) => {
                        nodes.push(Node::Function(f));
                        i = next;
                    }
                    // Unmatched brace: the rest of this block is unparsed.
                    None => break,
                }
            } else {
                let (local, next) = self.parse_call(i);
                nodes.push(Node::Local(local));
                i = next;
            }
        }
        nodes
    }

    /// Header line (contains `->`) plus its brace-delimited body.
    fn parse_function(&mut self, i: usize) -> Option<(Function, usize)> {
        let line = self.lines[i];
        let (name, decl, decl_offset) = split_assign(line);

        // The opening brace either trails the header or sits on the next
        // line by itself; both layouts occur in IR dumps.
        let (open, close) = match self.braces.get(&i).or_else(|| self.braces.get(&(i + 1))) {
            Some(&close) => (if self.braces.contains_key(&i) { i } else { i + 1 }, close),
            None => {
                warn!(line = i, name = %name, "function header without matching close brace");
                self.errors
                    .push(ParseError::at_line(format!("unmatched `{{` for function `{name}`"), i));
                return None;
            }
        };

        let vars = parse_vars(i, decl, decl_offset);
        let body = self.parse_range(open + 1, close);
        let define = self.lines[i..=close].join("\n");
        let function = Function {
            name,
            define,
            body,
            vars,
            range: Range::of_lines(i, close, self.lines[close]),
        };
        Some((function, close + 1))
    }

    /// A single-line assignment/call.
    fn parse_call(&mut self, i: usize) -> (Local, usize) {
        let line = self.lines[i];
        let (name, define, _) = split_assign(line);
        let children = percent_tokens(line)
            .into_iter()
            .skip(1)
            .map(|t| Operand {
                name: t.name,
                pos: Position::new(i as u32, t.offset as u32),
            })
            .collect();
        let local = Local {
            name,
            define: define.to_string(),
            children,
            range: Range::of_lines(i, i, line),
        };
        (local, i + 1)
    }
}

/// Split on the first `=`: trimmed left side is the name, the raw right
/// side is the definition text. Lines without `=` keep the whole trimmed
/// line as the name and an empty definition.
fn split_assign(line: &str) -> (String, &str, usize) {
    match line.split_once('=') {
        Some((name, rest)) => (name.trim().to_string(), rest, line.len() - rest.len()),
        None => (line.trim().to_string(), "", line.len()),
    }
}

/// Parameters of a header's declaration text, with line-absolute ranges.
fn parse_vars(header_line: usize, decl: &str, decl_offset: usize) -> Vec<Var> {
    percent_tokens(decl)
        .into_iter()
        .map(|t| {
            let after = &decl[t.offset + t.name.len()..];
            let begin = (decl_offset + t.offset) as u32;
            Var {
                typ: recover_type(after),
                range: Range::new(
                    Position::new(header_line as u32, begin),
                    Position::new(header_line as u32, begin + t.name.len() as u32),
                ),
                name: t.name,
            }
        })
        .collect()
}

/// Recover a parameter's type from the text following its token, assuming
/// the dialect's array-shape bracket syntax: first segment up to `],` with
/// the `]` restored, falling back to the first segment up to `)`. Purely
/// textual; never fails.
fn recover_type(after: &str) -> String {
    match after.split_once("],") {
        Some((head, _)) => format!("{head}]").trim().to_string(),
        None => after.split(')').next().unwrap_or("").trim().to_string(),
    }
}
