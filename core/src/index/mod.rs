//! Per-document query structures built from a parsed [`Function`].
//!
//! The index is an explicit context object: build one per document and pass
//! it into queries. It borrows the tree it was built from and is rebuilt
//! wholesale on every reparse.

#[cfg(test)]
mod index_test;

use tracing::debug;

use crate::parse::{Function, Local, Operand, Var};
use crate::source::{in_span, Position, Range};
use crate::util::fast_map::{fast_hash_map_with_capacity, FastHashMap};

/// Anything a cursor can land on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExprRef<'a> {
    Local(&'a Local),
    Operand(&'a Operand),
    Var(&'a Var),
}

impl<'a> ExprRef<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            ExprRef::Local(l) => &l.name,
            ExprRef::Operand(o) => &o.name,
            ExprRef::Var(v) => &v.name,
        }
    }
}

/// Flat lookup structures over the direct call lines of one function.
///
/// Only one nesting level is indexed: locals of nested functions are not
/// flattened in, so queries never see them.
pub struct SymbolIndex<'a> {
    fun: &'a Function,
    locals: Vec<&'a Local>,
    by_name: FastHashMap<&'a str, &'a Local>,
    params_by_name: FastHashMap<&'a str, &'a Var>,
}

impl<'a> SymbolIndex<'a> {
    pub fn build(fun: &'a Function) -> Self {
        let locals: Vec<&Local> = fun.body.iter().filter_map(|n| n.as_local()).collect();

        // first occurrence wins on duplicate names
        let mut by_name = fast_hash_map_with_capacity(locals.len());
        for local in &locals {
            by_name.entry(local.name.as_str()).or_insert(*local);
        }
        let mut params_by_name = fast_hash_map_with_capacity(fun.vars.len());
        for var in &fun.vars {
            params_by_name.entry(var.name.as_str()).or_insert(var);
        }

        debug!(
            locals = locals.len(),
            params = fun.vars.len(),
            "built symbol index"
        );
        Self {
            fun,
            locals,
            by_name,
            params_by_name,
        }
    }

    pub fn function(&self) -> &'a Function {
        self.fun
    }

    /// The indexed call lines, in document order.
    pub fn locals(&self) -> &[&'a Local] {
        &self.locals
    }

    pub fn local_by_name(&self, name: &str) -> Option<&'a Local> {
        self.by_name.get(name).copied()
    }

    pub fn param_by_name(&self, name: &str) -> Option<&'a Var> {
        self.params_by_name.get(name).copied()
    }

    /// First indexed local whose range begins at `line`.
    pub fn find_local_starting_at(&self, line: u32) -> Option<&'a Local> {
        self.locals.iter().find(|l| l.range.begin.line == line).copied()
    }

    /// The expression under a cursor position: the local itself when the
    /// cursor is on its name, otherwise the operand whose span contains the
    /// character.
    pub fn resolve_at_position(&self, pos: Position) -> Option<ExprRef<'a>> {
        let local = self.find_local_starting_at(pos.line)?;
        let name_start = local.range.begin.character;
        if in_span(name_start, pos.character, name_start + local.name.len() as u32) {
            return Some(ExprRef::Local(local));
        }
        local
            .children
            .iter()
            .find(|o| in_span(o.pos.character, pos.character, o.pos.character + o.name.len() as u32))
            .map(ExprRef::Operand)
    }

    /// Every indexed local with an operand of the given name, in document
    /// order. Linear scan over locals and their children.
    pub fn find_users(&self, name: &str) -> Vec<&'a Local> {
        self.locals
            .iter()
            .filter(|l| l.children.iter().any(|o| o.name == name))
            .copied()
            .collect()
    }

    /// First declared parameter whose header span contains `character`.
    pub fn resolve_param_at_character(&self, character: u32) -> Option<&'a Var> {
        self.fun
            .vars
            .iter()
            .find(|v| in_span(v.range.begin.character, character, v.range.end.character))
    }

    /// A local's type annotation: the trailing segment of its definition
    /// text after the last `//` marker.
    pub fn local_type(&self, local: &'a Local) -> Option<&'a str> {
        local.define.rsplit_once("//").map(|(_, typ)| typ.trim())
    }

    /// Definition range for a name: local first, declared parameter second.
    pub fn definition_range_of(&self, name: &str) -> Option<Range> {
        if let Some(local) = self.local_by_name(name) {
            return Some(local.range);
        }
        self.param_by_name(name).map(|v| v.range)
    }

    /// Definition range for the expression under the cursor.
    pub fn definition_at(&self, pos: Position) -> Option<Range> {
        let expr = self.resolve_at_position(pos)?;
        self.definition_range_of(expr.name())
    }

    /// Ranges of every user of the definition at the cursor. On the header
    /// line the cursor selects a declared parameter instead of a local.
    pub fn references_at(&self, pos: Position) -> Vec<Range> {
        let name = match self.find_local_starting_at(pos.line) {
            Some(local) => local.name.clone(),
            None => {
                if pos.line != self.fun.range.begin.line {
                    return Vec::new();
                }
                match self.resolve_param_at_character(pos.character) {
                    Some(var) => var.name.clone(),
                    None => return Vec::new(),
                }
            }
        };
        self.find_users(&name).into_iter().map(|l| l.range).collect()
    }

    /// Hover text for the expression under the cursor:
    /// `<name> <type> users: <count> <user names>`.
    pub fn hover_at(&self, pos: Position) -> Option<String> {
        let expr = self.resolve_at_position(pos)?;
        let typ = match expr {
            ExprRef::Local(l) => self.local_type(l).unwrap_or(""),
            ExprRef::Operand(o) => self
                .local_by_name(&o.name)
                .and_then(|l| self.local_type(l))
                .unwrap_or(""),
            ExprRef::Var(v) => v.typ.as_str(),
        };
        let users = self.find_users(expr.name());

        let mut text = expr.name().to_string();
        if !typ.is_empty() {
            text.push(' ');
            text.push_str(typ);
        }
        text.push_str(&format!(" users: {}", users.len()));
        for user in &users {
            text.push(' ');
            text.push_str(&user.name);
        }
        Some(text)
    }
}
