//! Pure composition of core parse/index/diagnostic results into LSP types.
//! Every function here re-parses the text it is handed; the server keeps no
//! analysis state between requests.

use tower_lsp::lsp_types::{
    Diagnostic, DiagnosticSeverity, DocumentSymbol, Hover, HoverContents, Location, MarkedString,
    Position, Range, SymbolKind, Url,
};

use nir_core::{extract_diagnostics, order, parse, parse_with_diagnostics, Function, SymbolIndex};

/// Result of analyzing one IR document.
#[derive(Debug, Clone)]
pub struct DocumentAnalysis {
    pub symbols: Vec<DocumentSymbol>,
    pub diagnostics: Vec<Diagnostic>,
}

pub fn analyze_document(text: &str) -> DocumentAnalysis {
    let (fun, errors) = parse_with_diagnostics(text);

    let mut diagnostics: Vec<Diagnostic> = errors
        .iter()
        .map(|e| {
            Diagnostic::new(
                Range::new(
                    to_lsp_position(e.position),
                    Position::new(e.position.line, u32::MAX),
                ),
                Some(DiagnosticSeverity::ERROR),
                None,
                Some("nir".to_string()),
                e.message.clone(),
                None,
                None,
            )
        })
        .collect();
    diagnostics.extend(extract_diagnostics(&fun).into_iter().map(|d| {
        Diagnostic::new(
            to_lsp_range(d.range),
            Some(DiagnosticSeverity::ERROR),
            None,
            Some("nir".to_string()),
            d.message,
            None,
            None,
        )
    }));

    DocumentAnalysis {
        symbols: document_symbols(&fun),
        diagnostics,
    }
}

/// Function outline: the parsed root when it is a real function, with
/// nested functions as children; a synthetic root contributes only its
/// body's functions.
pub fn document_symbols(fun: &Function) -> Vec<DocumentSymbol> {
    if fun.is_synthetic() {
        child_symbols(fun)
    } else {
        vec![symbol_of(fun)]
    }
}

fn child_symbols(fun: &Function) -> Vec<DocumentSymbol> {
    fun.body.iter().filter_map(|n| n.as_function()).map(symbol_of).collect()
}

fn symbol_of(fun: &Function) -> DocumentSymbol {
    let range = to_lsp_range(fun.range);
    let children = child_symbols(fun);
    DocumentSymbol {
        name: fun.name.clone(),
        detail: None,
        kind: SymbolKind::FUNCTION,
        tags: None,
        #[allow(deprecated)]
        deprecated: None,
        range,
        // the function name opens its header line
        selection_range: Range::new(
            range.start,
            Position::new(fun.range.begin.line, fun.name.len() as u32),
        ),
        children: if children.is_empty() { None } else { Some(children) },
    }
}

/// Definition location for the expression under the cursor.
pub fn definition(text: &str, position: Position, uri: &Url) -> Option<Location> {
    let fun = parse(text);
    let index = SymbolIndex::build(&fun);
    let range = index.definition_at(from_lsp_position(position))?;
    Some(Location::new(uri.clone(), to_lsp_range(range)))
}

/// Locations of every user of the definition (or header parameter) at the
/// cursor.
pub fn references(text: &str, position: Position, uri: &Url) -> Vec<Location> {
    let fun = parse(text);
    let index = SymbolIndex::build(&fun);
    index
        .references_at(from_lsp_position(position))
        .into_iter()
        .map(|r| Location::new(uri.clone(), to_lsp_range(r)))
        .collect()
}

pub fn hover(text: &str, position: Position) -> Option<Hover> {
    let fun = parse(text);
    let index = SymbolIndex::build(&fun);
    let contents = index.hover_at(from_lsp_position(position))?;
    Some(Hover {
        contents: HoverContents::Scalar(MarkedString::String(contents)),
        range: None,
    })
}

/// The compiler names its order listing `out_shape_list`.
pub fn is_order_document(uri: &Url) -> bool {
    uri.path().ends_with("out_shape_list")
}

/// Jump target for a line of an order listing: the dump file named
/// `{line+1}${op}` next to the listing.
pub fn order_jump_location(text: &str, line: u32, uri: &Url) -> Option<Location> {
    let orders = order::parse_order(text);
    let target = order::jump_target(line as usize, &orders)?;

    let path = uri.path();
    let dir_end = path.rfind('/')? + 1;
    let mut target_uri = uri.clone();
    target_uri.set_path(&format!("{}{}", &path[..dir_end], target));
    Some(Location::new(target_uri, Range::default()))
}

pub fn to_lsp_position(pos: nir_core::Position) -> Position {
    Position::new(pos.line, pos.character)
}

pub fn to_lsp_range(range: nir_core::Range) -> Range {
    Range::new(to_lsp_position(range.begin), to_lsp_position(range.end))
}

pub fn from_lsp_position(pos: Position) -> nir_core::Position {
    nir_core::Position::new(pos.line, pos.character)
}
