use serde::Serialize;

use crate::parse::Function;
use crate::source::Range;

/// Marker the compiler embeds in a definition it could not lower.
const INVALID_MARKER: &str = "invalid";

/// A positioned diagnostic extracted from a parsed document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IrDiagnostic {
    pub range: Range,
    pub message: String,
}

/// Scan the top-level function's direct call lines for the `invalid` error
/// marker. The message is everything after `invalid:`, or the whole trimmed
/// definition text when the colon form is absent. Multi-line definitions
/// (function bodies) are never scanned.
pub fn extract_diagnostics(fun: &Function) -> Vec<IrDiagnostic> {
    fun.body
        .iter()
        .filter_map(|n| n.as_local())
        .filter(|l| !l.define.contains('\n') && l.define.contains(INVALID_MARKER))
        .map(|l| {
            let message = match l.define.find("invalid:") {
                Some(i) => l.define[i + "invalid:".len()..].trim().to_string(),
                None => l.define.trim().to_string(),
            };
            IrDiagnostic {
                range: l.range,
                message,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse;
    use crate::source::{Position, Range};

    #[test]
    fn test_invalid_marker_yields_positioned_diagnostic() {
        let fun = parse("%1 = op invalid: bad shape\n%2 = add %1 %1");
        let diags = extract_diagnostics(&fun);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].message, "bad shape");
        assert_eq!(
            diags[0].range,
            Range::new(Position::new(0, 0), Position::new(0, 25))
        );
    }

    #[test]
    fn test_multiline_function_define_is_never_scanned() {
        let src = "%1 = const 3\nf = fn(%x) -> invalid_t {\n%2 = add %x %x\n}";
        let fun = parse(src);
        let f = fun.body[1].as_function().unwrap();
        // the nested function's define contains "invalid" but spans lines
        assert!(f.define.contains(INVALID_MARKER));
        assert!(extract_diagnostics(&fun).is_empty());
    }

    #[test]
    fn test_marker_without_colon_falls_back_to_define_text() {
        let fun = parse("%1 = op invalid result");
        let diags = extract_diagnostics(&fun);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].message, "op invalid result");
    }

    #[test]
    fn test_clean_document_has_no_diagnostics() {
        let fun = parse("%1 = const 3\n%2 = add %1 %1");
        assert!(extract_diagnostics(&fun).is_empty());
    }
}
