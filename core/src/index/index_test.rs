use super::{ExprRef, SymbolIndex};
use crate::parse::parse;
use crate::source::{Position, Range};

const DOC: &str = "\
main = fn(%x: f32[1,3], %y) -> i32 {
%1 = add %x %x // i32
%2 = mul %1 %y // f32[1,3]
%1 = neg %2
inner = fn(%z) -> i32 {
%3 = id %z
}
%4 = call inner %2
}";

#[test]
fn test_by_name_first_match_wins_on_duplicates() {
    let fun = parse(DOC);
    let index = SymbolIndex::build(&fun);
    // "%1" is defined on lines 1 and 3; the first wins
    let local = index.local_by_name("%1").unwrap();
    assert_eq!(local.range.begin.line, 1);
}

#[test]
fn test_flat_index_never_sees_nested_locals() {
    let fun = parse(DOC);
    let index = SymbolIndex::build(&fun);
    // "%3" lives one level down, inside `inner`
    assert!(index.local_by_name("%3").is_none());
    assert!(index.find_local_starting_at(5).is_none());
    let names: Vec<&str> = index.locals().iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["%1", "%2", "%1", "%4"]);
}

#[test]
fn test_resolve_at_position_on_own_name_is_self_reference() {
    let fun = parse(DOC);
    let index = SymbolIndex::build(&fun);
    match index.resolve_at_position(Position::new(1, 0)) {
        Some(ExprRef::Local(l)) => assert_eq!(l.name, "%1"),
        other => panic!("expected local self-reference, got {other:?}"),
    }
}

#[test]
fn test_resolve_at_position_on_operand() {
    let fun = parse(DOC);
    let index = SymbolIndex::build(&fun);
    match index.resolve_at_position(Position::new(1, 10)) {
        Some(ExprRef::Operand(o)) => {
            assert_eq!(o.name, "%x");
            assert_eq!(o.pos, Position::new(1, 9));
        }
        other => panic!("expected operand, got {other:?}"),
    }
}

#[test]
fn test_resolve_at_position_misses() {
    let fun = parse(DOC);
    let index = SymbolIndex::build(&fun);
    // between the name span and the first operand
    assert!(index.resolve_at_position(Position::new(1, 6)).is_none());
    // header line has no indexed local
    assert!(index.resolve_at_position(Position::new(0, 0)).is_none());
}

#[test]
fn test_find_users_reference_symmetry() {
    let fun = parse(DOC);
    let index = SymbolIndex::build(&fun);

    let users_of_1: Vec<u32> = index.find_users("%1").iter().map(|l| l.range.begin.line).collect();
    assert_eq!(users_of_1, vec![2]);

    let users_of_2: Vec<u32> = index.find_users("%2").iter().map(|l| l.range.begin.line).collect();
    assert_eq!(users_of_2, vec![3, 7]);

    assert!(index.find_users("%4").is_empty());
}

#[test]
fn test_resolve_param_at_character() {
    let fun = parse(DOC);
    let index = SymbolIndex::build(&fun);
    assert_eq!(index.resolve_param_at_character(10).unwrap().name, "%x");
    assert_eq!(index.resolve_param_at_character(25).unwrap().name, "%y");
    assert!(index.resolve_param_at_character(30).is_none());
}

#[test]
fn test_param_type_recovery_uses_bracket_heuristic() {
    let fun = parse(DOC);
    let index = SymbolIndex::build(&fun);
    // bracket form: first `],` segment with the `]` restored
    assert_eq!(index.param_by_name("%x").unwrap().typ, ": f32[1,3]");
    // fallback form: first `)` segment
    assert_eq!(index.param_by_name("%y").unwrap().typ, "");
}

#[test]
fn test_local_type_is_trailing_line_comment() {
    let fun = parse(DOC);
    let index = SymbolIndex::build(&fun);
    let local = index.local_by_name("%2").unwrap();
    assert_eq!(index.local_type(local), Some("f32[1,3]"));
    let untyped = index.local_by_name("%4").unwrap();
    assert_eq!(index.local_type(untyped), None);
}

#[test]
fn test_definition_at_resolves_locals_then_params() {
    let fun = parse(DOC);
    let index = SymbolIndex::build(&fun);
    // operand %1 on line 2 points at the first %1 definition
    let def = index.definition_at(Position::new(2, 9)).unwrap();
    assert_eq!(def.begin.line, 1);
    // operand %x has no local definition and falls back to the parameter
    let def = index.definition_at(Position::new(1, 9)).unwrap();
    assert_eq!(def, Range::new(Position::new(0, 10), Position::new(0, 12)));
    // nothing under the cursor
    assert!(index.definition_at(Position::new(0, 0)).is_none());
}

#[test]
fn test_references_at_local_and_param_lines() {
    let fun = parse(DOC);
    let index = SymbolIndex::build(&fun);

    let refs = index.references_at(Position::new(1, 0));
    assert_eq!(refs.len(), 1);
    assert_eq!(refs[0].begin.line, 2);

    // cursor on %y in the header finds its users
    let refs = index.references_at(Position::new(0, 25));
    assert_eq!(refs.len(), 1);
    assert_eq!(refs[0].begin.line, 2);

    // header position outside any parameter span
    assert!(index.references_at(Position::new(0, 33)).is_empty());
    // a line with no indexed local
    assert!(index.references_at(Position::new(5, 0)).is_empty());
}

#[test]
fn test_hover_composes_name_type_and_users() {
    let fun = parse(DOC);
    let index = SymbolIndex::build(&fun);

    let hover = index.hover_at(Position::new(2, 0)).unwrap();
    assert_eq!(hover, "%2 f32[1,3] users: 2 %1 %4");

    // operand of a defined local borrows its type
    let hover = index.hover_at(Position::new(3, 9)).unwrap();
    assert_eq!(hover, "%2 f32[1,3] users: 2 %1 %4");

    // operand with no definition has no type text
    let hover = index.hover_at(Position::new(1, 9)).unwrap();
    assert_eq!(hover, "%x users: 1 %1");
}

#[test]
fn test_synthetic_root_has_no_params() {
    let fun = parse("%1 = const 3\n%2 = add %1 %1");
    let index = SymbolIndex::build(&fun);
    assert!(fun.is_synthetic());
    assert_eq!(index.locals().len(), 2);
    assert!(index.resolve_param_at_character(0).is_none());
}
