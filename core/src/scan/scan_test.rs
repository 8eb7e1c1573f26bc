use super::{percent_tokens, PercentToken};

fn tok(name: &str, offset: usize) -> PercentToken {
    PercentToken {
        name: name.to_string(),
        offset,
    }
}

#[test]
fn test_call_line_tokens_with_offsets() {
    let got = percent_tokens("%1 = add %2 %3");
    assert_eq!(got, vec![tok("%1", 0), tok("%2", 9), tok("%3", 12)]);
}

#[test]
fn test_underscore_and_alnum_names() {
    let got = percent_tokens("%out_0 = relu %conv_weight1");
    assert_eq!(got, vec![tok("%out_0", 0), tok("%conv_weight1", 14)]);
}

#[test]
fn test_bare_percent_is_not_a_token() {
    assert!(percent_tokens("a % b").is_empty());
    assert!(percent_tokens("100%").is_empty());
}

#[test]
fn test_adjacent_percents() {
    // "%%x": the first '%' has no ident byte after it, the second starts a token
    assert_eq!(percent_tokens("%%x"), vec![tok("%x", 1)]);
}

#[test]
fn test_token_inside_string_literal_still_matches() {
    let got = percent_tokens(r#"%1 = note "uses %2 here""#);
    assert_eq!(got, vec![tok("%1", 0), tok("%2", 16)]);
}

#[test]
fn test_offsets_are_byte_offsets() {
    // two-byte 'é' before the token
    let line = "é %x";
    let got = percent_tokens(line);
    assert_eq!(got, vec![tok("%x", 3)]);
}

#[test]
fn test_empty_line() {
    assert!(percent_tokens("").is_empty());
}
