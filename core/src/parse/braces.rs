use crate::util::fast_map::FastHashMap;

/// Map each line holding an unmatched-on-that-line `{` to the line of its
/// matching `}`, by stack discipline.
///
/// A line containing both `{` and `}` is skipped entirely: a block opened
/// and closed on one line is invisible here. Only one marker's worth of
/// bookkeeping happens per line. A missing entry for an opener means the
/// structure is malformed and callers must stop descending into that block.
pub fn match_braces(lines: &[&str]) -> FastHashMap<usize, usize> {
    let mut pairs = FastHashMap::default();
    let mut stack: Vec<usize> = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        let opens = line.contains('{');
        let closes = line.contains('}');
        if opens && closes {
            continue;
        }
        if opens {
            stack.push(i);
        } else if closes {
            if let Some(open) = stack.pop() {
                pairs.insert(open, i);
            }
        }
    }
    pairs
}
