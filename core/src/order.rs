//! The operation-order listing emitted next to IR dumps: one `op: dims`
//! record per line, `scalar` standing for an empty shape.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    pub op: String,
    pub shape: Vec<u32>,
}

/// Parse an order listing. Blank lines are dropped before indexing, so a
/// record's index matches its document line only in the dense files the
/// compiler writes. Unparsable dims degrade to an empty shape.
pub fn parse_order(text: &str) -> Vec<Order> {
    text.split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(|line| match line.split_once(':') {
            Some((op, dims)) => Order {
                op: op.trim().to_string(),
                shape: parse_dims(dims),
            },
            None => Order {
                op: line.trim().to_string(),
                shape: Vec::new(),
            },
        })
        .collect()
}

fn parse_dims(dims: &str) -> Vec<u32> {
    if dims.trim() == "scalar" {
        return Vec::new();
    }
    dims.split_whitespace().filter_map(|n| n.parse().ok()).collect()
}

/// Name of the dump file an order line points at: `{line+1}${op}`.
pub fn jump_target(line: usize, orders: &[Order]) -> Option<String> {
    orders.get(line).map(|o| format!("{}${}", line + 1, o.op))
}
