//! Transitive prerequisite closure and cost aggregation.

use super::types::ClosureResult;
use crate::graph::Graph;
use std::collections::{BTreeMap, HashSet};

/// Compute the transitive prerequisite set of `target` in dependency order.
///
/// Depth-first over `requires`: prerequisites are appended before the node
/// that needs them, so the order ends with the target. Cycles are tolerated
/// with a visited/in-progress discipline; a cyclic graph yields a partial,
/// non-repeating order with the closing edge dropped. An unknown target
/// yields an empty result, not an error.
pub fn closure(graph: &Graph, target: &str) -> ClosureResult {
    if !graph.contains_key(target) {
        return ClosureResult::empty(target);
    }

    enum Frame<'a> {
        Enter(&'a str),
        Exit(&'a str),
    }

    let mut visited: HashSet<String> = HashSet::new();
    let mut in_progress: HashSet<&str> = HashSet::new();
    let mut order: Vec<String> = Vec::new();
    // Explicit stack instead of recursion: research chains can run deep.
    let mut stack = vec![Frame::Enter(target)];

    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Enter(key) => {
                if visited.contains(key) || in_progress.contains(key) {
                    continue;
                }
                let Some(node) = graph.get(key) else { continue };
                in_progress.insert(key);
                stack.push(Frame::Exit(key));
                // Reversed so prerequisites are explored in declaration order.
                for req in node.requires.iter().rev() {
                    stack.push(Frame::Enter(req.as_str()));
                }
            }
            Frame::Exit(key) => {
                in_progress.remove(key);
                visited.insert(key.to_string());
                order.push(key.to_string());
            }
        }
    }

    ClosureResult {
        target: target.to_string(),
        set: visited,
        order,
    }
}

/// Aggregate per-resource cost totals over a computed order.
///
/// Keys missing from the graph and non-finite amounts are skipped.
/// Permuting an order with the same key set yields the same totals.
pub fn sum_costs(graph: &Graph, order: &[String]) -> BTreeMap<String, f64> {
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    for key in order {
        let Some(node) = graph.get(key) else { continue };
        for cost in &node.costs {
            if !cost.count.is_finite() {
                continue;
            }
            *totals.entry(cost.resource.clone()).or_insert(0.0) += cost.count;
        }
    }
    totals
}
