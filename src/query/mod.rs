//! Read-only queries over a built graph.
//!
//! Provides the transitive prerequisite closure and cost aggregation over a
//! closure order. Queries never mutate the graph.

mod closure;
mod types;

pub use closure::{closure, sum_costs};
pub use types::ClosureResult;
