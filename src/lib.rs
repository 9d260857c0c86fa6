//! Techtree: research-tree dependency graph engine.
//!
//! Normalizes a game's raw, loosely-structured research records into a
//! canonical dependency graph and answers closure queries over it.
//!
//! # Core Concepts
//!
//! - **Nodes**: research items keyed by their GUI name, plus synthetic
//!   nodes standing in for awards (blueprints) that are not research items
//!   themselves
//! - **Edges**: `requires` comes from the raw data; `unlocks` is derived as
//!   its exact reverse after all nodes exist
//! - **Lookup**: optional flat key -> localized text table used to attach
//!   names and descriptions; without it the graph is purely structural
//!
//! # Example
//!
//! ```
//! use techtree::{build, closure, Node};
//!
//! let base = Node::new("research/name/base");
//! let mut adv = Node::new("research/name/adv");
//! adv.requires.push("research/name/base".into());
//!
//! let graph = build(vec![base, adv], None);
//! let result = closure(&graph, "research/name/adv");
//! assert_eq!(result.order, vec!["research/name/base", "research/name/adv"]);
//! ```

mod graph;
pub mod ingest;
pub mod query;
pub mod resolve;
pub mod text;

pub use graph::{
    build, AwardKind, Cost, Graph, GraphError, GraphPayload, GraphResult, GraphStats, Node,
    Position, ResolvedAward,
};
pub use ingest::{extract_records, normalize_record};
pub use query::{closure, sum_costs, ClosureResult};
pub use resolve::Lookup;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
