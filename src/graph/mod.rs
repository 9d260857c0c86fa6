//! Core graph data structures and construction.

mod builder;
mod node;


pub use builder::{build, Graph, GraphError, GraphPayload, GraphResult, GraphStats};
pub use node::{AwardKind, Cost, Node, Position, ResolvedAward};

pub(crate) use node::push_unique;
