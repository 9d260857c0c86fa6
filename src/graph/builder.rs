//! Graph construction: seeding, lookup attachment, award resolution,
//! reverse edges, category propagation, and synthetic award nodes.

use super::node::{push_unique, Node, ResolvedAward};
use crate::resolve::{self, Lookup};
use crate::text::sanitize;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap, HashSet};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors surfaced to callers. Per-record and per-field problems never
/// reach here; they degrade to absent fields inside the build.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("malformed input: expected a collection of research records")]
    MalformedInput,

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Keyed research graph. Sorted keys keep serialization deterministic.
pub type Graph = BTreeMap<String, Node>;

/// Build the keyed graph from normalized nodes.
///
/// Passes run in a fixed order, each total over the growing map and
/// best-effort per node: missing lookup entries and unresolvable ids leave
/// fields absent rather than failing the build. Reverse edges and category
/// propagation run only after every node is present, so readers of the
/// returned graph never observe a partially-linked state.
pub fn build(nodes: Vec<Node>, lookup: Option<&Lookup>) -> Graph {
    let mut graph: Graph = BTreeMap::new();
    for node in nodes {
        match graph.entry(node.key.clone()) {
            Entry::Occupied(mut slot) => slot.get_mut().merge(node),
            Entry::Vacant(slot) => {
                slot.insert(node);
            }
        }
    }
    debug!(nodes = graph.len(), "seeded research graph");

    if let Some(lookup) = lookup {
        attach_lookup_data(&mut graph, lookup);
        resolve_awards(&mut graph, lookup);
    }
    link_reverse_edges(&mut graph);
    propagate_categories(&mut graph, lookup);
    add_synthetic_award_nodes(&mut graph, lookup);
    debug!(nodes = graph.len(), "linked research graph");
    graph
}

/// Attach localized names and descriptions from the lookup table.
pub(crate) fn attach_lookup_data(graph: &mut Graph, lookup: &Lookup) {
    for node in graph.values_mut() {
        if let Some(name) = lookup.get(&node.key) {
            node.name = Some(sanitize(name));
        }
        if let Some(cat_name) = node.category.as_ref().and_then(|c| lookup.get(c)) {
            node.category_name = Some(sanitize(cat_name));
        }
        // Research keys follow a `.../name/...` convention; the matching
        // description lives under the same path with `name` swapped for
        // `description`. Keys outside the convention just get no description.
        if node.key.contains("/name/") {
            let desc_key = node.key.replace("/name/", "/description/");
            if let Some(desc) = lookup.get(&desc_key) {
                node.description = Some(sanitize(desc));
            }
        }
        if let Some(tooltip) = node
            .requirement_tooltip_key
            .as_ref()
            .and_then(|k| lookup.get(k))
        {
            node.requirement_tooltip = Some(sanitize(tooltip));
        }
        for cost in &mut node.costs {
            let resource_key = format!("resource_name/{}", cost.resource);
            if let Some(label) = lookup.get(&resource_key) {
                cost.resource_name = Some(sanitize(label));
            }
        }
    }
}

/// Resolve raw award ids to display keys, names and descriptions, merging
/// in the visibility flag captured during normalization.
pub(crate) fn resolve_awards(graph: &mut Graph, lookup: &Lookup) {
    for node in graph.values_mut() {
        if node.awards.is_empty() {
            continue;
        }
        let mut resolved = Vec::with_capacity(node.awards.len());
        for id in &node.awards {
            let mut award = ResolvedAward {
                id: id.clone(),
                kind: resolve::classify(id),
                visible: node.awards_visibility.get(id).copied(),
                ..Default::default()
            };
            if let Some(key) = resolve::display_key(id, lookup) {
                award.name = lookup.get(&key).map(|s| sanitize(s));
                award.desc = resolve::description_key(id, lookup)
                    .and_then(|k| lookup.get(&k))
                    .map(|s| sanitize(s));
                award.key = Some(key);
            }
            resolved.push(award);
        }
        node.awards_resolved = resolved;
    }
}

/// Derive `unlocks` as the exact reverse of `requires`.
///
/// Prerequisites that name no existing node contribute no edge. Appends are
/// duplicate-guarded so repeated prerequisites never multiply edges.
pub(crate) fn link_reverse_edges(graph: &mut Graph) {
    let edges: Vec<(String, Vec<String>)> = graph
        .values()
        .map(|n| (n.key.clone(), n.requires.clone()))
        .collect();
    for (key, requires) in edges {
        for req in requires {
            if let Some(dep) = graph.get_mut(&req) {
                push_unique(&mut dep.unlocks, &key);
            }
        }
    }
}

/// Nodes without a direct category adopt the nearest ancestor category
/// reachable over `requires`.
///
/// The memo map is scoped to one build and discarded with it. A node
/// already on the current search path is a dead end, not an error, so
/// cyclic `requires` edges cannot hang the pass.
pub(crate) fn propagate_categories(graph: &mut Graph, lookup: Option<&Lookup>) {
    let mut memo: HashMap<String, Option<String>> = HashMap::new();
    let keys: Vec<String> = graph.keys().cloned().collect();
    for key in keys {
        if graph.get(&key).map_or(true, |n| n.category.is_some()) {
            continue;
        }
        let mut path = HashSet::new();
        if let Some(category) = resolve_category(&key, graph, &mut memo, &mut path) {
            let category_name = lookup
                .and_then(|l| l.get(&category))
                .map(|s| sanitize(s));
            if let Some(node) = graph.get_mut(&key) {
                node.category = Some(category);
                if category_name.is_some() {
                    node.category_name = category_name;
                }
            }
        }
    }
}

fn resolve_category(
    key: &str,
    graph: &Graph,
    memo: &mut HashMap<String, Option<String>>,
    path: &mut HashSet<String>,
) -> Option<String> {
    if let Some(cached) = memo.get(key) {
        return cached.clone();
    }
    let node = graph.get(key)?;
    if let Some(category) = &node.category {
        memo.insert(key.to_string(), Some(category.clone()));
        return Some(category.clone());
    }
    if path.contains(key) {
        return None;
    }
    path.insert(key.to_string());
    for req in &node.requires {
        if let Some(category) = resolve_category(req, graph, memo, path) {
            path.remove(key);
            memo.insert(key.to_string(), Some(category.clone()));
            return Some(category);
        }
    }
    path.remove(key);
    memo.insert(key.to_string(), None);
    None
}

/// Synthesize one node per distinct award id so awards appear in the graph
/// uniformly, whether or not they are research items themselves.
///
/// The node is keyed by the resolved display key when resolution succeeds,
/// or by an `award:`-prefixed synthetic key otherwise. Owners become both
/// `requires` and `awardedBy`; each owner's `unlocks` gains the award key.
pub(crate) fn add_synthetic_award_nodes(graph: &mut Graph, lookup: Option<&Lookup>) {
    let mut owners_by_award: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for node in graph.values() {
        for id in &node.awards {
            let owners = owners_by_award.entry(id.clone()).or_default();
            push_unique(owners, &node.key);
        }
    }

    for (award_id, owners) in owners_by_award {
        let mut synth = Node::new(format!("award:{award_id}"));
        synth.kind = resolve::classify(&award_id);
        if let Some(lookup) = lookup {
            if let Some(ui_key) = resolve::display_key(&award_id, lookup) {
                synth.name = lookup.get(&ui_key).map(|s| sanitize(s));
                synth.description = resolve::description_key(&award_id, lookup)
                    .and_then(|k| lookup.get(&k))
                    .map(|s| sanitize(s));
                synth.key = ui_key;
            }
        }
        let synth_key = synth.key.clone();

        if let Some(existing) = graph.get_mut(&synth_key) {
            // Display keys share a namespace with research keys, so a
            // collision is possible in principle; surface it, then merge
            // owner sets as a union.
            warn!(
                key = %synth_key,
                owners = owners.len(),
                "award key collides with an existing node; merging owner sets"
            );
            for owner in &owners {
                push_unique(&mut existing.requires, owner);
                push_unique(&mut existing.awarded_by, owner);
            }
        } else {
            synth.requires = owners.clone();
            synth.awarded_by = owners.clone();
            graph.insert(synth_key.clone(), synth);
        }

        for owner in &owners {
            if let Some(owner_node) = graph.get_mut(owner) {
                push_unique(&mut owner_node.unlocks, &synth_key);
            }
        }
    }
}

/// Summary statistics for a built graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
    /// Count of normalized input records.
    pub nodes: usize,
    /// Nodes with no prerequisites in the built graph.
    pub roots: usize,
    /// When the graph was built.
    pub built_at: DateTime<Utc>,
}

impl GraphStats {
    pub fn compute(record_count: usize, graph: &Graph) -> Self {
        Self {
            nodes: record_count,
            roots: graph.values().filter(|n| n.is_root()).count(),
            built_at: Utc::now(),
        }
    }
}

/// The serialized output contract: statistics plus the keyed node map.
/// This is the sole surface any renderer or browser consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphPayload {
    pub stats: GraphStats,
    pub nodes: Graph,
}

impl GraphPayload {
    pub fn new(record_count: usize, nodes: Graph) -> Self {
        let stats = GraphStats::compute(record_count, &nodes);
        Self { stats, nodes }
    }

    pub fn to_json(&self) -> GraphResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
