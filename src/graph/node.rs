//! Node representation in the research graph.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Coarse classification of an award, derived from the leading path segment
/// of its blueprint id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AwardKind {
    Building,
    Weapon,
    Resource,
}

/// A 2-D layout position from the raw record set.
///
/// Only nodes sourced from raw records carry one; synthetic award nodes
/// never do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

/// One research cost entry: a resource id and how much of it is consumed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cost {
    pub resource: String,
    pub count: f64,
    /// Localized resource label, attached when a lookup is supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_name: Option<String>,
}

/// A raw award id paired with its resolved display data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedAward {
    pub id: String,
    /// Display key composed by the resolver, when one exists in the lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<AwardKind>,
    /// Tri-state visibility from the raw record; absent means unspecified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

/// A node in the research graph: either a research item from the raw record
/// set or a synthetic node standing in for an award.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Stable unique key; primary key of the graph.
    pub key: String,
    /// Localized label, attached when a lookup is supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Tree category key; direct from the raw data or inherited from the
    /// nearest ancestor during category propagation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<Position>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub costs: Vec<Cost>,
    /// Raw award (blueprint) ids granted by completing this node.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub awards: Vec<String>,
    /// Per-award visibility flag; an absent id means unspecified.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub awards_visibility: BTreeMap<String, bool>,
    /// Prerequisite node keys. Set semantics over an insertion-ordered list.
    #[serde(default)]
    pub requires: Vec<String>,
    /// Reverse edges, derived from `requires` by the builder; never
    /// populated by hand.
    #[serde(default)]
    pub unlocks: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub awards_resolved: Vec<ResolvedAward>,
    /// Synthetic award nodes only: the research nodes granting this award.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub awarded_by: Vec<String>,
    /// Optional GUI key for the requirement hint tooltip.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirement_tooltip_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirement_tooltip: Option<String>,
    /// Set on synthetic award nodes; research nodes leave it unset.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<AwardKind>,
}

impl Node {
    /// Create an empty node with the given key.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    /// True when the node has no prerequisites.
    pub fn is_root(&self) -> bool {
        self.requires.is_empty()
    }

    /// Display label fallback: the localized name when attached, otherwise
    /// the last path segment of the key with underscores as spaces.
    pub fn display_name(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        let seg = self.key.rsplit('/').next().unwrap_or(&self.key);
        seg.replace('_', " ")
    }

    /// Merge a second record with the same key into this node.
    ///
    /// Scalar fields keep the first value seen; list fields union in
    /// insertion order, so a later record never drops data from an earlier
    /// one.
    pub fn merge(&mut self, other: Node) {
        merge_option(&mut self.name, other.name);
        merge_option(&mut self.description, other.description);
        merge_option(&mut self.category, other.category);
        merge_option(&mut self.category_name, other.category_name);
        merge_option(&mut self.icon, other.icon);
        merge_option(&mut self.pos, other.pos);
        merge_option(&mut self.requirement_tooltip_key, other.requirement_tooltip_key);
        merge_option(&mut self.requirement_tooltip, other.requirement_tooltip);
        merge_option(&mut self.kind, other.kind);
        for cost in other.costs {
            if !self.costs.iter().any(|c| c.resource == cost.resource) {
                self.costs.push(cost);
            }
        }
        for award in other.awards {
            push_unique(&mut self.awards, &award);
        }
        for (id, visible) in other.awards_visibility {
            self.awards_visibility.entry(id).or_insert(visible);
        }
        for req in other.requires {
            push_unique(&mut self.requires, &req);
        }
        for unlock in other.unlocks {
            push_unique(&mut self.unlocks, &unlock);
        }
        for owner in other.awarded_by {
            push_unique(&mut self.awarded_by, &owner);
        }
    }
}

fn merge_option<T>(slot: &mut Option<T>, value: Option<T>) {
    if slot.is_none() {
        *slot = value;
    }
}

/// Append `value` unless already present. Set semantics over an
/// insertion-ordered list.
pub(crate) fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}
