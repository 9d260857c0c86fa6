//! Record normalization: loosely-typed research records into canonical nodes.
//!
//! The raw research tree varies across data revisions: container keys change
//! case and singular/plural form, numbers arrive as strings, and any list may
//! be a lone object instead of an array. Every ambiguity is resolved here;
//! no raw shape leaks past this module.

use crate::graph::{push_unique, Cost, GraphError, GraphResult, Node, Position};
use serde_json::Value;

/// Unwrap the research container nesting and normalize every record.
///
/// Accepts `{ Research: { categories: { ResearchTree: [...] } } }` plus the
/// spelling and nesting variants of each level, down to a bare array of
/// trees. Records without an identifying key contribute no node; that is
/// omission, not an error. The only rejected input is a top level that is
/// neither an object nor an array.
pub fn extract_records(data: &Value) -> GraphResult<Vec<Node>> {
    if !data.is_object() && !data.is_array() {
        return Err(GraphError::MalformedInput);
    }
    let root = data.get("Research").unwrap_or(data);
    let cats = field(root, &["categories", "Categories"]).unwrap_or(root);
    let trees = field(cats, &["ResearchTree", "researchTree"]).unwrap_or(cats);

    let mut out = Vec::new();
    for tree in as_list(trees) {
        let category = tree.get("category").and_then(Value::as_str);
        let nodes = field(tree, &["nodes", "Nodes"]).unwrap_or(tree);
        let records = field(nodes, &["ResearchNode", "researchNode"]).unwrap_or(nodes);
        for record in as_list(records) {
            if let Some(node) = normalize_record(record, category) {
                out.push(node);
            }
        }
    }
    Ok(out)
}

/// Normalize one raw research record into a canonical node.
///
/// Returns `None` when the record lacks an identifying `research_name`.
/// Malformed entries inside the requirement, cost and award lists are
/// skipped individually rather than aborting the record.
pub fn normalize_record(record: &Value, category: Option<&str>) -> Option<Node> {
    let key = record.get("research_name")?.as_str()?;
    let mut node = Node::new(key);
    node.category = category.map(str::to_string);
    node.icon = record.get("icon").and_then(Value::as_str).map(str::to_string);
    node.pos = position(record.get("position"));
    node.requirement_tooltip_key =
        field(record, &["requirement_tooltip", "requirementTooltip"])
            .and_then(Value::as_str)
            .map(str::to_string);

    for req in wrapped_list(
        record,
        &["requirements", "Requirements"],
        &["ResearchNodeRequirement", "researchNodeRequirement"],
    ) {
        if let Some(name) = req.get("research_name").and_then(Value::as_str) {
            push_unique(&mut node.requires, name);
        }
    }

    for cost in wrapped_list(
        record,
        &["research_costs", "costs"],
        &["ResearchCost", "researchCost"],
    ) {
        let resource = cost.get("resource").and_then(Value::as_str);
        let count = cost.get("count").and_then(lenient_f64);
        if let (Some(resource), Some(count)) = (resource, count) {
            node.costs.push(Cost {
                resource: resource.to_string(),
                count,
                resource_name: None,
            });
        }
    }

    for award in wrapped_list(
        record,
        &["research_awards", "awards"],
        &["ResearchAward", "researchAward"],
    ) {
        let Some(blueprint) = award.get("blueprint").and_then(Value::as_str) else {
            continue;
        };
        push_unique(&mut node.awards, blueprint);
        if let Some(visible) = award.get("is_visible").and_then(lenient_bool) {
            node.awards_visibility.insert(blueprint.to_string(), visible);
        }
    }

    Some(node)
}

/// First present field among the accepted spellings.
fn field<'a>(value: &'a Value, names: &[&str]) -> Option<&'a Value> {
    names.iter().find_map(|n| value.get(*n))
}

/// Singular-vs-plural tolerance: a lone object stands in for a one-element
/// list, and null for an empty one.
fn as_list(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        Value::Null => Vec::new(),
        other => vec![other],
    }
}

/// A list behind two layers of spelling variants: the container field and
/// the repeated element field inside it.
fn wrapped_list<'a>(
    record: &'a Value,
    container_names: &[&str],
    element_names: &[&str],
) -> Vec<&'a Value> {
    field(record, container_names)
        .and_then(|container| field(container, element_names))
        .map(as_list)
        .unwrap_or_default()
}

/// Lenient numeric parse: a JSON number or a numeric-looking string.
fn lenient_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

/// Flexible truthy/falsy parse for the visibility flag. Anything not
/// recognizably boolean is unspecified.
fn lenient_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn position(value: Option<&Value>) -> Option<Position> {
    let obj = value?.as_object()?;
    Some(Position {
        x: obj.get("x").and_then(lenient_f64),
        y: obj.get("y").and_then(lenient_f64),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extracts_full_container_nesting() {
        let data = json!({
            "Research": {
                "categories": {
                    "ResearchTree": [
                        {
                            "category": "gui/research/category/base",
                            "nodes": {
                                "ResearchNode": [
                                    { "research_name": "research/name/hq" },
                                    { "research_name": "research/name/wall" }
                                ]
                            }
                        }
                    ]
                }
            }
        });
        let nodes = extract_records(&data).unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].key, "research/name/hq");
        assert_eq!(
            nodes[0].category.as_deref(),
            Some("gui/research/category/base")
        );
    }

    #[test]
    fn test_tolerates_spelling_and_singular_variants() {
        // Capitalized container names and a lone tree/node object instead
        // of arrays.
        let data = json!({
            "Categories": {
                "researchTree": {
                    "category": "cat",
                    "Nodes": {
                        "researchNode": { "research_name": "only" }
                    }
                }
            }
        });
        let nodes = extract_records(&data).unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].key, "only");
        assert_eq!(nodes[0].category.as_deref(), Some("cat"));
    }

    #[test]
    fn test_accepts_bare_tree_array() {
        let data = json!([
            {
                "nodes": { "ResearchNode": [ { "research_name": "a" } ] }
            }
        ]);
        let nodes = extract_records(&data).unwrap();
        assert_eq!(nodes.len(), 1);
    }

    #[test]
    fn test_rejects_non_collection_top_level() {
        assert!(extract_records(&json!("just a string")).is_err());
        assert!(extract_records(&json!(42)).is_err());
        assert!(extract_records(&json!(null)).is_err());
    }

    #[test]
    fn test_keyless_record_is_skipped_silently() {
        let data = json!({
            "ResearchTree": [{
                "nodes": {
                    "ResearchNode": [
                        { "icon": "gui/icons/orphan" },
                        { "research_name": "kept" }
                    ]
                }
            }]
        });
        let nodes = extract_records(&data).unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].key, "kept");
    }

    #[test]
    fn test_position_accepts_string_numbers() {
        let record = json!({
            "research_name": "n",
            "position": { "x": "12.5", "y": 40 }
        });
        let node = normalize_record(&record, None).unwrap();
        let pos = node.pos.unwrap();
        assert_eq!(pos.x, Some(12.5));
        assert_eq!(pos.y, Some(40.0));
    }

    #[test]
    fn test_position_requires_an_object() {
        let record = json!({ "research_name": "n", "position": "3,4" });
        let node = normalize_record(&record, None).unwrap();
        assert!(node.pos.is_none());
    }

    #[test]
    fn test_requirements_collect_keys_and_dedup() {
        let record = json!({
            "research_name": "n",
            "requirements": {
                "ResearchNodeRequirement": [
                    { "research_name": "a" },
                    { "research_name": "a" },
                    { "bogus": true },
                    { "research_name": "b" }
                ]
            }
        });
        let node = normalize_record(&record, None).unwrap();
        assert_eq!(node.requires, vec!["a", "b"]);
    }

    #[test]
    fn test_costs_parse_leniently_and_skip_malformed() {
        let record = json!({
            "research_name": "n",
            "research_costs": {
                "ResearchCost": [
                    { "resource": "carbonium", "count": "150" },
                    { "resource": "ironium", "count": 25 },
                    { "resource": "cobalt", "count": "lots" },
                    { "count": 10 }
                ]
            }
        });
        let node = normalize_record(&record, None).unwrap();
        assert_eq!(node.costs.len(), 2);
        assert_eq!(node.costs[0].resource, "carbonium");
        assert_eq!(node.costs[0].count, 150.0);
        assert_eq!(node.costs[1].count, 25.0);
    }

    #[test]
    fn test_awards_with_tri_state_visibility() {
        let record = json!({
            "research_name": "n",
            "research_awards": {
                "ResearchAward": [
                    { "blueprint": "buildings/wall", "is_visible": "1" },
                    { "blueprint": "buildings/gate", "is_visible": false },
                    { "blueprint": "buildings/tower" },
                    { "blueprint": "buildings/moat", "is_visible": "maybe" }
                ]
            }
        });
        let node = normalize_record(&record, None).unwrap();
        assert_eq!(node.awards.len(), 4);
        assert_eq!(node.awards_visibility.get("buildings/wall"), Some(&true));
        assert_eq!(node.awards_visibility.get("buildings/gate"), Some(&false));
        assert_eq!(node.awards_visibility.get("buildings/tower"), None);
        assert_eq!(node.awards_visibility.get("buildings/moat"), None);
    }

    #[test]
    fn test_singular_award_object() {
        let record = json!({
            "research_name": "n",
            "awards": { "researchAward": { "blueprint": "items/weapons/flamer_item" } }
        });
        let node = normalize_record(&record, None).unwrap();
        assert_eq!(node.awards, vec!["items/weapons/flamer_item"]);
    }

    #[test]
    fn test_requirement_tooltip_key_variants() {
        let record = json!({
            "research_name": "n",
            "requirement_tooltip": "gui/hud/requirement/power"
        });
        let node = normalize_record(&record, None).unwrap();
        assert_eq!(
            node.requirement_tooltip_key.as_deref(),
            Some("gui/hud/requirement/power")
        );
    }

    #[test]
    fn test_icon_captured() {
        let record = json!({ "research_name": "n", "icon": "gui/icons/research" });
        let node = normalize_record(&record, None).unwrap();
        assert_eq!(node.icon.as_deref(), Some("gui/icons/research"));
    }
}
