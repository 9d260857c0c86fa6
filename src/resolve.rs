//! Award identifier resolution.
//!
//! Award ids are slash-delimited blueprint paths (`buildings/furnace_lvl_2`,
//! `items/weapons/flamer_item`, `resources/carbonium`). The leading segment
//! carries the coarse kind; the trailing segment is the base name, possibly
//! with a level or tier suffix. Resolution composes kind-specific GUI lookup
//! keys in priority order and returns the first one present in the lookup.

use crate::graph::AwardKind;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Flat key -> localized display text table.
pub type Lookup = HashMap<String, String>;

fn level_suffix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)_lvl_\d+$").expect("invalid level pattern"))
}

fn tier_suffix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)_(?:advanced|superior|extreme)_item$").expect("invalid tier pattern")
    })
}

fn item_suffix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)_item$").expect("invalid item pattern"))
}

// Numbered (_01) or two-letter (_sw) variants of the same base structure.
fn variant_suffix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)_(?:\d+|[a-z]{2})$").expect("invalid variant pattern"))
}

/// Classify an award id by its leading path segment. Independent of whether
/// key resolution succeeds.
pub fn classify(id: &str) -> Option<AwardKind> {
    match id.split('/').next() {
        Some("buildings") => Some(AwardKind::Building),
        Some("items") => Some(AwardKind::Weapon),
        Some("resources") => Some(AwardKind::Resource),
        _ => None,
    }
}

/// Strip a trailing `_lvl_<n>` level marker from a building base name.
pub fn strip_level_suffix(s: &str) -> String {
    level_suffix().replace(s, "").into_owned()
}

/// Strip a trailing tier qualifier (`_advanced_item` etc.) or the generic
/// `_item` suffix from an item base name.
pub fn strip_item_tier_suffix(s: &str) -> String {
    let once = tier_suffix().replace(s, "");
    item_suffix().replace(&once, "").into_owned()
}

/// Known mismatches between blueprint ids and GUI keys.
pub fn weapon_synonym(id: &str) -> &str {
    match id {
        "flamer" => "flamethrower",
        _ => id,
    }
}

/// Compose the display-name lookup key for an award id.
///
/// Returns the first composed key present in `lookup`, or `None` when the
/// kind is unrecognized or no composed key exists.
pub fn display_key(id: &str, lookup: &Lookup) -> Option<String> {
    let (top, last) = split_id(id)?;
    match top {
        "buildings" => building_key("gui/hud/building_name", last, lookup),
        "items" => weapon_key("gui/menu/inventory/weapon_name", last, lookup),
        "resources" => {
            let key = format!("resource_name/{last}");
            lookup.contains_key(&key).then_some(key)
        }
        _ => None,
    }
}

/// Compose the description lookup key for an award id. Same precedence as
/// [`display_key`]; resources carry no description template.
pub fn description_key(id: &str, lookup: &Lookup) -> Option<String> {
    let (top, last) = split_id(id)?;
    match top {
        "buildings" => building_key("gui/hud/building_description", last, lookup),
        "items" => weapon_key("gui/menu/inventory/weapon_charge_description", last, lookup),
        _ => None,
    }
}

/// Split an id into (leading segment, trailing segment). Ids with fewer
/// than two segments do not resolve.
fn split_id(id: &str) -> Option<(&str, &str)> {
    let mut parts = id.split('/');
    let top = parts.next()?;
    let last = parts.last()?;
    Some((top, last))
}

fn building_key(template: &str, last: &str, lookup: &Lookup) -> Option<String> {
    let base = strip_level_suffix(last);
    let key = format!("{template}/{base}");
    if lookup.contains_key(&key) {
        return Some(key);
    }
    // Retry once without a trailing variant code.
    let trimmed = variant_suffix().replace(&base, "");
    let key = format!("{template}/{trimmed}");
    lookup.contains_key(&key).then_some(key)
}

fn weapon_key(template: &str, last: &str, lookup: &Lookup) -> Option<String> {
    let base = strip_item_tier_suffix(last);
    let key = format!("{template}/{}", weapon_synonym(&base));
    lookup.contains_key(&key).then_some(key)
}
