//! Sanitation of localized display text.
//!
//! Lookup strings arrive from the game's GUI tables with typographic
//! punctuation and embedded inline markup tags. Everything attached to a
//! node passes through [`sanitize`] so consumers only ever see plain ASCII
//! punctuation and single-spaced text.

use regex::Regex;
use std::sync::OnceLock;

fn markup_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<img=[^>]+>").expect("invalid markup pattern"))
}

/// Normalize typographic punctuation to ASCII equivalents, strip inline
/// `<img=...>` markup tags, and collapse runs of whitespace.
pub fn sanitize(text: &str) -> String {
    let stripped = markup_tag().replace_all(text, " ");
    let mut out = String::with_capacity(stripped.len());
    for ch in stripped.chars() {
        match ch {
            '\u{2013}' | '\u{2014}' => out.push('-'),
            '\u{2018}' | '\u{2019}' => out.push('\''),
            '\u{201C}' | '\u{201D}' => out.push('"'),
            '\u{00A0}' => out.push(' '),
            '\u{2026}' => out.push_str("..."),
            _ => out.push(ch),
        }
    }
    collapse_whitespace(&out)
}

/// Collapse whitespace runs to single spaces and trim the ends.
fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut pending_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            pending_space = !out.is_empty();
        } else {
            if pending_space {
                out.push(' ');
            }
            pending_space = false;
            out.push(ch);
        }
    }
    out
}
