//! Slot-code decomposition.
//!
//! Published slot tokens come in three textual shapes:
//!
//! - a bare code: `"A"`, `"L11"`, `"P37-"`
//! - an alternation: `"A/X"` (two cohorts share the period)
//! - a multi-period lab sequence, either with the prefix repeated
//!   (`"P37-P38-P39-"`) or compressed to bare digit groups (`"P37-38-39-"`)
//!
//! Decomposition turns any of these into the atomic codes the cohort grid
//! keys on. It never fails: a token that fits no pattern decomposes to
//! nothing and the caller degrades gracefully.

use regex::Regex;
use std::sync::OnceLock;

fn repeated_lab_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"P\d+-P\d+-").expect("static regex must parse"))
}

fn prefixed_code_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(P\d+)-").expect("static regex must parse"))
}

fn compressed_head_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(P)(\d+)-").expect("static regex must parse"))
}

fn digit_group_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)-").expect("static regex must parse"))
}

/// Whether a published token denotes a multi-period lab sequence.
pub fn is_lab_sequence(slot: &str) -> bool {
    let slot = slot.trim();
    slot.contains('-') && !(slot.contains('/') && !slot.contains('-'))
}

/// Split a published slot token into the atomic codes it occupies.
///
/// Lab atoms are re-suffixed with `-` to match the grid's own convention, so
/// `"P37-P38-P39-"` and `"P37-38-39-"` both become `["P37-", "P38-", "P39-"]`.
/// An empty or unparseable token yields an empty set.
pub fn atomic_codes(slot: &str) -> Vec<String> {
    let slot = slot.trim();
    if slot.is_empty() {
        return Vec::new();
    }

    if slot.contains('/') && !slot.contains('-') {
        return slot
            .split('/')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
    }

    if slot.contains('-') {
        let bare: Vec<String> = if repeated_lab_re().is_match(slot) {
            // Repeated-prefix form: every P<digits> before a dash.
            prefixed_code_re()
                .captures_iter(slot)
                .map(|c| c[1].to_string())
                .collect()
        } else if let Some(head) = compressed_head_re().captures(slot) {
            // Compressed form: re-prefix every bare digit group.
            let prefix = &head[1];
            digit_group_re()
                .captures_iter(slot)
                .map(|c| format!("{}{}", prefix, &c[1]))
                .collect()
        } else {
            Vec::new()
        };
        return bare.into_iter().map(|code| format!("{code}-")).collect();
    }

    vec![slot.to_string()]
}
