//! Matching a route parameter to a record id
//!
//! Links in the wild carry ids in several shapes: padded numbers ("007"),
//! different casing, UUIDs with or without hyphens. Lookups try the strict
//! comparison first and loosen step by step.

use crate::core::Record;

/// Find the record whose id corresponds to `param`
///
/// Match order: exact, case-insensitive, numeric ("007" == "7"), then
/// hyphen-insensitive UUID. The first step with a hit wins.
pub fn find_by_param<'a, T: Record>(records: &'a [T], param: &str) -> Option<&'a T> {
    let param = param.trim();
    if param.is_empty() {
        return None;
    }

    if let Some(found) = records.iter().find(|r| r.id() == param) {
        return Some(found);
    }

    if let Some(found) = records.iter().find(|r| r.id().eq_ignore_ascii_case(param)) {
        return Some(found);
    }

    if let Some(wanted) = numeric_id(param) {
        if let Some(found) = records.iter().find(|r| numeric_id(r.id()) == Some(wanted)) {
            return Some(found);
        }
    }

    let wanted = compact_uuid(param)?;
    records
        .iter()
        .find(|r| compact_uuid(r.id()).as_deref() == Some(wanted.as_str()))
}

fn numeric_id(value: &str) -> Option<u64> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

/// Lowercase 32-hex-digit form, if `value` is a UUID in any hyphenation
fn compact_uuid(value: &str) -> Option<String> {
    let compact: String = value
        .chars()
        .filter(|c| *c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect();
    (compact.len() == 32 && compact.bytes().all(|b| b.is_ascii_hexdigit())).then_some(compact)
}
