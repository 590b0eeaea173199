//! Address Text Canonicalization
//!
//! Every piece of address text is passed through [`normalize`] before it is
//! indexed or matched, so that `"  3rd   st "` and `"3RD ST"` meet at the
//! same trie key. Whitespace is classified as ASCII whitespace.

/// Canonicalizes a string: uppercase, trimmed, internal whitespace runs
/// collapsed to a single space.
///
/// Idempotent: `normalize(normalize(s)) == normalize(s)`.
pub fn normalize(text: &str) -> String {
    text.to_uppercase()
        .split(|c: char| c.is_ascii_whitespace())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// [`normalize`], then expand a trailing street-suffix abbreviation
/// (`"MAIN ST"` becomes `"MAIN STREET"`). Only the last whitespace-separated
/// token is considered, and only on an exact post-uppercase match.
pub fn normalize_street_suffix(street: &str) -> String {
    let normalized = normalize(street);

    let mut words: Vec<&str> = normalized.split(' ').collect();
    if let Some(last) = words.last_mut() {
        if let Some(expanded) = expand_suffix(last) {
            *last = expanded;
            return words.join(" ");
        }
    }

    normalized
}

fn expand_suffix(token: &str) -> Option<&'static str> {
    match token {
        "ST" => Some("STREET"),
        "AVE" => Some("AVENUE"),
        "RD" => Some("ROAD"),
        "BLVD" => Some("BOULEVARD"),
        "DR" => Some("DRIVE"),
        "LN" => Some("LANE"),
        "CT" => Some("COURT"),
        "PL" => Some("PLACE"),
        "CIR" => Some("CIRCLE"),
        "WAY" => Some("WAY"),
        "PKWY" => Some("PARKWAY"),
        "TER" => Some("TERRACE"),
        "SQ" => Some("SQUARE"),
        "HWY" => Some("HIGHWAY"),
        "EXPY" => Some("EXPRESSWAY"),
        _ => None,
    }
}
