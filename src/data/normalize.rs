/// Canonical form used on both sides of every string comparison:
/// surrounding whitespace trimmed, then Unicode lowercase (no locale rules).
pub fn normalize_key(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Header variant of [`normalize_key`] that also drops a UTF-8 byte-order mark,
/// which spreadsheet exports like to prepend to the first column name.
pub fn normalize_header(s: &str) -> String {
    normalize_key(s.trim_start_matches('\u{feff}'))
}
