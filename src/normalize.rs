//! String normalization for cell values and header identifiers

/// Trim and drop every character outside ASCII
///
/// Lossy on purpose: `"München "` becomes `"Mnchen"`. Never fails.
pub fn decode_value(value: &str) -> String {
    value.trim().chars().filter(char::is_ascii).collect()
}

/// Turn a human-readable header label into an identifier-like key
///
/// The label is ASCII-folded and trimmed, then every run of characters other
/// than `[A-Za-z0-9_]` collapses into a single separator. Leading and trailing
/// separators are removed and the result is lower-cased with `_` as separator.
///
/// ```ignore
/// assert_eq!(header_key("Minutes played"), "minutes_played");
/// assert_eq!(header_key(" Nat. "), "nat");
/// ```
pub fn header_key(label: &str) -> String {
    let folded = decode_value(label);
    let mut slug = String::with_capacity(folded.len());
    for ch in folded.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').replace('-', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_drops_non_ascii_after_trimming() {
        assert_eq!(decode_value("  Bayern München "), "Bayern Mnchen");
        assert_eq!(decode_value("€60.00m"), "60.00m");
        assert_eq!(decode_value("\u{a0}Leeds\u{a0}"), "Leeds");
        assert_eq!(decode_value(""), "");
    }

    #[test]
    fn header_key_slugs_labels() {
        assert_eq!(header_key("Player"), "player");
        assert_eq!(header_key("Minutes played"), "minutes_played");
        assert_eq!(header_key("Nat."), "nat");
        assert_eq!(header_key("Left - club"), "left_club");
        assert_eq!(header_key("Market value_at time"), "market_value_at_time");
    }

    #[test]
    fn header_key_of_blank_label_is_empty() {
        assert_eq!(header_key("   "), "");
        assert_eq!(header_key("..."), "");
        assert_eq!(header_key("Ø"), "");
    }
}
