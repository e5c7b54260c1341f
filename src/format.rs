//! Number formatting for counters and table cells.

use num_format::{Locale, ToFormattedString};

/// Map a user-provided locale tag to a `num_format::Locale`.
///
/// Supported tags (case-insensitive): `en`, `us`, `en_US`, `de`, `de_DE`, `german`,
/// `fr`, `es`, `it`, `pt`, `nl`. Defaults to English.
pub fn map_locale(tag: &str) -> &'static Locale {
    match tag.to_lowercase().as_str() {
        "de" | "de_de" | "german" => &Locale::de,
        "fr" | "fr_fr" => &Locale::fr,
        "es" | "es_es" => &Locale::es,
        "it" | "it_it" => &Locale::it,
        "pt" | "pt_pt" | "pt_br" => &Locale::pt,
        "nl" | "nl_nl" => &Locale::nl,
        _ => &Locale::en,
    }
}

/// Thousands-grouped count, e.g. `1,234,567` (`en`) or `1.234.567` (`de`).
pub fn format_count(n: u64, locale_tag: &str) -> String {
    n.to_formatted_string(map_locale(locale_tag))
}

const SUFFIXES: [(f64, &str); 4] = [(1.0e12, "t"), (1.0e9, "b"), (1.0e6, "m"), (1.0e3, "k")];

/// Compact signed counter for the info boxes: `+0`, `+999.0`, `+1.2k`, `+3.4m`.
pub fn pretty_print_stat(n: u64) -> String {
    if n == 0 {
        return "+0".to_string();
    }
    let v = n as f64;
    // Walk up a unit when rounding would print `1000.0` of the smaller one.
    let mut pick: Option<(f64, &str)> = None;
    for (i, &(scale, suffix)) in SUFFIXES.iter().enumerate().rev() {
        if v >= scale {
            let rounded = (v / scale * 10.0).round() / 10.0;
            pick = match (rounded >= 1000.0, i) {
                (true, 0) | (false, _) => Some((scale, suffix)),
                (true, _) => Some(SUFFIXES[i - 1]),
            };
        }
    }
    match pick {
        Some((scale, suffix)) => format!("+{:.1}{}", v / scale, suffix),
        None => format!("+{:.1}", v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_stats() {
        assert_eq!(pretty_print_stat(0), "+0");
        assert_eq!(pretty_print_stat(7), "+7.0");
        assert_eq!(pretty_print_stat(999), "+999.0");
        assert_eq!(pretty_print_stat(1_234), "+1.2k");
        assert_eq!(pretty_print_stat(3_460_000), "+3.5m");
        assert_eq!(pretty_print_stat(999_960), "+1.0m");
        assert_eq!(pretty_print_stat(2_000_000_000), "+2.0b");
    }

    #[test]
    fn grouped_counts_follow_locale() {
        assert_eq!(format_count(1_234_567, "en"), "1,234,567");
        assert_eq!(format_count(1_234_567, "de"), "1.234.567");
        assert_eq!(format_count(12, "xx"), "12");
    }
}
