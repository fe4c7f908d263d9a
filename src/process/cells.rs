use once_cell::sync::Lazy;
use regex::Regex;

/// Matches percentage annotations such as `(40%)` or `( 3.5% )`.
static PERCENT_NOTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(\s*\d+(?:\.\d+)?\s*%\s*\)").expect("percent regex is valid"));

/// Normalize a bucket label: drop `-` placeholders around the label and
/// surrounding whitespace. Dashes inside ranges such as `18-44` are kept.
pub fn clean_bucket(raw: &str) -> String {
    raw.trim_matches(|c: char| c == '-' || c.is_whitespace())
        .to_string()
}

/// Strip annotations, placeholders and thousands separators from a count cell.
pub fn clean_count(raw: &str) -> String {
    PERCENT_NOTE
        .replace_all(raw, "")
        .replace(&['-', ','][..], "")
        .trim()
        .to_string()
}

/// `clean_count` followed by an integer parse. `None` if anything but a
/// signless integer remains.
pub fn parse_count(raw: &str) -> Option<i64> {
    let cleaned = clean_count(raw);
    if cleaned.is_empty() || !cleaned.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    cleaned.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_annotations_are_removed() {
        assert_eq!(parse_count("1,234 (5%)"), Some(1234));
        assert_eq!(parse_count("1,000 (40%)"), Some(1000));
        assert_eq!(parse_count("800"), Some(800));
        assert_eq!(parse_count("12 ( 3.5% )"), Some(12));
        assert_eq!(parse_count("1234"), Some(1234));
    }

    #[test]
    fn placeholder_dash_is_removed() {
        assert_eq!(parse_count("-12"), Some(12));
        assert_eq!(parse_count("- 7 -"), Some(7));
    }

    #[test]
    fn residue_that_is_not_a_number_fails() {
        assert_eq!(parse_count("-"), None);
        assert_eq!(parse_count("n/a"), None);
        assert_eq!(parse_count("12 (abc)"), None);
        assert_eq!(parse_count("1.5"), None);
    }

    #[test]
    fn bucket_labels_lose_dashes_and_padding() {
        assert_eq!(clean_bucket("  Manhattan "), "Manhattan");
        assert_eq!(clean_bucket("- Female"), "Female");
        assert_eq!(clean_bucket("18-44"), "18-44");
        assert_eq!(clean_bucket("75+ -"), "75+");
    }
}
