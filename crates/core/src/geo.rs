//! Canadian postal code handling.

use std::sync::LazyLock;

use regex::Regex;

/// Canadian postal code, forward sortation area + local delivery unit,
/// with an optional separating space (e.g. `H2X 1Y4`).
static POSTAL_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z]\d[A-Za-z]\s?\d[A-Za-z]\d$").expect("postal code regex must compile")
});

/// Check a postal code against the Canadian format.
pub fn is_valid_postal_code(code: &str) -> bool {
    POSTAL_CODE.is_match(code)
}

/// Normalize a postal code to canonical uppercase `ANA NAN` form.
///
/// Returns `None` when the input is not a valid postal code.
pub fn normalize_postal_code(code: &str) -> Option<String> {
    if !is_valid_postal_code(code) {
        return None;
    }
    let compact: String = code
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_uppercase();
    Some(format!("{} {}", &compact[..3], &compact[3..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn montreal_postal_codes_accepted() {
        assert!(is_valid_postal_code("H2X 1Y4"));
        assert!(is_valid_postal_code("H2X1Y4"));
        assert!(is_valid_postal_code("h3b 4w8"));
    }

    #[test]
    fn malformed_codes_rejected() {
        assert!(!is_valid_postal_code("12345"));
        assert!(!is_valid_postal_code("H2X 1Y"));
        assert!(!is_valid_postal_code("HHX 1Y4"));
        assert!(!is_valid_postal_code(""));
    }

    #[test]
    fn normalization_uppercases_and_spaces() {
        assert_eq!(
            normalize_postal_code("h2x1y4").as_deref(),
            Some("H2X 1Y4")
        );
        assert_eq!(
            normalize_postal_code("G1R 5P3").as_deref(),
            Some("G1R 5P3")
        );
        assert_eq!(normalize_postal_code("nope"), None);
    }
}
