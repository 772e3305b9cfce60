//! Property-based tests using proptest.
//!
//! These tests verify invariants of path matching, property naming and
//! creation property inference using randomly generated inputs.

use arcbridge::PropertyId;
use arcbridge::read::Matcher;
use arcbridge::write::PropertyValueHint;
use proptest::prelude::*;

/// Strategy for archive-style paths: 1-4 components joined by '/'.
fn path_strategy() -> impl Strategy<Value = String> {
    proptest::collection::vec("[a-zA-Z0-9][a-zA-Z0-9_.-]{0,9}", 1..4)
        .prop_map(|parts| parts.join("/"))
}

/// Flips the case of ASCII letters selected by `mask`.
fn flip_case(s: &str, mask: &[bool]) -> String {
    s.chars()
        .zip(mask.iter().cycle())
        .map(|(c, &flip)| match (flip, c.is_ascii_uppercase()) {
            (false, _) => c,
            (true, true) => c.to_ascii_lowercase(),
            (true, false) => c.to_ascii_uppercase(),
        })
        .collect()
}

proptest! {
    /// An exact pattern always matches itself.
    #[test]
    fn exact_matches_itself(path in path_strategy(), nocase in any::<bool>()) {
        prop_assert!(Matcher::exact(&path, nocase).matches(&path));
    }

    /// Case-insensitive exact matching ignores ASCII case differences.
    #[test]
    fn exact_nocase_ignores_case(
        path in path_strategy(),
        mask in proptest::collection::vec(any::<bool>(), 1..8),
    ) {
        let variant = flip_case(&path, &mask);
        prop_assert!(Matcher::exact(&path, true).matches(&variant));
        prop_assert_eq!(Matcher::exact(&path, false).matches(&variant), variant == path);
    }

    /// A leading wildcard plus a suffix matches any path ending in that
    /// suffix, across separators.
    #[test]
    fn star_suffix_matches(path in path_strategy(), ext in "[a-z]{1,4}") {
        let name = format!("{}.{}", path, ext);
        let pattern = format!("*.{}", ext);
        prop_assert!(Matcher::glob(&pattern, false).matches(&name));
    }

    /// A pattern without wildcards behaves like an exact match.
    #[test]
    fn literal_glob_is_exact(path in "[a-zA-Z0-9_/-]{1,20}", other in "[a-zA-Z0-9_/-]{1,20}") {
        let matcher = Matcher::glob(&path, false);
        prop_assert!(matcher.matches(&path));
        prop_assert_eq!(matcher.matches(&other), other == path);
    }

    /// Decimal integers are inferred as integers.
    #[test]
    fn integers_infer_as_int(n in any::<i64>()) {
        prop_assert_eq!(PropertyValueHint::infer(&n.to_string()), PropertyValueHint::Int(n));
    }

    /// Hexadecimal integers are inferred as integers.
    #[test]
    fn hex_infers_as_int(n in 0i64..=i64::MAX) {
        prop_assert_eq!(PropertyValueHint::infer(&format!("{:#x}", n)), PropertyValueHint::Int(n));
    }

    /// Alphabetic values that are not boolean words stay strings.
    #[test]
    fn words_infer_as_string(s in "[g-mp-xz][a-z]{2,10}") {
        prop_assume!(s != "true");
        prop_assert_eq!(PropertyValueHint::infer(&s), PropertyValueHint::Str(s.clone()));
    }

    /// Every property id survives a trip through its display name.
    #[test]
    fn property_names_resolve_back(id in 0u32..100_000) {
        let id = PropertyId::new(id);
        prop_assert_eq!(PropertyId::from_name(&id.name()), Some(id));
    }
}
