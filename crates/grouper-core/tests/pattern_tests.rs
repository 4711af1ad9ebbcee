//! Path matching and label substitution

use grouper_core::pattern::{matches, substitute};
use rstest::rstest;

#[rstest]
#[case("Assets/UI/button.png", "", true)]
#[case("Assets/UI/button.png", "UI/", true)]
#[case("Assets/UI/button.png", r"\.png$", true)]
#[case("Assets/UI/button.png", "^UI/", false)]
#[case("Assets/UI/button.png", "ui/", false)]
fn test_matches_searches_anywhere(
    #[case] path: &str,
    #[case] pattern: &str,
    #[case] expected: bool,
) {
    assert_eq!(matches(path, pattern).unwrap(), expected);
}

#[rstest]
#[case::empty_pattern("Assets/UI/a.png", "", "ui", "ui")]
#[case::empty_template("Assets/UI/a.png", "^Assets/(\\w+)/.*$", "", "")]
#[case::whole_path("Assets/UI/a.png", "^Assets/(\\w+)/.*$", "group_$1", "group_UI")]
#[case::digits_then_letters("Assets/UI/a.png", "^Assets/(\\w+)/.*$", "$1_icon", "UI_icon")]
#[case::named_group("Assets/UI/a.png", "^Assets/(?P<kind>\\w+)/.*$", "${kind}", "UI")]
#[case::partial_match("Assets/UI/a.png", "UI", "Menu", "Assets/Menu/a.png")]
#[case::first_match_only("a/a/a", "a", "b", "b/a/a")]
#[case::no_match("Assets/UI/a.png", "Audio", "sfx", "Assets/UI/a.png")]
#[case::whole_match("Assets/UI/a.png", "^.*$", "[$&]", "[Assets/UI/a.png]")]
fn test_substitute(
    #[case] path: &str,
    #[case] pattern: &str,
    #[case] template: &str,
    #[case] expected: &str,
) {
    assert_eq!(substitute(path, pattern, template).unwrap(), expected);
}

#[test]
fn test_invalid_pattern_fails_both_operations() {
    assert!(matches("a", "[").is_err());
    assert!(substitute("a", "[", "b").is_err());
    // An empty template short-circuits only for valid patterns
    assert!(substitute("a", "[", "").is_err());
}
