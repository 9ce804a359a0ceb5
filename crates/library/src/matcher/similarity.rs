/// Symmetric similarity ratio in `[0, 1]` between two already normalized
/// names. Identical names always score exactly `1.0`.
pub fn similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    strsim::normalized_levenshtein(&a.to_lowercase(), &b.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_identical_is_one() {
        assert_eq!(similarity("alpha", "alpha"), 1.0);
        assert_eq!(similarity("", ""), 1.0);
    }

    #[rstest]
    #[case("alpha", "alphb")]
    #[case("one piece", "one piece 2")]
    #[case("attack on titan", "attack on titen")]
    fn test_one_character_apart_is_below_default_threshold(#[case] a: &str, #[case] b: &str) {
        let score = similarity(a, b);
        assert!(score < 0.98, "{a} ~ {b} scored {score}");
        assert_eq!(score, similarity(b, a));
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(similarity("Alpha", "alpha"), 1.0);
    }

    #[test]
    fn test_unrelated_is_low() {
        assert!(similarity("alpha", "omega") < 0.5);
    }
}
