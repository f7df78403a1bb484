use news_veracity::classification::{StemmerMode, TextNormalizer};
use proptest::prelude::*;
use regex::Regex;

#[test]
fn test_title_and_author_normalize_to_stemmed_tokens() {
    let normalizer = TextNormalizer::default();

    let normalized = normalizer.normalize("John Doe Breaking: Scientists Confirm");

    assert_eq!(normalized.normalized, "john doe break scientist confirm");
    assert_eq!(
        normalized.tokens,
        vec!["john", "doe", "break", "scientist", "confirm"]
    );
}

#[test]
fn test_stopword_only_input_is_empty() {
    let normalizer = TextNormalizer::default();

    let normalized = normalizer.normalize("The AND of, to THEIR ourselves!");

    assert!(normalized.is_empty());
    assert_eq!(normalized.normalized, "");
}

#[test]
fn test_digits_and_punctuation_split_words() {
    let normalizer = TextNormalizer::default();

    let normalized = normalizer.normalize("Trump2016vs.Clinton");

    assert_eq!(normalized.normalized, "trump vs clinton");
}

#[test]
fn test_original_mode_differs_from_default() {
    let nltk = TextNormalizer::new(StemmerMode::Nltk);
    let original = TextNormalizer::new(StemmerMode::Original);

    assert_eq!(nltk.normalize("dying news").normalized, "die news");
    assert_eq!(original.normalize("dying news").normalized, "dy new");
}

#[test]
fn test_long_run_of_y_fits_in_worker_stack() {
    let worker = std::thread::Builder::new()
        .stack_size(2 * 1024 * 1024)
        .spawn(|| TextNormalizer::default().normalize(&"y".repeat(100_000)))
        .expect("spawn normalizer thread");

    let normalized = worker.join().expect("normalizer thread completes");

    assert_eq!(normalized.tokens.len(), 1);
    assert!(normalized.normalized.starts_with("yyyy"));
}

proptest! {
    #[test]
    fn prop_output_is_lowercase_words_separated_by_single_spaces(input in ".{0,120}") {
        let pattern = Regex::new("^[a-z]*( [a-z]+)*$").unwrap();
        let normalizer = TextNormalizer::default();

        let normalized = normalizer.normalize(&input);

        prop_assert!(pattern.is_match(&normalized.normalized), "{:?}", normalized.normalized);
        prop_assert_eq!(normalized.tokens.join(" "), normalized.normalized);
    }

    #[test]
    fn prop_normalization_is_deterministic(input in "[A-Za-z0-9 ,.!?'-]{0,80}") {
        let normalizer = TextNormalizer::default();

        prop_assert_eq!(normalizer.normalize(&input), normalizer.normalize(&input));
    }
}
