//! 英字以外の除去、ストップワード除去、語幹化による正規化処理。
use regex::Regex;

use super::stemmer::{PorterStemmer, StemmerMode};
use super::stopwords::is_stopword;

/// ベクトライザへ渡す直前の正規化済みテキスト。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedText {
    pub tokens: Vec<String>,
    pub normalized: String,
}

impl NormalizedText {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// 生テキストを語幹列へ変換する。
///
/// 手順の順序は語彙の学習時と同じでなければならない:
/// 英字以外を空白へ置換 → 小文字化 → 空白分割 → ストップワード除去 → 語幹化。
/// 正規化は冪等ではない (語幹をもう一度語幹化すると変わることがある)。
#[derive(Debug)]
pub struct TextNormalizer {
    non_alpha_re: Regex,
    stemmer: PorterStemmer,
}

impl TextNormalizer {
    #[must_use]
    pub fn new(mode: StemmerMode) -> Self {
        Self {
            non_alpha_re: Regex::new("[^a-zA-Z]").expect("compile non-alpha pattern"),
            stemmer: PorterStemmer::new(mode),
        }
    }

    #[must_use]
    pub fn stemmer_mode(&self) -> StemmerMode {
        self.stemmer.mode()
    }

    #[must_use]
    pub fn normalize(&self, text: &str) -> NormalizedText {
        let letters_only = self.non_alpha_re.replace_all(text, " ").to_lowercase();
        let tokens: Vec<String> = letters_only
            .split_whitespace()
            .filter(|word| !is_stopword(word))
            .map(|word| self.stemmer.stem(word))
            .filter(|stem| !stem.is_empty())
            .collect();
        let normalized = tokens.join(" ");
        NormalizedText { tokens, normalized }
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new(StemmerMode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_everything_but_ascii_letters() {
        let normalizer = TextNormalizer::default();
        let result = normalizer.normalize("COVID-19 vaccines: 95% effective?!");
        assert_eq!(result.normalized, "covid vaccin effect");
    }

    #[test]
    fn non_ascii_letters_split_words() {
        let normalizer = TextNormalizer::default();
        let result = normalizer.normalize("café naïve");
        // "ve" is itself a stopword
        assert_eq!(result.tokens, vec!["caf", "na"]);
    }

    #[test]
    fn stopword_only_input_is_empty() {
        let normalizer = TextNormalizer::default();
        let result = normalizer.normalize("The and of is");
        assert!(result.is_empty());
        assert_eq!(result.normalized, "");
    }

    #[test]
    fn contractions_lose_their_suffixes() {
        let normalizer = TextNormalizer::default();
        // "don't" -> "don" "t", both stopwords
        assert_eq!(normalizer.normalize("don't panic").normalized, "panic");
    }

    #[test]
    fn renormalizing_may_change_stems() {
        let normalizer = TextNormalizer::default();
        let once = normalizer.normalize("agreed");
        let twice = normalizer.normalize(&once.normalized);
        assert_eq!(once.normalized, "agre");
        assert_eq!(twice.normalized, "agr");
    }
}
