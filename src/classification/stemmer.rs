//! Porter ステマー。
//!
//! ベクトライザの語彙はこのステマーの出力で学習されているため、規則表は参照実装と
//! 一字一句一致させる必要がある。規則がずれてもエラーにはならず、未知語として
//! 黙って捨てられるだけなので精度だけが静かに落ちる。
use std::{fmt, str::FromStr};

use serde::Deserialize;

/// Porter アルゴリズムの変種。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StemmerMode {
    /// NLTK の既定モード。語彙の学習に使われたのはこれ。
    #[default]
    Nltk,
    /// 1980年の論文どおりの規則。
    Original,
    /// Martin Porter 自身による改訂版。
    Martin,
}

impl StemmerMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Nltk => "nltk",
            Self::Original => "original",
            Self::Martin => "martin",
        }
    }
}

impl fmt::Display for StemmerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StemmerMode {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_lowercase().as_str() {
            "nltk" | "nltk_extensions" => Ok(Self::Nltk),
            "original" | "original_algorithm" => Ok(Self::Original),
            "martin" | "martin_extensions" => Ok(Self::Martin),
            other => Err(anyhow::anyhow!(
                "unknown stemmer mode '{other}' (expected nltk, original or martin)"
            )),
        }
    }
}

/// NLTK モードでのみ使う不規則形の辞書。
const IRREGULAR_FORMS: [(&str, &str); 16] = [
    ("sky", "sky"),
    ("skies", "sky"),
    ("dying", "die"),
    ("lying", "lie"),
    ("tying", "tie"),
    ("news", "news"),
    ("innings", "inning"),
    ("inning", "inning"),
    ("outings", "outing"),
    ("outing", "outing"),
    ("cannings", "canning"),
    ("canning", "canning"),
    ("howe", "howe"),
    ("proceed", "proceed"),
    ("exceed", "exceed"),
    ("succeed", "succeed"),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct PorterStemmer {
    mode: StemmerMode,
}

struct Rule<'a> {
    suffix: &'static str,
    replacement: &'static str,
    condition: Option<&'a dyn Fn(&str) -> bool>,
}

impl<'a> Rule<'a> {
    fn always(suffix: &'static str, replacement: &'static str) -> Self {
        Self {
            suffix,
            replacement,
            condition: None,
        }
    }

    fn when(
        suffix: &'static str,
        replacement: &'static str,
        condition: &'a dyn Fn(&str) -> bool,
    ) -> Self {
        Self {
            suffix,
            replacement,
            condition: Some(condition),
        }
    }
}

/// 最初に接尾辞が一致した規則だけを評価する。条件を満たさなければ後続の規則は試さない。
fn apply_rules(word: String, rules: &[Rule<'_>]) -> String {
    for rule in rules {
        if let Some(stem) = word.strip_suffix(rule.suffix) {
            if rule.condition.is_none_or(|condition| condition(stem)) {
                return format!("{stem}{}", rule.replacement);
            }
            return word;
        }
    }
    word
}

fn is_vowel_letter(letter: u8) -> bool {
    matches!(letter, b'a' | b'e' | b'i' | b'o' | b'u')
}

/// y は直前が子音なら母音、母音なら子音。連続する y は交互に入れ替わる。
fn is_consonant(word: &[u8], index: usize) -> bool {
    match word[index] {
        letter if is_vowel_letter(letter) => false,
        b'y' => {
            let run = word[..=index]
                .iter()
                .rev()
                .take_while(|&&letter| letter == b'y')
                .count();
            let start = index + 1 - run;
            let first_is_consonant = start == 0 || is_vowel_letter(word[start - 1]);
            if run % 2 == 1 {
                first_is_consonant
            } else {
                !first_is_consonant
            }
        }
        _ => true,
    }
}

/// 語全体の子音判定を先頭から一度に求める。
fn consonant_flags(word: &[u8]) -> Vec<bool> {
    let mut flags: Vec<bool> = Vec::with_capacity(word.len());
    for (index, &letter) in word.iter().enumerate() {
        let consonant = match letter {
            letter if is_vowel_letter(letter) => false,
            b'y' => index == 0 || !flags[index - 1],
            _ => true,
        };
        flags.push(consonant);
    }
    flags
}

/// `[C](VC)^m[V]` の m。
fn measure(stem: &str) -> usize {
    let mut count = 0;
    let mut previous_vowel = false;
    for consonant in consonant_flags(stem.as_bytes()) {
        if consonant && previous_vowel {
            count += 1;
        }
        previous_vowel = !consonant;
    }
    count
}

fn contains_vowel(stem: &str) -> bool {
    consonant_flags(stem.as_bytes())
        .into_iter()
        .any(|consonant| !consonant)
}

fn ends_double_consonant(word: &str) -> bool {
    let bytes = word.as_bytes();
    let len = bytes.len();
    len >= 2 && bytes[len - 1] == bytes[len - 2] && is_consonant(bytes, len - 1)
}

impl PorterStemmer {
    #[must_use]
    pub fn new(mode: StemmerMode) -> Self {
        Self { mode }
    }

    #[must_use]
    pub fn mode(&self) -> StemmerMode {
        self.mode
    }

    /// 単語を語幹に変換する。入力は小文字化してから処理する。
    ///
    /// ASCII 以外の文字を含む語は小文字化のみ行う。正規化器はそうした語を渡さない。
    #[must_use]
    pub fn stem(&self, word: &str) -> String {
        let word = word.to_lowercase();
        if !word.is_ascii() {
            return word;
        }
        if self.mode == StemmerMode::Nltk
            && let Some((_, base)) = IRREGULAR_FORMS.iter().find(|(form, _)| *form == word)
        {
            return (*base).to_string();
        }
        if self.mode != StemmerMode::Original && word.len() <= 2 {
            return word;
        }

        let word = self.step1a(word);
        let word = self.step1b(word);
        let word = self.step1c(word);
        let word = self.step2(word);
        let word = Self::step3(word);
        let word = Self::step4(word);
        let word = self.step5a(word);
        Self::step5b(word)
    }

    /// `*o`: 語幹が cvc で終わり、最後の c が w, x, y ではない。
    fn ends_cvc(&self, word: &str) -> bool {
        let bytes = word.as_bytes();
        let len = bytes.len();
        let classic = len >= 3
            && is_consonant(bytes, len - 3)
            && !is_consonant(bytes, len - 2)
            && is_consonant(bytes, len - 1)
            && !matches!(bytes[len - 1], b'w' | b'x' | b'y');
        let short = self.mode == StemmerMode::Nltk
            && len == 2
            && !is_consonant(bytes, 0)
            && is_consonant(bytes, 1);
        classic || short
    }

    fn step1a(&self, word: String) -> String {
        if self.mode == StemmerMode::Nltk
            && word.len() == 4
            && let Some(stem) = word.strip_suffix("ies")
        {
            return format!("{stem}ie");
        }
        apply_rules(
            word,
            &[
                Rule::always("sses", "ss"),
                Rule::always("ies", "i"),
                Rule::always("ss", "ss"),
                Rule::always("s", ""),
            ],
        )
    }

    fn step1b(&self, word: String) -> String {
        if self.mode == StemmerMode::Nltk
            && let Some(stem) = word.strip_suffix("ied")
        {
            return if word.len() == 4 {
                format!("{stem}ie")
            } else {
                format!("{stem}i")
            };
        }

        if let Some(stem) = word.strip_suffix("eed") {
            return if measure(stem) > 0 {
                format!("{stem}ee")
            } else {
                word
            };
        }

        let Some(stem) = ["ed", "ing"]
            .iter()
            .find_map(|suffix| word.strip_suffix(suffix))
            .filter(|stem| contains_vowel(stem))
        else {
            return word;
        };
        let mut stem = stem.to_string();

        for (suffix, replacement) in [("at", "ate"), ("bl", "ble"), ("iz", "ize")] {
            if let Some(base) = stem.strip_suffix(suffix) {
                return format!("{base}{replacement}");
            }
        }

        if ends_double_consonant(&stem) {
            if !matches!(stem.as_bytes()[stem.len() - 1], b'l' | b's' | b'z') {
                stem.pop();
            }
            return stem;
        }

        if measure(&stem) == 1 && self.ends_cvc(&stem) {
            stem.push('e');
        }
        stem
    }

    fn step1c(&self, word: String) -> String {
        let nltk = |stem: &str| stem.len() > 1 && is_consonant(stem.as_bytes(), stem.len() - 1);
        let original = |stem: &str| contains_vowel(stem);
        let condition: &dyn Fn(&str) -> bool = if self.mode == StemmerMode::Nltk {
            &nltk
        } else {
            &original
        };
        apply_rules(word, &[Rule::when("y", "i", condition)])
    }

    fn step2(&self, word: String) -> String {
        let positive = |stem: &str| measure(stem) > 0;

        if self.mode == StemmerMode::Nltk
            && let Some(stem) = word.strip_suffix("alli")
            && positive(stem)
        {
            return self.step2(format!("{stem}al"));
        }

        // logi の l は語幹側に含めて測る (geo, theo などの短い語幹のため)
        let whole = word.clone();
        let logi_nltk = move |_stem: &str| positive(&whole[..whole.len() - 3]);

        let mut rules = vec![
            Rule::when("ational", "ate", &positive),
            Rule::when("tional", "tion", &positive),
            Rule::when("enci", "ence", &positive),
            Rule::when("anci", "ance", &positive),
            Rule::when("izer", "ize", &positive),
            if self.mode == StemmerMode::Original {
                Rule::when("abli", "able", &positive)
            } else {
                Rule::when("bli", "ble", &positive)
            },
            Rule::when("alli", "al", &positive),
            Rule::when("entli", "ent", &positive),
            Rule::when("eli", "e", &positive),
            Rule::when("ousli", "ous", &positive),
            Rule::when("ization", "ize", &positive),
            Rule::when("ation", "ate", &positive),
            Rule::when("ator", "ate", &positive),
            Rule::when("alism", "al", &positive),
            Rule::when("iveness", "ive", &positive),
            Rule::when("fulness", "ful", &positive),
            Rule::when("ousness", "ous", &positive),
            Rule::when("aliti", "al", &positive),
            Rule::when("iviti", "ive", &positive),
            Rule::when("biliti", "ble", &positive),
        ];
        match self.mode {
            StemmerMode::Nltk => {
                rules.push(Rule::when("fulli", "ful", &positive));
                rules.push(Rule::when("logi", "log", &logi_nltk));
            }
            StemmerMode::Martin => rules.push(Rule::when("logi", "log", &positive)),
            StemmerMode::Original => {}
        }
        apply_rules(word, &rules)
    }

    fn step3(word: String) -> String {
        let positive = |stem: &str| measure(stem) > 0;
        apply_rules(
            word,
            &[
                Rule::when("icate", "ic", &positive),
                Rule::when("ative", "", &positive),
                Rule::when("alize", "al", &positive),
                Rule::when("iciti", "ic", &positive),
                Rule::when("ical", "ic", &positive),
                Rule::when("ful", "", &positive),
                Rule::when("ness", "", &positive),
            ],
        )
    }

    fn step4(word: String) -> String {
        let above_one = |stem: &str| measure(stem) > 1;
        let ion = |stem: &str| measure(stem) > 1 && (stem.ends_with('s') || stem.ends_with('t'));
        apply_rules(
            word,
            &[
                Rule::when("al", "", &above_one),
                Rule::when("ance", "", &above_one),
                Rule::when("ence", "", &above_one),
                Rule::when("er", "", &above_one),
                Rule::when("ic", "", &above_one),
                Rule::when("able", "", &above_one),
                Rule::when("ible", "", &above_one),
                Rule::when("ant", "", &above_one),
                Rule::when("ement", "", &above_one),
                Rule::when("ment", "", &above_one),
                Rule::when("ent", "", &above_one),
                Rule::when("ion", "", &ion),
                Rule::when("ou", "", &above_one),
                Rule::when("ism", "", &above_one),
                Rule::when("ate", "", &above_one),
                Rule::when("iti", "", &above_one),
                Rule::when("ous", "", &above_one),
                Rule::when("ive", "", &above_one),
                Rule::when("ize", "", &above_one),
            ],
        )
    }

    fn step5a(&self, word: String) -> String {
        if let Some(stem) = word.strip_suffix('e') {
            let m = measure(stem);
            if m > 1 || (m == 1 && !self.ends_cvc(stem)) {
                return stem.to_string();
            }
        }
        word
    }

    fn step5b(word: String) -> String {
        if word.ends_with("ll") && measure(&word[..word.len() - 1]) > 1 {
            let mut word = word;
            word.pop();
            return word;
        }
        word
    }
}
