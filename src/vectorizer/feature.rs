use indexmap::IndexSet;
use unicode_general_category::{get_general_category, GeneralCategory};

use crate::config::{VectorizerConfig, NGRAM_SEPARATOR, SUBWORD_MAX_LEN, SUBWORD_MIN_LEN};

/// Tokens and derived features of one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Analysis {
    /// word tokens in document order
    pub tokens: Vec<String>,
    /// n-grams followed by per-token subwords, duplicates preserved
    pub features: Vec<String>,
}

/// Splits text into word tokens and derives n-gram and subword features.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureExtractor {
    ngram_range: (usize, usize),
    subword_min_len: usize,
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::from_config(&VectorizerConfig::default())
    }
}

impl FeatureExtractor {
    pub fn new(ngram_range: (usize, usize), subword_min_len: usize) -> Self {
        Self { ngram_range, subword_min_len }
    }

    pub fn from_config(config: &VectorizerConfig) -> Self {
        Self::new(config.ngram_range, SUBWORD_MIN_LEN)
    }

    /// Lowercases, blanks out everything that is not a word character or
    /// whitespace, then splits on whitespace.
    pub fn tokenize(text: &str) -> Vec<String> {
        let cleaned: String = text
            .to_lowercase()
            .chars()
            .map(|c| if is_word_char(c) || c.is_whitespace() { c } else { ' ' })
            .collect();
        cleaned.split_whitespace().map(str::to_owned).collect()
    }

    /// All contiguous token windows of length `min_n..=max_n`, grouped by `n`
    /// and in document order within a group.
    pub fn ngrams<T: AsRef<str>>(tokens: &[T], min_n: usize, max_n: usize) -> Vec<String> {
        let mut grams = Vec::new();
        let mut sep = [0u8; 4];
        let sep: &str = NGRAM_SEPARATOR.encode_utf8(&mut sep);
        for n in min_n.max(1)..=max_n.min(tokens.len()) {
            for window in tokens.windows(n) {
                let mut gram = String::from(window[0].as_ref());
                for tok in &window[1..] {
                    gram.push_str(sep);
                    gram.push_str(tok.as_ref());
                }
                grams.push(gram);
            }
        }
        grams
    }

    /// Distinct character substrings of `token` with length in
    /// `min_len..=SUBWORD_MAX_LEN`, in first-seen order.
    pub fn subwords(token: &str, min_len: usize) -> IndexSet<String> {
        let chars: Vec<char> = token.chars().collect();
        let len = chars.len();
        let mut subwords = IndexSet::new();
        for i in 0..len {
            let end = (i + SUBWORD_MAX_LEN + 1).min(len + 1);
            for j in (i + min_len)..end {
                subwords.insert(chars[i..j].iter().collect());
            }
        }
        subwords
    }

    /// Feature sequence of already tokenized text.
    pub fn features<T: AsRef<str>>(&self, tokens: &[T]) -> Vec<String> {
        let (min_n, max_n) = self.ngram_range;
        let mut features = Self::ngrams(tokens, min_n, max_n);
        for token in tokens {
            features.extend(Self::subwords(token.as_ref(), self.subword_min_len));
        }
        features
    }

    pub fn analyze(&self, text: &str) -> Analysis {
        let tokens = Self::tokenize(text);
        let features = self.features(&tokens);
        Analysis { tokens, features }
    }
}

/// Letters (L*), numbers (N*) and `_`. Combining marks (M*) are not word
/// characters even where `char::is_alphabetic` accepts them.
fn is_word_char(c: char) -> bool {
    use GeneralCategory::*;
    c == '_'
        || matches!(
            get_general_category(c),
            UppercaseLetter
                | LowercaseLetter
                | TitlecaseLetter
                | ModifierLetter
                | OtherLetter
                | DecimalNumber
                | LetterNumber
                | OtherNumber
        )
}
