//! Raw bytes to canonical tokens.
//!
//! Each step is a pure transformation and is exposed on its own so the
//! intermediate text can be inspected. The order is fixed: markup, whitespace,
//! stopwords, Unicode folding, tokenization.

use regex::{Captures, Regex};
use std::borrow::Cow;
use unicode_normalization::UnicodeNormalization;

use related_core::Result;

use crate::stopwords::Stopwords;

const MARKUP: &str = r"<[^>]*>";
const WHITESPACE: &str = r"\s{2,}";
const WORD: &str = r"[\p{L}\p{M}_'-]+";
const WORD_EDGES: &[char] = &['_', '\'', '-'];

/// NFC then lowercase. Stopword dictionaries and tokens both go through this,
/// so a word matches its dictionary entry whatever form the source used.
pub fn fold(text: &str) -> String {
    text.nfc().collect::<String>().to_lowercase()
}

#[derive(Debug, Clone)]
pub struct Normalizer {
    markup: Regex,
    whitespace: Regex,
    word: Regex,
    stopwords: Stopwords,
}

impl Normalizer {
    pub fn new(stopwords: Stopwords) -> Result<Self> {
        Ok(Self { markup: Regex::new(MARKUP)?, whitespace: Regex::new(WHITESPACE)?, word: Regex::new(WORD)?, stopwords })
    }

    /// Never fails: undecodable bytes are replaced, empty input gives no tokens.
    pub fn normalize(&self, raw: &[u8], lang: &str) -> Vec<String> {
        if raw.is_empty() {
            return Vec::new();
        }
        let text = String::from_utf8_lossy(raw);
        let text = self.strip_markup(&text);
        let text = self.collapse_whitespace(&text);
        let text = self.remove_stopwords(&text, lang);
        self.tokenize(&fold(&text))
    }

    /// Replaces every `<...>` with a single space. Unbalanced markup is fine.
    pub fn strip_markup<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.markup.replace_all(text, " ")
    }

    pub fn collapse_whitespace<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.whitespace.replace_all(text, " ")
    }

    /// Drops dictionary words for `lang`. Unknown languages pass through.
    pub fn remove_stopwords<'t>(&self, text: &'t str, lang: &str) -> Cow<'t, str> {
        let Some(set) = self.stopwords.for_lang(lang) else {
            return Cow::Borrowed(text);
        };
        self.word.replace_all(text, |caps: &Captures<'_>| {
            let word = &caps[0];
            if set.contains(&fold(word.trim_matches(WORD_EDGES))) {
                String::new()
            } else {
                word.to_string()
            }
        })
    }

    /// Splits on anything that is not a letter; `_`, `'` and `-` only survive inside words.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.word
            .find_iter(text)
            .map(|m| m.as_str().trim_matches(WORD_EDGES))
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }
}
