use lazy_static::lazy_static;
use regex::Regex;
use rustc_hash::FxHashSet;
use unicode_normalization::UnicodeNormalization;

use crate::config::EngineConfig;

lazy_static! {
    static ref TERM: Regex = Regex::new(r"[\p{L}\p{N}]+").unwrap();
    static ref STOP_WORDS: FxHashSet<&'static str> = {
        let words = vec![
            "a", "an", "and", "are", "as", "at", "be", "by", "for", "from",
            "has", "he", "in", "is", "it", "its", "of", "on", "that", "the",
            "to", "was", "were", "will", "with"
        ];
        words.into_iter().collect()
    };
}

/// Splits text into index terms. The same instance must be used for the
/// corpus and for queries, otherwise query terms won't line up with the
/// vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokenizer {
    pub min_token_len: usize,
    pub stop_words: bool,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self {
            min_token_len: 1,
            stop_words: false,
        }
    }
}

impl Tokenizer {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            min_token_len: config.min_token_len.max(1),
            stop_words: config.stop_words,
        }
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        // Normalize so that precomposed and decomposed accents map to one term
        let text = text.nfc().collect::<String>().to_lowercase();

        TERM.find_iter(&text)
            .map(|m| m.as_str())
            .filter(|token| token.chars().count() >= self.min_token_len)
            .filter(|token| !(self.stop_words && STOP_WORDS.contains(token)))
            .map(|token| token.to_string())
            .collect()
    }
}
