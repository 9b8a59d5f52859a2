//! Japanese stopword handling.
//!
//! Ships the default particle/function-word list and a small set type the
//! pipeline filters against. Extra words can be loaded from a plain text
//! file, one word per line.

use std::collections::HashSet;
use std::path::Path;

use crate::error::{Error, Result};

/// Default Japanese stopwords: particles, auxiliaries and other function
/// words that carry no weight in a word cloud or co-occurrence network.
pub const DEFAULT_STOPWORDS: &[&str] = &[
    "の", "に", "は", "を", "た", "が", "で", "て", "と", "し", "れ", "さ",
    "ある", "いる", "も", "する", "から", "な", "こと", "として", "い",
    "や", "れる", "など", "なっ", "ない", "この", "ため", "その", "あっ",
    "よう", "また", "もの", "という", "あり", "まで", "られ", "なる",
    "へ", "か", "だ", "これ", "によって", "により", "おり", "より", "による",
    "ず", "なり", "られる", "において", "ば", "なかっ", "なく", "しかし",
    "について", "せ", "だっ", "その後", "できる", "それ", "う", "ので",
    "なお", "のみ", "でき", "き", "つ", "における", "および", "いう",
    "さらに", "でも", "ら", "たり", "その他", "に関する", "たち", "ます",
    "ん", "なら", "に対して", "特に", "せる", "あるいは", "まし",
    "ながら", "ただし", "かつて", "ください", "なし", "これら", "それら",
];

/// A mutable stopword set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stopwords {
    words: HashSet<String>,
}

impl Stopwords {
    /// An empty set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in Japanese list.
    pub fn with_defaults() -> Self {
        Self {
            words: DEFAULT_STOPWORDS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn add(&mut self, word: impl Into<String>) {
        self.words.insert(word.into());
    }

    pub fn remove(&mut self, word: &str) {
        self.words.remove(word);
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Add words from a newline-delimited file. Blank lines are skipped.
    pub fn extend_from_file(&mut self, path: &Path) -> Result<()> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        for line in content.lines() {
            let word = line.trim();
            if !word.is_empty() {
                self.words.insert(word.to_string());
            }
        }
        Ok(())
    }

    /// Words in sorted order, for display and export.
    pub fn iter_sorted(&self) -> Vec<&str> {
        let mut words: Vec<&str> = self.words.iter().map(|s| s.as_str()).collect();
        words.sort_unstable();
        words
    }
}
