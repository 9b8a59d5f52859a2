//! Tokenization pipeline and word-list editing.
//!
//! Turns raw text into a filtered token stream with an aligned POS cache and
//! a word-frequency table, keeping per-line token lists for line-based
//! co-occurrence. The editing operations mirror what a user does to the word
//! list before visualizing: dropping words, dropping a POS category,
//! replacing words and re-applying stopwords.

use std::collections::HashMap;

use unicode_segmentation::UnicodeSegmentation;

use crate::analyzer::MorphologicalAnalyzer;
use crate::merge::{self, MergeRule};
use crate::stopwords::Stopwords;

/// Options for the tokenization pass.
#[derive(Debug, Clone)]
pub struct TokenizeOptions {
    /// Minimum surface length in grapheme clusters. Single-character
    /// tokens are mostly particles and noise in Japanese.
    pub min_chars: usize,
    pub stopwords: Stopwords,
}

impl Default for TokenizeOptions {
    fn default() -> Self {
        Self {
            min_chars: 2,
            stopwords: Stopwords::with_defaults(),
        }
    }
}

/// Whether a surface survives stopword and length filtering.
pub fn token_passes(surface: &str, opts: &TokenizeOptions) -> bool {
    !opts.stopwords.contains(surface) && surface.graphemes(true).count() >= opts.min_chars
}

/// Result of tokenizing a text.
#[derive(Debug, Clone, Default)]
pub struct TokenizedText {
    /// Filtered token stream (stopwords and short surfaces removed).
    pub tokens: Vec<String>,
    /// Major POS category aligned with `tokens`.
    pub pos_cache: Vec<String>,
    /// Surface -> occurrence count over `tokens`.
    pub word_freq: HashMap<String, usize>,
    /// Unfiltered token surfaces per input line.
    pub token_lines: Vec<Vec<String>>,
    /// All surfaces in text order, unfiltered.
    pub surfaces: Vec<String>,
    /// Major POS categories aligned with `surfaces`.
    pub pos_list: Vec<String>,
}

/// Tokenize `text` and apply stopword/length filtering.
pub fn tokenize(
    analyzer: &MorphologicalAnalyzer,
    text: &str,
    opts: &TokenizeOptions,
) -> TokenizedText {
    let line_tokens = analyzer.tokenize_lines(text);

    let mut token_lines = Vec::with_capacity(line_tokens.len());
    let mut surfaces = Vec::new();
    let mut pos_list = Vec::new();
    for line in &line_tokens {
        token_lines.push(line.iter().map(|t| t.surface.clone()).collect::<Vec<_>>());
        for token in line {
            surfaces.push(token.surface.clone());
            pos_list.push(token.pos.clone());
        }
    }

    let mut tokens = Vec::new();
    let mut pos_cache = Vec::new();
    for (surface, pos) in surfaces.iter().zip(&pos_list) {
        if token_passes(surface, opts) {
            tokens.push(surface.clone());
            pos_cache.push(pos.clone());
        }
    }

    let word_freq = count_freq(&tokens);
    tracing::debug!(
        tokens = tokens.len(),
        unique = word_freq.len(),
        lines = token_lines.len(),
        "tokenized text"
    );

    TokenizedText {
        tokens,
        pos_cache,
        word_freq,
        token_lines,
        surfaces,
        pos_list,
    }
}

fn count_freq(tokens: &[String]) -> HashMap<String, usize> {
    let mut freq = HashMap::new();
    for token in tokens {
        *freq.entry(token.clone()).or_insert(0) += 1;
    }
    freq
}

impl TokenizedText {
    fn rebuild_freq(&mut self) {
        self.word_freq = count_freq(&self.tokens);
    }

    /// Remove every occurrence of `word` from the word list.
    pub fn remove_word(&mut self, word: &str) {
        let mut tokens = Vec::with_capacity(self.tokens.len());
        let mut pos_cache = Vec::with_capacity(self.pos_cache.len());
        for (token, pos) in self.tokens.iter().zip(&self.pos_cache) {
            if token != word {
                tokens.push(token.clone());
                pos_cache.push(pos.clone());
            }
        }
        self.tokens = tokens;
        self.pos_cache = pos_cache;
        self.rebuild_freq();
    }

    /// Replace every occurrence of `from` with `to`, re-tagging the
    /// replacement through the analyzer. Line token lists are rewritten as
    /// well so line-based co-occurrence sees the replacement.
    pub fn replace_word(&mut self, from: &str, to: &str, analyzer: &MorphologicalAnalyzer) {
        if from.is_empty() || from == to {
            return;
        }
        let new_pos = analyzer.pos_of(to).unwrap_or_default();
        for (token, pos) in self.tokens.iter_mut().zip(self.pos_cache.iter_mut()) {
            if token == from {
                *token = to.to_string();
                *pos = new_pos.clone();
            }
        }
        for line in &mut self.token_lines {
            for token in line.iter_mut() {
                if token == from {
                    *token = to.to_string();
                }
            }
        }
        self.rebuild_freq();
    }

    /// Remove every word tagged with the given major POS category.
    pub fn remove_pos(&mut self, pos_tag: &str) {
        let mut tokens = Vec::with_capacity(self.tokens.len());
        let mut pos_cache = Vec::with_capacity(self.pos_cache.len());
        for (token, pos) in self.tokens.iter().zip(&self.pos_cache) {
            if pos != pos_tag {
                tokens.push(token.clone());
                pos_cache.push(pos.clone());
            }
        }
        self.tokens = tokens;
        self.pos_cache = pos_cache;
        self.rebuild_freq();
    }

    /// Re-apply a stopword set to the current word list.
    pub fn apply_stopwords(&mut self, stopwords: &Stopwords) {
        let mut tokens = Vec::with_capacity(self.tokens.len());
        let mut pos_cache = Vec::with_capacity(self.pos_cache.len());
        for (token, pos) in self.tokens.iter().zip(&self.pos_cache) {
            if !stopwords.contains(token) {
                tokens.push(token.clone());
                pos_cache.push(pos.clone());
            }
        }
        self.tokens = tokens;
        self.pos_cache = pos_cache;
        self.rebuild_freq();
    }

    /// Apply collocation merge rules to the per-line token lists and rebuild
    /// the filtered stream from the merged lines.
    pub fn apply_merge_rules(
        &mut self,
        rules: &[MergeRule],
        opts: &TokenizeOptions,
        analyzer: &MorphologicalAnalyzer,
    ) {
        if rules.is_empty() {
            return;
        }
        let (merged_lines, filtered) = merge::merge_lines(&self.token_lines, rules, opts);
        self.token_lines = merged_lines;
        self.tokens = filtered;

        let mut memo: HashMap<String, String> = HashMap::new();
        self.pos_cache = self
            .tokens
            .iter()
            .map(|token| {
                memo.entry(token.clone())
                    .or_insert_with(|| analyzer.pos_of(token).unwrap_or_default())
                    .clone()
            })
            .collect();
        self.rebuild_freq();
    }

    /// Frequency table restricted to words occurring at least `min_freq` times.
    pub fn filtered_freq(&self, min_freq: usize) -> HashMap<String, usize> {
        self.word_freq
            .iter()
            .filter(|(_, &count)| count >= min_freq)
            .map(|(word, &count)| (word.clone(), count))
            .collect()
    }

    /// Count of occurrences per POS category, for the editing UI side of
    /// POS-based deletion.
    pub fn pos_breakdown(&self) -> HashMap<String, usize> {
        let mut breakdown = HashMap::new();
        for pos in &self.pos_cache {
            *breakdown.entry(pos.clone()).or_insert(0) += 1;
        }
        breakdown
    }

    /// Word -> POS lookup built from the first occurrence of each word.
    pub fn pos_by_word(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();
        for (token, pos) in self.tokens.iter().zip(&self.pos_cache) {
            map.entry(token.clone()).or_insert_with(|| pos.clone());
        }
        map
    }
}
