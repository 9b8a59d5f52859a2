use lindera::dictionary::load_dictionary;
use lindera::mode::Mode;
use lindera::segmenter::Segmenter;
use lindera::tokenizer::Tokenizer;

use crate::error::{Error, Result};

/// Token information from morphological analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Surface form (表層形)
    pub surface: String,
    /// Major part-of-speech category (品詞大分類)
    pub pos: String,
    /// Part of speech subcategory (品詞細分類1)
    pub pos_detail1: String,
    /// Base form (基本形)
    pub base_form: String,
    /// Reading (読み)
    pub reading: String,
}

/// Morphological analyzer using Lindera
pub struct MorphologicalAnalyzer {
    tokenizer: Tokenizer,
}

impl MorphologicalAnalyzer {
    pub fn new() -> Result<Self> {
        let dictionary =
            load_dictionary("embedded://ipadic").map_err(|e| Error::Dictionary(e.to_string()))?;
        let segmenter = Segmenter::new(Mode::Normal, dictionary, None);
        let tokenizer = Tokenizer::new(segmenter);
        Ok(Self { tokenizer })
    }

    /// Tokenize text and return token information
    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = match self.tokenizer.tokenize(text) {
            Ok(t) => t,
            Err(_) => return Vec::new(),
        };

        let mut result = Vec::with_capacity(tokens.len());
        for token in tokens.iter_mut() {
            let surface = token.surface.as_ref().to_string();

            // IPADIC detail layout: POS, detail1..3, conjugation, base form, reading, pronunciation
            let details = token.details();

            result.push(Token {
                pos: details
                    .first()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "*".to_string()),
                pos_detail1: details
                    .get(1)
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "*".to_string()),
                base_form: details
                    .get(6)
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| surface.clone()),
                reading: details.get(7).map(|s| s.to_string()).unwrap_or_default(),
                surface,
            });
        }

        result
    }

    /// Tokenize each input line separately, preserving line boundaries
    /// for line-based co-occurrence extraction.
    pub fn tokenize_lines(&self, text: &str) -> Vec<Vec<Token>> {
        text.split('\n').map(|line| self.tokenize(line)).collect()
    }

    /// Major POS category of a single word, used when re-tagging edited
    /// or merged word lists.
    pub fn pos_of(&self, word: &str) -> Option<String> {
        if word.is_empty() {
            return None;
        }
        self.tokenize(word).first().map(|t| t.pos.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tokenize_japanese_sentence() {
        let analyzer = MorphologicalAnalyzer::new().unwrap();
        let tokens = analyzer.tokenize("人工知能の研究が進んでいる");

        assert!(!tokens.is_empty());
        let surfaces: Vec<&str> = tokens.iter().map(|t| t.surface.as_str()).collect();
        assert!(surfaces.contains(&"研究"));

        let kenkyu = tokens.iter().find(|t| t.surface == "研究").unwrap();
        assert_eq!(kenkyu.pos, "名詞");
    }

    #[test]
    fn test_tokenize_lines_preserves_line_count() {
        let analyzer = MorphologicalAnalyzer::new().unwrap();
        let lines = analyzer.tokenize_lines("今日は晴れ\n\n明日は雨");

        assert_eq!(lines.len(), 3);
        assert!(lines[1].is_empty());
        assert!(!lines[0].is_empty());
        assert!(!lines[2].is_empty());
    }

    #[test]
    fn test_pos_of_word() {
        let analyzer = MorphologicalAnalyzer::new().unwrap();
        assert_eq!(analyzer.pos_of("研究"), Some("名詞".to_string()));
        assert_eq!(analyzer.pos_of(""), None);
    }
}
