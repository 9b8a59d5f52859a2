//! Collocation merge rules (連語結合).
//!
//! A rule combines 2 to 4 adjacent token surfaces into a single unit, e.g.
//! 人工 + 知能 -> 人工知能. When several rules match at the same position the
//! longest sequence wins, and the consumed tokens are not rescanned.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::pipeline::{token_passes, TokenizeOptions};

pub const MIN_RULE_LEN: usize = 2;
pub const MAX_RULE_LEN: usize = 4;

/// A user-defined collocation merge rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRule {
    /// Adjacent surfaces to match, in order.
    pub seq: Vec<String>,
    /// Replacement unit.
    pub merged: String,
}

impl MergeRule {
    pub fn new(seq: Vec<String>, merged: impl Into<String>) -> Result<Self> {
        let rule = Self {
            seq,
            merged: merged.into(),
        };
        rule.validate()?;
        Ok(rule)
    }

    pub fn validate(&self) -> Result<()> {
        if !(MIN_RULE_LEN..=MAX_RULE_LEN).contains(&self.seq.len()) {
            return Err(Error::MergeRule(format!(
                "a rule must combine {MIN_RULE_LEN} to {MAX_RULE_LEN} tokens, got {}",
                self.seq.len()
            )));
        }
        if self.merged.is_empty() {
            return Err(Error::MergeRule("merged unit must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }
}

/// Load merge rules from a JSON file (an array of `{seq, merged}` objects).
pub fn load_rules(path: &Path) -> Result<Vec<MergeRule>> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let rules: Vec<MergeRule> = serde_json::from_str(&content)?;
    for rule in &rules {
        rule.validate()?;
    }
    tracing::debug!(count = rules.len(), path = %path.display(), "loaded merge rules");
    Ok(rules)
}

/// Apply merge rules to one line of token surfaces. Longer rules take
/// precedence at each position.
pub fn apply_to_line(line: &[String], rules: &[MergeRule]) -> Vec<String> {
    let mut sorted: Vec<&MergeRule> = rules.iter().collect();
    sorted.sort_by(|a, b| b.len().cmp(&a.len()));

    let mut out = Vec::with_capacity(line.len());
    let mut i = 0;
    while i < line.len() {
        let matched = sorted
            .iter()
            .find(|rule| i + rule.len() <= line.len() && line[i..i + rule.len()] == rule.seq[..]);
        match matched {
            Some(rule) => {
                out.push(rule.merged.clone());
                i += rule.len();
            }
            None => {
                out.push(line[i].clone());
                i += 1;
            }
        }
    }
    out
}

/// Apply merge rules per line and rebuild the filtered token stream.
/// Merged units are themselves subject to stopword and length filtering.
pub fn merge_lines(
    lines: &[Vec<String>],
    rules: &[MergeRule],
    opts: &TokenizeOptions,
) -> (Vec<Vec<String>>, Vec<String>) {
    let mut merged_lines = Vec::with_capacity(lines.len());
    let mut filtered_tokens = Vec::new();
    for line in lines {
        let new_line = if rules.is_empty() {
            line.clone()
        } else {
            apply_to_line(line, rules)
        };
        filtered_tokens.extend(new_line.iter().filter(|t| token_passes(t, opts)).cloned());
        merged_lines.push(new_line);
    }
    (merged_lines, filtered_tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stopwords::Stopwords;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn line(words: &[&str]) -> Vec<String> {
        words.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_rule_length_bounds() {
        assert!(MergeRule::new(line(&["人工"]), "人工").is_err());
        assert!(MergeRule::new(line(&["a", "b", "c", "d", "e"]), "abcde").is_err());
        assert!(MergeRule::new(line(&["人工", "知能"]), "人工知能").is_ok());
        assert!(MergeRule::new(line(&["a", "b", "c", "d"]), "abcd").is_ok());
    }

    #[test]
    fn test_empty_merged_unit_rejected() {
        assert!(MergeRule::new(line(&["人工", "知能"]), "").is_err());
    }

    #[test]
    fn test_apply_to_line_basic_merge() {
        let rules = vec![MergeRule::new(line(&["人工", "知能"]), "人工知能").unwrap()];
        let merged = apply_to_line(&line(&["人工", "知能", "進化"]), &rules);
        assert_eq!(merged, line(&["人工知能", "進化"]));
    }

    #[test]
    fn test_apply_to_line_prefers_longer_match() {
        let rules = vec![
            MergeRule::new(line(&["人工", "知能"]), "人工知能").unwrap(),
            MergeRule::new(line(&["人工", "知能", "研究"]), "人工知能研究").unwrap(),
        ];
        let merged = apply_to_line(&line(&["人工", "知能", "研究", "所"]), &rules);
        assert_eq!(merged, line(&["人工知能研究", "所"]));
    }

    #[test]
    fn test_merged_tokens_not_rescanned() {
        // 機械 + 学習 -> 機械学習; the produced unit must not match again
        let rules = vec![MergeRule::new(line(&["機械", "学習"]), "機械学習").unwrap()];
        let merged = apply_to_line(&line(&["機械", "学習", "機械", "学習"]), &rules);
        assert_eq!(merged, line(&["機械学習", "機械学習"]));
    }

    #[test]
    fn test_merge_lines_applies_rules_and_filters() {
        let mut stopwords = Stopwords::empty();
        stopwords.add("AI");
        let opts = TokenizeOptions {
            min_chars: 2,
            stopwords,
        };
        let rules = vec![MergeRule::new(line(&["人工", "知能"]), "人工知能").unwrap()];
        let lines = vec![line(&["人工", "知能", "AI"]), line(&["進化", "未来"])];

        let (merged_lines, filtered) = merge_lines(&lines, &rules, &opts);

        assert_eq!(merged_lines[0], line(&["人工知能", "AI"]));
        assert_eq!(filtered, line(&["人工知能", "進化", "未来"]));
    }

    #[test]
    fn test_load_rules_from_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"seq": ["人工", "知能"], "merged": "人工知能"}}]"#
        )
        .unwrap();

        let rules = load_rules(file.path()).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].merged, "人工知能");
    }

    #[test]
    fn test_load_rules_rejects_bad_length() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"seq": ["人工"], "merged": "人工"}}]"#).unwrap();
        assert!(load_rules(file.path()).is_err());
    }
}
