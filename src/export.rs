//! CSV exports of the analysis results.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{Error, Result};

/// Write the word list as `word,pos,count`, most frequent first.
pub fn write_word_frequency_csv(
    path: &Path,
    word_freq: &HashMap<String, usize>,
    pos_by_word: &HashMap<String, String>,
) -> Result<()> {
    let mut ranked: Vec<(&String, usize)> = word_freq.iter().map(|(w, &c)| (w, c)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["word", "pos", "count"])?;
    for (word, count) in ranked {
        let pos = pos_by_word.get(word).map(|s| s.as_str()).unwrap_or("");
        writer.write_record([word.as_str(), pos, &count.to_string()])?;
    }
    writer.flush().map_err(|e| Error::io(path, e))?;
    tracing::info!(path = %path.display(), words = word_freq.len(), "wrote word frequency CSV");
    Ok(())
}

/// Write co-occurrence edges as `word1,word2,count`, heaviest first.
pub fn write_edges_csv(path: &Path, edges: &[(String, String, usize)]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["word1", "word2", "count"])?;
    for (a, b, count) in edges {
        writer.write_record([a.as_str(), b.as_str(), &count.to_string()])?;
    }
    writer.flush().map_err(|e| Error::io(path, e))?;
    tracing::info!(path = %path.display(), edges = edges.len(), "wrote edge list CSV");
    Ok(())
}
