//! Wakumo - Japanese text analysis toolkit
//!
//! Tokenizes Japanese text with morphological analysis, supports word-list
//! editing (stopwords, merge rules, replacements) and derives word clouds,
//! co-occurrence networks and frequency charts.

pub mod analyzer;
pub mod chart;
pub mod cli;
pub mod cloud;
pub mod config;
pub mod cooccur;
pub mod error;
pub mod export;
pub mod input;
pub mod merge;
pub mod pipeline;
pub mod stopwords;
