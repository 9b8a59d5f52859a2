//! Command-line interface: argument parsing and command runners.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::analyzer::MorphologicalAnalyzer;
use crate::chart;
use crate::cloud::{CloudShape, CloudSpec};
use crate::config::Config;
use crate::cooccur::{self, CooccurrenceOptions, SelfLoopMode, WindowMode};
use crate::export;
use crate::input;
use crate::merge;
use crate::pipeline::{self, TokenizeOptions, TokenizedText};
use crate::stopwords::Stopwords;

#[derive(Debug, Parser)]
#[command(
    name = "wakumo",
    version,
    about = "Japanese text analysis: tokenize, edit word lists, derive word clouds, co-occurrence networks and frequency charts"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Tokenize the input and write the word list as CSV (word, POS, count)
    Tokenize {
        #[command(flatten)]
        args: InputArgs,

        /// Output CSV path
        #[arg(long, short)]
        output: PathBuf,
    },

    /// Render the word-frequency bar chart (SVG) and optionally a CSV table
    Freq {
        #[command(flatten)]
        args: InputArgs,

        /// Output SVG path for the chart
        #[arg(long)]
        chart: Option<PathBuf>,

        /// Output CSV path for the frequency table
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Number of words shown in the chart
        #[arg(long)]
        top: Option<usize>,
    },

    /// Build the co-occurrence network (Graphviz DOT and/or edge-list CSV)
    Network {
        #[command(flatten)]
        args: InputArgs,

        /// Output DOT path (render with Graphviz, e.g. `neato -Tsvg`)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Output CSV path for the edge list
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Pair extraction mode
        #[arg(long)]
        mode: Option<ModeArg>,

        /// Sliding window size
        #[arg(long)]
        window: Option<usize>,

        /// Number of most frequent pairs to keep
        #[arg(long)]
        max_edges: Option<usize>,

        /// Minimum co-occurrence count per pair
        #[arg(long)]
        min_cooc: Option<usize>,

        /// What to do with pairs of a word with itself
        #[arg(long, value_enum, default_value_t = SelfLoopArg::Remove)]
        self_loops: SelfLoopArg,

        /// Collapse runs of the same token before pairing
        #[arg(long)]
        collapse: bool,

        /// Count each distinct pair at most once per line (line mode)
        #[arg(long)]
        dedup_per_line: bool,
    },

    /// Emit the word-cloud render spec (JSON) for an external renderer
    Cloud {
        #[command(flatten)]
        args: InputArgs,

        /// Output JSON path
        #[arg(long, short)]
        output: PathBuf,

        #[arg(long)]
        width: Option<u32>,

        #[arg(long)]
        height: Option<u32>,

        /// Canvas shape
        #[arg(long, value_enum, default_value_t = ShapeArg::Rectangle)]
        shape: ShapeArg,

        /// Grayscale mask image for the custom shape
        #[arg(long)]
        mask: Option<PathBuf>,

        /// Japanese font file for the renderer
        #[arg(long)]
        font: Option<PathBuf>,
    },
}

/// Input and word-list editing flags shared by all subcommands.
#[derive(Debug, Args)]
pub struct InputArgs {
    /// Input text or CSV file
    #[arg(long, short)]
    pub input: PathBuf,

    /// Treat the input as CSV even without a .csv extension
    #[arg(long)]
    pub csv_input: bool,

    /// Zero-based CSV column indices to combine (default: all columns)
    #[arg(long, value_delimiter = ',')]
    pub columns: Vec<usize>,

    /// Whether the first CSV row is a header (default: guessed)
    #[arg(long)]
    pub has_header: Option<bool>,

    /// Extra stopword file, one word per line
    #[arg(long)]
    pub stopwords: Option<PathBuf>,

    /// Disable the built-in Japanese stopword list
    #[arg(long)]
    pub no_default_stopwords: bool,

    /// Collocation merge rule file (JSON array of {seq, merged})
    #[arg(long)]
    pub merge_rules: Option<PathBuf>,

    /// Minimum token length in characters
    #[arg(long)]
    pub min_chars: Option<usize>,

    /// Drop a word from the word list (repeatable)
    #[arg(long = "drop-word")]
    pub drop_words: Vec<String>,

    /// Drop every word tagged with this POS category (repeatable)
    #[arg(long = "drop-pos")]
    pub drop_pos: Vec<String>,

    /// Replace FROM=TO in the word list (repeatable)
    #[arg(long, value_parser = parse_replace)]
    pub replace: Vec<(String, String)>,

    /// Keep only words occurring at least this many times
    /// (default: 1 for tokenize, 2 for visualizations)
    #[arg(long)]
    pub min_freq: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Sliding,
    Line,
}

impl From<ModeArg> for WindowMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Sliding => WindowMode::Sliding,
            ModeArg::Line => WindowMode::Line,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SelfLoopArg {
    Keep,
    Remove,
}

impl From<SelfLoopArg> for SelfLoopMode {
    fn from(mode: SelfLoopArg) -> Self {
        match mode {
            SelfLoopArg::Keep => SelfLoopMode::Keep,
            SelfLoopArg::Remove => SelfLoopMode::Remove,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ShapeArg {
    Rectangle,
    Ellipse,
    Custom,
}

impl From<ShapeArg> for CloudShape {
    fn from(shape: ShapeArg) -> Self {
        match shape {
            ShapeArg::Rectangle => CloudShape::Rectangle,
            ShapeArg::Ellipse => CloudShape::Ellipse,
            ShapeArg::Custom => CloudShape::Custom,
        }
    }
}

fn parse_replace(s: &str) -> std::result::Result<(String, String), String> {
    s.split_once('=')
        .map(|(from, to)| (from.to_string(), to.to_string()))
        .ok_or_else(|| format!("expected FROM=TO, got '{s}'"))
}

pub async fn run(cli: Cli) -> Result<()> {
    let config = Config::load_from_default();
    let analyzer = MorphologicalAnalyzer::new()?;

    match cli.command {
        Command::Tokenize { args, output } => {
            let tokenized = prepare(&args, &config, &analyzer).await?;
            let min_freq = args.min_freq.unwrap_or(1);
            let word_freq = tokenized.filtered_freq(min_freq);
            if word_freq.is_empty() {
                bail!("no words occur at least {min_freq} times");
            }
            export::write_word_frequency_csv(&output, &word_freq, &tokenized.pos_by_word())?;
        }

        Command::Freq {
            args,
            chart: chart_path,
            csv,
            top,
        } => {
            if chart_path.is_none() && csv.is_none() {
                bail!("specify --chart and/or --csv");
            }
            let tokenized = prepare(&args, &config, &analyzer).await?;
            let min_freq = args.min_freq.unwrap_or(2);
            let word_freq = tokenized.filtered_freq(min_freq);
            if word_freq.is_empty() {
                bail!("no words occur at least {min_freq} times");
            }
            if let Some(path) = chart_path {
                let top_n = top.unwrap_or(config.chart.top_n);
                let svg = chart::frequency_chart_svg(&word_freq, top_n)?;
                std::fs::write(&path, svg)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                tracing::info!(path = %path.display(), "wrote frequency chart");
            }
            if let Some(path) = csv {
                export::write_word_frequency_csv(&path, &word_freq, &tokenized.pos_by_word())?;
            }
        }

        Command::Network {
            args,
            output,
            csv,
            mode,
            window,
            max_edges,
            min_cooc,
            self_loops,
            collapse,
            dedup_per_line,
        } => {
            if output.is_none() && csv.is_none() {
                bail!("specify --output and/or --csv");
            }
            let tokenized = prepare(&args, &config, &analyzer).await?;
            let min_freq = args.min_freq.unwrap_or(2);
            let word_freq = tokenized.filtered_freq(min_freq);
            if word_freq.is_empty() {
                bail!("no words occur at least {min_freq} times");
            }

            let default_mode = if config.network.mode == "line" {
                WindowMode::Line
            } else {
                WindowMode::Sliding
            };
            let opts = CooccurrenceOptions {
                mode: mode.map(WindowMode::from).unwrap_or(default_mode),
                window_size: window.unwrap_or(config.network.window_size),
                collapse_consecutive: collapse,
                dedup_pairs_per_line: dedup_per_line,
                self_loops: self_loops.into(),
                max_edges: max_edges.unwrap_or(config.network.max_edges),
                min_count: min_cooc.unwrap_or(config.network.min_count),
            };

            let graph = match cooccur::build_network(
                &tokenized.tokens,
                &tokenized.token_lines,
                &word_freq,
                &opts,
            ) {
                Some(graph) => graph,
                None => bail!(
                    "no displayable co-occurrence network; \
                     try a larger window or more edges"
                ),
            };

            if let Some(path) = output {
                let dot = graph.to_dot(&word_freq);
                std::fs::write(&path, dot)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                tracing::info!(
                    path = %path.display(),
                    nodes = graph.node_count(),
                    edges = graph.edge_count(),
                    "wrote network DOT"
                );
            }
            if let Some(path) = csv {
                export::write_edges_csv(&path, &graph.edges())?;
            }
        }

        Command::Cloud {
            args,
            output,
            width,
            height,
            shape,
            mask,
            font,
        } => {
            let tokenized = prepare(&args, &config, &analyzer).await?;
            let min_freq = args.min_freq.unwrap_or(2);
            let word_freq = tokenized.filtered_freq(min_freq);

            let mut spec = CloudSpec::new(&word_freq);
            spec.width = width.unwrap_or(config.cloud.width);
            spec.height = height.unwrap_or(config.cloud.height);
            spec.shape = shape.into();
            spec.mask_path = mask;
            spec.font_path = font.or_else(|| config.cloud.font_path.clone());
            spec.validate()?;

            std::fs::write(&output, spec.to_json()?)
                .with_context(|| format!("failed to write {}", output.display()))?;
            tracing::info!(
                path = %output.display(),
                words = spec.frequencies.len(),
                "wrote word cloud spec"
            );
        }
    }

    Ok(())
}

/// Load the input, tokenize it and apply word-list edits.
async fn prepare(
    args: &InputArgs,
    config: &Config,
    analyzer: &MorphologicalAnalyzer,
) -> Result<TokenizedText> {
    let text = load_text(args).await?;
    if text.trim().is_empty() {
        bail!("input text is empty");
    }

    let opts = tokenize_options(args, config)?;
    let mut tokenized = pipeline::tokenize(analyzer, &text, &opts);
    tracing::info!(
        tokens = tokenized.tokens.len(),
        unique = tokenized.word_freq.len(),
        "extracted words"
    );

    if let Some(path) = &args.merge_rules {
        let rules = merge::load_rules(path)?;
        tokenized.apply_merge_rules(&rules, &opts, analyzer);
    }
    for word in &args.drop_words {
        tokenized.remove_word(word);
    }
    for pos in &args.drop_pos {
        tokenized.remove_pos(pos);
    }
    for (from, to) in &args.replace {
        tokenized.replace_word(from, to, analyzer);
    }

    Ok(tokenized)
}

async fn load_text(args: &InputArgs) -> Result<String> {
    let raw = tokio::fs::read(&args.input)
        .await
        .with_context(|| format!("failed to read {}", args.input.display()))?;

    let is_csv = args.csv_input
        || args
            .input
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);

    if is_csv {
        let doc = input::parse_csv(&raw)?;
        let has_header = args.has_header.unwrap_or(doc.has_header_guess);
        let selected: Vec<usize> = if args.columns.is_empty() {
            let width = doc.rows.iter().map(|r| r.len()).max().unwrap_or(0);
            (0..width).collect()
        } else {
            args.columns.clone()
        };
        tracing::info!(
            encoding = doc.encoding,
            delimiter = %(doc.delimiter as char),
            has_header,
            "loaded CSV input"
        );
        Ok(input::combine_columns(&doc.rows, &selected, has_header))
    } else {
        let (text, encoding) = input::decode_text(&raw);
        tracing::info!(encoding, "loaded text input");
        Ok(text)
    }
}

fn tokenize_options(args: &InputArgs, config: &Config) -> Result<TokenizeOptions> {
    let mut stopwords = if args.no_default_stopwords || !config.tokenize.use_default_stopwords {
        Stopwords::empty()
    } else {
        Stopwords::with_defaults()
    };
    if let Some(path) = &config.tokenize.stopword_file {
        stopwords.extend_from_file(path)?;
    }
    if let Some(path) = &args.stopwords {
        stopwords.extend_from_file(path)?;
    }
    Ok(TokenizeOptions {
        min_chars: args.min_chars.unwrap_or(config.tokenize.min_chars),
        stopwords,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_replace() {
        assert_eq!(
            parse_replace("AI=人工知能"),
            Ok(("AI".to_string(), "人工知能".to_string()))
        );
        assert!(parse_replace("no-separator").is_err());
    }

    #[test]
    fn test_parse_network_flags() {
        let cli = Cli::try_parse_from([
            "wakumo",
            "network",
            "--input",
            "text.txt",
            "--output",
            "net.dot",
            "--mode",
            "line",
            "--window",
            "8",
            "--dedup-per-line",
        ])
        .unwrap();

        match cli.command {
            Command::Network {
                mode,
                window,
                dedup_per_line,
                self_loops,
                ..
            } => {
                assert_eq!(mode, Some(ModeArg::Line));
                assert_eq!(window, Some(8));
                assert!(dedup_per_line);
                assert_eq!(self_loops, SelfLoopArg::Remove);
            }
            _ => panic!("expected network command"),
        }
    }

    #[test]
    fn test_parse_tokenize_with_edits() {
        let cli = Cli::try_parse_from([
            "wakumo",
            "tokenize",
            "-i",
            "text.txt",
            "-o",
            "words.csv",
            "--drop-pos",
            "動詞",
            "--replace",
            "AI=人工知能",
            "--columns",
            "0,2",
        ])
        .unwrap();

        match cli.command {
            Command::Tokenize { args, output } => {
                assert_eq!(output, PathBuf::from("words.csv"));
                assert_eq!(args.drop_pos, vec!["動詞".to_string()]);
                assert_eq!(args.replace.len(), 1);
                assert_eq!(args.columns, vec![0, 2]);
            }
            _ => panic!("expected tokenize command"),
        }
    }
}
