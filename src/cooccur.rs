//! Co-occurrence pair extraction and network construction.
//!
//! Pairs are extracted either from a sliding window over the whole token
//! stream or from unordered pairs within each input line. The counted pairs
//! become a weighted undirected graph which is reduced to its largest
//! connected component and stripped of its lightest edges before export.
//! Layout and rendering stay external: the graph is serialized as Graphviz
//! DOT.

use std::collections::{HashMap, HashSet};

/// How pairs are extracted from the token stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowMode {
    /// Sliding window of `window_size` over the flat token stream.
    Sliding,
    /// All unordered pairs within each input line.
    Line,
}

/// What to do with pairs of a word with itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelfLoopMode {
    Keep,
    Remove,
}

#[derive(Debug, Clone)]
pub struct CooccurrenceOptions {
    pub mode: WindowMode,
    pub window_size: usize,
    /// Collapse runs of the same token before pairing.
    pub collapse_consecutive: bool,
    /// Count each distinct pair at most once per line (line mode only).
    pub dedup_pairs_per_line: bool,
    pub self_loops: SelfLoopMode,
    /// Keep only this many of the most frequent pairs.
    pub max_edges: usize,
    /// Drop pairs seen fewer times than this.
    pub min_count: usize,
}

impl Default for CooccurrenceOptions {
    fn default() -> Self {
        Self {
            mode: WindowMode::Sliding,
            window_size: 5,
            collapse_consecutive: false,
            dedup_pairs_per_line: false,
            self_loops: SelfLoopMode::Remove,
            max_edges: 50,
            min_count: 1,
        }
    }
}

fn canonical_pair(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

fn collapse_runs<'a>(items: impl IntoIterator<Item = &'a String>) -> Vec<&'a String> {
    let mut out = Vec::new();
    let mut prev: Option<&String> = None;
    for item in items {
        if prev != Some(item) {
            out.push(item);
        }
        prev = Some(item);
    }
    out
}

/// Extract co-occurrence pairs. Only words present in `word_freq` (the
/// possibly min-frequency-filtered table) participate. Pairs are
/// canonicalized so `(a, b)` and `(b, a)` accumulate together.
pub fn extract_pairs(
    tokens: &[String],
    token_lines: &[Vec<String>],
    word_freq: &HashMap<String, usize>,
    opts: &CooccurrenceOptions,
) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    match opts.mode {
        WindowMode::Sliding => {
            let used: Vec<&String> = if opts.collapse_consecutive {
                collapse_runs(tokens)
            } else {
                tokens.iter().collect()
            };
            for i in 0..used.len() {
                if !word_freq.contains_key(used[i].as_str()) {
                    continue;
                }
                for j in (i + 1)..usize::min(i + opts.window_size, used.len()) {
                    if !word_freq.contains_key(used[j].as_str()) {
                        continue;
                    }
                    pairs.push(canonical_pair(used[i], used[j]));
                }
            }
        }
        WindowMode::Line => {
            for line in token_lines {
                if line.is_empty() {
                    continue;
                }
                let line_tokens: Vec<&String> = line
                    .iter()
                    .filter(|s| word_freq.contains_key(s.as_str()))
                    .collect();
                let line_tokens = if opts.collapse_consecutive {
                    collapse_runs(line_tokens)
                } else {
                    line_tokens
                };
                let mut seen: HashSet<(String, String)> = HashSet::new();
                for i in 0..line_tokens.len() {
                    for j in (i + 1)..line_tokens.len() {
                        let pair = canonical_pair(line_tokens[i], line_tokens[j]);
                        if opts.dedup_pairs_per_line {
                            if seen.insert(pair.clone()) {
                                pairs.push(pair);
                            }
                        } else {
                            pairs.push(pair);
                        }
                    }
                }
            }
        }
    }
    pairs
}

/// A weighted undirected word graph with interned node ids.
#[derive(Debug, Clone, Default)]
pub struct NetworkGraph {
    words: Vec<String>,
    ids: HashMap<String, u32>,
    adjacency: Vec<HashMap<u32, usize>>,
}

impl NetworkGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn intern(&mut self, word: &str) -> u32 {
        if let Some(&id) = self.ids.get(word) {
            return id;
        }
        let id = self.words.len() as u32;
        self.ids.insert(word.to_string(), id);
        self.words.push(word.to_string());
        self.adjacency.push(HashMap::new());
        id
    }

    /// Insert an edge with the given weight (both directions).
    pub fn add_edge(&mut self, a: &str, b: &str, weight: usize) {
        let ia = self.intern(a);
        let ib = self.intern(b);
        self.adjacency[ia as usize].insert(ib, weight);
        self.adjacency[ib as usize].insert(ia, weight);
    }

    pub fn node_count(&self) -> usize {
        self.words.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency
            .iter()
            .enumerate()
            .map(|(i, adj)| adj.keys().filter(|&&j| j as usize >= i).count())
            .sum()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.ids.contains_key(word)
    }

    /// Edges as `(word1, word2, count)` with canonical endpoint order,
    /// sorted by weight descending, then lexicographically.
    pub fn edges(&self) -> Vec<(String, String, usize)> {
        let mut out = Vec::new();
        for (i, adj) in self.adjacency.iter().enumerate() {
            for (&j, &weight) in adj {
                if j as usize >= i {
                    let (a, b) = if self.words[i] <= self.words[j as usize] {
                        (self.words[i].clone(), self.words[j as usize].clone())
                    } else {
                        (self.words[j as usize].clone(), self.words[i].clone())
                    };
                    out.push((a, b, weight));
                }
            }
        }
        out.sort_by(|a, b| {
            b.2.cmp(&a.2)
                .then_with(|| a.0.cmp(&b.0))
                .then_with(|| a.1.cmp(&b.1))
        });
        out
    }

    /// The subgraph induced by the largest connected component. Ties are
    /// broken toward the component containing the earliest-inserted node.
    pub fn largest_component(&self) -> NetworkGraph {
        let n = self.words.len();
        let mut visited = vec![false; n];
        let mut best: Vec<usize> = Vec::new();
        for start in 0..n {
            if visited[start] {
                continue;
            }
            let mut component = Vec::new();
            let mut queue = vec![start];
            visited[start] = true;
            while let Some(node) = queue.pop() {
                component.push(node);
                for &next in self.adjacency[node].keys() {
                    if !visited[next as usize] {
                        visited[next as usize] = true;
                        queue.push(next as usize);
                    }
                }
            }
            if component.len() > best.len() {
                best = component;
            }
        }

        let keep: HashSet<usize> = best.into_iter().collect();
        let mut graph = NetworkGraph::new();
        for (a, b, weight) in self.edges() {
            let ia = self.ids[&a] as usize;
            let ib = self.ids[&b] as usize;
            if keep.contains(&ia) && keep.contains(&ib) {
                graph.add_edge(&a, &b, weight);
            }
        }
        graph
    }

    /// Drop edges lighter than a fifth of the heaviest edge (at least 1).
    /// Nodes left without edges disappear with them.
    pub fn prune_light_edges(&self) -> NetworkGraph {
        let edges = self.edges();
        let max_weight = edges.iter().map(|e| e.2).max().unwrap_or(0);
        let min_weight = usize::max(1, max_weight / 5);
        let mut graph = NetworkGraph::new();
        for (a, b, weight) in edges {
            if weight >= min_weight {
                graph.add_edge(&a, &b, weight);
            }
        }
        graph
    }

    /// Serialize as Graphviz DOT. Node widths scale with word frequency and
    /// edge pen widths with normalized co-occurrence counts; layout is left
    /// to Graphviz. Output ordering is deterministic.
    pub fn to_dot(&self, word_freq: &HashMap<String, usize>) -> String {
        let mut nodes: Vec<&String> = self.words.iter().collect();
        nodes.sort();

        let mut edges = self.edges();
        edges.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
        let max_weight = edges.iter().map(|e| e.2).max().unwrap_or(1);

        let mut dot = String::new();
        dot.push_str("graph cooccurrence {\n");
        dot.push_str(&format!(
            "  graph [label=\"共起ネットワーク（{} ノード、{} エッジ）\", labelloc=\"t\", overlap=false, splines=true];\n",
            self.node_count(),
            self.edge_count()
        ));
        dot.push_str("  node [shape=circle, style=filled, fillcolor=\"#aec7e8\", fontname=\"sans-serif\"];\n");

        for word in nodes {
            let freq = word_freq.get(word.as_str()).copied().unwrap_or(1);
            // same sizing curve as the original node areas: max(300, freq * 150)
            let area = usize::max(300, freq * 150) as f64;
            let width = (area / 300.0).sqrt();
            dot.push_str(&format!(
                "  \"{}\" [width={:.2}];\n",
                escape_dot(word),
                width
            ));
        }
        for (a, b, weight) in edges {
            let normalized = weight as f64 / max_weight as f64;
            let penwidth = 1.5 + normalized * 6.0;
            dot.push_str(&format!(
                "  \"{}\" -- \"{}\" [weight={}, penwidth={:.2}];\n",
                escape_dot(&a),
                escape_dot(&b),
                weight,
                penwidth
            ));
        }
        dot.push_str("}\n");
        dot
    }
}

fn escape_dot(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Build the co-occurrence network: count pairs, keep the `max_edges` most
/// frequent ones above `min_count`, then reduce to the largest component and
/// prune light edges. Returns `None` when no displayable network remains
/// (fewer than two connected nodes).
pub fn build_network(
    tokens: &[String],
    token_lines: &[Vec<String>],
    word_freq: &HashMap<String, usize>,
    opts: &CooccurrenceOptions,
) -> Option<NetworkGraph> {
    let pairs = extract_pairs(tokens, token_lines, word_freq, opts);

    let mut counts: HashMap<(String, String), usize> = HashMap::new();
    for pair in pairs {
        *counts.entry(pair).or_insert(0) += 1;
    }
    counts.retain(|_, count| *count >= opts.min_count);
    if counts.is_empty() {
        return None;
    }

    let mut ranked: Vec<((String, String), usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(opts.max_edges);

    let mut graph = NetworkGraph::new();
    for ((a, b), count) in ranked {
        if a == b && opts.self_loops == SelfLoopMode::Remove {
            continue;
        }
        graph.add_edge(&a, &b, count);
    }
    if graph.node_count() == 0 {
        return None;
    }

    let graph = graph.largest_component().prune_light_edges();
    if graph.node_count() < 2 {
        return None;
    }
    tracing::debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "built co-occurrence network"
    );
    Some(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn freq_of(tokens: &[String]) -> HashMap<String, usize> {
        let mut freq = HashMap::new();
        for t in tokens {
            *freq.entry(t.clone()).or_insert(0) += 1;
        }
        freq
    }

    #[test]
    fn test_sliding_window_adjacent_only() {
        let tokens = words(&["知能", "進化", "社会"]);
        let freq = freq_of(&tokens);
        let opts = CooccurrenceOptions {
            window_size: 2,
            ..Default::default()
        };
        let pairs = extract_pairs(&tokens, &[], &freq, &opts);
        // canonical endpoint order follows byte order: 知 < 社 < 進
        assert_eq!(
            pairs,
            vec![
                ("知能".to_string(), "進化".to_string()),
                ("社会".to_string(), "進化".to_string()),
            ]
        );
    }

    #[test]
    fn test_sliding_window_skips_unknown_words() {
        let tokens = words(&["知能", "未知", "社会"]);
        let mut freq = freq_of(&tokens);
        freq.remove("未知");
        let opts = CooccurrenceOptions {
            window_size: 3,
            ..Default::default()
        };
        let pairs = extract_pairs(&tokens, &[], &freq, &opts);
        assert_eq!(pairs, vec![("知能".to_string(), "社会".to_string())]);
    }

    #[test]
    fn test_pairs_are_canonical() {
        let tokens = words(&["社会", "進化", "社会"]);
        let freq = freq_of(&tokens);
        let opts = CooccurrenceOptions {
            window_size: 2,
            ..Default::default()
        };
        let pairs = extract_pairs(&tokens, &[], &freq, &opts);
        // both orderings accumulate on the same canonical key
        assert_eq!(pairs[0], pairs[1]);
    }

    #[test]
    fn test_line_mode_all_pairs_within_line() {
        let lines = vec![words(&["知能", "進化", "社会"]), words(&["未来"])];
        let freq = freq_of(&words(&["知能", "進化", "社会", "未来"]));
        let opts = CooccurrenceOptions {
            mode: WindowMode::Line,
            ..Default::default()
        };
        let pairs = extract_pairs(&[], &lines, &freq, &opts);
        assert_eq!(pairs.len(), 3); // single-token line contributes nothing
    }

    #[test]
    fn test_line_mode_dedup_per_line() {
        let lines = vec![words(&["知能", "進化", "知能"])];
        let freq = freq_of(&lines[0]);
        let base = CooccurrenceOptions {
            mode: WindowMode::Line,
            self_loops: SelfLoopMode::Keep,
            ..Default::default()
        };

        let all = extract_pairs(&[], &lines, &freq, &base);
        assert_eq!(all.len(), 3);

        let deduped = extract_pairs(
            &[],
            &lines,
            &freq,
            &CooccurrenceOptions {
                dedup_pairs_per_line: true,
                ..base
            },
        );
        assert_eq!(deduped.len(), 2); // (知能,進化) once plus (知能,知能)
    }

    #[test]
    fn test_collapse_consecutive() {
        let tokens = words(&["知能", "知能", "進化"]);
        let freq = freq_of(&tokens);
        let opts = CooccurrenceOptions {
            window_size: 2,
            collapse_consecutive: true,
            self_loops: SelfLoopMode::Keep,
            ..Default::default()
        };
        let pairs = extract_pairs(&tokens, &[], &freq, &opts);
        assert_eq!(pairs, vec![("知能".to_string(), "進化".to_string())]);
    }

    #[test]
    fn test_empty_lines_produce_no_pairs() {
        let lines = vec![Vec::new(), Vec::new()];
        let freq = HashMap::new();
        let opts = CooccurrenceOptions {
            mode: WindowMode::Line,
            ..Default::default()
        };
        assert!(extract_pairs(&[], &lines, &freq, &opts).is_empty());
    }

    #[test]
    fn test_build_network_basic() {
        // 知能-進化 co-occurs three times, 進化-社会 once
        let tokens = words(&["知能", "進化", "知能", "進化", "社会"]);
        let freq = freq_of(&tokens);
        let opts = CooccurrenceOptions {
            window_size: 2,
            ..Default::default()
        };
        let graph = build_network(&tokens, &[], &freq, &opts).unwrap();
        assert_eq!(graph.node_count(), 3);
        let edges = graph.edges();
        assert_eq!(edges[0].2, 3);
    }

    #[test]
    fn test_build_network_none_when_empty() {
        let opts = CooccurrenceOptions::default();
        assert!(build_network(&[], &[], &HashMap::new(), &opts).is_none());
    }

    #[test]
    fn test_self_loops_removed_by_default() {
        let tokens = words(&["知能", "知能"]);
        let freq = freq_of(&tokens);
        let opts = CooccurrenceOptions {
            window_size: 2,
            ..Default::default()
        };
        // only a self-loop pair exists, so nothing displayable remains
        assert!(build_network(&tokens, &[], &freq, &opts).is_none());
    }

    #[test]
    fn test_min_count_filters_rare_pairs() {
        let tokens = words(&["知能", "進化", "知能", "進化", "社会"]);
        let freq = freq_of(&tokens);
        let opts = CooccurrenceOptions {
            window_size: 2,
            min_count: 2,
            ..Default::default()
        };
        let graph = build_network(&tokens, &[], &freq, &opts).unwrap();
        assert_eq!(graph.node_count(), 2);
        assert!(graph.contains("知能"));
        assert!(graph.contains("進化"));
        assert!(!graph.contains("社会"));
    }

    #[test]
    fn test_max_edges_keeps_most_frequent() {
        let tokens = words(&[
            "知能", "進化", "知能", "進化", "知能", "進化", "社会", "未来",
        ]);
        let freq = freq_of(&tokens);
        let opts = CooccurrenceOptions {
            window_size: 2,
            max_edges: 1,
            ..Default::default()
        };
        let graph = build_network(&tokens, &[], &freq, &opts).unwrap();
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.contains("知能"));
        assert!(!graph.contains("未来"));
    }

    #[test]
    fn test_largest_component_selected() {
        let mut graph = NetworkGraph::new();
        graph.add_edge("知能", "進化", 3);
        graph.add_edge("進化", "社会", 2);
        graph.add_edge("未来", "技術", 1);

        let largest = graph.largest_component();
        assert_eq!(largest.node_count(), 3);
        assert!(!largest.contains("未来"));
    }

    #[test]
    fn test_prune_light_edges() {
        let mut graph = NetworkGraph::new();
        graph.add_edge("知能", "進化", 10);
        graph.add_edge("進化", "社会", 1);

        // threshold is max(1, 10 / 5) = 2, so the weight-1 edge goes
        let pruned = graph.prune_light_edges();
        assert_eq!(pruned.node_count(), 2);
        assert_eq!(pruned.edges(), vec![("知能".to_string(), "進化".to_string(), 10)]);
    }

    #[test]
    fn test_to_dot_is_deterministic() {
        let mut graph = NetworkGraph::new();
        graph.add_edge("知能", "進化", 2);
        graph.add_edge("進化", "社会", 1);
        let freq: HashMap<String, usize> =
            [("知能", 4), ("進化", 2), ("社会", 1)]
                .iter()
                .map(|(w, c)| (w.to_string(), *c))
                .collect();

        let dot = graph.to_dot(&freq);
        assert!(dot.starts_with("graph cooccurrence {"));
        assert!(dot.contains("\"知能\" -- \"進化\""));
        assert!(dot.contains("penwidth=7.50")); // heaviest edge
        assert_eq!(dot, graph.to_dot(&freq));
    }
}
