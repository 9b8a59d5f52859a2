//! Input loading: text decoding and CSV handling.
//!
//! Japanese text files arrive in a handful of encodings; decoding tries a
//! BOM first, then UTF-8, CP932, EUC-JP and UTF-16 before giving up and
//! decoding lossily. CSV files get delimiter sniffing, a header guess and
//! column combining into analyzable text.

use encoding_rs::{Encoding, EUC_JP, SHIFT_JIS, UTF_16BE, UTF_16LE, UTF_8};

use crate::error::Result;

/// Decode raw bytes to text, returning the encoding name that succeeded.
/// Newlines are normalized to `\n`.
pub fn decode_text(raw: &[u8]) -> (String, &'static str) {
    if let Some((encoding, bom_len)) = Encoding::for_bom(raw) {
        let (decoded, _) = encoding.decode_without_bom_handling(&raw[bom_len..]);
        let name = match encoding.name() {
            "UTF-8" => "utf-8-sig",
            "UTF-16LE" => "utf-16-le",
            "UTF-16BE" => "utf-16-be",
            _ => "unknown",
        };
        return (normalize_newlines(&decoded), name);
    }

    if let Ok(text) = std::str::from_utf8(raw) {
        return (normalize_newlines(text), "utf-8");
    }

    let candidates: [(&'static Encoding, &'static str); 4] = [
        (SHIFT_JIS, "cp932"),
        (EUC_JP, "euc-jp"),
        (UTF_16LE, "utf-16-le"),
        (UTF_16BE, "utf-16-be"),
    ];
    for (encoding, name) in candidates {
        if let Some(decoded) = encoding.decode_without_bom_handling_and_without_replacement(raw) {
            return (normalize_newlines(&decoded), name);
        }
    }

    let (decoded, _, _) = UTF_8.decode(raw);
    (normalize_newlines(&decoded), "utf-8 (replace)")
}

fn normalize_newlines(text: &str) -> String {
    if text.contains('\r') {
        text.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        text.to_string()
    }
}

/// A parsed CSV file with the detection metadata shown to the user.
#[derive(Debug, Clone)]
pub struct CsvDocument {
    pub rows: Vec<Vec<String>>,
    pub encoding: &'static str,
    pub delimiter: u8,
    pub has_header_guess: bool,
}

/// Parse CSV bytes: decode, sniff the delimiter, read all records and guess
/// whether the first row is a header.
pub fn parse_csv(raw: &[u8]) -> Result<CsvDocument> {
    let (decoded, encoding) = decode_text(raw);
    let sample: String = decoded.chars().take(4096).collect();
    let delimiter = sniff_delimiter(&sample);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(decoded.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(|s| s.to_string()).collect());
    }

    let has_header_guess = guess_header(&rows);
    tracing::debug!(
        rows = rows.len(),
        encoding,
        delimiter = %(delimiter as char),
        has_header_guess,
        "parsed CSV input"
    );

    Ok(CsvDocument {
        rows,
        encoding,
        delimiter,
        has_header_guess,
    })
}

/// Pick the delimiter whose count is consistent and non-zero across the
/// first lines; fall back to the first candidate present at all.
fn sniff_delimiter(sample: &str) -> u8 {
    const CANDIDATES: [u8; 3] = [b',', b'\t', b';'];

    let lines: Vec<&str> = sample.lines().filter(|l| !l.is_empty()).take(10).collect();
    for &candidate in &CANDIDATES {
        let ch = candidate as char;
        let counts: Vec<usize> = lines.iter().map(|l| l.matches(ch).count()).collect();
        if let Some(&first) = counts.first() {
            if first > 0 && counts.iter().all(|&n| n == first) {
                return candidate;
            }
        }
    }
    for &candidate in &CANDIDATES {
        if sample.contains(candidate as char) {
            return candidate;
        }
    }
    b','
}

/// Heuristic: the first row is a header when it contains no numeric cell
/// but the second row does.
fn guess_header(rows: &[Vec<String>]) -> bool {
    let (first, second) = match (rows.first(), rows.get(1)) {
        (Some(f), Some(s)) => (f, s),
        _ => return false,
    };
    let numeric = |cell: &String| cell.trim().parse::<f64>().is_ok();
    if first.iter().any(numeric) {
        return false;
    }
    second.iter().any(numeric)
}

/// Combine the selected columns of each data row into one line of text.
/// Out-of-range indices are skipped; the header row is dropped when present.
pub fn combine_columns(rows: &[Vec<String>], selected: &[usize], has_header: bool) -> String {
    if rows.is_empty() {
        return String::new();
    }
    let data_start = usize::from(has_header);
    let lines: Vec<String> = rows[data_start..]
        .iter()
        .map(|row| {
            let parts: Vec<&str> = selected
                .iter()
                .filter_map(|&i| row.get(i).map(|s| s.as_str()))
                .collect();
            parts.join(" ")
        })
        .collect();
    lines.join("\n")
}
