//! Word-frequency bar chart rendered to SVG with plotters.

use std::collections::HashMap;

use plotters::prelude::*;

use crate::error::{Error, Result};

/// matplotlib's "steelblue", the original bar color.
const STEEL_BLUE: RGBColor = RGBColor(70, 130, 180);

const CHART_WIDTH: u32 = 1200;
const CHART_HEIGHT: u32 = 800;

/// Render a horizontal bar chart of the `top_n` most frequent words as an
/// SVG document, highest count at the top.
pub fn frequency_chart_svg(word_freq: &HashMap<String, usize>, top_n: usize) -> Result<String> {
    let mut ranked: Vec<(&String, usize)> = word_freq.iter().map(|(w, &c)| (w, c)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.truncate(top_n);
    if ranked.is_empty() {
        return Err(Error::Chart("no words to chart".to_string()));
    }

    // rows run bottom-up, so reverse to put the most frequent word on top
    let rows: Vec<(String, usize)> = ranked
        .into_iter()
        .rev()
        .map(|(w, c)| (w.clone(), c))
        .collect();
    let max_count = rows.iter().map(|r| r.1).max().unwrap_or(1);
    let title = format!(
        "単語出現頻度（全{}単語中の上位{}単語）",
        word_freq.len(),
        rows.len()
    );

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| Error::Chart(e.to_string()))?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&title, ("sans-serif", 28))
            .margin(10)
            .x_label_area_size(50)
            .y_label_area_size(180)
            .build_cartesian_2d(0..max_count + 1, (0..rows.len()).into_segmented())
            .map_err(|e| Error::Chart(e.to_string()))?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .x_desc("出現回数")
            .axis_desc_style(("sans-serif", 18))
            .label_style(("sans-serif", 16))
            .y_labels(rows.len())
            .y_label_formatter(&|value: &SegmentValue<usize>| match value {
                SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
                    rows.get(*i).map(|(w, _)| w.clone()).unwrap_or_default()
                }
                _ => String::new(),
            })
            .draw()
            .map_err(|e| Error::Chart(e.to_string()))?;

        chart
            .draw_series(rows.iter().enumerate().map(|(i, (_, count))| {
                Rectangle::new(
                    [
                        (0, SegmentValue::Exact(i)),
                        (*count, SegmentValue::Exact(i + 1)),
                    ],
                    STEEL_BLUE.filled(),
                )
            }))
            .map_err(|e| Error::Chart(e.to_string()))?;

        root.present().map_err(|e| Error::Chart(e.to_string()))?;
    }
    Ok(svg)
}
