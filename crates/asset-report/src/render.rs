//! Plain-text layout of a report.

use analysis_orchestrator::{sections, AssetReport, Block, SectionView};

const CHART_WIDTH: usize = 60;
const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

pub const DISCLAIMER: &str = "Disclaimer: This report provides analysis for informational purposes only. \
It does not constitute financial advice.";

pub fn render_text(report: &AssetReport) -> String {
    let mut out = Vec::new();
    out.push(format!(
        "{} ({}) report generated {}",
        report.symbol,
        report.kind.label(),
        report.generated_at.format("%Y-%m-%d %H:%M UTC")
    ));
    out.push(String::new());

    for (i, view) in sections(report).iter().enumerate() {
        out.push(heading(view));
        if i == 0 {
            out.extend(price_chart(report));
        }
        out.extend(section_body(view));
        out.push(String::new());
    }
    out.push(DISCLAIMER.to_string());

    out.join("\n")
}

fn heading(view: &SectionView) -> String {
    format!("{}\n{}", view.title, "=".repeat(view.title.chars().count()))
}

fn price_chart(report: &AssetReport) -> Vec<String> {
    let window = report.price_series.display_window();
    let closes: Vec<f64> = window.iter().map(|b| b.close).collect();
    let (Some(first), Some(last)) = (window.first(), window.last()) else {
        return Vec::new();
    };
    vec![
        format!(
            "{} Price Chart ({} to {})",
            report.symbol,
            first.timestamp.format("%Y-%m-%d"),
            last.timestamp.format("%Y-%m-%d")
        ),
        sparkline(&closes, CHART_WIDTH),
        String::new(),
    ]
}

fn section_body(view: &SectionView) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(notice) = &view.notice {
        lines.push(format!("! {}", notice));
    }

    let width = view.rows.iter().map(|(label, _)| label.chars().count()).max().unwrap_or(0);
    for (label, value) in &view.rows {
        lines.push(format!("  {:<width$}  {}", label, value, width = width));
    }

    for block in &view.blocks {
        lines.push(String::new());
        match block {
            Block::Paragraph { heading, text } => {
                lines.push(format!("{}:", heading));
                lines.extend(text.lines().map(|l| format!("  {}", l)));
            }
            Block::Bullets { heading, items } => {
                lines.push(format!("{}:", heading));
                for item in items {
                    let mut item_lines = item.lines();
                    if let Some(first) = item_lines.next() {
                        lines.push(format!("  - {}", first));
                    }
                    lines.extend(item_lines.map(|l| format!("    {}", l)));
                }
            }
        }
    }
    lines
}

/// One character per bucket of consecutive values, scaled between min and max.
pub fn sparkline(values: &[f64], width: usize) -> String {
    let values: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if values.is_empty() || width == 0 {
        return String::new();
    }

    let buckets = width.min(values.len());
    let averages: Vec<f64> = (0..buckets)
        .map(|b| {
            let start = b * values.len() / buckets;
            let end = ((b + 1) * values.len() / buckets).max(start + 1);
            let slice = &values[start..end];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect();

    let min = averages.iter().copied().fold(f64::INFINITY, f64::min);
    let max = averages.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    let top = SPARK_LEVELS.len() - 1;

    averages
        .iter()
        .map(|v| {
            let level = if span > 0.0 {
                (((v - min) / span) * top as f64).round() as usize
            } else {
                top / 2
            };
            SPARK_LEVELS[level.min(top)]
        })
        .collect()
}
