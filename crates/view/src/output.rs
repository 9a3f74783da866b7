//! Output surfaces for the display tree.

use crate::format::{KPI_DIGITS, format_number};
use crate::tree::{Cell, Chart, ChartPanel, DisplayTree, KpiCard, StyleClass, TablePanel};
use colored::Colorize;
use std::fmt::Write;
use std::str::FromStr;
use thiserror::Error;

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const SPARK_WIDTH: usize = 40;
const RULE_WIDTH: usize = 72;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Coloured terminal text.
    #[default]
    Pretty,
    /// Terminal text without escape codes.
    Plain,
    /// The display tree as JSON.
    Json,
}

#[derive(Error, Debug)]
#[error("unknown output format '{0}' (expected pretty, plain or json)")]
pub struct UnknownFormat(String);

impl FromStr for OutputFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "plain" | "text" => Ok(Self::Plain),
            "json" => Ok(Self::Json),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

/// Turns a display tree into printable text.
pub trait TreeFormatter {
    fn format(&self, tree: &DisplayTree) -> String;
}

/// Get the formatter for an output format.
pub fn get_formatter(format: OutputFormat) -> Box<dyn TreeFormatter> {
    match format {
        OutputFormat::Pretty => Box::new(TextFormatter { color: true }),
        OutputFormat::Plain => Box::new(TextFormatter { color: false }),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}

/// Text layout for terminals: cards, chart summaries with sparklines, table.
pub struct TextFormatter {
    pub color: bool,
}

impl TextFormatter {
    fn paint(&self, text: &str, class: Option<StyleClass>) -> String {
        if !self.color {
            return text.to_string();
        }
        match class {
            Some(StyleClass::Pos) => text.green().to_string(),
            Some(StyleClass::Neg) => text.red().to_string(),
            Some(StyleClass::Fee) => text.blue().to_string(),
            Some(StyleClass::Muted) => text.dimmed().to_string(),
            None => text.to_string(),
        }
    }

    fn heading(&self, title: &str) -> String {
        let rule = "─".repeat(RULE_WIDTH.saturating_sub(title.chars().count() + 4));
        let line = format!("── {title} {rule}");
        if self.color {
            line.bold().to_string()
        } else {
            line
        }
    }

    fn write_kpis(&self, out: &mut String, kpis: &[KpiCard]) {
        let label_width = kpis.iter().map(|k| k.label.chars().count()).max().unwrap_or(0);
        let value_width = kpis.iter().map(|k| k.value.chars().count()).max().unwrap_or(0);

        for kpi in kpis {
            let value = pad_left(&kpi.value, value_width);
            let _ = write!(
                out,
                "{}  {}",
                pad_right(&kpi.label, label_width),
                self.paint(&value, kpi.class)
            );
            if let Some(hint) = &kpi.hint {
                let _ = write!(out, "   {}", self.paint(hint, Some(StyleClass::Muted)));
            }
            out.push('\n');
        }
    }

    fn write_panel(&self, out: &mut String, panel: &ChartPanel) {
        let _ = writeln!(out, "{}", self.heading(&panel.title));
        write_chart_summary(out, &panel.chart, |text, class| self.paint(text, class));
    }

    fn write_table(&self, out: &mut String, panel: &TablePanel) {
        let _ = writeln!(out, "{}", self.heading(&panel.title));
        let table = &panel.table;

        let mut widths: Vec<usize> = table.headers.iter().map(|h| h.chars().count()).collect();
        for row in &table.rows {
            for (i, cell) in row.cells.iter().enumerate() {
                if let Some(w) = widths.get_mut(i) {
                    *w = (*w).max(cell.text.chars().count());
                }
            }
        }

        let header: Vec<String> = table
            .headers
            .iter()
            .zip(&widths)
            .map(|(h, w)| pad_right(h, *w))
            .collect();
        let _ = writeln!(out, "{}", header.join("  ").trim_end());

        if table.rows.is_empty() {
            let _ = writeln!(out, "{}", self.paint("(no trades)", Some(StyleClass::Muted)));
        }

        for row in &table.rows {
            let cells: Vec<String> = row
                .cells
                .iter()
                .zip(&widths)
                .map(|(cell, w)| self.paint(&align(cell, *w), cell.class))
                .collect();
            let _ = writeln!(out, "{}", cells.join("  ").trim_end());
        }
    }
}

impl TreeFormatter for TextFormatter {
    fn format(&self, tree: &DisplayTree) -> String {
        match tree {
            DisplayTree::Loading { text } => text.clone(),
            DisplayTree::Error { message } => self.paint(message, Some(StyleClass::Neg)),
            DisplayTree::Dashboard(d) => {
                let mut out = String::new();
                self.write_kpis(&mut out, &d.kpis);
                for panel in &d.panels {
                    out.push('\n');
                    self.write_panel(&mut out, panel);
                }
                out.push('\n');
                self.write_table(&mut out, &d.trades);
                out.trim_end().to_string()
            }
        }
    }
}

/// JSON output formatter
pub struct JsonFormatter;

impl TreeFormatter for JsonFormatter {
    fn format(&self, tree: &DisplayTree) -> String {
        serde_json::to_string_pretty(tree).unwrap_or_else(|_| "null".to_string())
    }
}

fn write_chart_summary(
    out: &mut String,
    chart: &Chart,
    paint: impl Fn(&str, Option<StyleClass>) -> String,
) {
    if chart.rows.is_empty() {
        let _ = writeln!(out, "  {}", paint("(no data)", Some(StyleClass::Muted)));
        return;
    }

    let name_width = chart.series.iter().map(|s| s.name.chars().count()).max().unwrap_or(0);
    for series in &chart.series {
        let Some(values) = chart.column(series.key) else {
            continue;
        };
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        let (Some(last), Some(min), Some(max)) = (
            finite.last().copied(),
            finite.iter().copied().reduce(f64::min),
            finite.iter().copied().reduce(f64::max),
        ) else {
            continue;
        };

        let _ = writeln!(
            out,
            "  {}  {}  last {}  min {}  max {}",
            pad_right(series.name, name_width),
            sparkline(&finite, SPARK_WIDTH),
            format_number(last, KPI_DIGITS),
            format_number(min, KPI_DIGITS),
            format_number(max, KPI_DIGITS),
        );
    }

    if let (Some(first), Some(last)) = (chart.rows.first(), chart.rows.last())
        && !chart.x_axis.hidden
    {
        let _ = writeln!(
            out,
            "  {}",
            paint(&format!("{} → {}", first.x, last.x), Some(StyleClass::Muted))
        );
    }
}

/// Compresses `values` into at most `width` block characters.
#[must_use]
pub fn sparkline(values: &[f64], width: usize) -> String {
    if values.is_empty() || width == 0 {
        return String::new();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    let count = values.len().min(width);

    (0..count)
        .map(|i| {
            let v = values[i * values.len() / count];
            if range <= f64::EPSILON {
                SPARK_LEVELS[SPARK_LEVELS.len() / 2]
            } else {
                let level = ((v - min) / range * (SPARK_LEVELS.len() - 1) as f64).round();
                SPARK_LEVELS[level as usize]
            }
        })
        .collect()
}

fn pad_right(text: &str, width: usize) -> String {
    format!("{text:<width$}")
}

fn pad_left(text: &str, width: usize) -> String {
    format!("{text:>width$}")
}

fn align(cell: &Cell, width: usize) -> String {
    if cell.numeric {
        pad_left(&cell.text, width)
    } else {
        pad_right(&cell.text, width)
    }
}
