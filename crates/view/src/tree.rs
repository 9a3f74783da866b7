//! Framework-independent display tree.
//!
//! The tree says what to show and how to style it; drawing is left to
//! whichever surface consumes it.

use serde::Serialize;

/// Result of composing the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DisplayTree {
    /// Nothing fetched yet.
    Loading { text: String },
    /// Last fetch failed; only the message is shown.
    Error { message: String },
    /// Full dashboard body.
    Dashboard(Dashboard),
}

impl DisplayTree {
    /// Returns the dashboard body, if this tree has one.
    #[must_use]
    pub fn dashboard(&self) -> Option<&Dashboard> {
        match self {
            Self::Dashboard(d) => Some(d),
            _ => None,
        }
    }
}

/// Dashboard body, in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub kpis: Vec<KpiCard>,
    pub panels: Vec<ChartPanel>,
    pub trades: TablePanel,
}

/// Style hint attached to a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleClass {
    /// Non-negative P&L-like value.
    Pos,
    /// Negative P&L-like value or cost.
    Neg,
    /// Fee amount.
    Fee,
    /// De-emphasised text such as timestamps.
    Muted,
}

impl StyleClass {
    /// Class name as used by styled surfaces.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pos => "pos",
            Self::Neg => "neg",
            Self::Fee => "fee",
            Self::Muted => "muted",
        }
    }
}

/// A single headline figure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiCard {
    pub label: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<StyleClass>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

/// A titled chart occupying `span` of 12 grid columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPanel {
    pub title: String,
    pub span: u8,
    pub chart: Chart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Composed,
    Bar,
    Area,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mark {
    Line,
    Area,
    Bar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisSide {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XAxis {
    pub key: &'static str,
    pub hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YAxis {
    pub id: &'static str,
    pub side: AxisSide,
}

/// One plotted series. Its values sit at the series' position in every
/// [`ChartRow::values`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub key: &'static str,
    pub name: &'static str,
    pub mark: Mark,
    pub axis: &'static str,
}

/// One x position with a value per series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartRow {
    pub x: String,
    pub values: Vec<f64>,
}

/// Chart description: axes, series and the data behind them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub kind: ChartKind,
    pub x_axis: XAxis,
    pub y_axes: Vec<YAxis>,
    pub series: Vec<ChartSeries>,
    pub rows: Vec<ChartRow>,
}

impl Chart {
    /// Values of the series named `key`, in row order.
    #[must_use]
    pub fn column(&self, key: &str) -> Option<Vec<f64>> {
        let index = self.series.iter().position(|s| s.key == key)?;
        Some(
            self.rows
                .iter()
                .map(|r| r.values.get(index).copied().unwrap_or(f64::NAN))
                .collect(),
        )
    }
}

/// Titled table spanning the full grid width.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TablePanel {
    pub title: String,
    pub span: u8,
    pub table: Table,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub headers: Vec<&'static str>,
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    pub text: String,
    /// Right-aligned numeric cell.
    pub numeric: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<StyleClass>,
}

impl Cell {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            numeric: false,
            class: None,
        }
    }

    pub fn number(text: impl Into<String>, class: Option<StyleClass>) -> Self {
        Self {
            text: text.into(),
            numeric: true,
            class,
        }
    }

    #[must_use]
    pub fn styled(mut self, class: StyleClass) -> Self {
        self.class = Some(class);
        self
    }
}
