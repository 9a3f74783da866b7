//! View composer: a pure projection of dashboard state into a display tree.

use crate::format::{
    COUNT_DIGITS, KPI_DIGITS, MONEY_DIGITS, QTY_DIGITS, VOL_DIGITS, clock_label, fmt,
    format_number, metric_sign_class, sign_class, tick_label,
};
use crate::tree::{
    AxisSide, Cell, Chart, ChartKind, ChartPanel, ChartRow, ChartSeries, Dashboard, DisplayTree,
    KpiCard, Mark, StyleClass, Table, TablePanel, TableRow, XAxis, YAxis,
};
use trade_dash_domain::{Metric, MetricsSnapshot, SeriesPoint, Trade};
use trade_dash_loader::DashboardState;

/// Most recent trades shown in the table.
pub const TABLE_ROW_LIMIT: usize = 200;
/// Most recent trades plotted in the fees / slippage chart.
pub const FEE_CHART_TRADES: usize = 50;
/// Placeholder text shown before the first fetch completes.
pub const LOADING_TEXT: &str = "Loading…";

/// Trades table columns, in order.
pub const TRADE_COLUMNS: [&str; 9] = [
    "t",
    "pair",
    "side",
    "qty",
    "gross_pnl",
    "fees_total",
    "slippage",
    "net_pnl",
    "hold_ms",
];

/// Renders the current state.
///
/// An error hides the dashboard body even when a stale snapshot is held.
#[must_use]
pub fn render(state: &DashboardState) -> DisplayTree {
    if let Some(message) = &state.error {
        return DisplayTree::Error {
            message: message.clone(),
        };
    }

    match &state.snapshot {
        None => DisplayTree::Loading {
            text: LOADING_TEXT.to_string(),
        },
        Some(snapshot) => DisplayTree::Dashboard(render_snapshot(snapshot)),
    }
}

/// Composes the dashboard body for one snapshot.
#[must_use]
pub fn render_snapshot(m: &MetricsSnapshot) -> Dashboard {
    let fee_trades = m.tail_trades(FEE_CHART_TRADES);

    Dashboard {
        kpis: kpi_cards(m),
        panels: vec![
            panel("Spread & Net P&L over time", 8, spread_chart(&m.series)),
            panel("Fees & Slippage (per trade)", 4, fees_chart(fee_trades)),
            panel("Cumulative P&L after fees", 6, cum_pnl_chart(&m.series)),
            panel("Rolling Volatility & Drawdown", 6, risk_chart(&m.series)),
        ],
        trades: TablePanel {
            title: "Recent Trades".to_string(),
            span: 12,
            table: trades_table(&m.trades),
        },
    }
}

fn kpi_cards(m: &MetricsSnapshot) -> Vec<KpiCard> {
    let k = &m.kpi;
    vec![
        kpi_card(
            "Net P&L (after fees)",
            &k.net_pnl,
            format!(
                "fees: {} | win%: {}%",
                fmt(&k.fees_total, MONEY_DIGITS),
                fmt(&k.win_rate.scaled(100.0), KPI_DIGITS)
            ),
        ),
        kpi_card(
            "Avg Spread (bps)",
            &k.avg_spread_bps,
            format!("trades: {}", fmt(&k.trades, COUNT_DIGITS)),
        ),
        kpi_card(
            "Sharpe (naive)",
            &k.sharpe,
            format!("vol: {}", fmt(&k.realized_vol, VOL_DIGITS)),
        ),
        kpi_card(
            "Max Drawdown",
            &k.max_drawdown,
            format!("duration: {}s", k.max_dd_duration),
        ),
    ]
}

fn kpi_card(label: &str, value: &Metric, hint: String) -> KpiCard {
    KpiCard {
        label: label.to_string(),
        value: fmt(value, KPI_DIGITS),
        class: metric_sign_class(value),
        hint: Some(hint),
    }
}

fn panel(title: &str, span: u8, chart: Chart) -> ChartPanel {
    ChartPanel {
        title: title.to_string(),
        span,
        chart,
    }
}

fn time_axis() -> XAxis {
    XAxis {
        key: "t",
        hidden: false,
    }
}

fn left_axis(id: &'static str) -> YAxis {
    YAxis {
        id,
        side: AxisSide::Left,
    }
}

fn series(key: &'static str, name: &'static str, mark: Mark, axis: &'static str) -> ChartSeries {
    ChartSeries {
        key,
        name,
        mark,
        axis,
    }
}

fn time_rows(points: &[SeriesPoint], values: impl Fn(&SeriesPoint) -> Vec<f64>) -> Vec<ChartRow> {
    points
        .iter()
        .map(|p| ChartRow {
            x: tick_label(&p.t),
            values: values(p),
        })
        .collect()
}

fn spread_chart(points: &[SeriesPoint]) -> Chart {
    Chart {
        kind: ChartKind::Composed,
        x_axis: time_axis(),
        y_axes: vec![left_axis("y")],
        series: vec![
            series("spread_bps", "Spread (bps)", Mark::Line, "y"),
            series("net_pnl", "Net P&L", Mark::Area, "y"),
        ],
        rows: time_rows(points, |p| vec![p.spread_bps, p.net_pnl]),
    }
}

fn fees_chart(trades: &[Trade]) -> Chart {
    Chart {
        kind: ChartKind::Bar,
        x_axis: XAxis {
            key: "id",
            hidden: true,
        },
        y_axes: vec![left_axis("y")],
        series: vec![
            series("fees_total", "Fees", Mark::Bar, "y"),
            series("slippage", "Slippage", Mark::Bar, "y"),
        ],
        rows: trades
            .iter()
            .enumerate()
            .map(|(i, tr)| ChartRow {
                x: tr.id.map_or_else(|| i.to_string(), |id| id.to_string()),
                values: vec![tr.fees_total, tr.slippage],
            })
            .collect(),
    }
}

fn cum_pnl_chart(points: &[SeriesPoint]) -> Chart {
    Chart {
        kind: ChartKind::Area,
        x_axis: time_axis(),
        y_axes: vec![left_axis("y")],
        series: vec![series("cum_pnl", "Cumulative P&L", Mark::Area, "y")],
        rows: time_rows(points, |p| vec![p.cum_pnl]),
    }
}

fn risk_chart(points: &[SeriesPoint]) -> Chart {
    Chart {
        kind: ChartKind::Composed,
        x_axis: time_axis(),
        y_axes: vec![
            left_axis("vol"),
            YAxis {
                id: "dd",
                side: AxisSide::Right,
            },
        ],
        series: vec![
            series("roll_vol", "Rolling Vol", Mark::Line, "vol"),
            series("drawdown", "Drawdown", Mark::Area, "dd"),
        ],
        rows: time_rows(points, |p| vec![p.roll_vol, p.drawdown]),
    }
}

fn trades_table(trades: &[Trade]) -> Table {
    let start = trades.len().saturating_sub(TABLE_ROW_LIMIT);
    let rows = trades[start..]
        .iter()
        .rev()
        .map(|tr| TableRow {
            cells: vec![
                Cell::text(clock_label(&tr.t)).styled(StyleClass::Muted),
                Cell::text(tr.pair.clone()),
                Cell::text(tr.side.clone()),
                Cell::number(format_number(tr.qty, QTY_DIGITS), None),
                Cell::number(
                    format_number(tr.gross_pnl, MONEY_DIGITS),
                    Some(sign_class(tr.gross_pnl)),
                ),
                Cell::number(
                    format_number(tr.fees_total, MONEY_DIGITS),
                    Some(StyleClass::Fee),
                ),
                Cell::number(
                    format_number(tr.slippage, MONEY_DIGITS),
                    Some(StyleClass::Neg),
                ),
                Cell::number(
                    format_number(tr.net_pnl, MONEY_DIGITS),
                    Some(sign_class(tr.net_pnl)),
                ),
                Cell::number(format_number(tr.hold_ms as f64, COUNT_DIGITS), None),
            ],
        })
        .collect();

    Table {
        headers: TRADE_COLUMNS.to_vec(),
        rows,
    }
}
