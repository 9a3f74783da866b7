//! View composer for the trading dashboard.
//!
//! `render` is a pure function from [`DashboardState`] to a [`DisplayTree`]:
//! - a loading placeholder before the first fetch
//! - the error text when the last fetch failed
//! - otherwise KPI cards, four chart panels and the recent-trades table
//!
//! The tree is independent of any UI toolkit; `output` turns it into
//! terminal text or JSON.
//!
//! [`DashboardState`]: trade_dash_loader::DashboardState

/// State to tree composition.
pub mod compose;
/// Number, sign and time formatting.
pub mod format;
/// Text and JSON surfaces.
pub mod output;
/// Display tree types.
pub mod tree;

pub use compose::{FEE_CHART_TRADES, TABLE_ROW_LIMIT, render, render_snapshot};
pub use format::{fmt, format_number, sign_class, updated_label};
pub use output::{OutputFormat, TreeFormatter, get_formatter};
pub use tree::{Dashboard, DisplayTree, StyleClass};
