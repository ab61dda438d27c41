//! Chart configurations for the statistics page.
//!
//! Produces Chart.js (v2 schema) config objects from `{labels, data}`
//! aggregates. Drawing is left to the charting library; this module only
//! decides chart type, colours and options.

use std::fmt;
use std::str::FromStr;

use podium_interchange::ChartData;
use serde_json::{json, Value};

/// Bootstrap-flavoured palette, cycled across data points.
pub const PALETTE: [&str; 10] = [
    "#0d6efd", "#ffc107", "#dc3545", "#198754", "#d63384", "#6f42c1", "#0dcaf0", "#fd7e14",
    "#20c997", "#6610f2",
];

pub const BAR_BORDER_COLOR: &str = "rgba(2,117,216,1)";
pub const DEFAULT_FONT_COLOR: &str = "#292b2c";
pub const DEFAULT_FONT_FAMILY: &str = "-apple-system,system-ui,BlinkMacSystemFont,\"Segoe UI\",Roboto,\"Helvetica Neue\",Arial,sans-serif";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Doughnut,
}

impl ChartKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::Doughnut => "doughnut",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bar" => Ok(ChartKind::Bar),
            "doughnut" => Ok(ChartKind::Doughnut),
            other => Err(format!(
                "unknown chart kind '{}' (expected 'bar' or 'doughnut')",
                other
            )),
        }
    }
}

/// One colour per data point, cycling through [`PALETTE`].
pub fn palette_for(points: usize) -> Vec<&'static str> {
    PALETTE.iter().copied().cycle().take(points).collect()
}

/// Global defaults applied once per page before any chart is drawn.
pub fn chart_defaults() -> Value {
    json!({
        "global": {
            "defaultFontFamily": DEFAULT_FONT_FAMILY,
            "defaultFontColor": DEFAULT_FONT_COLOR,
        }
    })
}

/// Full config object for `new Chart(ctx, config)`.
pub fn chart_config(kind: ChartKind, data: &ChartData) -> Value {
    let colors = palette_for(data.data.len());

    match kind {
        ChartKind::Bar => json!({
            "type": "bar",
            "data": {
                "labels": data.labels,
                "datasets": [{
                    "backgroundColor": colors,
                    "borderColor": BAR_BORDER_COLOR,
                    "data": data.data,
                }],
            },
            "options": {
                "scales": {
                    "yAxes": [{ "ticks": { "min": 0 } }],
                },
                "legend": { "display": false },
            },
        }),
        ChartKind::Doughnut => json!({
            "type": "doughnut",
            "data": {
                "labels": data.labels,
                "datasets": [{
                    "data": data.data,
                    "backgroundColor": colors,
                }],
            },
            "options": {},
        }),
    }
}
