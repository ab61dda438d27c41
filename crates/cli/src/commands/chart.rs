use std::path::Path;

use podium_client::{chart_config, chart_defaults, ChartKind};
use podium_interchange::chart_data_from_json_str;
use tracing::debug;

use super::Context;

/// Print the Chart.js config for `data_path`. Output is JSON in both
/// output modes.
pub(crate) fn cmd_chart(ctx: &Context, kind: ChartKind, data_path: &Path, with_defaults: bool) {
    let body = match std::fs::read_to_string(data_path) {
        Ok(s) => s,
        Err(_) => ctx.fail(&format!(
            "error: chart data file not found: {}",
            data_path.display()
        )),
    };

    let data = match chart_data_from_json_str(&body) {
        Ok(data) => data,
        Err(e) => ctx.fail(&format!("error: {}: {}", data_path.display(), e)),
    };
    debug!(%kind, points = data.data.len(), "building chart config");

    let config = chart_config(kind, &data);
    let value = if with_defaults {
        serde_json::json!({ "defaults": chart_defaults(), "config": config })
    } else {
        config
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&value)
            .unwrap_or_else(|e| format!("serialization error: {}", e))
    );
}
