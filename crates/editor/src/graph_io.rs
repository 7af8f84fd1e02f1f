#![forbid(unsafe_code)]

use om_core::Chart;
use std::path::{Path, PathBuf};
use tracing::warn;

const DEFAULT_GRAPH_FILE: &str = "chart.json";

/// Graph file named by `--graph`, or the conventional `chart.json`.
pub(crate) fn graph_path(args: &[String]) -> PathBuf {
    crate::support::flag_value(args, "--graph")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_GRAPH_FILE))
}

/// Reads a `{nodes, edges}` graph file, dropping whatever does not hold
/// together (duplicate ids, edges without both endpoints).
pub(crate) fn read_chart(path: &Path) -> Result<Chart, Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(path)
        .map_err(|err| format!("cannot read {}: {err}", path.display()))?;
    let chart: Chart = serde_json::from_str(&raw)
        .map_err(|err| format!("{} is not a valid graph file: {err}", path.display()))?;
    let (chart, report) = Chart::from_parts(chart.nodes, chart.edges);
    if !report.is_clean() {
        warn!(
            file = %path.display(),
            nodes_dropped = report.nodes_dropped,
            edges_dropped = report.edges_dropped,
            "graph file needed cleanup"
        );
    }
    Ok(chart)
}

pub(crate) fn write_chart(path: &Path, chart: &Chart) -> Result<(), Box<dyn std::error::Error>> {
    let mut raw = serde_json::to_string_pretty(chart)?;
    raw.push('\n');
    std::fs::write(path, raw).map_err(|err| format!("cannot write {}: {err}", path.display()))?;
    Ok(())
}
