#![forbid(unsafe_code)]

//! Chart store commands: list/show/save/load/delete of named snapshots.

use om_core::Chart;
use std::path::Path;
use tracing::warn;

use crate::graph_io;
use crate::support;

pub(crate) fn list(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let store = super::open_store(args)?;
    if store.charts().is_empty() {
        println!("no saved charts in {}", store.storage_dir().display());
        return Ok(());
    }
    for chart in store.charts() {
        println!(
            "{}  {} nodes, {} edges  updated {}",
            chart.name,
            chart.nodes.len(),
            chart.edges.len(),
            support::ts_ms_to_rfc3339(chart.updated_at_ms)
        );
    }
    Ok(())
}

pub(crate) fn show(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let name = require_name(args, "show")?;
    let store = super::open_store(args)?;
    let snapshot = store
        .load(name)
        .ok_or_else(|| format!("no saved chart named '{name}'"))?;
    println!("{}", snapshot.name);
    println!(
        "created {}  updated {}",
        support::ts_ms_to_rfc3339(snapshot.created_at_ms),
        support::ts_ms_to_rfc3339(snapshot.updated_at_ms)
    );
    println!("{}", support::render_graph(&snapshot.nodes, &snapshot.edges));
    Ok(())
}

pub(crate) fn save(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let name = require_name(args, "save")?;
    let graph = support::flag_value(args, "--graph").ok_or("save: missing --graph FILE")?;
    let chart = graph_io::read_chart(Path::new(graph))?;

    let mut store = super::open_store(args)?;
    if store.exists(name) && !support::has_flag(args, "--force") {
        return Err(format!("chart '{name}' already exists (pass --force to overwrite)").into());
    }
    let (node_count, edge_count) = (chart.nodes.len(), chart.edges.len());
    store.save(name, chart.nodes, chart.edges)?;
    println!("saved chart '{name}' ({node_count} nodes, {edge_count} edges)");
    Ok(())
}

pub(crate) fn load(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let name = require_name(args, "load")?;
    let out = support::flag_value(args, "--out").ok_or("load: missing --out FILE")?;

    let store = super::open_store(args)?;
    let snapshot = store
        .load(name)
        .ok_or_else(|| format!("no saved chart named '{name}'"))?;
    let (chart, report) = Chart::from_parts(snapshot.nodes.clone(), snapshot.edges.clone());
    if !report.is_clean() {
        warn!(
            name,
            nodes_dropped = report.nodes_dropped,
            edges_dropped = report.edges_dropped,
            "saved chart needed cleanup"
        );
    }
    graph_io::write_chart(Path::new(out), &chart)?;
    println!(
        "wrote '{name}' to {out} ({} nodes, {} edges)",
        chart.nodes.len(),
        chart.edges.len()
    );
    Ok(())
}

pub(crate) fn delete(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let name = require_name(args, "delete")?;
    let mut store = super::open_store(args)?;
    if store.delete(name)? {
        println!("deleted chart '{name}'");
    } else {
        println!("no saved chart named '{name}', nothing deleted");
    }
    Ok(())
}

fn require_name<'a>(
    args: &'a [String],
    command: &str,
) -> Result<&'a str, Box<dyn std::error::Error>> {
    match support::positionals(args).first().copied() {
        Some(name) => Ok(name),
        None => Err(format!("{command}: missing chart NAME").into()),
    }
}
