#![forbid(unsafe_code)]

use om_core::{ChartEdge, ChartNode, Position};
use std::fmt::Write as _;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Flags that consume the next argument. Everything else starting with `--`
/// is a boolean flag.
const VALUE_FLAGS: &[&str] = &[
    "--storage-dir",
    "--graph",
    "--out",
    "--id",
    "--name",
    "--title",
    "--department",
    "--at",
];

/// Value of the last occurrence of `flag`, if any.
pub(crate) fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    let mut iter = args.iter();
    let mut found = None;
    while let Some(arg) = iter.next() {
        if arg == flag
            && let Some(value) = iter.next()
        {
            found = Some(value.as_str());
        }
    }
    found
}

pub(crate) fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|arg| arg == flag)
}

/// Arguments that are neither flags nor flag values, in order.
pub(crate) fn positionals(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if VALUE_FLAGS.contains(&arg.as_str()) {
            iter.next();
        } else if !arg.starts_with("--") {
            out.push(arg.as_str());
        }
    }
    out
}

pub(crate) fn parse_position(raw: &str) -> Result<Position, String> {
    let invalid = || format!("invalid position '{raw}', expected finite X,Y");
    let Some((x, y)) = raw.split_once(',') else {
        return Err(invalid());
    };
    let x = x.trim().parse::<f64>().map_err(|_| invalid())?;
    let y = y.trim().parse::<f64>().map_err(|_| invalid())?;
    if !x.is_finite() || !y.is_finite() {
        return Err(invalid());
    }
    Ok(Position { x, y })
}

const SPAWN_EXTENT: f64 = 500.0;

/// Random canvas position for a new node, inside the same 500x500 region the
/// canvas drops nodes into.
pub(crate) fn spawn_position() -> Position {
    Position {
        x: rand::random::<f64>() * SPAWN_EXTENT,
        y: rand::random::<f64>() * SPAWN_EXTENT,
    }
}

pub(crate) fn ts_ms_to_rfc3339(ts_ms: i64) -> String {
    let nanos = (ts_ms as i128) * 1_000_000i128;
    let dt = OffsetDateTime::from_unix_timestamp_nanos(nanos).unwrap_or(OffsetDateTime::UNIX_EPOCH);
    dt.format(&Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}

/// One-line-per-item rendering of a `{nodes, edges}` pair, shared by `show`
/// and the interactive session.
pub(crate) fn render_graph(nodes: &[ChartNode], edges: &[ChartEdge]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "nodes ({}):", nodes.len());
    for node in nodes {
        let _ = writeln!(
            out,
            "  [{}] {} ({}, {}) at ({}, {})",
            node.id,
            node.data.name,
            node.data.title,
            node.data.department,
            node.position.x,
            node.position.y
        );
    }
    let _ = write!(out, "edges ({}):", edges.len());
    for edge in edges {
        let _ = write!(out, "\n  {}: {} -> {}", edge.id, edge.source, edge.target);
    }
    out
}
