#![forbid(unsafe_code)]

//! Graph file commands: seed a file, add/edit/remove people, connect them.
//! These read the whole file, apply one operation and write it back.

use om_core::{Chart, NodeData};

use crate::graph_io;
use crate::support;

pub(crate) fn new_graph(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let path = match support::flag_value(args, "--out") {
        Some(out) => std::path::PathBuf::from(out),
        None => graph_io::graph_path(args),
    };
    if path.exists() && !support::has_flag(args, "--force") {
        return Err(format!(
            "{} already exists (pass --force to replace it)",
            path.display()
        )
        .into());
    }
    let chart = if support::has_flag(args, "--empty") {
        Chart::new()
    } else {
        Chart::starter()
    };
    graph_io::write_chart(&path, &chart)?;
    println!(
        "wrote {} ({} nodes, {} edges)",
        path.display(),
        chart.nodes.len(),
        chart.edges.len()
    );
    Ok(())
}

pub(crate) fn node(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let action = support::positionals(args)
        .first()
        .copied()
        .ok_or("node: expected add, edit or rm")?;
    match action {
        "add" => add(args),
        "edit" => edit(args),
        "rm" => rm(args),
        other => Err(format!("node: unknown action '{other}' (expected add, edit or rm)").into()),
    }
}

fn add(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let data = match (
        support::flag_value(args, "--name"),
        support::flag_value(args, "--title"),
        support::flag_value(args, "--department"),
    ) {
        (Some(name), Some(title), Some(department)) => NodeData::new(name, title, department),
        _ => return Err("node add: --name, --title and --department are all required".into()),
    };
    let position = match support::flag_value(args, "--at") {
        Some(raw) => support::parse_position(raw)?,
        None => support::spawn_position(),
    };

    let path = graph_io::graph_path(args);
    let mut chart = graph_io::read_chart(&path)?;
    let display_name = data.name.clone();
    let id = chart.add_node(data, position);
    graph_io::write_chart(&path, &chart)?;
    println!("added node [{id}] {display_name}");
    Ok(())
}

fn edit(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let id = support::flag_value(args, "--id").ok_or("node edit: missing --id")?;
    let name = support::flag_value(args, "--name");
    let title = support::flag_value(args, "--title");
    let department = support::flag_value(args, "--department");
    if name.is_none() && title.is_none() && department.is_none() {
        return Err("node edit: nothing to change (pass --name, --title or --department)".into());
    }

    let path = graph_io::graph_path(args);
    let mut chart = graph_io::read_chart(&path)?;
    let current = chart
        .node(id)
        .ok_or_else(|| format!("no node with id '{id}'"))?
        .data
        .clone();
    let data = NodeData::new(
        name.unwrap_or(&current.name),
        title.unwrap_or(&current.title),
        department.unwrap_or(&current.department),
    );
    chart.update_node(id, data)?;
    graph_io::write_chart(&path, &chart)?;
    println!("updated node [{id}]");
    Ok(())
}

fn rm(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let id = support::flag_value(args, "--id").ok_or("node rm: missing --id")?;
    let path = graph_io::graph_path(args);
    let mut chart = graph_io::read_chart(&path)?;
    let removed = chart.remove_node(id)?;
    graph_io::write_chart(&path, &chart)?;
    println!(
        "removed node [{id}] {} and {} edge(s)",
        removed.node.data.name,
        removed.edges.len()
    );
    Ok(())
}

pub(crate) fn connect(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let positionals = support::positionals(args);
    let (source, target) = match positionals.as_slice() {
        [source, target] => (*source, *target),
        _ => return Err("connect: expected SOURCE and TARGET node ids".into()),
    };

    let path = graph_io::graph_path(args);
    let mut chart = graph_io::read_chart(&path)?;
    let edge = chart.connect(source, target)?;
    graph_io::write_chart(&path, &chart)?;
    println!("connected {source} -> {target} as {}", edge.id);
    Ok(())
}
