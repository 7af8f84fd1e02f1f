#![forbid(unsafe_code)]

//! Interactive editing session. One command per stdin line; which commands are
//! live depends on the session mode, so a pending confirmation swallows the
//! next line as its answer. With `--graph` the working chart is read from the
//! file at start and written back on quit.

use om_core::{Chart, EditorMode, EditorSession, NodeData, SaveDecision};
use om_storage::ChartStore;
use std::fmt::Write as _;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use crate::graph_io;
use crate::support;

const HELP: &str = "\
commands:
  show                                print the working chart
  add <name>; <title>; <department>   add a person at a random spot
  edit <node-id>                      open a node for editing
  connect <src> <tgt>                 add a reporting line
  list                                list saved charts
  save <name>                         save the working chart under a name
  load <name>                         replace the working chart with a saved one
  delete <name>                       delete a saved chart
  quit                                leave the session";

pub(crate) fn run(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = super::open_store(args)?;
    let graph_path = support::flag_value(args, "--graph").map(PathBuf::from);
    let chart = match &graph_path {
        Some(path) if path.exists() => graph_io::read_chart(path)?,
        _ => Chart::starter(),
    };
    let mut session = EditorSession::new(chart);

    let stdin = std::io::stdin();
    let mut reader = BufReader::new(stdin.lock());
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    writeln!(
        out,
        "org chart editor: {} node(s), {} edge(s) on the canvas. type 'help' for commands.",
        session.chart().nodes.len(),
        session.chart().edges.len()
    )?;
    out.flush()?;

    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if matches!(session.mode(), EditorMode::Idle) && matches!(input, "quit" | "exit") {
            break;
        }
        let reply = match session.mode().clone() {
            EditorMode::ConfirmingDelete { id } => confirm_delete_line(&mut session, &id, input),
            EditorMode::ConfirmingOverwrite { .. } => {
                confirm_overwrite_line(&mut session, &mut store, input)?
            }
            EditorMode::EditingNode { id } => edit_line(&mut session, &id, input),
            _ => command_line(&mut session, &mut store, input)?,
        };
        writeln!(out, "{reply}")?;
        out.flush()?;
    }

    if let Some(path) = graph_path {
        let chart = session.into_chart();
        graph_io::write_chart(&path, &chart)?;
        writeln!(out, "wrote {}", path.display())?;
    }
    Ok(())
}

fn command_line(
    session: &mut EditorSession,
    store: &mut ChartStore,
    input: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    let (word, rest) = split_word(input);
    match word {
        "help" => Ok(HELP.to_string()),
        "show" => Ok(support::render_graph(
            &session.chart().nodes,
            &session.chart().edges,
        )),
        "list" => Ok(render_saved(store)),
        "add" => Ok(match parse_person(rest) {
            Some(data) => {
                let display_name = data.name.clone();
                match session.add_node(data, support::spawn_position()) {
                    Ok(id) => format!("added node [{id}] {display_name}"),
                    Err(err) => err.to_string(),
                }
            }
            None => "usage: add <name>; <title>; <department>".to_string(),
        }),
        "edit" => {
            let id = rest;
            if id.is_empty() {
                return Ok("usage: edit <node-id>".to_string());
            }
            Ok(match session.begin_edit(id) {
                Ok(()) => format!(
                    "editing node {}\nset <name>; <title>; <department> | delete | show | cancel",
                    node_summary(session, id)
                ),
                Err(err) => err.to_string(),
            })
        }
        "connect" => {
            let mut parts = rest.split_whitespace();
            match (parts.next(), parts.next()) {
                (Some(source), Some(target)) => Ok(match session.connect(source, target) {
                    Ok(edge) => format!("connected {source} -> {target} as {}", edge.id),
                    Err(err) => err.to_string(),
                }),
                _ => Ok("usage: connect <source-id> <target-id>".to_string()),
            }
        }
        "save" => save_line(session, store, rest),
        "load" => Ok(load_line(session, store, rest)),
        "delete" => {
            let name = rest;
            if name.is_empty() {
                Ok("usage: delete <name>".to_string())
            } else if store.delete(name)? {
                Ok(format!("deleted chart '{name}'"))
            } else {
                Ok(format!("no saved chart named '{name}', nothing deleted"))
            }
        }
        other => Ok(format!("unknown command '{other}', type 'help'")),
    }
}

fn save_line(
    session: &mut EditorSession,
    store: &mut ChartStore,
    name: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    if let Err(err) = session.begin_save() {
        return Ok(err.to_string());
    }
    let decision = match session.submit_save_name(name, store.exists(name)) {
        Ok(decision) => decision,
        Err(err) => return Ok(err.to_string()),
    };
    match decision {
        SaveDecision::Rejected => {
            session.cancel();
            Ok("chart name must not be blank (usage: save <name>)".to_string())
        }
        SaveDecision::NeedsConfirm => {
            Ok(format!("chart '{name}' already exists. overwrite? [y/N]"))
        }
        SaveDecision::Proceed(name) => {
            store.save(
                &name,
                session.chart().nodes.clone(),
                session.chart().edges.clone(),
            )?;
            Ok(format!("saved chart '{name}'"))
        }
    }
}

fn load_line(session: &mut EditorSession, store: &ChartStore, name: &str) -> String {
    if let Err(err) = session.begin_load() {
        return err.to_string();
    }
    if name.is_empty() {
        session.cancel();
        return format!("{}\nusage: load <name>", render_saved(store));
    }
    let Some(snapshot) = store.load(name) else {
        session.cancel();
        return format!("no saved chart named '{name}'");
    };
    let nodes = snapshot.nodes.clone();
    let edges = snapshot.edges.clone();
    match session.finish_load(nodes, edges) {
        Ok(report) => {
            let mut msg = format!(
                "loaded chart '{name}' ({} nodes, {} edges)",
                session.chart().nodes.len(),
                session.chart().edges.len()
            );
            if !report.is_clean() {
                let _ = write!(
                    msg,
                    ", dropped {} node(s) and {} edge(s)",
                    report.nodes_dropped, report.edges_dropped
                );
            }
            msg
        }
        Err(err) => err.to_string(),
    }
}

fn edit_line(session: &mut EditorSession, id: &str, input: &str) -> String {
    let (word, rest) = split_word(input);
    match word {
        "set" => match parse_person(rest) {
            Some(data) => match session.apply_edit(data) {
                Ok(()) => format!("updated node [{id}]"),
                Err(err) => err.to_string(),
            },
            None => "usage: set <name>; <title>; <department>".to_string(),
        },
        "delete" => match session.request_delete() {
            Ok(()) => format!("delete node [{id}] and its edges? [y/N]"),
            Err(err) => err.to_string(),
        },
        "show" => node_summary(session, id),
        "cancel" => {
            session.cancel();
            "edit cancelled".to_string()
        }
        _ => format!("editing node [{id}]: set <name>; <title>; <department> | delete | show | cancel"),
    }
}

fn confirm_delete_line(session: &mut EditorSession, id: &str, input: &str) -> String {
    if is_yes(input) {
        match session.confirm_delete() {
            Ok(removed) => format!(
                "removed node [{}] {} and {} edge(s)",
                removed.node.id,
                removed.node.data.name,
                removed.edges.len()
            ),
            Err(err) => err.to_string(),
        }
    } else {
        session.cancel();
        format!("kept node [{id}], still editing it")
    }
}

fn confirm_overwrite_line(
    session: &mut EditorSession,
    store: &mut ChartStore,
    input: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    if is_yes(input) {
        let name = match session.confirm_overwrite() {
            Ok(name) => name,
            Err(err) => return Ok(err.to_string()),
        };
        store.save(
            &name,
            session.chart().nodes.clone(),
            session.chart().edges.clone(),
        )?;
        Ok(format!("saved chart '{name}'"))
    } else {
        // declining falls back to the save dialog; close that too
        session.cancel();
        session.cancel();
        Ok("save cancelled".to_string())
    }
}

fn render_saved(store: &ChartStore) -> String {
    if store.charts().is_empty() {
        return "no saved charts".to_string();
    }
    let mut out = String::new();
    for (i, chart) in store.charts().iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = write!(
            out,
            "{}  {} nodes, {} edges  updated {}",
            chart.name,
            chart.nodes.len(),
            chart.edges.len(),
            support::ts_ms_to_rfc3339(chart.updated_at_ms)
        );
    }
    out
}

fn node_summary(session: &EditorSession, id: &str) -> String {
    match session.chart().node(id) {
        Some(node) => format!(
            "[{}] {} ({}, {})",
            node.id, node.data.name, node.data.title, node.data.department
        ),
        None => format!("[{id}]"),
    }
}

fn parse_person(raw: &str) -> Option<NodeData> {
    let mut parts = raw.splitn(3, ';');
    let name = parts.next()?.trim();
    let title = parts.next()?.trim();
    let department = parts.next()?.trim();
    if name.is_empty() || title.is_empty() || department.is_empty() {
        return None;
    }
    Some(NodeData::new(name, title, department))
}

fn split_word(input: &str) -> (&str, &str) {
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (input, ""),
    }
}

fn is_yes(input: &str) -> bool {
    input.eq_ignore_ascii_case("y") || input.eq_ignore_ascii_case("yes")
}
