#![forbid(unsafe_code)]

mod commands;
mod config;
mod graph_io;
mod support;

fn usage() -> &'static str {
    "om_editor - org chart editor (named snapshots over a local sqlite store)\n\n\
USAGE:\n\
  om_editor <COMMAND> [OPTIONS]\n\
\n\
COMMANDS:\n\
  list                          List saved charts\n\
  show NAME                     Print one saved chart\n\
  save NAME --graph FILE        Save a graph file as a named chart\n\
  load NAME --out FILE          Write a saved chart out as a graph file\n\
  delete NAME                   Delete a saved chart (no-op when absent)\n\
  new [--out FILE] [--empty]    Write the starter (or an empty) graph file\n\
  node add|edit|rm [..]         Edit people in a graph file\n\
  connect SRC TGT [..]          Add a reporting line to a graph file\n\
  edit [--graph FILE]           Interactive editing session on stdin\n\
\n\
OPTIONS:\n\
  --storage-dir DIR   Chart store directory (env ORGMAP_STORAGE_DIR, default ./.orgmap)\n\
  --graph FILE        Graph file to read or edit (default chart.json)\n\
  --force             Overwrite an existing chart name or graph file\n\
\n\
FLAGS:\n\
  -h, --help       Print this help and exit\n\
  -V, --version    Print version and exit\n"
}

fn version_line() -> String {
    format!("om_editor {}", env!("CARGO_PKG_VERSION"))
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    if args
        .iter()
        .any(|arg| matches!(arg.as_str(), "-h" | "--help"))
    {
        print!("{}", usage());
        return;
    }
    if args
        .iter()
        .any(|arg| matches!(arg.as_str(), "-V" | "--version"))
    {
        println!("{}", version_line());
        return;
    }

    let Some(command) = args.first() else {
        eprint!("{}", usage());
        std::process::exit(2);
    };

    init_logging();

    let rest = &args[1..];
    let result = match command.as_str() {
        "list" => commands::charts::list(rest),
        "show" => commands::charts::show(rest),
        "save" => commands::charts::save(rest),
        "load" => commands::charts::load(rest),
        "delete" => commands::charts::delete(rest),
        "new" => commands::graph::new_graph(rest),
        "node" => commands::graph::node(rest),
        "connect" => commands::graph::connect(rest),
        "edit" => commands::edit::run(rest),
        other => {
            eprintln!("unknown command '{other}'");
            eprint!("{}", usage());
            std::process::exit(2);
        }
    };

    if let Err(err) = result {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
