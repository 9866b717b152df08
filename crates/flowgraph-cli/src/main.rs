use flowgraph::{FlowConfig, Graph};
use serde::Serialize;
use std::io::Read;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Flow(flowgraph::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Flow(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<flowgraph::Error> for CliError {
    fn from(value: flowgraph::Error) -> Self {
        Self::Flow(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Layout,
    Settle,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    pretty: bool,
    config: Option<String>,
    max_ticks: usize,
    input: Option<String>,
}

#[derive(Serialize)]
struct NodeOut<'a> {
    name: &'a str,
    x: f64,
    y: f64,
}

#[derive(Serialize)]
struct SettleOut<'a> {
    ticks: usize,
    alpha: f64,
    nodes: Vec<NodeOut<'a>>,
}

fn usage() -> &'static str {
    "flowgraph-cli\n\
\n\
USAGE:\n\
  flowgraph-cli [layout] [--pretty] [--config <path>] [<path>|-]\n\
  flowgraph-cli settle [--pretty] [--config <path>] [--max-ticks <n>] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', the graph JSON is read from stdin.\n\
  - The graph JSON has `nodes` ({ name, inputs, outputs }) and `connections`\n\
    ({ out, out_slot, in, in_slot }).\n\
  - layout prints node name -> { x, y } ranks; y is null (not computed).\n\
  - settle seeds positions from the ranks and runs the collision simulation to rest.\n\
  - Set RUST_LOG (e.g. RUST_LOG=flowgraph=debug) for diagnostics on stderr.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        max_ticks: 10_000,
        ..Default::default()
    };

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "layout" => args.command = Command::Layout,
            "settle" => args.command = Command::Settle,
            "--pretty" => args.pretty = true,
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--max-ticks" => {
                let Some(n) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.max_ticks = n.parse::<usize>().map_err(|_| CliError::Usage(usage()))?;
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn read_config(path: Option<&str>) -> Result<FlowConfig, CliError> {
    match path {
        None => Ok(FlowConfig::default()),
        Some(path) => Ok(FlowConfig::from_json_str(&std::fs::read_to_string(path)?)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    let mut out = std::io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut out, value)?;
    } else {
        serde_json::to_writer(&mut out, value)?;
    }
    use std::io::Write;
    writeln!(out)?;
    Ok(())
}

fn run(args: Args) -> Result<(), CliError> {
    let config = read_config(args.config.as_deref())?;
    let text = read_input(args.input.as_deref())?;
    let graph = Graph::from_json_str(&text)?;

    match args.command {
        Command::Layout => {
            let result = flowgraph::layout(&graph)?;
            write_json(&result, args.pretty)
        }
        Command::Settle => {
            let mut sim = flowgraph::simulate(graph, &config)?;
            let ticks = sim.run_until_idle(args.max_ticks);
            if sim.is_running() {
                tracing::warn!(
                    ticks,
                    alpha = sim.alpha(),
                    "tick budget exhausted before the simulation cooled down"
                );
            }
            let out = SettleOut {
                ticks,
                alpha: sim.alpha(),
                nodes: sim
                    .nodes()
                    .iter()
                    .map(|n| NodeOut {
                        name: &n.name,
                        x: n.x,
                        y: n.y,
                    })
                    .collect(),
            };
            write_json(&out, args.pretty)
        }
    }
}

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    init_logging();

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
