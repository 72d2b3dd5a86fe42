use serde::Serialize;
use sigmap_core::{ExtractOptions, NodeKind, Query, RelationshipRecord, Related};
use sigmap_render::config::LayoutConfig;
use sigmap_render::model::SignalGraphLayout;
use sigmap_render::svg::{SvgRenderOptions, render_svg};
use sigmap_render::{Highlight, LayoutOptions};
use std::path::PathBuf;
use unicode_width::UnicodeWidthStr;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Extract(sigmap_core::Error),
    Render(sigmap_render::Error),
    Json(serde_json::Error),
    NotFound { kind: NodeKind, label: String },
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Extract(err) => write!(f, "{err}"),
            CliError::Render(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::NotFound { kind, label } => write!(f, "No {kind} named '{label}'"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<sigmap_core::Error> for CliError {
    fn from(value: sigmap_core::Error) -> Self {
        Self::Extract(value)
    }
}

impl From<sigmap_render::Error> for CliError {
    fn from(value: sigmap_render::Error) -> Self {
        Self::Render(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Command {
    #[default]
    List,
    Layout,
    Render,
    Details,
    Help,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    root: Option<PathBuf>,
    query: Query,
    json: bool,
    pretty: bool,
    project_check: bool,
    config: Option<PathBuf>,
    out: Option<PathBuf>,
    kind: Option<NodeKind>,
    label: Option<String>,
    verbose: bool,
}

fn usage() -> &'static str {
    "sigmap\n\
\n\
USAGE:\n\
  sigmap [list] [--query <text>] [--case-sensitive] [--whole-word] [--json] [--pretty] [--no-project-check] <root>\n\
  sigmap layout [--query <text>] [--case-sensitive] [--whole-word] [--config <file.json>] [--pretty] [--no-project-check] <root>\n\
  sigmap render [--query <text>] [--case-sensitive] [--whole-word] [--config <file.json>] [--out <path>] [--no-project-check] <root>\n\
  sigmap details --kind signal|sender|receiver --label <name> [--json] [--pretty] [--no-project-check] <root>\n\
\n\
NOTES:\n\
  - <root> must contain manage.py unless --no-project-check is given.\n\
  - list prints a table of signal | sender | receiver | file; --json prints the records.\n\
  - layout prints the node/edge/frame JSON of the filtered records, plus opacities when a query is set.\n\
  - render prints SVG to stdout by default; use --out to write a file.\n\
  - Set SIGMAP_LOG (e.g. SIGMAP_LOG=debug) or pass -v for diagnostics on stderr.\n\
"
}

fn command_word(word: &str) -> Option<Command> {
    match word {
        "list" => Some(Command::List),
        "layout" => Some(Command::Layout),
        "render" => Some(Command::Render),
        "details" => Some(Command::Details),
        _ => None,
    }
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        command: Command::List,
        project_check: true,
        ..Default::default()
    };

    // A command word is only recognized as the first positional argument.
    let mut seen_positional = false;
    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => args.command = Command::Help,
            "--case-sensitive" => args.query.case_sensitive = true,
            "--whole-word" => args.query.whole_word = true,
            "--json" => args.json = true,
            "--pretty" => args.pretty = true,
            "--no-project-check" => args.project_check = false,
            "--verbose" | "-v" => args.verbose = true,
            "--query" | "-q" => {
                let Some(text) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.query.text = text.clone();
            }
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(PathBuf::from(path));
            }
            "--out" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(PathBuf::from(path));
            }
            "--kind" => {
                let Some(kind) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.kind = Some(
                    kind.parse::<NodeKind>()
                        .map_err(|_| CliError::Usage(usage()))?,
                );
            }
            "--label" => {
                let Some(label) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.label = Some(label.clone());
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.root.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.root = Some(PathBuf::from(rest));
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if !seen_positional {
                    seen_positional = true;
                    if let Some(command) = command_word(path) {
                        args.command = command;
                        continue;
                    }
                }
                if args.root.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.root = Some(PathBuf::from(path));
            }
        }
    }

    if args.command != Command::Help && args.root.is_none() {
        return Err(CliError::Usage(usage()));
    }
    if args.command == Command::Details && (args.kind.is_none() || args.label.is_none()) {
        return Err(CliError::Usage(usage()));
    }
    Ok(args)
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("SIGMAP_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn write_text(text: &str, out: Option<&std::path::Path>) -> Result<(), CliError> {
    match out {
        None => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn load_records(args: &Args) -> Result<Vec<RelationshipRecord>, CliError> {
    let Some(root) = args.root.as_deref() else {
        return Err(CliError::Usage(usage()));
    };
    let options = if args.project_check {
        ExtractOptions::django()
    } else {
        ExtractOptions::default()
    };
    Ok(sigmap_core::extract(root, &options)?)
}

fn layout_options(args: &Args) -> Result<LayoutOptions, CliError> {
    let config = match args.config.as_deref() {
        Some(path) => LayoutConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => LayoutConfig::default(),
    };
    Ok(LayoutOptions::default().with_config(config))
}

/// Column-aligned table, each column sized to its widest cell.
fn format_table(records: &[&RelationshipRecord]) -> String {
    const HEADERS: [&str; 4] = ["Signal", "Sender", "Receiver", "File"];

    let mut widths = HEADERS.map(UnicodeWidthStr::width);
    for record in records {
        for (w, cell) in widths.iter_mut().zip(record.columns()) {
            *w = (*w).max(UnicodeWidthStr::width(cell));
        }
    }

    fn push_row(out: &mut String, cells: [&str; 4], widths: &[usize; 4]) {
        let mut line = String::new();
        for (i, (cell, w)) in cells.iter().zip(widths).enumerate() {
            line.push_str(cell);
            if i + 1 < cells.len() {
                let pad = w.saturating_sub(UnicodeWidthStr::width(*cell)) + 2;
                line.extend(std::iter::repeat_n(' ', pad));
            }
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }

    let mut out = String::new();
    push_row(&mut out, HEADERS, &widths);
    let rules = widths.map(|w| "-".repeat(w));
    push_row(&mut out, rules.each_ref().map(String::as_str), &widths);
    for record in records {
        push_row(&mut out, record.columns(), &widths);
    }
    out
}

fn join<'a>(values: impl IntoIterator<Item = &'a String>) -> String {
    values.into_iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

fn format_details(kind: NodeKind, label: &str, related: &Related) -> String {
    match kind {
        NodeKind::Event => format!(
            "Signal: {label}\nSenders: {}\nReceivers: {}\n",
            join(&related.origins),
            join(&related.targets)
        ),
        NodeKind::Origin => format!(
            "Sender: {label}\nSignals: {}\nReceivers: {}\n",
            join(&related.events),
            join(&related.targets)
        ),
        NodeKind::Target => format!(
            "Receiver: {label}\nSignals: {}\nSenders: {}\n",
            join(&related.events),
            join(&related.origins)
        ),
    }
}

#[derive(Serialize)]
struct LayoutOut<'a> {
    #[serde(flatten)]
    layout: &'a SignalGraphLayout,
    #[serde(skip_serializing_if = "Option::is_none")]
    highlight: Option<&'a Highlight>,
}

fn run(args: &Args) -> Result<(), CliError> {
    if args.command == Command::Help {
        print!("{}", usage());
        return Ok(());
    }

    let records = load_records(args)?;
    if records.is_empty() {
        tracing::warn!("no signal receivers found");
    }

    match args.command {
        Command::Help => Ok(()),
        Command::List => {
            let filtered = sigmap_core::filter(&records, &args.query);
            if args.json {
                write_json(&filtered, args.pretty)
            } else {
                print!("{}", format_table(&filtered));
                Ok(())
            }
        }
        Command::Layout => {
            let options = layout_options(args)?;
            let filtered = sigmap_core::filter_owned(&records, &args.query);
            let layout = sigmap_render::layout(&filtered, &options);
            let highlight =
                (!args.query.is_empty()).then(|| sigmap_render::highlight(&args.query, &layout));
            write_json(
                &LayoutOut {
                    layout: &layout,
                    highlight: highlight.as_ref(),
                },
                args.pretty,
            )
        }
        Command::Render => {
            let options = layout_options(args)?;
            let filtered = sigmap_core::filter_owned(&records, &args.query);
            let layout = sigmap_render::layout(&filtered, &options);
            let highlight =
                (!args.query.is_empty()).then(|| sigmap_render::highlight(&args.query, &layout));
            let svg_options = SvgRenderOptions {
                font: options.config.font.clone(),
                ..Default::default()
            };
            let svg = render_svg(&layout, highlight.as_ref(), &svg_options);
            write_text(&svg, args.out.as_deref())
        }
        Command::Details => {
            let (Some(kind), Some(label)) = (args.kind, args.label.as_deref()) else {
                return Err(CliError::Usage(usage()));
            };
            let related = sigmap_core::related_to(kind, label, &records);
            if related.is_empty() {
                return Err(CliError::NotFound {
                    kind,
                    label: label.to_string(),
                });
            }
            if args.json {
                write_json(&related, args.pretty)
            } else {
                print!("{}", format_details(kind, label, &related));
                Ok(())
            }
        }
    }
}

fn main() {
    let argv = std::env::args().collect::<Vec<_>>();
    let args = match parse_args(&argv) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };
    init_tracing(args.verbose);

    if let Err(err) = run(&args) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
