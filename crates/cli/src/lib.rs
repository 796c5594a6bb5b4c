use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use flags::{DirectionFlag, GestureFlag, PlatformFlag};
use serde::Serialize;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use uisnap_protocol::{
    serialize_json, serialize_json_pretty, ErrorEnvelope, ResolveResponse, SnapshotResponse,
};
use uisnap_tree::{parse_caption, GestureConfig};

mod flags;
mod report;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let raw = if pretty {
        serialize_json_pretty(value)?
    } else {
        serialize_json(value)?
    };
    print_stdout(&raw)
}

#[derive(Parser)]
#[command(name = "uisnap")]
#[command(about = "Compact, addressable snapshots of mobile UI trees for agents", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the pruned snapshot of a UI dump
    Snapshot(SnapshotArgs),

    /// Snapshot a dump, then resolve a ref to gesture geometry
    Resolve(ResolveArgs),

    /// Split an accessibility-audit caption into its parts
    Caption(CaptionArgs),

    /// Print the JSON schema of a response
    Schema(SchemaArgs),
}

#[derive(Args)]
struct DumpArgs {
    /// UI dump file (stdin when omitted or `-`)
    #[arg(long, short)]
    input: Option<PathBuf>,

    /// Dump vocabulary
    #[arg(long, value_enum, env = "UISNAP_PLATFORM", default_value = "auto")]
    platform: PlatformFlag,
}

#[derive(Args)]
struct SnapshotArgs {
    #[command(flatten)]
    dump: DumpArgs,

    /// Output JSON format
    #[arg(long)]
    json: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Args)]
struct ResolveArgs {
    #[command(flatten)]
    dump: DumpArgs,

    /// Ref from the snapshot
    #[arg(long = "ref")]
    ref_id: u32,

    /// Gesture to build for the ref
    #[arg(long, value_enum, default_value = "tap")]
    gesture: GestureFlag,

    /// Scroll direction (content moves toward it)
    #[arg(long, value_enum, default_value = "down")]
    direction: DirectionFlag,

    /// Long-press dwell in milliseconds
    #[arg(long, env = "UISNAP_LONG_PRESS_MS")]
    long_press_ms: Option<u64>,

    /// Swipe duration in milliseconds
    #[arg(long, env = "UISNAP_SWIPE_MS")]
    swipe_ms: Option<u64>,

    /// Output JSON format
    #[arg(long)]
    json: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Args)]
struct CaptionArgs {
    /// Caption text, e.g. "Wi-Fi, vanCampers, Button"
    text: String,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Copy, Clone, ValueEnum)]
enum SchemaTarget {
    Snapshot,
    Resolve,
    Error,
}

#[derive(Args)]
struct SchemaArgs {
    #[arg(value_enum)]
    target: SchemaTarget,
}

pub fn main_entry() -> Result<()> {
    let mut cli = Cli::parse();

    // Keep stdout clean for JSON parsing
    let json_output = match &cli.command {
        Commands::Snapshot(args) => args.json,
        Commands::Resolve(args) => args.json,
        Commands::Caption(_) | Commands::Schema(_) => true,
    };
    if json_output {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Snapshot(args) => run_snapshot(args)?,
        Commands::Resolve(args) => run_resolve(args)?,
        Commands::Caption(args) => print_json(&parse_caption(&args.text), args.pretty)?,
        Commands::Schema(args) => run_schema(args)?,
    }

    Ok(())
}

fn read_dump(input: Option<&Path>) -> Result<String> {
    if let Some(path) = input.filter(|p| *p != Path::new("-")) {
        return fs::read_to_string(path)
            .with_context(|| format!("Failed to read dump from {}", path.display()));
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read dump from stdin")?;
    Ok(buffer)
}

/// Print the snapshot text or JSON response
fn run_snapshot(args: SnapshotArgs) -> Result<()> {
    let raw = read_dump(args.dump.input.as_deref())?;
    let mut session = args.dump.platform.session();
    let snapshot = session.snapshot(&raw);

    if args.json {
        let response = report::snapshot_response(
            args.dump.platform.resolved_name(&raw),
            &snapshot,
            session.current(),
        );
        print_json(&response, args.pretty)?;
    } else if session.current().is_empty() {
        log::warn!("dump produced no usable tree");
    } else {
        print_stdout(&snapshot.text)?;
        log::info!(
            "{} nodes -> {} nodes, {} refs",
            snapshot.stats.input_nodes,
            snapshot.stats.output_nodes,
            snapshot.stats.refs
        );
    }
    Ok(())
}

/// Resolve a ref against a fresh snapshot of the dump
fn run_resolve(args: ResolveArgs) -> Result<()> {
    let defaults = GestureConfig::default();
    let config = GestureConfig {
        long_press_ms: args.long_press_ms.unwrap_or(defaults.long_press_ms),
        swipe_ms: args.swipe_ms.unwrap_or(defaults.swipe_ms),
    };
    config.validate()?;

    let raw = read_dump(args.dump.input.as_deref())?;
    let mut session = args.dump.platform.session().with_config(config);
    session.snapshot(&raw);

    if session.current().is_empty() {
        fail(&report::no_tree_envelope(), args.json, args.pretty)?;
    }

    let kind = args.gesture.as_domain(args.direction);
    match session.gesture(args.ref_id, kind) {
        Ok(gesture) => {
            let response = report::resolve_response(args.ref_id, session.current(), gesture);
            if args.json {
                print_json(&response, args.pretty)?;
            } else {
                print_stdout(&describe(&response))?;
            }
            Ok(())
        }
        Err(err) => fail(&report::error_envelope(&err), args.json, args.pretty),
    }
}

fn describe(response: &ResolveResponse) -> String {
    use uisnap_protocol::GesturePayload;

    match response.gesture {
        GesturePayload::Tap { at } => format!("tap {} {}", at.x, at.y),
        GesturePayload::LongPress { at, duration_ms } => {
            format!("long-press {} {} {duration_ms}ms", at.x, at.y)
        }
        GesturePayload::Swipe {
            from,
            to,
            duration_ms,
        } => format!(
            "swipe {} {} -> {} {} {duration_ms}ms",
            from.x, from.y, to.x, to.y
        ),
    }
}

fn fail(envelope: &ErrorEnvelope, json: bool, pretty: bool) -> Result<()> {
    if json {
        print_json(envelope, pretty)?;
    } else {
        eprintln!("Error: {}", envelope.message);
        if let Some(hint) = &envelope.hint {
            eprintln!("Hint: {hint}");
        }
    }
    std::process::exit(1);
}

fn run_schema(args: SchemaArgs) -> Result<()> {
    let schema = match args.target {
        SchemaTarget::Snapshot => schemars::schema_for!(SnapshotResponse),
        SchemaTarget::Resolve => schemars::schema_for!(ResolveResponse),
        SchemaTarget::Error => schemars::schema_for!(ErrorEnvelope),
    };
    print_json(&schema, true)
}
