//! Kiosk flow simulator entry point.
//!
//! # Usage
//!
//! ```bash
//! # Walk the built-in clinic flow
//! kioskflow
//!
//! # Walk a document, reloading it whenever the file is saved
//! kioskflow --flow lobby.json --watch --log-file kioskflow.log
//!
//! # Lint a document without starting the UI
//! kioskflow --flow lobby.json --check
//!
//! # Ask an external generator for a flow
//! kioskflow --prompt "pharmacy pickup with CPF" --generator "llm -m gpt"
//! ```

use std::{
    fs::File,
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
    sync::Arc,
    time::Duration,
};

use clap::Parser;
use kioskflow_app::{App, AppConfig, CommandGenerator, Runtime, SystemEnv, generate_flow};
use kioskflow_proto::Flow;
use kioskflow_tui::TerminalDriver;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Terminal kiosk simulator for server-driven flows
#[derive(Parser, Debug)]
#[command(name = "kioskflow")]
#[command(about = "Walk a kiosk flow document in the terminal")]
#[command(version)]
struct Args {
    /// Flow document (JSON). Defaults to the built-in clinic flow.
    #[arg(short, long)]
    flow: Option<PathBuf>,

    /// Reload the flow document whenever it changes on disk
    #[arg(short, long, requires = "flow")]
    watch: bool,

    /// Describe the flow to generate instead of loading one
    #[arg(short, long, requires = "generator", conflicts_with = "flow")]
    prompt: Option<String>,

    /// Generator command line; receives the prompt on stdin
    #[arg(short, long)]
    generator: Option<String>,

    /// Parse and lint the flow document, print diagnostics, and exit
    #[arg(long)]
    check: bool,

    /// Latency of the simulated enqueue call
    #[arg(long, default_value_t = 2000)]
    effect_latency_ms: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Write logs to this file (the terminal belongs to the UI)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(&args)?;

    let document = args.flow.as_ref().map(std::fs::read_to_string).transpose()?;

    if args.check {
        let raw = match document {
            Some(raw) => raw,
            None => Flow::fallback().to_json_pretty()?,
        };
        return Ok(check(&raw, &mut io::stdout().lock())?);
    }

    let config = AppConfig {
        effect_latency: Duration::from_millis(args.effect_latency_ms),
        ..AppConfig::default()
    };

    let mut app = App::new(Flow::fallback())?;
    if let Some(raw) = &document {
        app.load_document(raw);
    }

    if let (Some(prompt), Some(command)) = (&args.prompt, &args.generator) {
        match CommandGenerator::from_command_line(command) {
            Some(generator) => {
                let generator = generator.with_timeout(config.generator_timeout);
                app.adopt_generated(generate_flow(&generator, prompt).await);
            },
            None => app.set_status("Generator command is empty, using built-in flow"),
        }
    }

    tracing::info!(flow = %app.session().flow().flow_id, "kiosk starting");

    let watch = if args.watch { args.flow.clone() } else { None };
    let driver = TerminalDriver::new(watch)?;
    let runtime = Runtime::new(driver, SystemEnv::new(), app, config);
    runtime.run().await?;

    Ok(ExitCode::SUCCESS)
}

/// Install the subscriber. Without a log file, logs are discarded.
fn init_logging(args: &Args) -> io::Result<()> {
    let Some(path) = &args.log_file else {
        return Ok(());
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    let file = Arc::new(File::create(path)?);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(file).with_ansi(false))
        .with(filter)
        .init();
    Ok(())
}

/// Parse and lint `raw`, writing one line per finding.
fn check(raw: &str, out: &mut impl Write) -> io::Result<ExitCode> {
    let flow = match Flow::parse(raw) {
        Ok(flow) => flow,
        Err(err) => {
            writeln!(out, "error: {err}")?;
            return Ok(ExitCode::FAILURE);
        },
    };

    let warnings = flow.lint();
    for warning in &warnings {
        writeln!(out, "warning: {warning}")?;
    }
    writeln!(
        out,
        "{}: {} screens, entry '{}', {} warning(s)",
        flow.flow_id,
        flow.screen_count(),
        flow.entry_point(),
        warnings.len()
    )?;

    Ok(ExitCode::SUCCESS)
}
