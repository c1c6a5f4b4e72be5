//! Courier Code Generator
//!
//! Scans Rust sources for `#[http_client]` contracts and writes adapter
//! implementations.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use courier_gen::Generator;
use courier_gen::backend::BackendRegistry;
use courier_gen::config::GeneratorConfig;
use courier_gen::errors::GeneratorError;
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Courier code generator - implements HTTP contract traits with reqwest adapters
#[derive(Parser, Debug)]
#[command(name = "courier-gen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory to scan for contracts (repeatable; replaces `scan_paths`)
    #[arg(short, long = "scan")]
    scan: Vec<PathBuf>,

    /// Output directory for generated adapters
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Backend id (see --list-backends)
    #[arg(short, long)]
    backend: Option<String>,

    /// Suffix appended to contract names
    #[arg(long)]
    suffix: Option<String>,

    /// Configuration file (defaults to ./courier.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print generated code without writing files
    #[arg(long)]
    dry_run: bool,

    /// List available backends and exit
    #[arg(long)]
    list_backends: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Installs the stderr subscriber. `RUST_LOG` wins over `-v`.
///
/// - 0: WARN
/// - 1 (-v): INFO (contracts collected, files written)
/// - 2 (-vv): DEBUG (files scanned, methods synthesized)
/// - 3+ (-vvv): TRACE
fn init_tracing(verbose: u8) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            1 => "warn,courier_gen=info".to_string(),
            2 => "info,courier_gen=debug".to_string(),
            _ => "debug,courier_gen=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(verbose >= 2)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn main() -> Result<ExitCode, GeneratorError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.list_backends {
        for (id, description) in BackendRegistry::builtin().describe() {
            println!("{:<18} {}", id.bold(), description);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let config = match &cli.config {
        Some(path) => GeneratorConfig::load(path)?,
        None => GeneratorConfig::discover(Path::new("."))?,
    };

    let mut generator = Generator::from_config(config).dry_run(cli.dry_run);
    for path in cli.scan {
        generator = generator.scan_path(path);
    }
    if let Some(output) = cli.output {
        generator = generator.output_dir(output);
    }
    if let Some(backend) = cli.backend {
        generator = generator.backend(backend);
    }
    if let Some(suffix) = cli.suffix {
        generator = generator.adapter_suffix(suffix);
    }

    let report = generator.run()?;
    if !report.diagnostics.is_empty() {
        eprint!("{}", report.diagnostics.render_colored());
    }
    eprintln!("{}", report.summary());

    Ok(if report.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
