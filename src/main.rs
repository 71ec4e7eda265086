//! policygen CLI
//!
//! Entry point for the `policygen` command-line tool.

use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use policygen::config::DEFAULT_CONFIG_FILE;
use policygen::{ConfigOverrides, GeneratorConfig, PolicyGenerator};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "policygen")]
#[command(about = "Generate governance policies from generation templates", version)]
struct Cli {
    /// Directory holding source documents (default: .)
    #[arg(long, short = 's')]
    source_dir: Option<PathBuf>,

    /// Directory holding generation templates (default: .)
    #[arg(long, short = 't')]
    template_dir: Option<PathBuf>,

    /// Output root (default: ./policies)
    #[arg(long, short = 'o')]
    out_dir: Option<PathBuf>,

    /// Also print every generated document to stdout
    #[arg(long)]
    stdout: bool,

    /// Emit merged custom resources without policy wrapping
    #[arg(long)]
    custom_resources: bool,

    /// Continue with the next template when one fails
    #[arg(long)]
    keep_going: bool,

    /// Path to config file (default: policygen.toml when present)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let overrides = ConfigOverrides {
        source_dir: cli.source_dir,
        template_dir: cli.template_dir,
        out_dir: cli.out_dir,
        stdout: cli.stdout,
        custom_resources: cli.custom_resources,
        keep_going: cli.keep_going,
    };
    let config_file = cli.config.or_else(|| {
        let default = Path::new(DEFAULT_CONFIG_FILE);
        default.exists().then(|| default.to_path_buf())
    });

    let config = match GeneratorConfig::resolve(config_file.as_deref(), &overrides) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            process::exit(1);
        }
    };

    match PolicyGenerator::new(config).generate() {
        Ok(report) if report.is_success() => {}
        Ok(report) => {
            eprintln!("{} of {} templates failed:", report.failures.len(), report.templates);
            for failure in &report.failures {
                eprintln!("  {}: {}", failure.path.display(), failure.message);
            }
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

/// Log to stderr so stdout stays free for `--stdout` documents.
fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time(),
        )
        .init();
}
