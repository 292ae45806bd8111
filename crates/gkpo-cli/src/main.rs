//! GKPO CLI - canonical forms, equivalence checks, and method adapters.

use clap::{Parser, Subcommand};
use gkpo_adapters::Method;
use tracing_subscriber::EnvFilter;

mod commands;
mod input;
mod output;

use commands::{canonicalize, check, compare, decode, encode, verify};

#[derive(Parser)]
#[command(name = "gkpo")]
#[command(about = "GKPO canonicalization, equivalence, and adapter CLI")]
struct Cli {
    /// Log debug events to stderr (overrides GKPO_LOG)
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the canonical projection, opal_hash, and reducibility flags
    Canonicalize {
        /// Input GKPO JSON file (or stdin if not provided)
        input: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print opal_hash and reducibility flags for each file
    Check {
        /// GKPO JSON files
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Compare two documents; exits 1 when their digests differ
    Compare {
        /// First GKPO JSON file
        a: String,
        /// Second GKPO JSON file
        b: String,
        /// Print field-level differences even when equivalent
        #[arg(long)]
        show_diff: bool,
        /// Key-path prefixes to skip when diffing (default: provenance)
        #[arg(long, num_args = 0..)]
        ignore: Option<Vec<String>>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check stored provenance.opal_hash values against recomputation
    Verify {
        /// GKPO JSON files
        #[arg(required = true)]
        paths: Vec<String>,
        /// Exit with error code if any digest is missing or stale
        #[arg(long)]
        strict: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Build a canonical GKPO document from method-native params
    Encode {
        /// Method name (dpo, rrhf)
        method: Method,
        /// Native params JSON file (or stdin if not provided)
        input: Option<String>,
    },
    /// Extract method-native params from a GKPO document
    Decode {
        /// Method name (dpo, rrhf)
        method: Method,
        /// Input GKPO JSON file (or stdin if not provided)
        input: Option<String>,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("GKPO_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Canonicalize { input, json } => canonicalize::run(input, json),
        Commands::Check { paths } => check::run(paths),
        Commands::Compare {
            a,
            b,
            show_diff,
            ignore,
            json,
        } => compare::run(a, b, show_diff, ignore, json),
        Commands::Verify {
            paths,
            strict,
            json,
        } => verify::run(paths, strict, json),
        Commands::Encode { method, input } => encode::run(method, input),
        Commands::Decode { method, input } => decode::run(method, input),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
