//! hav CLI - sign, verify and inspect human authorship proofs.

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod commands;
mod output;
mod path;

use commands::{decode, encode, fingerprint, keygen, reconstruct, sign, verify};

#[derive(Parser)]
#[command(name = "hav")]
#[command(about = "Human authorship proof signing and verification CLI")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a key pair
    Keygen {
        /// Signature algorithm (ed25519, rsa)
        #[arg(long, default_value = "ed25519")]
        alg: String,
        /// Write the key pair JSON here instead of stdout
        #[arg(long)]
        out: Option<String>,
    },
    /// Sign a log and its text, producing an artifact
    Sign {
        /// Key pair JSON produced by `keygen`
        #[arg(long)]
        key: String,
        /// Event log (JSON document, JSON array, or TLV)
        #[arg(long)]
        log: String,
        /// Text to sign (default: the log's reconstruction)
        #[arg(long)]
        text: Option<String>,
        /// Signing timestamp in ms (default: now)
        #[arg(long)]
        timestamp: Option<u64>,
        /// Log location recorded in the artifact
        #[arg(long)]
        log_location: Option<String>,
        /// Record the log fingerprint in the artifact
        #[arg(long)]
        fingerprint: bool,
        /// Write the artifact here instead of stdout
        #[arg(long)]
        out: Option<String>,
    },
    /// Verify an artifact against its log
    Verify {
        /// Artifact JSON produced by `sign`
        artifact: String,
        /// Event log (default: the artifact's log location, if a local file)
        #[arg(long)]
        log: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Exit with error code if verification fails
        #[arg(long)]
        strict: bool,
        /// Minimum plausible event count
        #[arg(long)]
        min_events: Option<usize>,
        /// Minimum plausible mean key interval in ms
        #[arg(long)]
        min_interval_ms: Option<u64>,
        /// Current time in ms for the timestamp check (default: now)
        #[arg(long)]
        now: Option<u64>,
    },
    /// Print the text a log reconstructs to
    Reconstruct {
        /// Event log
        log: String,
    },
    /// Convert a JSON log to TLV
    Encode {
        /// JSON event log
        input: String,
        /// Output TLV file
        #[arg(long)]
        out: String,
    },
    /// Convert a TLV log to JSON
    Decode {
        /// TLV event log
        input: String,
        /// Treat a truncated final record as end of log
        #[arg(long)]
        permissive: bool,
        /// Timestamp to wrap the events in a log document
        #[arg(long)]
        timestamp: Option<u64>,
    },
    /// Print the fingerprint of a log
    Fingerprint {
        /// Event log
        log: String,
    },
}

fn init_tracing(verbose: u8) {
    let directive = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Keygen { alg, out } => keygen::run(alg, out),
        Commands::Sign {
            key,
            log,
            text,
            timestamp,
            log_location,
            fingerprint,
            out,
        } => sign::run(sign::SignArgs {
            key,
            log,
            text,
            timestamp,
            log_location,
            fingerprint,
            out,
        }),
        Commands::Verify {
            artifact,
            log,
            json,
            strict,
            min_events,
            min_interval_ms,
            now,
        } => verify::run(verify::VerifyArgs {
            artifact,
            log,
            json,
            strict,
            min_events,
            min_interval_ms,
            now,
        }),
        Commands::Reconstruct { log } => reconstruct::run(log),
        Commands::Encode { input, out } => encode::run(input, out),
        Commands::Decode {
            input,
            permissive,
            timestamp,
        } => decode::run(input, permissive, timestamp),
        Commands::Fingerprint { log } => fingerprint::run(log),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
