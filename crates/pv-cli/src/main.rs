//! CLI frontend for Palaver conversations.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(
    name = "pv",
    about = "Palaver: write, check and play branching conversations",
    version,
    propagate_version = true
)]
struct Cli {
    /// More log output on stderr (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new .talk file from a template
    New {
        /// Conversation title
        name: String,

        /// File to create (default: derived from the title)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Validate a conversation and report diagnostics
    Check {
        /// Conversation file (.talk or .json)
        file: PathBuf,
    },

    /// List the nodes of a conversation
    Show {
        /// Conversation file (.talk or .json)
        file: PathBuf,

        /// Also list editor layout data
        #[arg(short, long)]
        layout: bool,
    },

    /// Convert a conversation to another format
    Convert {
        /// Conversation file (.talk or .json)
        file: PathBuf,

        /// Output format: json, talk
        #[arg(short, long)]
        format: String,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Play a conversation in the terminal
    Play {
        /// Conversation file (.talk or .json)
        file: PathBuf,

        /// Read one reply number per line and never wait for Enter
        #[arg(long)]
        script: bool,
    },
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::New { name, file } => commands::new::run(&name, file.as_deref()),
        Commands::Check { file } => commands::check::run(&file),
        Commands::Show { file, layout } => commands::show::run(&file, layout),
        Commands::Convert {
            file,
            format,
            output,
        } => commands::convert::run(&file, &format, output.as_deref()),
        Commands::Play { file, script } => commands::play::run(&file, script),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
