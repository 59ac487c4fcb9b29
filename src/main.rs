//! chatvault CLI - Browse and manage saved AI chats.

use chatvault::cli;
use chatvault::config::load_config;
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chatvault")]
#[command(author, version, about = "Browse and manage saved AI chats", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List saved chats, newest first.
    List {
        /// Maximum number of chats to show. Defaults to the configured limit.
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Print the transcript of a saved chat.
    Show {
        /// Chat filename (with or without .json) or path.
        chat: String,
    },

    /// Show metadata for a saved chat without loading it.
    Info {
        /// Chat filename (with or without .json) or path.
        chat: String,
    },

    /// Save a JSON array of messages as a new chat.
    Import {
        /// Transcript file, or "-" for stdin.
        source: String,

        /// Title for the chat (also used for its filename).
        #[arg(short, long)]
        title: Option<String>,
    },

    /// Delete a saved chat.
    Delete {
        /// Chat filename (with or without .json) or path.
        chat: String,
    },

    /// List models available with the configured API keys.
    Models {
        /// Include models whose provider has no API key.
        #[arg(long)]
        all: bool,
    },
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("chatvault=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("chatvault: error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Commands::List { limit } => cli::list::run(&config, limit),
        Commands::Show { chat } => cli::show::run(&config, &chat),
        Commands::Info { chat } => cli::info::run(&config, &chat),
        Commands::Import { source, title } => {
            cli::import::run(&config, &source, title.as_deref())
        }
        Commands::Delete { chat } => cli::delete::run(&config, &chat),
        Commands::Models { all } => cli::models::run(&config, all),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("chatvault: error: {e}");
            ExitCode::FAILURE
        }
    }
}
