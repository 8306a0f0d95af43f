use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "nextblock", version, about = "Weekly schedule companion")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// One-line summary for the current moment
    Status,
    /// Details of the block happening now
    Now {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Details of the next block today
    Next {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// All of today's blocks
    Today {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Live view: re-renders every second and reloads on file change
    Watch,
    /// Print the schedule folder path, creating it if needed
    Folder,
    /// Write a starter schedule file unless one already exists
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Status => commands::query::status(),
        Commands::Now { json } => commands::query::now(json),
        Commands::Next { json } => commands::query::next(json),
        Commands::Today { json } => commands::query::today(json),
        Commands::Watch => commands::watch::run(),
        Commands::Folder => commands::setup::folder(),
        Commands::Init => commands::setup::init(),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
