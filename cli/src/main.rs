mod config;
mod server;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process;

use crate::config::Config;
use ladle_core::db::Database;

#[derive(Parser)]
#[command(
    name = "ladle",
    version,
    about = "A simple, self-hosted recipe catalog",
    long_about = "\n\n   ██╗      █████╗ ██████╗ ██╗     ███████╗
   ██║     ██╔══██╗██╔══██╗██║     ██╔════╝
   ██║     ███████║██║  ██║██║     █████╗
   ██║     ██╔══██║██║  ██║██║     ██╔══╝
   ███████╗██║  ██║██████╔╝███████╗███████╗
   ╚══════╝╚═╝  ╚═╝╚═════╝ ╚══════╝╚══════╝
        every dish has a home.
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the recipe catalog web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
        /// Address to bind to (default: 127.0.0.1, use 0.0.0.0 to expose to network)
        #[arg(short, long, default_value = "127.0.0.1")]
        bind: String,
        /// Path to the recipe database (default: recipes.db in the working directory)
        #[arg(long, value_name = "PATH")]
        db: Option<std::path::PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Serve { port, bind, db } => {
            let config = Config::resolve(db)?;
            // Schema init happens here, once, before the listener starts.
            let db = Database::open(&config.db_path)?;
            server::start_server(db, port, &bind).await
        }
    }
}
