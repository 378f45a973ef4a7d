use clap::Parser;

use betlytics::cli::{self, Cli, Commands};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Serve(args) => cli::serve::execute(&cli, args).await,
        Commands::Ingest(args) => cli::ingest::execute(&cli, args).await,
        Commands::Generate(args) => cli::generate::execute(&cli, args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
