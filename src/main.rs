use clap::Parser;
use pmp_vision_gateway::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => cli::serve::run().await,
        Command::Scan(args) => cli::scan::run(args),
        Command::Predict(args) => cli::predict::run(args),
    }
}
