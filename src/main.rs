use clap::Parser;
use roleready_auth::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve::run().await,
        Command::IssueToken(args) => cli::token::issue(args).await,
        Command::InspectToken(args) => cli::token::inspect(args).await,
    }
}
