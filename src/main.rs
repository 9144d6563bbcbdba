use clap::Parser;
use ops_kb_qa::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli::bootstrap(cli.config.as_deref())?;

    match cli.command {
        Command::Ask(args) => cli::ask::run(&config, args).await,
        Command::Probe(args) => cli::probe::run(&config, args).await,
        Command::Status => cli::status::run(&config).await,
    }
}
