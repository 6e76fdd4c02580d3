mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use reifier_core::error::Result;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    init_tracing(&cli);

    if let Err(e) = run(cli) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn init_tracing(cli: &Cli) {
    let filter = if cli.quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(match cli.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            })
        })
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(cli.verbose > 1)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Commands::Generate(args) => commands::generate::run(&cli, args.clone()),
        Commands::List(args) => commands::list::run(&cli, args.clone()),
        Commands::Init(args) => commands::init::run(&cli, args.clone()),
        Commands::Info => commands::info::run(&cli),
    }
}
