//! flsub CLI main entry point

use anyhow::Result;
use clap::Parser;
use flsub_cli::{commands::{Cli, CommandExecutor}, interactive::start_interactive};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = cli.format.unwrap_or_default();
    let executor = CommandExecutor::from_symbols_file(cli.symbols.as_deref())?;

    // No subcommand, start interactive mode
    let Some(command) = cli.command else {
        start_interactive(executor, format)?;
        return Ok(());
    };

    let result = match executor.execute(command, &format) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    // Exit with appropriate code
    if result.success {
        println!("{}", result.message);
        std::process::exit(0);
    } else {
        eprintln!("{}", result.message);
        std::process::exit(1);
    }
}
