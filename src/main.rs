use std::io;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use revenue_forecasts::commands::aggregate_cmd::aggregate_command;
use revenue_forecasts::commands::base_commands::{CliArgs, Commands};
use revenue_forecasts::commands::report_cmd::report_command;
use revenue_forecasts::commands::run_cmd::run_command;
use revenue_forecasts::commands::submit_cmd::submit_command;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(args.engine.verbose);

    match args.command {
        cmd @ Commands::Submit { .. } => submit_command(cmd, &args.engine),
        cmd @ Commands::Run { .. } => run_command(cmd, &args.engine),
        cmd @ Commands::Aggregate { .. } => aggregate_command(cmd, &args.engine),
        cmd @ Commands::Report { .. } => report_command(cmd, &args.engine),
        Commands::Completions { shell } => {
            let mut command = CliArgs::command();
            let name = command.get_name().to_string();
            clap_complete::generate(shell, &mut command, name, &mut io::stdout());
            ExitCode::SUCCESS
        }
    }
}
