use std::process::ExitCode;

use crate::commands::base_commands::{Commands, EngineArgs};
use crate::commands::report_format::format_output_report;

pub fn run_command(cmd: Commands, engine_args: &EngineArgs) -> ExitCode {
    let Commands::Run { project, track } = cmd else {
        return ExitCode::FAILURE;
    };

    let engine = match engine_args.open_engine() {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Failed to open simulation engine: {e}");
            return ExitCode::FAILURE;
        }
    };

    match engine.run_track(&project, track.into()) {
        Ok(output) => {
            println!("{}", format_output_report(&output));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to run simulation: {e}");
            ExitCode::FAILURE
        }
    }
}
