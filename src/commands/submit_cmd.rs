use std::process::ExitCode;

use crate::commands::base_commands::{Commands, EngineArgs};
use crate::commands::report_format::format_output_report;
use crate::services::factors_yaml::load_factors_from_yaml_file;

pub fn submit_command(cmd: Commands, engine_args: &EngineArgs) -> ExitCode {
    let Commands::Submit {
        project,
        contributor,
        factors,
        output,
    } = cmd
    else {
        return ExitCode::FAILURE;
    };

    let factors = match load_factors_from_yaml_file(&factors) {
        Ok(factors) => factors,
        Err(e) => {
            eprintln!("Failed to load factors: {e}");
            return ExitCode::FAILURE;
        }
    };

    let engine = match engine_args.open_engine() {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Failed to open simulation engine: {e}");
            return ExitCode::FAILURE;
        }
    };

    let receipt = match engine.submit_factors(&contributor, &project, factors) {
        Ok(receipt) => receipt,
        Err(e) => {
            eprintln!("Failed to submit factors: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!(
        "Factors of {contributor} stored for {} simulation {}",
        receipt.track, receipt.simulation_id
    );
    println!("{}", format_output_report(&receipt.output));
    if let Some(cross_check) = &receipt.cross_check {
        println!();
        println!("{}", format_output_report(&cross_check.output));
    }

    if let Some(path) = output {
        let yaml = match serde_yaml::to_string(&receipt) {
            Ok(contents) => contents,
            Err(e) => {
                eprintln!("Failed to serialize submission receipt: {e}");
                return ExitCode::FAILURE;
            }
        };
        if let Err(e) = std::fs::write(&path, yaml) {
            eprintln!("Failed to write submission receipt: {e}");
            return ExitCode::FAILURE;
        }
        println!("Submission receipt written to {path}");
    }
    ExitCode::SUCCESS
}
