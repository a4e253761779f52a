use std::path::Path;
use std::process::ExitCode;

use crate::commands::base_commands::{Commands, EngineArgs, OutputFormat};
use crate::commands::report_format::format_histogram_summary;
use crate::services::histogram::{HistogramError, write_histogram_png};
use crate::services::simulation_types::AggregateHistograms;

fn render(histograms: &AggregateHistograms, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Yaml => serde_yaml::to_string(histograms).map_err(|e| e.to_string()),
        OutputFormat::Json => serde_json::to_string_pretty(histograms).map_err(|e| e.to_string()),
    }
}

/// Writes `<dir>/<factor>.png` for every factor with a non-empty histogram.
fn plot_histograms(dir: &Path, histograms: &AggregateHistograms) -> Result<usize, HistogramError> {
    std::fs::create_dir_all(dir).map_err(|e| HistogramError::Render(e.to_string()))?;
    let mut written = 0;
    for (factor, histogram) in histograms.iter().filter(|(_, histogram)| !histogram.is_empty()) {
        write_histogram_png(dir.join(format!("{factor}.png")), factor, histogram)?;
        written += 1;
    }
    Ok(written)
}

pub fn aggregate_command(cmd: Commands, engine_args: &EngineArgs) -> ExitCode {
    let Commands::Aggregate {
        project,
        format,
        output,
        plot_dir,
    } = cmd
    else {
        return ExitCode::FAILURE;
    };

    let engine = match engine_args.open_engine() {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Failed to open simulation engine: {e}");
            return ExitCode::FAILURE;
        }
    };

    let histograms = match engine.aggregate_distributions(&project) {
        Ok(histograms) => histograms,
        Err(e) => {
            eprintln!("Failed to aggregate distributions: {e}");
            return ExitCode::FAILURE;
        }
    };

    let rendered = match render(&histograms, format) {
        Ok(contents) => contents,
        Err(e) => {
            eprintln!("Failed to serialize histograms: {e}");
            return ExitCode::FAILURE;
        }
    };

    match &output {
        Some(path) => {
            if let Err(e) = std::fs::write(path, rendered) {
                eprintln!("Failed to write histograms: {e}");
                return ExitCode::FAILURE;
            }
            println!("{}", format_histogram_summary(&histograms));
            println!("Histograms written to {path}");
        }
        None => println!("{rendered}"),
    }

    if let Some(dir) = plot_dir {
        match plot_histograms(Path::new(&dir), &histograms) {
            Ok(written) => eprintln!("{written} histogram plots written to {dir}"),
            Err(e) => {
                eprintln!("Failed to plot histograms: {e}");
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}
