use crate::services::simulation_types::{AggregateHistograms, SimulationOutput, YearlyStatistics};

pub fn format_output_report(output: &SimulationOutput) -> String {
    let mut lines = Vec::new();
    lines.push("Simulation Report".to_string());
    lines.push(format!("Simulation: {}", output.simulation_id));
    lines.push(format!("Run ticket: {}", output.run_ticket));
    lines.push(format!(
        "Computed at: {}",
        output.computed_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    lines.push(String::new());
    lines.push("Year | Mean | Median | Std Dev | Min | Max | P5 | P95".to_string());
    lines.push("-----|------|--------|---------|-----|-----|----|----".to_string());
    for (index, statistics) in output.summary_statistics.iter().enumerate() {
        lines.push(format_year_row(index + 1, statistics));
    }

    lines.join("\n")
}

fn format_year_row(year: usize, statistics: &YearlyStatistics) -> String {
    format!(
        "{year} | {:.2} | {:.2} | {:.2} | {:.2} | {:.2} | {:.2} | {:.2}",
        statistics.mean,
        statistics.median,
        statistics.std_dev,
        statistics.min,
        statistics.max,
        statistics.percentile_5,
        statistics.percentile_95,
    )
}

/// One line per factor: sample count and value range of its histogram.
pub fn format_histogram_summary(histograms: &AggregateHistograms) -> String {
    histograms
        .iter()
        .map(|(factor, histogram)| {
            match (histogram.x_values.first(), histogram.x_values.last()) {
                (Some(min), Some(max)) if !histogram.is_empty() => format!(
                    "{factor}: {} samples in [{min:.2}, {max:.2})",
                    histogram.total_count()
                ),
                _ => format!("{factor}: no spread"),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::simulation_types::FactorHistogram;
    use chrono::{TimeZone, Utc};

    fn statistics(mean: f64) -> YearlyStatistics {
        YearlyStatistics {
            mean,
            median: mean,
            std_dev: 1.5,
            min: mean - 3.0,
            max: mean + 3.0,
            percentile_5: mean - 2.0,
            percentile_95: mean + 2.0,
        }
    }

    fn build_output() -> SimulationOutput {
        SimulationOutput {
            simulation_id: "p1_normal".to_string(),
            summary_statistics: (1..=5).map(|year| statistics(year as f64 * 100.0)).collect(),
            run_ticket: 42,
            computed_at: Utc.with_ymd_and_hms(2026, 2, 1, 12, 30, 0).unwrap(),
        }
    }

    #[test]
    fn format_output_report_includes_header_and_table() {
        let output = format_output_report(&build_output());

        assert!(output.contains("Simulation Report"));
        assert!(output.contains("Simulation: p1_normal"));
        assert!(output.contains("Run ticket: 42"));
        assert!(output.contains("Computed at: 2026-02-01 12:30:00 UTC"));
        assert!(output.contains("Year | Mean | Median | Std Dev | Min | Max | P5 | P95"));
        assert!(output.contains("1 | 100.00 | 100.00 | 1.50 | 97.00 | 103.00 | 98.00 | 102.00"));
        assert!(output.contains("5 | 500.00 | 500.00 | 1.50 | 497.00 | 503.00 | 498.00 | 502.00"));
    }

    #[test]
    fn histogram_summary_marks_degenerate_factors() {
        let mut histograms = AggregateHistograms::new();
        histograms.insert(
            "willingness_to_pay_standard".to_string(),
            FactorHistogram {
                x_values: vec![0.0, 5.0, 10.0],
                y_values: vec![3, 4],
            },
        );
        histograms.insert("yoy_growth_rate".to_string(), FactorHistogram::default());

        let summary = format_histogram_summary(&histograms);
        assert!(summary.contains("willingness_to_pay_standard: 7 samples in [0.00, 10.00)"));
        assert!(summary.contains("yoy_growth_rate: no spread"));
    }
}
