use std::path::Path;

use plotters::prelude::*;
use thiserror::Error;

use crate::services::simulation_types::FactorHistogram;

#[derive(Error, Debug)]
pub enum HistogramError {
    #[error("failed to render histogram: {0}")]
    Render(String),
}

/// Bins `values` into `bins` equal-width buckets spanning `[min, max]` of the
/// finite values.
///
/// Buckets are half-open `[edge_i, edge_i+1)`, so values equal to the maximum
/// fall outside every bucket and are not counted. A pool whose finite values
/// are all equal, an empty pool, or `bins == 0` yields an empty histogram.
pub fn compute_histogram(values: &[f64], bins: usize) -> FactorHistogram {
    let finite = || values.iter().copied().filter(|value| value.is_finite());
    let min_value = finite().fold(f64::INFINITY, f64::min);
    let max_value = finite().fold(f64::NEG_INFINITY, f64::max);
    if bins == 0 || !(max_value > min_value) {
        return FactorHistogram::default();
    }

    let bin_width = (max_value - min_value) / bins as f64;
    let mut x_values: Vec<f64> = (0..bins)
        .map(|index| min_value + index as f64 * bin_width)
        .collect();
    x_values.push(max_value);

    let mut y_values = vec![0u64; bins];
    for value in finite() {
        if value < min_value || value >= max_value {
            continue;
        }
        let bucket = (((value - min_value) / bin_width) as usize).min(bins - 1);
        y_values[bucket] += 1;
    }

    FactorHistogram { x_values, y_values }
}

pub fn write_histogram_png<P: AsRef<Path>>(
    output_path: P,
    title: &str,
    histogram: &FactorHistogram,
) -> Result<(), HistogramError> {
    render_histogram_png(output_path.as_ref(), title, histogram)
}

fn render_histogram_png(
    output_path: &Path,
    title: &str,
    histogram: &FactorHistogram,
) -> Result<(), HistogramError> {
    if histogram.is_empty() {
        return Ok(());
    }

    let x_min = histogram.x_values.first().copied().unwrap_or(0.0);
    let x_max = histogram.x_values.last().copied().unwrap_or(1.0);
    let max_count = histogram.y_values.iter().copied().max().unwrap_or(1);

    let root = BitMapBackend::new(output_path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| HistogramError::Render(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption(title, ("sans-serif", 30))
        .x_label_area_size(55)
        .y_label_area_size(65)
        .build_cartesian_2d(x_min..x_max, 0u64..(max_count + 1))
        .map_err(|e| HistogramError::Render(e.to_string()))?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Value")
        .y_desc("Frequency")
        .label_style(("sans-serif", 18))
        .axis_desc_style(("sans-serif", 22))
        .x_label_formatter(&|value| format!("{value:.2}"))
        .draw()
        .map_err(|e| HistogramError::Render(e.to_string()))?;

    let bar_color = RGBColor(30, 122, 204);
    let bar_style = ShapeStyle::from(&bar_color).filled();
    chart
        .draw_series(
            histogram
                .x_values
                .windows(2)
                .zip(&histogram.y_values)
                .map(|(edges, count)| Rectangle::new([(edges[0], 0), (edges[1], *count)], bar_style)),
        )
        .map_err(|e| HistogramError::Render(e.to_string()))?;

    root.present()
        .map_err(|e| HistogramError::Render(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_step_from_min_to_max() {
        let histogram = compute_histogram(&[0.0, 1.0, 2.0, 3.0, 4.0], 4);
        assert_eq!(histogram.x_values, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(histogram.y_values, vec![1, 1, 1, 1]);
    }

    #[test]
    fn maximum_value_falls_outside_the_last_bucket() {
        let values = [0.0, 0.5, 10.0, 10.0, 9.99];
        let histogram = compute_histogram(&values, 10);
        let in_range = values.iter().filter(|v| **v >= 0.0 && **v < 10.0).count() as u64;
        assert_eq!(histogram.total_count(), in_range);
        assert_eq!(histogram.total_count(), 3);
        assert_eq!(histogram.y_values[9], 1);
    }

    #[test]
    fn single_valued_pool_gives_empty_histogram() {
        let histogram = compute_histogram(&[3.0; 50], 100);
        assert!(histogram.is_empty());
        assert!(histogram.x_values.is_empty());
    }

    #[test]
    fn empty_pool_and_zero_bins_give_empty_histogram() {
        assert!(compute_histogram(&[], 10).is_empty());
        assert!(compute_histogram(&[1.0, 2.0], 0).is_empty());
    }

    #[test]
    fn non_finite_values_are_ignored() {
        let histogram = compute_histogram(&[f64::NAN, 0.0, 1.0, 2.0, f64::INFINITY], 2);
        assert_eq!(histogram.x_values, vec![0.0, 1.0, 2.0]);
        assert_eq!(histogram.y_values, vec![1, 1]);
    }

    #[test]
    fn write_histogram_png_skips_empty_histogram() {
        let temp = assert_fs::TempDir::new().unwrap();
        let path = temp.path().join("empty.png");
        write_histogram_png(&path, "empty", &FactorHistogram::default()).unwrap();
        assert!(!path.exists());
    }
}
