/*!
 * Research summary charts
 *
 * Renders a two-panel PNG: organizations per category on the left, and total
 * organizations against major companies found on the right. Captions and
 * value labels need a system font and are drawn only with the `chart-labels`
 * feature.
 */

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::{NpiRegistryError, Result};

/// Pixel size of the whole chart
pub const CHART_SIZE: (u32, u32) = (1400, 600);

const CATEGORY_COLOR: RGBColor = RGBColor(31, 119, 180);
const TOTAL_COLOR: RGBColor = RGBColor(44, 160, 44);
const MAJOR_COLOR: RGBColor = RGBColor(255, 127, 14);

/// One bar: label, height, fill
type Bar<'a> = (&'a str, usize, RGBColor);

/// Write the summary chart to `path`, which should end in `.png`
pub fn write_summary_chart(
    path: &Path,
    category_counts: &[(String, usize)],
    total: usize,
    major_found: usize,
) -> Result<()> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_error)?;
    let (left, right) = root.split_horizontally((CHART_SIZE.0 / 2) as i32);

    let categories: Vec<Bar<'_>> = category_counts
        .iter()
        .map(|(name, count)| (name.as_str(), *count, CATEGORY_COLOR))
        .collect();
    draw_bars(&left, "Organizations by Category", &categories)?;
    draw_bars(
        &right,
        "Total vs Major Companies Found",
        &[
            ("Total Organizations", total, TOTAL_COLOR),
            ("Major Companies Found", major_found, MAJOR_COLOR),
        ],
    )?;

    root.present().map_err(chart_error)?;
    Ok(())
}

fn draw_bars<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    bars: &[Bar<'_>],
) -> Result<()> {
    let slots = bars.len().max(1) as f64;
    let top = bars.iter().map(|bar| bar.1).max().unwrap_or(0).max(1) as f64 * 1.1;

    let mut builder = ChartBuilder::on(area);
    builder.margin(20);
    #[cfg(feature = "chart-labels")]
    {
        builder
            .caption(title, ("sans-serif", 24))
            .x_label_area_size(20)
            .y_label_area_size(50);
    }
    #[cfg(not(feature = "chart-labels"))]
    let _ = title;

    let mut chart = builder
        .build_cartesian_2d(0f64..slots, 0f64..top)
        .map_err(chart_error)?;

    #[cfg(feature = "chart-labels")]
    {
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(0)
            .y_desc("Count")
            .draw()
            .map_err(chart_error)?;
        chart
            .draw_series(bars.iter().enumerate().map(|(i, (label, count, _))| {
                Text::new(
                    format!("{} ({})", label, count),
                    (i as f64 + 0.1, *count as f64 + top * 0.02),
                    ("sans-serif", 14),
                )
            }))
            .map_err(chart_error)?;
    }

    chart
        .draw_series(bars.iter().enumerate().map(|(i, (_, count, color))| {
            Rectangle::new(
                [(i as f64 + 0.15, 0.0), (i as f64 + 0.85, *count as f64)],
                color.filled(),
            )
        }))
        .map_err(chart_error)?;
    Ok(())
}

fn chart_error(err: impl std::fmt::Display) -> NpiRegistryError {
    NpiRegistryError::Chart {
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G'];

    #[test]
    fn test_writes_png() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("summary.png");
        let counts = vec![("Hospitals".to_string(), 12), ("Clinics".to_string(), 4)];

        write_summary_chart(&path, &counts, 16, 3).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(PNG_MAGIC));
    }

    #[test]
    fn test_empty_sweep_still_renders() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.png");

        write_summary_chart(&path, &[], 0, 0).unwrap();
        assert!(path.exists());
    }
}
