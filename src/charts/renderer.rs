//! Static Chart Renderer
//! Renders chart specs to PNG files with plotters, for the "Save PNG" buttons.
//!
//! Layout:
//! 1. Title centered at the top
//! 2. Pie: donut with label + percentage per slice
//! 3. Scatter: payload on x, Failure/Success ticks on y, legend per booster version

use crate::charts::plotter::PALETTE;
use crate::charts::{PieChartSpec, ScatterChartSpec};
use anyhow::{ensure, Result};
use plotters::element::Pie;
use plotters::prelude::*;
use std::path::Path;

const FONT: &str = "sans-serif";

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    fn palette_color(index: usize) -> RGBColor {
        let c = PALETTE[index % PALETTE.len()];
        RGBColor(c.r(), c.g(), c.b())
    }

    /// Render the pie chart spec as a PNG at `path`.
    pub fn render_pie_png(spec: &PieChartSpec, path: &Path, size: (u32, u32)) -> Result<()> {
        ensure!(!spec.slices.is_empty(), "pie chart has no slices");

        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE)?;
        let area = root.titled(&spec.title, (FONT, 28))?;

        let (w, h) = area.dim_in_pixel();
        let center = (w as i32 / 2, h as i32 / 2);
        let radius = f64::from(w.min(h)) * 0.38;

        let sizes: Vec<f64> = spec.slices.iter().map(|s| s.fraction).collect();
        let colors: Vec<RGBColor> = (0..spec.slices.len()).map(Self::palette_color).collect();
        let labels: Vec<&str> = spec.slices.iter().map(|s| s.label.as_str()).collect();

        let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
        pie.start_angle(-90.0);
        pie.donut_hole(radius * spec.hole);
        pie.label_style((FONT, 18).into_font().color(&BLACK));
        pie.percentages((FONT, radius * 0.08).into_font().color(&WHITE));
        area.draw(&pie)?;

        root.present()?;
        tracing::info!(path = %path.display(), "saved pie chart");
        Ok(())
    }

    /// Render the scatter chart spec as a PNG at `path`.
    pub fn render_scatter_png(
        spec: &ScatterChartSpec,
        path: &Path,
        size: (u32, u32),
    ) -> Result<()> {
        let (x_min, x_max) = spec
            .x_extent()
            .ok_or_else(|| anyhow::anyhow!("scatter chart has no points"))?;
        let pad = ((x_max - x_min) * 0.05).max(100.0);

        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&spec.title, (FONT, 28))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(90)
            .build_cartesian_2d((x_min - pad)..(x_max + pad), -0.25f64..1.25f64)?;

        let tick_label = |v: &f64| spec.y_tick_label(*v);
        chart
            .configure_mesh()
            .x_desc(spec.x_label.as_str())
            .y_desc(spec.y_label.as_str())
            .y_labels(7)
            .y_label_formatter(&tick_label)
            .draw()?;

        for (i, series) in spec.series.iter().enumerate() {
            let color = Self::palette_color(i);
            chart
                .draw_series(
                    series
                        .points
                        .iter()
                        .map(|p| Circle::new((p[0], p[1]), 5, color.filled())),
                )?
                .label(series.booster_version.as_str())
                .legend(move |(x, y)| Circle::new((x, y), 5, color.filled()));
        }

        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.85))
            .border_style(&BLACK)
            .position(SeriesLabelPosition::UpperRight)
            .draw()?;

        root.present()?;
        tracing::info!(path = %path.display(), points = spec.point_count(), "saved scatter chart");
        Ok(())
    }
}
