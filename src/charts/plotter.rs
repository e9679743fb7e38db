//! Chart Plotter Module
//! Creates interactive visualizations using egui_plot and the egui painter.

use crate::charts::{PieChartSpec, ScatterChartSpec};
use egui::epaint::Mesh;
use egui::{Align2, Color32, FontId, Pos2, RichText, Sense, Shape, Stroke, Vec2};
use egui_plot::{GridMark, Legend, Plot, PlotPoints, Points};
use std::f32::consts::TAU;

pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(52, 152, 219),  // Blue
    Color32::from_rgb(231, 76, 60),   // Red
    Color32::from_rgb(46, 204, 113),  // Green
    Color32::from_rgb(155, 89, 182),  // Purple
    Color32::from_rgb(243, 156, 18),  // Orange
    Color32::from_rgb(26, 188, 156),  // Teal
    Color32::from_rgb(233, 30, 99),   // Pink
    Color32::from_rgb(0, 188, 212),   // Cyan
    Color32::from_rgb(121, 85, 72),   // Brown
    Color32::from_rgb(96, 125, 139),  // Blue Grey
];

const CHART_HEIGHT: f32 = 360.0;
/// Segments per full turn when tessellating the donut.
const PIE_RESOLUTION: f32 = 180.0;

/// Draws the dashboard charts.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Color for the n-th slice or series.
    pub fn series_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Donut chart with percent + label inside each slice and a legend on the right.
    pub fn draw_pie_chart(ui: &mut egui::Ui, spec: &PieChartSpec) {
        ui.label(RichText::new(&spec.title).size(15.0).strong());

        let width = ui.available_width().max(200.0);
        let (response, painter) =
            ui.allocate_painter(Vec2::new(width, CHART_HEIGHT), Sense::hover());
        let rect = response.rect;

        let legend_width = 180.0_f32.min(width * 0.35);
        let pie_area = rect.with_max_x(rect.max.x - legend_width);
        let center = pie_area.center();
        let outer = pie_area.width().min(pie_area.height()) * 0.45;
        let inner = outer * spec.hole as f32;

        // Plotly starts at 12 o'clock and runs clockwise.
        let mut start = -TAU / 4.0;
        for (i, slice) in spec.slices.iter().enumerate() {
            let sweep = slice.fraction as f32 * TAU;
            if sweep <= 0.0 {
                continue;
            }
            let color = Self::series_color(i);
            painter.add(Shape::mesh(Self::ring_segment(
                center, inner, outer, start, sweep, color,
            )));

            let mid = start + sweep / 2.0;
            let label_radius = (inner + outer) / 2.0;
            let label_pos = center + Vec2::angled(mid) * label_radius;
            if slice.fraction >= 0.03 {
                painter.text(
                    label_pos,
                    Align2::CENTER_CENTER,
                    format!("{}\n{:.1}%", slice.label, slice.fraction * 100.0),
                    FontId::proportional(12.0),
                    Color32::WHITE,
                );
            }
            start += sweep;
        }

        // Legend
        let mut y = rect.min.y + 10.0;
        let x = rect.max.x - legend_width + 10.0;
        for (i, slice) in spec.slices.iter().enumerate() {
            let swatch = egui::Rect::from_min_size(Pos2::new(x, y), Vec2::splat(12.0));
            painter.rect_filled(swatch, 2.0, Self::series_color(i));
            painter.text(
                Pos2::new(x + 18.0, y + 6.0),
                Align2::LEFT_CENTER,
                &slice.label,
                FontId::proportional(12.0),
                ui.visuals().text_color(),
            );
            y += 20.0;
        }
    }

    /// Filled annulus segment from `start` spanning `sweep` radians.
    fn ring_segment(
        center: Pos2,
        inner: f32,
        outer: f32,
        start: f32,
        sweep: f32,
        color: Color32,
    ) -> Mesh {
        let steps = ((sweep / TAU) * PIE_RESOLUTION).ceil().max(1.0) as u32;
        let mut mesh = Mesh::default();

        for step in 0..=steps {
            let angle = start + sweep * step as f32 / steps as f32;
            let dir = Vec2::angled(angle);
            mesh.colored_vertex(center + dir * inner, color);
            mesh.colored_vertex(center + dir * outer, color);
        }
        for step in 0..steps {
            let i = step * 2;
            mesh.add_triangle(i, i + 1, i + 2);
            mesh.add_triangle(i + 1, i + 3, i + 2);
        }
        mesh
    }

    /// Payload vs outcome, one colored point series per booster version.
    pub fn draw_scatter_chart(ui: &mut egui::Ui, spec: &ScatterChartSpec) {
        ui.label(RichText::new(&spec.title).size(15.0).strong());

        let ticks = spec.y_ticks.clone();
        let tick_labels = spec.y_ticks.clone();

        Plot::new("payload_scatter")
            .height(CHART_HEIGHT)
            .legend(Legend::default())
            .x_axis_label(spec.x_label.clone())
            .y_axis_label(spec.y_label.clone())
            .allow_scroll(false)
            .include_y(-0.25)
            .include_y(1.25)
            .y_grid_spacer(move |_input| {
                ticks
                    .iter()
                    .map(|&(value, _)| GridMark {
                        value,
                        step_size: 1.0,
                    })
                    .collect()
            })
            .y_axis_formatter(move |mark, _range| {
                tick_labels
                    .iter()
                    .find(|(tick, _)| (tick - mark.value).abs() < 1e-6)
                    .map(|(_, label)| label.clone())
                    .unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                for (i, series) in spec.series.iter().enumerate() {
                    let points: PlotPoints = series.points.iter().copied().collect();
                    plot_ui.points(
                        Points::new(points)
                            .radius(4.0)
                            .color(Self::series_color(i))
                            .name(&series.booster_version),
                    );
                }
            });
    }

    /// Red boxed message shown in place of a chart that failed to build.
    pub fn draw_chart_error(ui: &mut egui::Ui, context: &str, message: &str) {
        egui::Frame::none()
            .rounding(5.0)
            .stroke(Stroke::new(1.0, Color32::from_rgb(220, 53, 69)))
            .inner_margin(10.0)
            .show(ui, |ui| {
                ui.label(
                    RichText::new(format!("Error generating {context}: {message}"))
                        .color(Color32::from_rgb(220, 53, 69)),
                );
            });
    }
}
