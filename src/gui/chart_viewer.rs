//! Chart Viewer Widget
//! Central scrollable panel: the two chart cards, dataset summary and preview.

use crate::charts::ChartPlotter;
use crate::dashboard::{DashboardState, LoadedDashboard, NO_DATA_MESSAGE};
use egui::{Color32, RichText, ScrollArea};

const CHART_SPACING: f32 = 15.0;

/// Which chart a save request is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Pie,
    Scatter,
}

impl ChartKind {
    pub fn file_name(&self) -> &'static str {
        match self {
            ChartKind::Pie => "launch_success_rate.png",
            ChartKind::Scatter => "payload_vs_outcome.png",
        }
    }
}

/// Scrollable chart display area.
#[derive(Default)]
pub struct ChartViewer;

impl ChartViewer {
    pub fn new() -> Self {
        Self
    }

    /// Draw the current state. Returns a chart the user asked to save, if any.
    pub fn show(&mut self, ui: &mut egui::Ui, state: &DashboardState) -> Option<ChartKind> {
        ui.heading(RichText::new("🚀 SpaceX Launch Analytics Dashboard").size(24.0));
        ui.add_space(10.0);

        match state {
            DashboardState::Loading => {
                ui.centered_and_justified(|ui| {
                    ui.spinner();
                });
                None
            }
            DashboardState::Empty { load_error } => {
                if let Some(error) = load_error {
                    Self::error_banner(ui, error);
                }
                Self::error_banner(ui, NO_DATA_MESSAGE);
                None
            }
            DashboardState::Ready(loaded) => {
                let mut save = None;
                ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        save = Self::show_loaded(ui, loaded);
                    });
                save
            }
        }
    }

    fn show_loaded(ui: &mut egui::Ui, loaded: &LoadedDashboard) -> Option<ChartKind> {
        let mut save = None;

        Self::chart_card(ui, "📊 Launch Success Rate", ChartKind::Pie, &mut save, |ui| {
            match &loaded.views.pie {
                Ok(spec) => ChartPlotter::draw_pie_chart(ui, spec),
                Err(e) => ChartPlotter::draw_chart_error(ui, "pie chart", &e.to_string()),
            }
        });
        ui.add_space(CHART_SPACING);

        Self::chart_card(
            ui,
            "📈 Payload vs. Launch Outcome",
            ChartKind::Scatter,
            &mut save,
            |ui| match &loaded.views.scatter {
                Ok(spec) => ChartPlotter::draw_scatter_chart(ui, spec),
                Err(e) => ChartPlotter::draw_chart_error(ui, "scatter plot", &e.to_string()),
            },
        );
        ui.add_space(CHART_SPACING);

        egui::CollapsingHeader::new("ℹ️ Dataset Summary").show(ui, |ui| {
            let summary = &loaded.summary;
            ui.label(format!("Total launches: {}", summary.total_launches));
            ui.label(format!("Payload range: {}", summary.payload_range_text()));
            ui.label(format!("Success rate: {}", summary.success_rate_text()));
        });

        egui::CollapsingHeader::new("🔍 Data Preview").show(ui, |ui| {
            Self::preview_table(ui, &loaded.preview.0, &loaded.preview.1);
        });

        save
    }

    /// Bordered card with a heading, a save button and the chart body.
    fn chart_card(
        ui: &mut egui::Ui,
        heading: &str,
        kind: ChartKind,
        save: &mut Option<ChartKind>,
        body: impl FnOnce(&mut egui::Ui),
    ) {
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.0, ui.visuals().widgets.noninteractive.bg_stroke.color))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(heading).size(18.0).strong());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button("💾 Save PNG").clicked() {
                            *save = Some(kind);
                        }
                    });
                });
                ui.add_space(8.0);
                body(ui);
            });
    }

    fn preview_table(ui: &mut egui::Ui, headers: &[String], rows: &[Vec<String>]) {
        ScrollArea::horizontal().show(ui, |ui| {
            egui::Grid::new("data_preview")
                .striped(true)
                .spacing([12.0, 4.0])
                .show(ui, |ui| {
                    for header in headers {
                        ui.label(RichText::new(header).strong().size(11.0));
                    }
                    ui.end_row();
                    for row in rows {
                        for cell in row {
                            ui.label(RichText::new(cell).size(11.0));
                        }
                        ui.end_row();
                    }
                });
        });
    }

    fn error_banner(ui: &mut egui::Ui, message: &str) {
        egui::Frame::none()
            .rounding(5.0)
            .fill(Color32::from_rgb(255, 235, 238))
            .inner_margin(10.0)
            .show(ui, |ui| {
                ui.label(RichText::new(message).color(Color32::from_rgb(156, 0, 6)));
            });
        ui.add_space(8.0);
    }
}
