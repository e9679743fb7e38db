//! Control Panel Widget
//! Left side panel with the data source, site selector and payload range.

use crate::dashboard::{DashboardState, LoadedDashboard};
use crate::data::{FilterState, SiteSelection};
use egui::{Color32, ComboBox, RichText};

/// Slider step in kg.
const PAYLOAD_STEP: f64 = 100.0;

/// Left side control panel with source and filter controls.
pub struct ControlPanel {
    pub source: String,
    pub status: String,
}

impl ControlPanel {
    pub fn new(source: String) -> Self {
        Self {
            source,
            status: "Ready".to_string(),
        }
    }

    /// Draw the control panel
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        state: &DashboardState,
        is_loading: bool,
    ) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🚀 Launch Analytics")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.label(RichText::new(&self.source).size(11.0).color(Color32::GRAY));
                ui.add_space(4.0);
                ui.add_enabled_ui(!is_loading, |ui| {
                    if ui.button("🔄 Refresh data").clicked() {
                        action = ControlPanelAction::Refresh;
                    }
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Filters =====
        if let DashboardState::Ready(loaded) = state {
            if let Some(filter) = Self::show_filters(ui, loaded) {
                action = ControlPanelAction::FilterChanged(filter);
            }
            ui.add_space(15.0);
            ui.separator();
            ui.add_space(10.0);
        }

        // ===== Status =====
        ui.label(RichText::new("📊 Status").size(14.0).strong());
        ui.add_space(5.0);
        if is_loading {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(RichText::new(&self.status).size(11.0));
            });
        } else {
            let status_color = if self.status.contains("Error") {
                Color32::from_rgb(220, 53, 69)
            } else {
                Color32::GRAY
            };
            ui.label(RichText::new(&self.status).size(11.0).color(status_color));
        }

        action
    }

    /// Site selector and payload sliders. Returns the new filter when the user changed it.
    fn show_filters(ui: &mut egui::Ui, loaded: &LoadedDashboard) -> Option<FilterState> {
        let mut filter = loaded.filter.clone();
        let range = loaded.range;

        ui.label(RichText::new("🔧 Filters").size(14.0).strong());
        ui.add_space(8.0);

        ui.label("Select Launch Site:");
        ComboBox::from_id_salt("launch_site")
            .width(ui.available_width() - 10.0)
            .selected_text(filter.site.to_string())
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut filter.site, SiteSelection::All, "ALL");
                for site in &loaded.sites {
                    ui.selectable_value(&mut filter.site, SiteSelection::Site(site.clone()), site);
                }
            });

        ui.add_space(10.0);
        ui.label("Select Payload Range (kg):");

        let (mut low, mut high) = filter.payload;
        ui.add(
            egui::Slider::new(&mut low, range.min..=range.max)
                .step_by(PAYLOAD_STEP)
                .text("min"),
        );
        ui.add(
            egui::Slider::new(&mut high, range.min..=range.max)
                .step_by(PAYLOAD_STEP)
                .text("max"),
        );
        // Keep low <= high whichever handle moved.
        if low != filter.payload.0 {
            high = high.max(low);
        } else if high != filter.payload.1 {
            low = low.min(high);
        }
        filter.payload = (low, high);

        if let Some(reason) = range.fallback {
            ui.add_space(5.0);
            ui.label(
                RichText::new(format!("⚠ Default payload range in use: {reason}"))
                    .size(11.0)
                    .color(Color32::from_rgb(243, 156, 18)),
            );
        }

        (filter != loaded.filter).then_some(filter)
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    Refresh,
    FilterChanged(FilterState),
}
