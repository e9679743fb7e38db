//! Launch Dashboard Main Application
//! Main window with control panel and chart viewer.

use crate::charts::StaticChartRenderer;
use crate::config::DashboardConfig;
use crate::dashboard::DashboardState;
use crate::data::{load_dataset, DashboardContext, FilterState, LaunchDataset, LoadError};
use crate::gui::{ChartKind, ChartViewer, ControlPanel, ControlPanelAction};
use egui::SidePanel;
use std::path::Path;
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

const EXPIRY_POLL: Duration = Duration::from_secs(30);

/// CSV loading result from background thread
type LoadResult = Result<LaunchDataset, LoadError>;

/// Main application window.
pub struct DashboardApp {
    context: DashboardContext,
    state: DashboardState,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
    export_size: (u32, u32),

    // Async CSV loading
    load_rx: Option<Receiver<LoadResult>>,
}

impl DashboardApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        context: DashboardContext,
        config: &DashboardConfig,
    ) -> Self {
        let mut app = Self {
            control_panel: ControlPanel::new(context.describe_source()),
            context,
            state: DashboardState::Loading,
            chart_viewer: ChartViewer::new(),
            export_size: config.export_size(),
            load_rx: None,
        };
        app.start_load();
        app
    }

    fn is_loading(&self) -> bool {
        self.load_rx.is_some()
    }

    /// Fetch and clean the dataset on a background thread.
    fn start_load(&mut self) {
        if self.is_loading() {
            return;
        }

        if let Some(dataset) = self.context.cached(Instant::now()) {
            let previous = self.state.filter().cloned();
            self.state = DashboardState::from_load(Ok(dataset), previous.as_ref());
            return;
        }

        let source = self.context.source();
        tracing::info!(source = %source.describe(), "loading launch records");
        self.control_panel.set_status("Loading launch records...");

        let (tx, rx) = channel();
        self.load_rx = Some(rx);
        thread::spawn(move || {
            let _ = tx.send(load_dataset(source.as_ref()));
        });
    }

    /// Check for CSV loading results
    fn check_load_results(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };

        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => {
                self.load_rx = Some(rx);
                return;
            }
            Err(TryRecvError::Disconnected) => {
                tracing::error!("loader thread exited without a result");
                self.control_panel.set_status("Error: loader thread stopped");
                if matches!(self.state, DashboardState::Loading) {
                    self.state = DashboardState::Empty {
                        load_error: Some("Error loading data: loader thread stopped".to_string()),
                    };
                }
                return;
            }
        };

        let accepted = self.context.accept(result, Instant::now());
        match &accepted {
            Ok(dataset) => self
                .control_panel
                .set_status(&format!("Loaded {} launches", dataset.get_row_count())),
            Err(e) => self.control_panel.set_status(&format!("Error: {e}")),
        }

        let previous = self.state.filter().cloned();
        self.state = DashboardState::from_load(accepted, previous.as_ref());
    }

    /// Reload once the cached dataset outlives its TTL. The current view stays
    /// on screen until the new data arrives.
    fn check_cache_expiry(&mut self) {
        if matches!(self.state, DashboardState::Ready(_))
            && !self.is_loading()
            && self.context.is_stale(Instant::now())
        {
            tracing::info!("cached launch records expired");
            self.start_load();
        }
    }

    fn handle_refresh(&mut self) {
        self.context.invalidate();
        self.start_load();
    }

    fn handle_filter_changed(&mut self, filter: FilterState) {
        if let DashboardState::Ready(loaded) = &mut self.state {
            loaded.set_filter(filter);
        }
    }

    /// Save one chart as PNG - ask for a location, render with plotters, open it.
    fn handle_save_chart(&mut self, kind: ChartKind) {
        let DashboardState::Ready(loaded) = &self.state else {
            return;
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name(kind.file_name())
            .save_file()
        else {
            return; // User cancelled
        };

        let result = match kind {
            ChartKind::Pie => match &loaded.views.pie {
                Ok(spec) => StaticChartRenderer::render_pie_png(spec, &path, self.export_size),
                Err(e) => Err(anyhow::anyhow!("{e}")),
            },
            ChartKind::Scatter => match &loaded.views.scatter {
                Ok(spec) => StaticChartRenderer::render_scatter_png(spec, &path, self.export_size),
                Err(e) => Err(anyhow::anyhow!("{e}")),
            },
        };

        match result {
            Ok(()) => {
                self.control_panel
                    .set_status(&format!("Saved {}", Self::display_name(&path)));
                if let Err(e) = open::that(&path) {
                    tracing::warn!(error = %e, "could not open exported chart");
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "chart export failed");
                self.control_panel.set_status(&format!("Error: {e}"));
            }
        }
    }

    fn display_name(path: &Path) -> String {
        path.file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string())
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_load_results();
        self.check_cache_expiry();

        // Request repaint while loading; otherwise wake up now and then for cache expiry
        if self.is_loading() {
            ctx.request_repaint();
        } else {
            ctx.request_repaint_after(EXPIRY_POLL);
        }

        // Left panel - Control Panel
        let is_loading = self.is_loading();
        let action = SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .show(ui, |ui| self.control_panel.show(ui, &self.state, is_loading))
                    .inner
            })
            .inner;

        match action {
            ControlPanelAction::Refresh => self.handle_refresh(),
            ControlPanelAction::FilterChanged(filter) => self.handle_filter_changed(filter),
            ControlPanelAction::None => {}
        }

        // Central panel - Chart Viewer
        let save = egui::CentralPanel::default()
            .show(ctx, |ui| self.chart_viewer.show(ui, &self.state))
            .inner;

        if let Some(kind) = save {
            self.handle_save_chart(kind);
        }
    }
}
