//! Charts module - chart specs, interactive drawing and PNG export

mod builder;
mod plotter;
mod renderer;

pub use builder::{ChartError, ChartSpecBuilder, PieChartSpec, ScatterChartSpec};
pub use plotter::ChartPlotter;
pub use renderer::StaticChartRenderer;
