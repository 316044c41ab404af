// Crosshair synchronizer - links pointer movement across every registered chart
use crate::application::chart_registry::ChartRegistry;
use crate::domain::chart::{Metric, TooltipAnchor};
use serde::Deserialize;

/// How a pointer position on one chart maps onto the others.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    /// Same pixel x on every chart; exact only for identical plotting areas
    #[default]
    Pixel,
    /// Resolved index converted to each chart's own pixel position
    Index,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CrosshairSynchronizer {
    mode: SyncMode,
}

impl CrosshairSynchronizer {
    pub fn new(mode: SyncMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> SyncMode {
        self.mode
    }

    /// Moves the guide line and tooltip of every chart to follow the pointer over `origin`.
    /// Returns the sample index resolved on the origin chart.
    pub fn pointer_move(
        &self,
        charts: &mut ChartRegistry,
        origin: Metric,
        x: f64,
        y: f64,
    ) -> Option<usize> {
        let Some(chart) = charts.get(origin) else {
            return None;
        };
        if !chart.area().contains_x(x) {
            self.pointer_leave(charts);
            return None;
        }
        let index = chart.nearest_index(x);

        for chart in charts.iter_mut() {
            let guide_x = match (self.mode, index) {
                (SyncMode::Index, Some(i)) => chart.index_to_pixel(i).unwrap_or(x),
                _ => x,
            };
            chart.set_crosshair(Some(guide_x));
            chart.set_tooltip(index.map(|index| TooltipAnchor {
                index,
                x: guide_x,
                y,
            }));
        }

        index
    }

    pub fn pointer_leave(&self, charts: &mut ChartRegistry) {
        for chart in charts.iter_mut() {
            chart.set_crosshair(None);
            chart.set_tooltip(None);
        }
    }

    /// Sample index under a click on `origin`, if the click lands in its plotting area.
    pub fn resolve_click(&self, charts: &ChartRegistry, origin: Metric, x: f64) -> Option<usize> {
        let chart = charts.get(origin)?;
        if !chart.area().contains_x(x) {
            return None;
        }
        chart.nearest_index(x)
    }
}
