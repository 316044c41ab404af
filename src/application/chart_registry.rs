// Chart registry - one chart instance per metric, all sharing a label axis
use crate::domain::chart::{ChartArea, ChartInstance, Dataset, Metric};
use crate::domain::palette::Palette;
use crate::domain::route::Label;
use std::collections::BTreeMap;

/// Sensor readings of one displayed route.
#[derive(Debug, Clone, Copy)]
pub struct Trace<'a> {
    pub name: &'a str,
    pub temperature: &'a [f64],
    pub vibration: &'a [f64],
    pub humidity: &'a [f64],
}

impl Trace<'_> {
    fn values(&self, metric: Metric) -> &[f64] {
        match metric {
            Metric::Temperature => self.temperature,
            Metric::Vibration => self.vibration,
            Metric::Humidity => self.humidity,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChartRegistry {
    charts: BTreeMap<Metric, ChartInstance>,
    palette: Palette,
}

impl ChartRegistry {
    pub fn new(area: ChartArea, palette: Palette) -> Self {
        let charts = Metric::ALL
            .iter()
            .map(|metric| (*metric, ChartInstance::new(*metric, area)))
            .collect();
        Self { charts, palette }
    }

    pub fn get(&self, metric: Metric) -> Option<&ChartInstance> {
        self.charts.get(&metric)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChartInstance> {
        self.charts.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ChartInstance> {
        self.charts.values_mut()
    }

    /// Replaces every chart's datasets with one dataset per trace, coloured by position.
    pub fn show(&mut self, labels: &[Label], traces: &[Trace<'_>]) {
        for chart in self.charts.values_mut() {
            let datasets = traces
                .iter()
                .enumerate()
                .map(|(index, trace)| Dataset {
                    label: trace.name.to_string(),
                    color: self.palette.color(index).to_string(),
                    data: trace.values(chart.metric()).to_vec(),
                })
                .collect();
            chart.replace_data(labels.to_vec(), datasets);
        }
    }

    pub fn clear(&mut self) {
        for chart in self.charts.values_mut() {
            chart.clear();
        }
    }

    pub fn set_area(&mut self, metric: Metric, area: ChartArea) {
        if let Some(chart) = self.charts.get_mut(&metric) {
            chart.set_area(area);
        }
    }

    /// Pixel-based synchronisation is only exact when every plotting area matches.
    pub fn has_uniform_geometry(&self) -> bool {
        let mut areas = self.charts.values().map(|c| *c.area());
        match areas.next() {
            Some(first) => areas.all(|area| area == first),
            None => true,
        }
    }
}
