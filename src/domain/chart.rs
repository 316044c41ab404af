// Chart domain models: one line chart per sensor metric
use super::route::Label;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Temperature,
    Vibration,
    Humidity,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Temperature, Metric::Vibration, Metric::Humidity];

    pub fn title(self) -> &'static str {
        match self {
            Metric::Temperature => "Temperatura (°C)",
            Metric::Vibration => "Vibração (m/s²)",
            Metric::Humidity => "Umidade Relativa (%)",
        }
    }
}

/// Plotting area in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartArea {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl ChartArea {
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn contains_x(&self, x: f64) -> bool {
        x >= self.left && x <= self.right
    }
}

impl Default for ChartArea {
    fn default() -> Self {
        Self {
            left: 50.0,
            right: 750.0,
            top: 40.0,
            bottom: 360.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub label: String,
    pub color: String,
    pub data: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TooltipAnchor {
    pub index: usize,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GuideLine {
    pub x: f64,
    pub top: f64,
    pub bottom: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipRow {
    pub dataset: String,
    pub color: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartInstance {
    metric: Metric,
    area: ChartArea,
    labels: Vec<Label>,
    datasets: Vec<Dataset>,
    crosshair: Option<f64>,
    tooltip: Option<TooltipAnchor>,
}

impl ChartInstance {
    pub fn new(metric: Metric, area: ChartArea) -> Self {
        Self {
            metric,
            area,
            labels: Vec::new(),
            datasets: Vec::new(),
            crosshair: None,
            tooltip: None,
        }
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub fn area(&self) -> &ChartArea {
        &self.area
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn datasets(&self) -> &[Dataset] {
        &self.datasets
    }

    pub fn crosshair(&self) -> Option<f64> {
        self.crosshair
    }

    pub fn tooltip(&self) -> Option<&TooltipAnchor> {
        self.tooltip.as_ref()
    }

    pub fn set_area(&mut self, area: ChartArea) {
        self.area = area;
    }

    pub fn replace_data(&mut self, labels: Vec<Label>, datasets: Vec<Dataset>) {
        self.labels = labels;
        self.datasets = datasets;
        self.crosshair = None;
        self.tooltip = None;
    }

    pub fn clear(&mut self) {
        self.replace_data(Vec::new(), Vec::new());
    }

    /// Index hit-testing along the label axis: nearest label, no need to hit a plotted point.
    pub fn nearest_index(&self, x: f64) -> Option<usize> {
        let last = self.labels.len().checked_sub(1)?;
        let width = self.area.width();
        if last == 0 || width <= 0.0 {
            return Some(0);
        }
        let step = width / last as f64;
        let position = ((x - self.area.left) / step).round();
        Some(position.clamp(0.0, last as f64) as usize)
    }

    pub fn index_to_pixel(&self, index: usize) -> Option<f64> {
        let last = self.labels.len().checked_sub(1)?;
        if index > last {
            return None;
        }
        if last == 0 {
            return Some(self.area.left + self.area.width() / 2.0);
        }
        Some(self.area.left + self.area.width() * index as f64 / last as f64)
    }

    pub fn set_crosshair(&mut self, x: Option<f64>) {
        self.crosshair = x;
    }

    pub fn set_tooltip(&mut self, anchor: Option<TooltipAnchor>) {
        self.tooltip = anchor.filter(|a| a.index < self.labels.len());
    }

    /// Overlay drawn after the chart's own render pass; hidden outside the plotting area.
    pub fn guide_line(&self) -> Option<GuideLine> {
        let x = self.crosshair?;
        self.area.contains_x(x).then(|| GuideLine {
            x,
            top: self.area.top,
            bottom: self.area.bottom,
        })
    }

    pub fn tooltip_rows(&self) -> Vec<TooltipRow> {
        let Some(anchor) = self.tooltip else {
            return Vec::new();
        };
        self.datasets
            .iter()
            .filter_map(|dataset| {
                let value = *dataset.data.get(anchor.index)?;
                value.is_finite().then(|| TooltipRow {
                    dataset: dataset.label.clone(),
                    color: dataset.color.clone(),
                    value,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart_with_labels(count: i64) -> ChartInstance {
        let mut chart = ChartInstance::new(
            Metric::Temperature,
            ChartArea {
                left: 0.0,
                right: 100.0,
                top: 10.0,
                bottom: 90.0,
            },
        );
        let labels = (0..count).map(Label::Index).collect();
        let datasets = vec![Dataset {
            label: "A".to_string(),
            color: "#0f0b60".to_string(),
            data: (0..count).map(|v| v as f64 * 10.0).collect(),
        }];
        chart.replace_data(labels, datasets);
        chart
    }

    #[test]
    fn test_nearest_index_rounds_and_clamps() {
        let chart = chart_with_labels(5); // labels every 25px
        assert_eq!(chart.nearest_index(0.0), Some(0));
        assert_eq!(chart.nearest_index(12.0), Some(0));
        assert_eq!(chart.nearest_index(13.0), Some(1));
        assert_eq!(chart.nearest_index(60.0), Some(2));
        assert_eq!(chart.nearest_index(100.0), Some(4));
        assert_eq!(chart.nearest_index(400.0), Some(4));
        assert_eq!(chart.nearest_index(-30.0), Some(0));
    }

    #[test]
    fn test_nearest_index_degenerate_axes() {
        assert_eq!(chart_with_labels(0).nearest_index(50.0), None);
        assert_eq!(chart_with_labels(1).nearest_index(80.0), Some(0));
    }

    #[test]
    fn test_index_to_pixel() {
        let chart = chart_with_labels(5);
        assert_eq!(chart.index_to_pixel(0), Some(0.0));
        assert_eq!(chart.index_to_pixel(2), Some(50.0));
        assert_eq!(chart.index_to_pixel(4), Some(100.0));
        assert_eq!(chart.index_to_pixel(5), None);
        assert_eq!(chart_with_labels(1).index_to_pixel(0), Some(50.0));
    }

    #[test]
    fn test_guide_line_only_inside_area() {
        let mut chart = chart_with_labels(3);
        assert_eq!(chart.guide_line(), None);

        chart.set_crosshair(Some(40.0));
        assert_eq!(
            chart.guide_line(),
            Some(GuideLine {
                x: 40.0,
                top: 10.0,
                bottom: 90.0
            })
        );

        chart.set_crosshair(Some(140.0));
        assert_eq!(chart.guide_line(), None);
    }

    #[test]
    fn test_tooltip_rows_skip_short_datasets() {
        let mut chart = chart_with_labels(3);
        let mut datasets = chart.datasets().to_vec();
        datasets.push(Dataset {
            label: "B".to_string(),
            color: "#d90429".to_string(),
            data: vec![1.0],
        });
        chart.replace_data(chart.labels().to_vec(), datasets);

        chart.set_tooltip(Some(TooltipAnchor {
            index: 2,
            x: 100.0,
            y: 5.0,
        }));
        let rows = chart.tooltip_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].dataset, "A");
        assert_eq!(rows[0].value, 20.0);

        chart.set_tooltip(Some(TooltipAnchor {
            index: 9,
            x: 0.0,
            y: 0.0,
        }));
        assert!(chart.tooltip().is_none());
    }
}
