// Dashboard snapshot published to the browser after every action
use super::chart::{Dataset, GuideLine, Metric, TooltipRow};
use super::kpi::KpiTable;
use super::map::{LatLng, Polyline, Viewport};
use super::route::{Label, RouteDetails, RouteId};
use super::view::{Alert, ViewMode};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewSnapshot {
    pub title: String,
    pub view: ViewMode,
    pub loading: bool,
    pub threshold: f64,
    pub panels: Panels,
    pub compare_button: CompareButton,
    pub routes: Vec<RouteCard>,
    pub charts: Vec<ChartView>,
    pub map: MapView,
    pub kpis: KpiView,
    pub details: Option<DetailsView>,
    pub comparison: Option<KpiTable>,
    pub alert: Option<Alert>,
    pub upload_feedback: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Panels {
    pub welcome_screen: bool,
    pub analysis_content: bool,
    pub kpi_panel: bool,
    pub comparison_table: bool,
    pub route_details: bool,
    pub cancel_compare_button: bool,
    pub compare_checkboxes: bool,
}

/// The compare button either enters compare mode or generates the comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompareButton {
    pub label: &'static str,
    pub gesture: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteCard {
    pub id: RouteId,
    pub name: String,
    pub product: String,
    pub created_on: Option<String>,
    pub active: bool,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartView {
    pub metric: Metric,
    pub title: &'static str,
    pub labels: Vec<Label>,
    pub datasets: Vec<Dataset>,
    pub guide_line: Option<GuideLine>,
    pub tooltip: Option<TooltipView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipView {
    pub index: usize,
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub rows: Vec<TooltipRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub viewport: Viewport,
    pub polylines: Vec<Polyline>,
    pub marker: Option<MarkerView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerView {
    pub position: LatLng,
    pub popup: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiView {
    pub distance: String,
    pub impacts: String,
    pub max_vibration: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailsView {
    pub supplier: String,
    pub product: String,
    pub route_info: String,
}

impl From<&RouteDetails> for DetailsView {
    fn from(details: &RouteDetails) -> Self {
        let text = |field: &Option<String>| field.clone().unwrap_or_else(|| "N/A".to_string());
        Self {
            supplier: text(&details.supplier),
            product: text(&details.product),
            route_info: text(&details.route_info),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_details_show_placeholder() {
        let details = RouteDetails {
            supplier: Some("ACME".to_string()),
            product: None,
            route_info: None,
        };
        let view = DetailsView::from(&details);
        assert_eq!(view.supplier, "ACME");
        assert_eq!(view.product, "N/A");
        assert_eq!(view.route_info, "N/A");
    }
}
