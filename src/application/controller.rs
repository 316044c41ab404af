// Dashboard controller - applies state machine commands to charts and map
use crate::application::action::{Action, Completion, Request};
use crate::application::chart_registry::{ChartRegistry, Trace};
use crate::application::crosshair::{CrosshairSynchronizer, SyncMode};
use crate::application::map_renderer::MapRenderer;
use crate::application::report::{COMPARISON_REPORT_NAME, ChartFigure, ReportContent};
use crate::application::view_state::{Command, ViewStateMachine};
use crate::domain::chart::Metric;
use crate::domain::dashboard::{
    ChartView, CompareButton, DetailsView, KpiView, MapView, MarkerView, Panels, RouteCard,
    TooltipView, ViewSnapshot,
};
use crate::domain::error::{DashboardError, ValidationError};
use crate::domain::kpi::{KpiTable, Kpis};
use crate::domain::map::LatLng;
use crate::domain::route::{ComparisonData, RouteData, RouteDetails, RouteId, RouteSummary};
use crate::domain::view::{
    Alert, COMPARE_RESULT_TITLE, COMPARE_SELECT_TITLE, ViewMode, WELCOME_TITLE,
};
use crate::infrastructure::config::DashboardSettings;
use chrono::NaiveDateTime;

/// What the analysis area currently shows.
#[derive(Debug, Clone)]
enum Content {
    Empty,
    Route {
        name: String,
        kpis: Kpis,
        details: Option<RouteDetails>,
    },
    Comparison {
        table: KpiTable,
    },
}

pub struct DashboardController {
    machine: ViewStateMachine,
    charts: ChartRegistry,
    map: MapRenderer,
    crosshair: CrosshairSynchronizer,
    routes: Vec<RouteSummary>,
    content: Content,
    alert: Option<Alert>,
    upload_feedback: Option<String>,
    in_flight: usize,
}

impl DashboardController {
    pub fn new(settings: &DashboardSettings) -> Self {
        Self {
            machine: ViewStateMachine::new(settings.default_threshold),
            charts: ChartRegistry::new(settings.chart_area, settings.palette.clone()),
            map: MapRenderer::new(settings.palette.clone(), settings.bounds_padding),
            crosshair: CrosshairSynchronizer::new(settings.crosshair_sync),
            routes: Vec::new(),
            content: Content::Empty,
            alert: None,
            upload_feedback: None,
            in_flight: 0,
        }
    }

    /// Consumes one action and returns the backend requests it needs.
    pub fn handle(&mut self, action: Action) -> Vec<Request> {
        if let Action::Completed(completion) = &action {
            if completion.blocks_ui() {
                self.in_flight = self.in_flight.saturating_sub(1);
            }
        }

        match action {
            Action::PointerMove { chart, x, y } => {
                self.crosshair.pointer_move(&mut self.charts, chart, x, y);
                Vec::new()
            }
            Action::PointerLeave { .. } => {
                self.crosshair.pointer_leave(&mut self.charts);
                Vec::new()
            }
            Action::ChartClick { chart, x, .. } => self.select_point(chart, x),
            Action::ResizeChart { chart, area } => {
                self.charts.set_area(chart, area);
                if self.crosshair.mode() == SyncMode::Pixel && !self.charts.has_uniform_geometry() {
                    tracing::warn!(
                        "Chart plotting areas differ; pixel crosshair sync will be approximate"
                    );
                }
                Vec::new()
            }
            Action::DismissAlert => {
                self.alert = None;
                Vec::new()
            }
            Action::Completed(Completion::AddressResolved { marker, result }) => {
                if !self.map.resolve_marker(marker, result) {
                    tracing::debug!("Discarding address for replaced marker {}", marker);
                }
                Vec::new()
            }
            action => {
                let commands = self.machine.dispatch(action);
                self.apply(commands)
            }
        }
    }

    fn select_point(&mut self, chart: Metric, x: f64) -> Vec<Request> {
        if !matches!(self.content, Content::Route { .. }) || self.machine.mode().is_comparing() {
            tracing::debug!("Ignoring chart click without a single route on screen");
            return Vec::new();
        }
        let Some(index) = self.crosshair.resolve_click(&self.charts, chart, x) else {
            return Vec::new();
        };
        match self.map.place_marker(0, index) {
            Some(ticket) => vec![Request::ReverseGeocode {
                marker: ticket.marker,
                at: ticket.position,
            }],
            None => Vec::new(),
        }
    }

    fn apply(&mut self, commands: Vec<Command>) -> Vec<Request> {
        let mut requests = Vec::new();
        for command in commands {
            match command {
                Command::ClearVisuals => {
                    self.charts.clear();
                    self.map.clear();
                    self.content = Content::Empty;
                }
                Command::RenderRoute { id, data } => self.render_route(id, data),
                Command::RenderComparison(data) => self.render_comparison(data),
                Command::ShowRoutes(routes) => self.routes = routes,
                Command::Issue(request) => {
                    if request.blocks_ui() {
                        self.in_flight += 1;
                    }
                    requests.push(request);
                }
                Command::Alert(alert) => self.alert = Some(alert),
                Command::UploadFeedback(feedback) => self.upload_feedback = feedback,
            }
        }
        requests
    }

    fn route_name(&self, id: RouteId) -> String {
        self.routes
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.name.clone())
            .unwrap_or_else(|| format!("Ensaio {}", id))
    }

    fn render_route(&mut self, id: RouteId, data: RouteData) {
        let name = self.route_name(id);
        let series = &data.datasets;
        self.charts.show(
            &data.labels,
            &[Trace {
                name: &name,
                temperature: &series.temperature,
                vibration: &series.vibration,
                humidity: &series.humidity,
            }],
        );
        self.map
            .draw_routes(&[(name.as_str(), series.coordinates.as_slice())]);
        self.content = Content::Route {
            name,
            kpis: data.kpis,
            details: data.details.filter(|d| !d.is_empty()),
        };
    }

    fn render_comparison(&mut self, data: ComparisonData) {
        let labels = data.labels.unwrap_or_default();
        let traces: Vec<Trace<'_>> = data
            .datasets
            .iter()
            .map(|d| Trace {
                name: &d.name,
                temperature: &d.temperature,
                vibration: &d.vibration,
                humidity: &d.humidity,
            })
            .collect();
        self.charts.show(&labels, &traces);

        let routes: Vec<(&str, &[LatLng])> = data
            .all_coords
            .iter()
            .enumerate()
            .map(|(index, coords)| {
                let name = data.datasets.get(index).map_or("", |d| d.name.as_str());
                (name, coords.as_slice())
            })
            .collect();
        self.map.draw_routes(&routes);

        self.content = Content::Comparison {
            table: KpiTable::for_comparison(&data.datasets),
        };
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        let mode = self.machine.mode();
        let has_data = !matches!(self.content, Content::Empty);

        let title = match (mode, &self.content) {
            (ViewMode::Single { route: None }, _) => WELCOME_TITLE.to_string(),
            (ViewMode::Single { .. }, Content::Route { name, .. }) => {
                format!("Análise do Ensaio: {}", name)
            }
            (ViewMode::Single { route: Some(id) }, _) => {
                format!("Análise do Ensaio: {}", self.route_name(*id))
            }
            (ViewMode::CompareSelect { .. }, _) => COMPARE_SELECT_TITLE.to_string(),
            (ViewMode::CompareResult { .. }, _) => COMPARE_RESULT_TITLE.to_string(),
        };

        let compare_button = if mode.is_comparing() {
            CompareButton {
                label: "Gerar Comparação",
                gesture: "generate_comparison",
            }
        } else {
            CompareButton {
                label: "Comparar Ensaios",
                gesture: "enter_compare",
            }
        };

        let (kpis, details, comparison) = match &self.content {
            Content::Route { kpis, details, .. } => {
                (kpis.clone(), details.as_ref().map(DetailsView::from), None)
            }
            Content::Comparison { table } => (Kpis::default(), None, Some(table.clone())),
            Content::Empty => (Kpis::default(), None, None),
        };

        ViewSnapshot {
            title,
            view: mode.clone(),
            loading: self.in_flight > 0,
            threshold: self.machine.threshold(),
            panels: Panels {
                welcome_screen: !has_data,
                analysis_content: has_data,
                kpi_panel: matches!(self.content, Content::Route { .. }),
                comparison_table: matches!(self.content, Content::Comparison { .. }),
                route_details: details.is_some(),
                cancel_compare_button: mode.is_comparing(),
                compare_checkboxes: mode.is_comparing(),
            },
            compare_button,
            routes: self.route_cards(mode),
            charts: self.chart_views(),
            map: self.map_view(),
            kpis: KpiView {
                distance: kpis.distance_text(),
                impacts: kpis.impacts_text(),
                max_vibration: kpis.max_vibration_text(),
            },
            details,
            comparison,
            alert: self.alert.clone(),
            upload_feedback: self.upload_feedback.clone(),
        }
    }

    fn route_cards(&self, mode: &ViewMode) -> Vec<RouteCard> {
        self.routes
            .iter()
            .map(|route| RouteCard {
                id: route.id,
                name: route.name.clone(),
                product: route.product.clone().unwrap_or_else(|| "N/A".to_string()),
                created_on: route
                    .created_on()
                    .map(|date| date.format("%d/%m/%Y").to_string()),
                active: mode.active_route() == Some(route.id),
                checked: mode.selected().is_some_and(|s| s.contains(&route.id)),
            })
            .collect()
    }

    fn chart_views(&self) -> Vec<ChartView> {
        self.charts
            .iter()
            .map(|chart| ChartView {
                metric: chart.metric(),
                title: chart.metric().title(),
                labels: chart.labels().to_vec(),
                datasets: chart.datasets().to_vec(),
                guide_line: chart.guide_line(),
                tooltip: chart.tooltip().map(|anchor| TooltipView {
                    index: anchor.index,
                    label: chart
                        .labels()
                        .get(anchor.index)
                        .map(|l| l.to_string())
                        .unwrap_or_default(),
                    x: anchor.x,
                    y: anchor.y,
                    rows: chart.tooltip_rows(),
                }),
            })
            .collect()
    }

    fn map_view(&self) -> MapView {
        MapView {
            viewport: self.map.viewport().clone(),
            polylines: self.map.polylines().to_vec(),
            marker: self.map.marker().map(|marker| MarkerView {
                position: marker.position,
                popup: marker.popup.content().to_string(),
            }),
        }
    }

    /// Content of the PDF for whatever is on screen.
    pub fn report(&self, generated_at: NaiveDateTime) -> Result<ReportContent, DashboardError> {
        let (name, kpi_table) = match &self.content {
            Content::Empty => return Err(ValidationError::NothingToExport.into()),
            Content::Route { name, kpis, .. } => {
                (name.clone(), KpiTable::new([(name.as_str(), kpis)]))
            }
            Content::Comparison { table } => (COMPARISON_REPORT_NAME.to_string(), table.clone()),
        };

        let charts = self
            .charts
            .iter()
            .map(|chart| ChartFigure {
                title: chart.metric().title(),
                sample_count: chart.labels().len(),
                datasets: chart.datasets().to_vec(),
            })
            .collect();

        Ok(ReportContent {
            name,
            generated_at,
            kpi_table,
            charts,
        })
    }
}
