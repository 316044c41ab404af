// Typed user gestures, backend completions and the requests they trigger
use crate::domain::chart::{ChartArea, Metric};
use crate::domain::error::DashboardError;
use crate::domain::map::LatLng;
use crate::domain::route::{ComparisonData, NewRoute, RouteData, RouteId, RouteSummary};

#[derive(Debug, Clone)]
pub enum Action {
    LoadRoutes,
    /// Click on a route card outside its checkbox
    ClickRouteCard(RouteId),
    ToggleRoute(RouteId),
    EnterCompare,
    GenerateComparison,
    CancelCompare,
    /// Raw text of the threshold input
    SetThreshold(String),
    DeleteRoute(RouteId),
    CreateRoute(NewRoute),
    PointerMove { chart: Metric, x: f64, y: f64 },
    PointerLeave { chart: Metric },
    ChartClick { chart: Metric, x: f64, y: f64 },
    ResizeChart { chart: Metric, area: ChartArea },
    DismissAlert,
    Completed(Completion),
}

/// Result of a backend request, tagged so stale results can be recognised.
#[derive(Debug, Clone)]
pub enum Completion {
    RoutesListed {
        generation: u64,
        result: Result<Vec<RouteSummary>, DashboardError>,
    },
    RouteFetched {
        generation: u64,
        result: Result<RouteData, DashboardError>,
    },
    ComparisonFetched {
        generation: u64,
        result: Result<ComparisonData, DashboardError>,
    },
    RouteDeleted {
        id: RouteId,
        result: Result<(), DashboardError>,
    },
    RouteCreated {
        result: Result<(), DashboardError>,
    },
    AddressResolved {
        marker: u64,
        result: Result<Option<String>, DashboardError>,
    },
}

impl Completion {
    /// Completions of requests that hold the loading indicator.
    pub fn blocks_ui(&self) -> bool {
        !matches!(
            self,
            Completion::RoutesListed { .. } | Completion::AddressResolved { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    ListRoutes {
        generation: u64,
    },
    FetchRoute {
        generation: u64,
        id: RouteId,
        threshold: f64,
    },
    FetchComparison {
        generation: u64,
        ids: Vec<RouteId>,
        threshold: f64,
    },
    DeleteRoute {
        id: RouteId,
    },
    CreateRoute {
        route: NewRoute,
    },
    ReverseGeocode {
        marker: u64,
        at: LatLng,
    },
}

impl Request {
    pub fn blocks_ui(&self) -> bool {
        !matches!(
            self,
            Request::ListRoutes { .. } | Request::ReverseGeocode { .. }
        )
    }
}
