// Backend API trait for ensaio data access
use crate::domain::error::DashboardError;
use crate::domain::map::LatLng;
use crate::domain::route::{ComparisonData, NewRoute, RouteData, RouteId, RouteSummary};
use async_trait::async_trait;

#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// List every stored ensaio
    async fn list_routes(&self) -> Result<Vec<RouteSummary>, DashboardError>;

    /// Series, KPIs and details of one ensaio, impacts counted above `threshold`
    async fn get_route(&self, id: RouteId, threshold: f64) -> Result<RouteData, DashboardError>;

    /// Aligned series of several ensaios
    async fn compare(
        &self,
        ids: &[RouteId],
        threshold: f64,
    ) -> Result<ComparisonData, DashboardError>;

    /// Street address at a position; `None` when the geocoder has nothing
    async fn reverse_geocode(&self, at: LatLng) -> Result<Option<String>, DashboardError>;

    async fn create_route(&self, route: NewRoute) -> Result<(), DashboardError>;

    async fn delete_route(&self, id: RouteId) -> Result<(), DashboardError>;
}
