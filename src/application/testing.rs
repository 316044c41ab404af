// In-memory backend used by service tests
use crate::application::dashboard_api::DashboardApi;
use crate::domain::error::DashboardError;
use crate::domain::kpi::Kpis;
use crate::domain::map::LatLng;
use crate::domain::route::{
    ComparisonData, ComparisonDataset, Label, NewRoute, RouteData, RouteId, RouteSeries,
    RouteSummary,
};
use async_trait::async_trait;
use std::sync::Mutex;

#[derive(Default)]
pub struct StubApi {
    routes: Mutex<Vec<RouteSummary>>,
    calls: Mutex<Vec<String>>,
}

impl StubApi {
    pub fn with_routes(names: &[&str]) -> Self {
        let routes = names
            .iter()
            .enumerate()
            .map(|(index, name)| RouteSummary {
                id: index as RouteId + 1,
                name: name.to_string(),
                product: Some("Leite".to_string()),
                created_at: Some("2024-05-01 12:00:00".to_string()),
            })
            .collect();
        Self {
            routes: Mutex::new(routes),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn exists(&self, id: RouteId) -> bool {
        self.routes.lock().unwrap().iter().any(|r| r.id == id)
    }
}

fn samples(offset: f64) -> Vec<f64> {
    (0..4).map(|i| offset + i as f64).collect()
}

fn coordinates(offset: f64) -> Vec<LatLng> {
    (0..4)
        .map(|i| LatLng::new(-23.5 + offset + i as f64 * 0.01, -46.6))
        .collect()
}

#[async_trait]
impl DashboardApi for StubApi {
    async fn list_routes(&self) -> Result<Vec<RouteSummary>, DashboardError> {
        Ok(self.routes.lock().unwrap().clone())
    }

    async fn get_route(&self, id: RouteId, threshold: f64) -> Result<RouteData, DashboardError> {
        self.record(format!("get_route {} {}", id, threshold));
        if !self.exists(id) {
            return Err(DashboardError::Server("Ensaio não encontrado".to_string()));
        }
        Ok(RouteData {
            labels: (0..4).map(Label::Index).collect(),
            datasets: RouteSeries {
                coordinates: coordinates(0.0),
                temperature: samples(20.0),
                vibration: samples(1.0),
                humidity: samples(50.0),
            },
            kpis: Kpis {
                distance: Some(3.3),
                impacts: Some(0),
                max_vibration: Some(4.0),
            },
            details: None,
        })
    }

    async fn compare(
        &self,
        ids: &[RouteId],
        threshold: f64,
    ) -> Result<ComparisonData, DashboardError> {
        self.record(format!("compare {:?} {}", ids, threshold));
        let routes = self.routes.lock().unwrap().clone();
        let selected: Vec<&RouteSummary> = routes.iter().filter(|r| ids.contains(&r.id)).collect();
        Ok(ComparisonData {
            labels: Some((0..4).map(Label::Index).collect()),
            all_coords: selected
                .iter()
                .map(|r| coordinates(r.id as f64))
                .collect(),
            datasets: selected
                .iter()
                .map(|r| ComparisonDataset {
                    name: r.name.clone(),
                    kpis: Kpis::default(),
                    temperature: samples(20.0),
                    vibration: samples(1.0),
                    humidity: samples(50.0),
                })
                .collect(),
        })
    }

    async fn reverse_geocode(&self, at: LatLng) -> Result<Option<String>, DashboardError> {
        self.record(format!("reverse_geocode {} {}", at.lat, at.lon));
        Ok(Some("Av. Paulista".to_string()))
    }

    async fn create_route(&self, route: NewRoute) -> Result<(), DashboardError> {
        self.record(format!("create_route {}", route.name));
        let mut routes = self.routes.lock().unwrap();
        if routes.iter().any(|r| r.name == route.name) {
            return Err(DashboardError::Server(
                "Já existe um ensaio com este nome.".to_string(),
            ));
        }
        let id = routes.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        routes.push(RouteSummary {
            id,
            name: route.name,
            product: Some(route.product),
            created_at: None,
        });
        Ok(())
    }

    async fn delete_route(&self, id: RouteId) -> Result<(), DashboardError> {
        self.record(format!("delete_route {}", id));
        self.routes.lock().unwrap().retain(|r| r.id != id);
        Ok(())
    }
}
