// HTTP client for the ensaio backend
use crate::application::dashboard_api::DashboardApi;
use crate::domain::error::DashboardError;
use crate::domain::map::LatLng;
use crate::domain::route::{ComparisonData, NewRoute, RouteData, RouteId, RouteSummary};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct HttpDashboardApi {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    address: Option<String>,
}

impl HttpDashboardApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, DashboardError> {
        let response = request
            .header("Accept", "application/json")
            .send()
            .await?;
        let status = response.status();

        let body: Value = match response.json().await {
            Ok(body) => body,
            Err(err) if status.is_success() => return Err(err.into()),
            Err(_) => return Err(DashboardError::Transport(format!("HTTP {}", status))),
        };
        if !status.is_success() && error_message(&body).is_none() {
            return Err(DashboardError::Transport(format!("HTTP {}", status)));
        }
        decode(body)
    }
}

fn error_message(body: &Value) -> Option<String> {
    let error = body.get("error").filter(|e| !e.is_null())?;
    Some(
        error
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string()),
    )
}

/// `{error: ...}` payloads become server errors whatever the HTTP status was.
fn decode<T: DeserializeOwned>(body: Value) -> Result<T, DashboardError> {
    if let Some(message) = error_message(&body) {
        return Err(DashboardError::Server(message));
    }
    serde_json::from_value(body)
        .map_err(|e| DashboardError::Transport(format!("Resposta inválida do servidor: {}", e)))
}

#[async_trait]
impl DashboardApi for HttpDashboardApi {
    async fn list_routes(&self) -> Result<Vec<RouteSummary>, DashboardError> {
        self.execute(self.client.get(self.url("/routes"))).await
    }

    async fn get_route(&self, id: RouteId, threshold: f64) -> Result<RouteData, DashboardError> {
        let url = self.url(&format!("/route/{}?threshold={}", id, threshold));
        tracing::debug!("Fetching route {}", url);
        self.execute(self.client.get(url)).await
    }

    async fn compare(
        &self,
        ids: &[RouteId],
        threshold: f64,
    ) -> Result<ComparisonData, DashboardError> {
        let ids: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
        let url = self.url(&format!(
            "/compare?ids={}&threshold={}",
            urlencoding::encode(&ids.join(",")),
            threshold
        ));
        tracing::debug!("Fetching comparison {}", url);
        self.execute(self.client.get(url)).await
    }

    async fn reverse_geocode(&self, at: LatLng) -> Result<Option<String>, DashboardError> {
        let url = self.url(&format!("/reverse_geocode?lat={}&lon={}", at.lat, at.lon));
        let response: GeocodeResponse = self.execute(self.client.get(url)).await?;
        Ok(response.address)
    }

    async fn create_route(&self, route: NewRoute) -> Result<(), DashboardError> {
        let file = Part::bytes(route.file).file_name(route.file_name);
        let form = Form::new()
            .text("name", route.name)
            .text("supplier", route.supplier)
            .text("product", route.product)
            .text("route_info", route.route_info)
            .part("file", file);

        let _: Value = self
            .execute(self.client.post(self.url("/route")).multipart(form))
            .await?;
        Ok(())
    }

    async fn delete_route(&self, id: RouteId) -> Result<(), DashboardError> {
        let _: Value = self
            .execute(self.client.delete(self.url(&format!("/route/{}", id))))
            .await?;
        Ok(())
    }
}
