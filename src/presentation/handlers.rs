// HTTP request handlers
use crate::application::action::Action;
use crate::domain::chart::{ChartArea, Metric};
use crate::domain::route::{NewRoute, RouteId};
use crate::infrastructure::chunked_json::stream_from_watch;
use crate::infrastructure::http_response::{json_error, pdf_response};
use crate::infrastructure::pdf_report::render_pdf;
use crate::presentation::app_state::AppState;
use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartError},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;

/// JSON form of a user gesture, e.g. `{"type": "click_route_card", "id": 3}`
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Gesture {
    LoadRoutes,
    ClickRouteCard { id: RouteId },
    ToggleRoute { id: RouteId },
    EnterCompare,
    GenerateComparison,
    CancelCompare,
    SetThreshold { value: ThresholdInput },
    DeleteRoute { id: RouteId },
    PointerMove { chart: Metric, x: f64, y: f64 },
    PointerLeave { chart: Metric },
    ChartClick { chart: Metric, x: f64, y: f64 },
    ResizeChart { chart: Metric, area: ChartArea },
    DismissAlert,
}

/// The threshold field arrives as typed by the user or already parsed
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ThresholdInput {
    Number(f64),
    Text(String),
}

impl From<ThresholdInput> for String {
    fn from(input: ThresholdInput) -> Self {
        match input {
            ThresholdInput::Number(value) => value.to_string(),
            ThresholdInput::Text(text) => text,
        }
    }
}

impl From<Gesture> for Action {
    fn from(gesture: Gesture) -> Self {
        match gesture {
            Gesture::LoadRoutes => Action::LoadRoutes,
            Gesture::ClickRouteCard { id } => Action::ClickRouteCard(id),
            Gesture::ToggleRoute { id } => Action::ToggleRoute(id),
            Gesture::EnterCompare => Action::EnterCompare,
            Gesture::GenerateComparison => Action::GenerateComparison,
            Gesture::CancelCompare => Action::CancelCompare,
            Gesture::SetThreshold { value } => Action::SetThreshold(value.into()),
            Gesture::DeleteRoute { id } => Action::DeleteRoute(id),
            Gesture::PointerMove { chart, x, y } => Action::PointerMove { chart, x, y },
            Gesture::PointerLeave { chart } => Action::PointerLeave { chart },
            Gesture::ChartClick { chart, x, y } => Action::ChartClick { chart, x, y },
            Gesture::ResizeChart { chart, area } => Action::ResizeChart { chart, area },
            Gesture::DismissAlert => Action::DismissAlert,
        }
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Current dashboard snapshot
pub async fn get_view(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.dashboard.current())
}

/// Apply one gesture and return the resulting snapshot
pub async fn post_action(
    State(state): State<Arc<AppState>>,
    Json(gesture): Json<Gesture>,
) -> Response {
    tracing::debug!("Gesture {:?}", gesture);
    dispatch(&state, gesture.into()).await
}

/// Multipart upload of a new ensaio
pub async fn upload_route(State(state): State<Arc<AppState>>, mut multipart: Multipart) -> Response {
    match read_new_route(&mut multipart).await {
        Ok(route) => dispatch(&state, Action::CreateRoute(route)).await,
        Err(e) => {
            tracing::warn!("Malformed upload: {}", e);
            json_error(StatusCode::BAD_REQUEST, e.body_text())
        }
    }
}

/// Snapshot stream, one JSON document per line
pub async fn stream_view(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    stream_from_watch(state.dashboard.subscribe())
}

/// PDF report of the route or comparison on screen
pub async fn export_report(State(state): State<Arc<AppState>>) -> Response {
    let content = match state.dashboard.report().await {
        Ok(Ok(content)) => content,
        Ok(Err(err)) => {
            let status = if err.is_validation() {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            return json_error(status, err.to_string());
        }
        Err(e) => {
            tracing::error!("Report request failed: {}", e);
            return json_error(StatusCode::SERVICE_UNAVAILABLE, e.to_string());
        }
    };

    let bytes = match render_pdf(&content) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!("Error rendering report: {:#}", e);
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, "Erro ao gerar o relatório.");
        }
    };
    match pdf_response(bytes, &content.file_name()) {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

async fn dispatch(state: &AppState, action: Action) -> Response {
    match state.dashboard.dispatch(action).await {
        Ok(snapshot) => Json(snapshot).into_response(),
        Err(e) => {
            tracing::error!("Error dispatching action: {}", e);
            json_error(StatusCode::SERVICE_UNAVAILABLE, e.to_string())
        }
    }
}

async fn read_new_route(multipart: &mut Multipart) -> Result<NewRoute, MultipartError> {
    let mut route = NewRoute::default();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                route.file_name = field.file_name().unwrap_or_default().to_string();
                route.file = field.bytes().await?.to_vec();
            }
            "name" => route.name = field.text().await?,
            "supplier" => route.supplier = field.text().await?,
            "product" => route.product = field.text().await?,
            "route_info" => route.route_info = field.text().await?,
            other => tracing::debug!("Ignoring upload field {}", other),
        }
    }
    Ok(route)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(json: &str) -> Action {
        serde_json::from_str::<Gesture>(json).unwrap().into()
    }

    #[test]
    fn test_gesture_conversion() {
        assert!(matches!(
            action(r#"{"type": "click_route_card", "id": 3}"#),
            Action::ClickRouteCard(3)
        ));
        assert!(matches!(
            action(r#"{"type": "enter_compare"}"#),
            Action::EnterCompare
        ));
        assert!(matches!(
            action(r#"{"type": "pointer_move", "chart": "vibration", "x": 120.5, "y": 40}"#),
            Action::PointerMove { chart: Metric::Vibration, x, .. } if x == 120.5
        ));
        assert!(matches!(
            action(r#"{"type": "resize_chart", "chart": "humidity",
                       "area": {"left": 10, "right": 300, "top": 5, "bottom": 200}}"#),
            Action::ResizeChart { chart: Metric::Humidity, area } if area.right == 300.0
        ));
    }

    #[test]
    fn test_threshold_accepts_number_or_text() {
        assert!(matches!(
            action(r#"{"type": "set_threshold", "value": 12.5}"#),
            Action::SetThreshold(ref v) if v == "12.5"
        ));
        assert!(matches!(
            action(r#"{"type": "set_threshold", "value": "abc"}"#),
            Action::SetThreshold(ref v) if v == "abc"
        ));
    }

    #[test]
    fn test_unknown_gesture_is_rejected() {
        assert!(serde_json::from_str::<Gesture>(r#"{"type": "fly"}"#).is_err());
        assert!(serde_json::from_str::<Gesture>(r#"{"type": "toggle_route"}"#).is_err());
    }
}
