// HTTP routes
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    export_report, get_view, health_check, post_action, stream_view, upload_route,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

pub fn build_router(state: Arc<AppState>) -> Router {
    // The snapshot stream stays out of the compression layer so every line is flushed
    let compressed = Router::new()
        .route("/healthz", get(health_check))
        .route("/view", get(get_view))
        .route("/actions", post(post_action))
        .route(
            "/routes",
            post(upload_route).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/report.pdf", get(export_report))
        .layer(CompressionLayer::new());

    Router::new()
        .route("/view/stream", get(stream_view))
        .merge(compressed)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dashboard_service::DashboardService;
    use crate::application::testing::StubApi;
    use crate::infrastructure::config::DashboardSettings;
    use reqwest::StatusCode;
    use serde_json::{Value, json};

    async fn serve() -> String {
        let api = Arc::new(StubApi::with_routes(&["Rota A", "Rota B"]));
        let dashboard = DashboardService::spawn(api, &DashboardSettings::default());
        let router = build_router(Arc::new(AppState { dashboard }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    async fn post_gesture(base: &str, gesture: Value) -> reqwest::Response {
        reqwest::Client::new()
            .post(format!("{}/actions", base))
            .json(&gesture)
            .send()
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_and_view() {
        let base = serve().await;
        let body = reqwest::get(format!("{}/healthz", base))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(body, "ok");

        let view: Value = reqwest::get(format!("{}/view", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(view["title"], "Análise de Sensores");
        assert_eq!(view["threshold"], 8.0);
        assert_eq!(view["view"]["mode"], "single");
    }

    #[tokio::test]
    async fn test_gestures_return_snapshot() {
        let base = serve().await;

        let response = post_gesture(&base, json!({"type": "enter_compare"})).await;
        assert_eq!(response.status(), StatusCode::OK);
        let view: Value = response.json().await.unwrap();
        assert_eq!(view["title"], "Modo de Comparação: Selecione os Ensaios");
        assert_eq!(view["compare_button"]["gesture"], "generate_comparison");

        let view: Value = post_gesture(&base, json!({"type": "generate_comparison"}))
            .await
            .json()
            .await
            .unwrap();
        assert_eq!(view["alert"]["kind"], "validation");
        assert_eq!(
            view["alert"]["message"],
            "Selecione pelo menos dois ensaios para comparar."
        );

        let response = post_gesture(&base, json!({"type": "fly"})).await;
        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_report_without_content_is_rejected() {
        let base = serve().await;
        let response = reqwest::get(format!("{}/report.pdf", base)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = response.json().await.unwrap();
        assert_eq!(
            body["error"],
            "Selecione um ensaio ou uma comparação para gerar o relatório."
        );
    }

    #[tokio::test]
    async fn test_upload_with_missing_fields_gives_feedback() {
        let base = serve().await;
        let form = reqwest::multipart::Form::new().text("name", "Rota C");
        let view: Value = reqwest::Client::new()
            .post(format!("{}/routes", base))
            .multipart(form)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(
            view["upload_feedback"],
            "Todos os campos e o arquivo são obrigatórios"
        );
    }

    #[tokio::test]
    async fn test_stream_starts_with_current_snapshot() {
        let base = serve().await;
        let mut response = reqwest::get(format!("{}/view/stream", base)).await.unwrap();
        assert_eq!(
            response.headers()["content-type"],
            "application/x-ndjson"
        );

        let mut buffer = Vec::new();
        while !buffer.contains(&b'\n') {
            let chunk = response.chunk().await.unwrap().expect("stream ended early");
            buffer.extend_from_slice(&chunk);
        }
        let line = buffer.split(|b| *b == b'\n').next().unwrap();
        let view: Value = serde_json::from_slice(line).unwrap();
        assert_eq!(view["title"], "Análise de Sensores");
    }
}
