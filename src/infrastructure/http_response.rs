// HTTP response utilities for PDF downloads and error payloads
use axum::{
    Json,
    body::Body,
    http::{HeaderValue, Response, StatusCode, header},
    response::IntoResponse,
};
use serde_json::json;

/// PDF attachment named `file_name`
pub fn pdf_response(bytes: Vec<u8>, file_name: &str) -> Result<Response<Body>, StatusCode> {
    let disposition = HeaderValue::from_str(&content_disposition(file_name)).map_err(|e| {
        tracing::error!("Invalid report file name {:?}: {}", file_name, e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/pdf")
        .header(header::CONTENT_DISPOSITION, disposition)
        .header(header::CONTENT_LENGTH, bytes.len())
        .body(Body::from(bytes))
        .map_err(|e| {
            tracing::error!("Response build error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

/// ASCII fallback plus the RFC 5987 form for names with accents
fn content_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_graphic() && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        urlencoding::encode(file_name)
    )
}

/// `{"error": message}` with the given status
pub fn json_error(status: StatusCode, message: impl Into<String>) -> Response<Body> {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_response_headers() {
        let response = pdf_response(b"%PDF-1.3".to_vec(), "relatorio_Rota_São_Paulo.pdf").unwrap();
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(response.headers()[header::CONTENT_LENGTH], "8");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"relatorio_Rota_S_o_Paulo.pdf\"; filename*=UTF-8''relatorio_Rota_S%C3%A3o_Paulo.pdf"
        );
    }

    #[tokio::test]
    async fn test_json_error_body() {
        let response = json_error(StatusCode::BAD_REQUEST, "Selecione um ensaio");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], "{\"error\":\"Selecione um ensaio\"}".as_bytes());
    }
}
