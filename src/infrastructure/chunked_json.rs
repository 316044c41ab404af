// Chunked NDJSON streaming utilities
use axum::body::Body;
use axum::http::{Response, StatusCode, header};
use axum::response::IntoResponse;
use bytes::{BufMut, Bytes, BytesMut};
use futures::StreamExt;
use futures::stream::Stream;
use serde::Serialize;
use tokio::sync::watch;

/// Create a chunked response with one JSON document per line
pub fn chunked_json_stream<S, T>(stream: S) -> Result<Response<Body>, StatusCode>
where
    S: Stream<Item = T> + Send + 'static,
    T: Serialize + 'static,
{
    let byte_stream = stream.map(|item| serialize_chunk(&item));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/x-ndjson")
        .header(header::CACHE_CONTROL, "no-cache")
        .body(Body::from_stream(byte_stream))
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

fn serialize_chunk<T: Serialize>(item: &T) -> Result<Bytes, std::io::Error> {
    let mut writer = BytesMut::new().writer();
    serde_json::to_writer(&mut writer, item)?;
    let mut chunk = writer.into_inner();
    chunk.put_u8(b'\n');
    Ok(chunk.freeze())
}

/// Streams the current value, then every change until the sender goes away
pub fn stream_from_watch<T>(mut rx: watch::Receiver<T>) -> impl IntoResponse
where
    T: Clone + Serialize + Send + Sync + 'static,
{
    let stream = async_stream::stream! {
        let current = rx.borrow_and_update().clone();
        yield current;
        while rx.changed().await.is_ok() {
            let next = rx.borrow_and_update().clone();
            yield next;
        }
    };

    match chunked_json_stream(stream) {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}
