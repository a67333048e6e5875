use axum::body::{to_bytes, Body};
use axum::http::{header, Request};
use axum::middleware::Next;
use axum::response::Response;

use crate::shared::format::{format_elapsed, format_number};

/// Логирование HTTP запросов в консоль: время, длительность, размер, статус, метод, путь
///
/// Размер берётся из Content-Length; без него тело ответа буферизуется.
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;
    let (parts, body) = response.into_parts();

    let declared_size = parts
        .headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());

    let (size, body) = match declared_size {
        Some(size) => (Some(size), body),
        None => match to_bytes(body, usize::MAX).await {
            Ok(bytes) => (Some(bytes.len()), Body::from(bytes)),
            Err(e) => {
                tracing::warn!("Failed to buffer response body of {}: {}", path, e);
                (None, Body::default())
            }
        },
    };

    let status = parts.status.as_u16();
    let elapsed = format_elapsed(start.elapsed().as_millis() as u64);
    let size = size.map(format_number).unwrap_or_else(|| "error".into());

    // голубой для 2xx, жёлтый для остальных
    let color_code = if parts.status.is_success() { "36" } else { "33" };
    println!(
        "\x1b[{}m{}\x1b[0m | {:>8} | {:>12} | {} {:>6} {}",
        color_code,
        chrono::Local::now().format("%H:%M:%S"),
        elapsed,
        size,
        status,
        method,
        path
    );

    if parts.status.is_server_error() {
        tracing::error!("{} {} -> {}", method, path, status);
    }

    Response::from_parts(parts, body)
}
