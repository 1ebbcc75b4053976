//! HTTP server for the enrollstat API.
//!
//! The thin contract with the upload page: raw tabular bytes in, result
//! tables (or a validation error) out. All analysis state lives inside
//! one request; nothing is kept between uploads.
//!
//! # API Endpoints
//!
//! | Method | Path           | Description                               |
//! |--------|----------------|-------------------------------------------|
//! | GET    | `/health`      | Health check                              |
//! | POST   | `/api/analyze` | Upload CSV, receive tables + metrics JSON |
//! | POST   | `/api/report`  | Upload CSV, receive the 4-sheet xlsx      |
//! | GET    | `/api/logs`    | SSE stream for real-time analysis logs    |

use axum::{
    extract::{Multipart, State},
    http::{header, Method, StatusCode},
    response::{sse::Event, IntoResponse, Json, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::{convert::Infallible, net::SocketAddr, sync::Arc, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;

use super::logs::LOG_BROADCASTER;
use super::types::{error_response, schema_error_response, AnalyzeResponse};
use crate::analysis::analyze_bytes;
use crate::error::PipelineError;
use crate::export::{write_report, REPORT_FILE_NAME, REPORT_MIME_TYPE};
use crate::models::ReportConfig;

/// Start the HTTP server with the given analysis policy.
pub async fn start_server(
    port: u16,
    config: ReportConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE, header::CONTENT_DISPOSITION]);

    let app = Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/analyze", post(analyze_csv))
        .route("/api/report", post(download_report))
        .route("/api/logs", get(sse_logs))
        .layer(cors)
        .with_state(Arc::new(config));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    println!("enrollstat server running on http://localhost:{}", port);
    println!("   POST /api/analyze - Upload CSV, get analysis JSON");
    println!("   POST /api/report  - Upload CSV, get xlsx report");
    println!("   GET  /api/logs    - SSE log stream");
    println!("   GET  /health      - Health check");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "enrollstat",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "analyze": "POST /api/analyze",
            "report": "POST /api/report",
            "logs": "GET /api/logs (SSE)"
        }
    }))
}

/// SSE endpoint for real-time log streaming.
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(entry) => {
            let json = serde_json::to_string(&entry).ok()?;
            Some(Ok(Event::default().data(json)))
        }
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Upload CSV, respond with the analysis tables and metrics as JSON.
async fn analyze_csv(
    State(config): State<Arc<ReportConfig>>,
    multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, (StatusCode, Json<Value>)> {
    let (bytes, file_name) = read_upload(multipart).await?;

    println!(
        "New upload: {} ({} bytes)",
        file_name.as_deref().unwrap_or("unknown"),
        bytes.len()
    );

    let result = analyze_bytes(&bytes, &config).map_err(map_pipeline_error)?;
    Ok(Json(AnalyzeResponse::from(result)))
}

/// Upload CSV, respond with the 4-sheet xlsx artifact.
async fn download_report(
    State(config): State<Arc<ReportConfig>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    let (bytes, _) = read_upload(multipart).await?;

    let result = analyze_bytes(&bytes, &config).map_err(map_pipeline_error)?;
    let report = write_report(&result, &config).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(error_response(&e.to_string())),
        )
    })?;

    let headers = [
        (header::CONTENT_TYPE, REPORT_MIME_TYPE.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", REPORT_FILE_NAME),
        ),
    ];
    Ok((headers, report))
}

/// Pull the `file` field out of the multipart body.
async fn read_upload(
    mut multipart: Multipart,
) -> Result<(Vec<u8>, Option<String>), (StatusCode, Json<Value>)> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(error_response(&format!("Multipart error: {}", e))),
        )
    })? {
        let name = field.name().unwrap_or("").to_string();

        if name == "file" {
            file_name = field.file_name().map(|s| s.to_string());
            file_data = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| {
                        (
                            StatusCode::BAD_REQUEST,
                            Json(error_response(&format!("Read error: {}", e))),
                        )
                    })?
                    .to_vec(),
            );
        }
    }

    let bytes = file_data.ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            Json(error_response("No file provided")),
        )
    })?;

    Ok((bytes, file_name))
}

/// Schema failures report the exact missing columns with 422; everything
/// else collapses to the generic all-or-nothing error (plus the
/// column-name hint) — no partial results either way.
fn map_pipeline_error(e: PipelineError) -> (StatusCode, Json<Value>) {
    match e {
        PipelineError::Schema(ref schema) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(schema_error_response(&schema.missing)),
        ),
        PipelineError::Csv(_) | PipelineError::EmptyInput => {
            (StatusCode::BAD_REQUEST, Json(error_response(&e.to_string())))
        }
        other => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(error_response(&other.to_string())),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CsvError, SchemaError};

    #[test]
    fn test_schema_error_maps_to_422_with_columns() {
        let err = PipelineError::Schema(SchemaError::new(vec!["학기".into()]));
        let (status, Json(body)) = map_pipeline_error(err);
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["missingColumns"][0], "학기");
    }

    #[test]
    fn test_csv_error_maps_to_400() {
        let (status, _) = map_pipeline_error(PipelineError::Csv(CsvError::EmptyFile));
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_empty_input_maps_to_400() {
        let (status, _) = map_pipeline_error(PipelineError::EmptyInput);
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
