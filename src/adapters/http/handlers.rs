//! HTTP handlers.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tokio_util::sync::CancellationToken;

use crate::application::{ProcessSubmissionCommand, ProcessSubmissionHandler, SubmissionError};
use crate::domain::export::{ResultSerializer, SerializationError};
use crate::domain::foundation::{AssistantId, UseCase};
use crate::domain::ingestion::{DocumentIngestor, UploadedDocument};
use crate::domain::registry::AssistantRegistry;
use crate::ports::ExportFormat;

use super::dto::{
    DocumentQuery, ErrorResponse, ExportRequest, HealthResponse, IngestMode, ProcessRequest,
    ProcessResponse, TemplateListResponse, UseCaseListResponse, UseCaseResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct AppState {
    submission: Arc<ProcessSubmissionHandler>,
    registry: Arc<AssistantRegistry>,
    ingestor: Arc<DocumentIngestor>,
    serializer: Arc<ResultSerializer>,
    /// Cancelled on server shutdown; every run gets a child token.
    shutdown: CancellationToken,
}

impl AppState {
    pub fn new(
        submission: Arc<ProcessSubmissionHandler>,
        registry: Arc<AssistantRegistry>,
        ingestor: Arc<DocumentIngestor>,
        serializer: Arc<ResultSerializer>,
    ) -> Self {
        Self {
            submission,
            registry,
            ingestor,
            serializer,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Errors
// ════════════════════════════════════════════════════════════════════════════

/// An error response with its status code.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, body: ErrorResponse) -> Self {
        Self { status, body }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ErrorResponse::bad_request(message))
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::internal(message),
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<SubmissionError> for ApiError {
    fn from(err: SubmissionError) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            ErrorResponse::new(err.code(), err.to_string()),
        )
    }
}

impl From<SerializationError> for ApiError {
    fn from(err: SerializationError) -> Self {
        let status = match err {
            SerializationError::RendererUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            SerializationError::SerializationFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorResponse::new(err.code(), err.to_string())
            .with_details(serde_json::json!({ "format": err.format() }));
        Self::new(status, body)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: chrono::Utc::now(),
    })
}

/// GET /api/use-cases
pub async fn list_use_cases() -> Json<UseCaseListResponse> {
    Json(UseCaseListResponse {
        use_cases: UseCase::all()
            .iter()
            .copied()
            .map(UseCaseResponse::from)
            .collect(),
    })
}

/// GET /api/templates - never fails, an unreachable service yields `[]`
pub async fn list_templates(State(state): State<AppState>) -> Json<TemplateListResponse> {
    let templates = state.registry.list_template_assistants().await;
    Json(TemplateListResponse::from(templates))
}

/// POST /api/process
pub async fn process_submission(
    State(state): State<AppState>,
    Json(req): Json<ProcessRequest>,
) -> Result<Json<ProcessResponse>, ApiError> {
    let use_case = req
        .use_case
        .parse::<UseCase>()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let assistant_id = match req.assistant_id.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(
            raw.parse::<AssistantId>()
                .map_err(|e| ApiError::bad_request(e.to_string()))?,
        ),
    };

    // Dropping this future (client gone) cancels the run, as does shutdown.
    let cancel = state.shutdown.child_token();
    let _disconnect = cancel.clone().drop_guard();

    let cmd = ProcessSubmissionCommand {
        input: req.input,
        use_case,
        assistant_id,
    };
    let result = state.submission.handle(cmd, &cancel).await?;

    Ok(Json(ProcessResponse {
        ok: result.is_ok(),
        result: result.display.content,
        format: result.display.format,
        assistant_id: result.assistant_id.to_string(),
        error_code: result.error.map(|e| e.code().to_string()),
    }))
}

/// POST /api/documents?filename=<name>[&mode=raw_text]
pub async fn ingest_document(
    State(state): State<AppState>,
    Query(query): Query<DocumentQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let mut document = UploadedDocument::new(query.filename, body.to_vec());
    if let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    {
        document = document.with_content_type(content_type);
    }

    tracing::info!(
        filename = %document.filename,
        size = document.bytes.len(),
        content_type = ?document.content_type,
        "Ingesting uploaded document"
    );

    let ingestor = state.ingestor.clone();
    let outcome = tokio::task::spawn_blocking(move || match query.mode {
        IngestMode::Html => ingestor.ingest_with_report(&document),
        IngestMode::RawText => ingestor.ingest_raw_text(&document),
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Ingestion task failed");
        ApiError::internal("Document ingestion failed")
    })?;

    Ok((StatusCode::OK, Json(outcome)).into_response())
}

/// POST /api/export/:format
pub async fn export_result(
    State(state): State<AppState>,
    Path(format): Path<String>,
    Json(req): Json<ExportRequest>,
) -> Result<Response, ApiError> {
    let format = format
        .parse::<ExportFormat>()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let document = state.serializer.serialize(&req.text, format).await?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, document.content_type.clone()),
            (header::CONTENT_DISPOSITION, document.content_disposition()),
        ],
        document.content,
    )
        .into_response())
}
