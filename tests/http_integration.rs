//! Integration tests for the HTTP boundary.
//!
//! Requests go through the real router with `tower::ServiceExt::oneshot`;
//! the assistant service is the scripted mock and documents are converted
//! with the real docx converter.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use base64::Engine;
use serde_json::{json, Value};
use tower::ServiceExt;

use clinical_synth::adapters::assistants::MockAssistantService;
use clinical_synth::adapters::document::{DocxConverter, PandocExportService};
use clinical_synth::adapters::http::{api_routes, AppState};
use clinical_synth::application::ProcessSubmissionHandler;
use clinical_synth::domain::export::ResultSerializer;
use clinical_synth::domain::foundation::UseCase;
use clinical_synth::domain::ingestion::DocumentIngestor;
use clinical_synth::domain::orchestration::{OrchestratorConfig, RunOrchestrator};
use clinical_synth::domain::registry::AssistantRegistry;
use clinical_synth::ports::ThreadMessage;

// =============================================================================
// Test Infrastructure
// =============================================================================

const PNG_1X1: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

fn app(service: MockAssistantService) -> Router {
    let service = Arc::new(service);
    let registry = Arc::new(
        AssistantRegistry::new(service.clone(), "dev")
            .with_assignment(UseCase::Discharge, "asst_discharge".parse().unwrap())
            .with_assignment(UseCase::Summary, "asst_summary".parse().unwrap()),
    );
    let orchestrator = Arc::new(RunOrchestrator::new(
        service,
        OrchestratorConfig::default()
            .with_poll_interval(Duration::from_millis(1))
            .with_joined_assistant("asst_summary".parse().unwrap()),
    ));
    let submission = Arc::new(ProcessSubmissionHandler::new(registry.clone(), orchestrator));
    let ingestor = Arc::new(DocumentIngestor::new(Arc::new(DocxConverter::new())));
    let renderer = PandocExportService::new().with_pandoc_path("/nonexistent/pandoc");
    let serializer = Arc::new(ResultSerializer::new(Arc::new(renderer)));

    api_routes(AppState::new(submission, registry, ingestor, serializer))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

async fn send_json(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_bytes(uri: &str, content_type: &str, bytes: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(bytes))
        .unwrap()
}

fn docx_with_table_and_image() -> Vec<u8> {
    let png = base64::engine::general_purpose::STANDARD
        .decode(PNG_1X1)
        .unwrap();
    let cell = |text: &str| {
        docx_rs::TableCell::new()
            .add_paragraph(docx_rs::Paragraph::new().add_run(docx_rs::Run::new().add_text(text)))
    };
    let docx = docx_rs::Docx::new()
        .add_paragraph(
            docx_rs::Paragraph::new()
                .add_run(docx_rs::Run::new().add_text("Discharge summary"))
                .style("Heading1"),
        )
        .add_table(docx_rs::Table::new(vec![
            docx_rs::TableRow::new(vec![cell("Medication"), cell("Dose")]),
            docx_rs::TableRow::new(vec![cell("Paracetamol"), cell("1g QDS")]),
        ]))
        .add_paragraph(docx_rs::Paragraph::new().add_run(
            docx_rs::Run::new().add_image(docx_rs::Pic::new_with_dimensions(png, 1, 1)),
        ));

    let mut buffer = Cursor::new(Vec::new());
    docx.build().pack(&mut buffer).unwrap();
    buffer.into_inner()
}

// =============================================================================
// Catalogue endpoints
// =============================================================================

#[tokio::test]
async fn health_reports_ok() {
    let (status, body) = send_json(app(MockAssistantService::new()), get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn use_cases_list_the_catalogue() {
    let (status, body) = send_json(app(MockAssistantService::new()), get("/api/use-cases")).await;

    assert_eq!(status, StatusCode::OK);
    let use_cases = body["use_cases"].as_array().unwrap();
    assert_eq!(use_cases.len(), UseCase::all().len());
    assert!(use_cases
        .iter()
        .any(|u| u["id"] == "tuhi" && u["requires_template"] == true));
}

#[tokio::test]
async fn templates_are_filtered_and_first_is_default() {
    let service = MockAssistantService::new()
        .with_assistant("asst_prod", "Production summary")
        .with_assistant("asst_dev", "dev Clinic letter");

    let (status, body) = send_json(app(service), get("/api/templates")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["templates"], json!([{ "id": "asst_dev", "name": "dev Clinic letter" }]));
    assert_eq!(body["default_template_id"], "asst_dev");
}

// =============================================================================
// Processing
// =============================================================================

#[tokio::test]
async fn process_returns_result_text() {
    let service = MockAssistantService::new()
        .with_statuses(["queued", "in_progress", "completed"])
        .with_message(ThreadMessage::assistant_text("Code: 80146002"));

    let (status, body) = send_json(
        app(service.clone()),
        post_json("/api/process", json!({ "input": "Appendicectomy notes", "use_case": "discharge" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["result"], "Code: 80146002");
    assert_eq!(body["format"], "text");
    assert_eq!(body["assistant_id"], "asst_discharge");
    assert!(body.get("error_code").is_none());
    assert_eq!(service.poll_count(), 2);
}

#[tokio::test]
async fn summary_result_is_html() {
    let service = MockAssistantService::new()
        .with_message(ThreadMessage::assistant_text("**Diagnosis:** appendicitis"));

    let (_, body) = send_json(
        app(service),
        post_json("/api/process", json!({ "input": "notes", "use_case": "summary" })),
    )
    .await;

    assert_eq!(body["format"], "html");
    assert_eq!(body["result"], "<strong>Diagnosis:</strong> appendicitis");
}

#[tokio::test]
async fn template_use_case_uses_selected_assistant() {
    let service = MockAssistantService::new().with_message(ThreadMessage::assistant_text("Letter"));

    let (status, body) = send_json(
        app(service),
        post_json(
            "/api/process",
            json!({ "input": "notes", "use_case": "tuhi", "assistant_id": "asst_dev" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["assistant_id"], "asst_dev");
}

#[tokio::test]
async fn failed_run_is_reported_in_band() {
    let service = MockAssistantService::new().with_statuses(["queued", "expired"]);

    let (status, body) = send_json(
        app(service),
        post_json("/api/process", json!({ "input": "notes", "use_case": "discharge" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], false);
    assert_eq!(body["result"], "Run ended with status: expired");
    assert_eq!(body["error_code"], "RUN_ENDED_ABNORMALLY");
}

#[tokio::test]
async fn empty_input_is_rejected() {
    let service = MockAssistantService::new();

    let (status, body) = send_json(
        app(service.clone()),
        post_json("/api/process", json!({ "input": "  ", "use_case": "discharge" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "EMPTY_INPUT");
    assert_eq!(service.call_count(), 0);
}

#[tokio::test]
async fn template_use_case_without_selection_is_rejected() {
    let (status, body) = send_json(
        app(MockAssistantService::new()),
        post_json("/api/process", json!({ "input": "notes", "use_case": "tuhi", "assistant_id": "" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "UNRESOLVED_ASSISTANT");
}

#[tokio::test]
async fn unknown_use_case_is_rejected() {
    let (status, body) = send_json(
        app(MockAssistantService::new()),
        post_json("/api/process", json!({ "input": "notes", "use_case": "radiology" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

// =============================================================================
// Document ingestion
// =============================================================================

#[tokio::test]
async fn docx_upload_becomes_structured_html() {
    let (status, body) = send_json(
        app(MockAssistantService::new()),
        post_bytes(
            "/api/documents?filename=discharge.docx",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            docx_with_table_and_image(),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"]["kind"], "structured_html");
    let html = body["content"]["content"].as_str().unwrap();
    assert!(html.contains("<table class=\"table table-auto border-collapse border border-gray-300\">"));
    assert!(html.contains("<th class=\"border border-gray-300 px-2 py-1 bg-gray-100 font-semibold\">"));
    assert!(html.contains(
        "<td class=\"border border-gray-300 px-2 py-1\"><p class=\"mb-2\">Paracetamol</p></td>"
    ));
    assert!(html.contains("src=\"data:image/png;base64,"));
    assert!(body["degraded"].is_null());
}

#[tokio::test]
async fn corrupted_docx_yields_placeholder() {
    let (status, body) = send_json(
        app(MockAssistantService::new()),
        post_bytes(
            "/api/documents?filename=broken.docx",
            "application/octet-stream",
            b"PK\x03\x04 truncated".to_vec(),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"]["kind"], "plain_text");
    assert!(body["content"]["content"]
        .as_str()
        .unwrap()
        .contains("Could not extract content from broken.docx"));
    assert!(body["degraded"]["reason"].is_string());
}

#[tokio::test]
async fn text_upload_is_decoded() {
    let (_, body) = send_json(
        app(MockAssistantService::new()),
        post_bytes(
            "/api/documents?filename=notes.txt",
            "text/plain",
            "BP 120/80".as_bytes().to_vec(),
        ),
    )
    .await;

    assert_eq!(body["content"], json!({ "kind": "plain_text", "content": "BP 120/80" }));
}

#[tokio::test]
async fn docx_raw_text_mode_returns_paragraph_text() {
    let (_, body) = send_json(
        app(MockAssistantService::new()),
        post_bytes(
            "/api/documents?filename=discharge.docx&mode=raw_text",
            "application/octet-stream",
            docx_with_table_and_image(),
        ),
    )
    .await;

    assert_eq!(body["content"]["kind"], "plain_text");
    assert!(body["content"]["content"]
        .as_str()
        .unwrap()
        .starts_with("Discharge summary"));
}

// =============================================================================
// Export
// =============================================================================

#[tokio::test]
async fn text_export_is_downloadable() {
    let text = "Plan:\n\n**Rest** & fluids";
    let response = app(MockAssistantService::new())
        .oneshot(post_json("/api/export/txt", json!({ "text": text })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/plain;charset=utf-8"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"result.txt\""
    );
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(std::str::from_utf8(&body).unwrap(), text);
}

#[tokio::test]
async fn docx_export_is_a_word_package() {
    let (status, body) = send(
        app(MockAssistantService::new()),
        post_json("/api/export/docx", json!({ "text": "Follow up in clinic" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..2], b"PK");
}

#[tokio::test]
async fn pdf_export_without_pandoc_is_unavailable() {
    let (status, body) = send_json(
        app(MockAssistantService::new()),
        post_json("/api/export/pdf", json!({ "text": "x" })),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "EXPORT_UNAVAILABLE");
    assert_eq!(body["details"]["format"], "pdf");
}

#[tokio::test]
async fn unknown_export_format_is_rejected() {
    let (status, _) = send_json(
        app(MockAssistantService::new()),
        post_json("/api/export/html", json!({ "text": "x" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
