use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use clinical_synth::adapters::{
    app_router, AppState, AzureAssistantsClient, AzureAssistantsConfig, DocxConverter,
    PandocExportService,
};
use clinical_synth::application::ProcessSubmissionHandler;
use clinical_synth::config::{AppConfig, RegistryConfig, ServerConfig};
use clinical_synth::domain::export::ResultSerializer;
use clinical_synth::domain::foundation::{AssistantId, UseCase, ValidationError};
use clinical_synth::domain::ingestion::DocumentIngestor;
use clinical_synth::domain::orchestration::{OrchestratorConfig, RunOrchestrator};
use clinical_synth::domain::registry::AssistantRegistry;
use clinical_synth::ports::{AssistantService, DocumentExportService};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Configuration and logging
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    // 2. Adapters
    let service: Arc<dyn AssistantService> = Arc::new(AzureAssistantsClient::new(
        AzureAssistantsConfig::from_settings(&config.assistant_service),
    ));
    let renderer = Arc::new(PandocExportService::from_config(&config.export));
    if !renderer.is_available().await {
        tracing::warn!(
            pandoc = config.export.pandoc_binary(),
            "Pandoc not found; PDF export will be unavailable"
        );
    }

    // 3. Domain services
    let assignments = assignments(&config.registry)?;
    let mut registry = AssistantRegistry::new(service.clone(), config.registry.template_prefix.clone());
    for (use_case, assistant_id) in assignments {
        registry = registry.with_assignment(use_case, assistant_id);
    }

    let mut orchestrator_config = OrchestratorConfig::default()
        .with_poll_interval(config.orchestration.poll_interval())
        .with_max_wait(config.run_deadline());
    if let Some(summary) = registry.assignment(UseCase::Summary) {
        orchestrator_config = orchestrator_config.with_joined_assistant(summary.clone());
    }

    let registry = Arc::new(registry);
    let orchestrator = Arc::new(RunOrchestrator::new(service, orchestrator_config));
    let submission = Arc::new(ProcessSubmissionHandler::new(registry.clone(), orchestrator));
    let ingestor = Arc::new(DocumentIngestor::new(Arc::new(DocxConverter::new())));
    let serializer = Arc::new(ResultSerializer::new(renderer));

    // 4. Serve until Ctrl-C, cancelling in-flight runs on the way out
    let shutdown = CancellationToken::new();
    let state = AppState::new(submission, registry, ingestor, serializer).with_shutdown(shutdown.clone());
    let app = app_router(state, &config.server);

    let listener = TcpListener::bind(config.server.socket_addr()).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        environment = ?config.server.environment,
        "Clinical synth server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&server.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if server.is_production() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn assignments(registry: &RegistryConfig) -> Result<Vec<(UseCase, AssistantId)>, ValidationError> {
    [
        (UseCase::Discharge, &registry.discharge),
        (UseCase::Summary, &registry.summary),
        (UseCase::Review, &registry.review),
        (UseCase::CommunicationReview, &registry.communication_review),
    ]
    .into_iter()
    .filter_map(|(use_case, id)| id.as_ref().map(|id| (use_case, id)))
    .map(|(use_case, id)| AssistantId::new(id.as_str()).map(|id| (use_case, id)))
    .collect()
}

async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested, cancelling in-flight runs");
    shutdown.cancel();
}
