use outdial::application::{ConfigResolver, OutboundCallOrchestrator};
use outdial::config::Config;
use outdial::domain::call::CallEngine;
use outdial::domain::call::EventSink;
use outdial::infrastructure::actions::default_registry;
use outdial::infrastructure::engine::LoopbackCallEngine;
use outdial::infrastructure::events::LoggingEventSink;
use outdial::infrastructure::prompts::PromptLibrary;
use outdial::interface::api::{build_router, init_metrics, AppState};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();

    // Load configuration
    let config = Config::from_env()?;

    // Error reporting; the guard flushes pending events on drop
    let sentry_guard = config.telemetry.client_options().map(sentry::init);

    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_guard.as_ref().map(|_| sentry_tracing::layer()))
        .init();

    info!("Starting Outdial");

    if let Err(e) = dotenv {
        info!("No .env file loaded: {}", e);
    }

    info!("Configuration loaded: {:?}", config);

    if config.telemetry.enabled {
        match &config.telemetry.dsn {
            Some(_) => info!(
                environment = config.telemetry.environment.as_deref(),
                "Sentry error reporting enabled"
            ),
            None => warn!("USE_SENTRY is set without SENTRY_DSN, errors will not be reported"),
        }
    }

    // Actions and event sink are built once and shared read-only
    let actions = Arc::new(default_registry()?);
    info!("Registered {} action(s)", actions.len());

    let events: Arc<dyn EventSink> = Arc::new(LoggingEventSink::new());

    let prompts = PromptLibrary::new(config.prompts.dir.clone());
    let resolver = Arc::new(ConfigResolver::new(
        prompts,
        config.synthesizer_config(),
        config.transcriber_config(),
        actions.action_configs(),
    ));

    // Fail fast on a broken inbound template; outbound is checked per request
    resolver.resolve_inbound()?;
    info!("Inbound call config ready at {}/inbound_call", config.server.base_url);

    let engine: Arc<dyn CallEngine> = Arc::new(LoopbackCallEngine::default());

    let orchestrator = Arc::new(OutboundCallOrchestrator::new(
        resolver,
        engine,
        actions,
        events,
        config.telephony_config(),
    ));

    let prometheus_handle = if config.metrics.enabled {
        info!("Initializing Prometheus metrics exporter");
        Some(init_metrics()?)
    } else {
        None
    };

    let app = build_router(AppState { orchestrator }, prometheus_handle);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    info!("REST API server listening on {}", config.bind_address());

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for shutdown signal: {}", e);
            }
            info!("Shutting down...");
        })
        .await?;

    Ok(())
}
