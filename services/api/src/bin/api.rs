//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{AgentClient, AgentStudyAdapter, AgentTutorAdapter},
    config::Config,
    error::ApiError,
    web::{
        self,
        state::{AppState, SessionRegistry},
        ApiDoc,
    },
};
use axum::extract::DefaultBodyLimit;
use axum::http::{
    header::{ACCEPT, CONTENT_TYPE},
    HeaderValue, Method,
};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Configuration and Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded");

    // --- 2. Initialize Agent Adapters ---
    // One shared client; the two adapters differ only in which agent they
    // address. Credentials stay on this side of the HTTP boundary.
    let agent_client = AgentClient::new(&config.agent_endpoint, &config.agent_api_key);
    let study_adapter = Arc::new(AgentStudyAdapter::new(
        agent_client.clone(),
        config.study_agent_id.clone(),
    ));
    let tutor_adapter = Arc::new(AgentTutorAdapter::new(
        agent_client,
        config.tutor_agent_id.clone(),
    ));

    // --- 3. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        config: config.clone(),
        study_adapter,
        tutor_adapter,
        sessions: SessionRegistry::new(),
    });

    let cors_origin = config
        .cors_allowed_origin
        .parse::<HeaderValue>()
        .map_err(|e| {
            ApiError::Internal(format!(
                "Invalid CORS origin '{}': {}",
                config.cors_allowed_origin, e
            ))
        })?;
    let cors = CorsLayer::new()
        .allow_origin(cors_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, ACCEPT]);

    // --- 4. Create the Web Router ---
    let api_router = web::router(app_state)
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
        .layer(cors);

    // Swagger UI rides alongside the API routes.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 5. Start the Server ---
    info!("Serving the study API on {}", config.bind_address);
    info!("Swagger UI at http://{}/swagger-ui", config.bind_address);
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
