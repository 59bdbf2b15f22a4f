//! finflow Web Server
//!
//! Axum-based REST API over the finflow core.
//!
//! The server is a thin wrapper: handlers parse requests, call the core, and
//! serialize the result. Security features:
//! - Restrictive CORS policy (explicit origins, `*` only when asked for)
//! - Input validation (pagination limits, upload size limits)
//! - Sanitized error responses

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::{error, info, warn};

use finflow_core::{
    AnalyticsService, AnomalyDetector, Categorizer, Config, Database, Forecaster,
    PlainTextExtractor, TextExtractor,
};

mod handlers;

/// Maximum upload size across all files in one request (10 MB)
pub const MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024;

/// Maximum pagination limit
pub const MAX_PAGE_LIMIT: i64 = 10_000;

/// Server configuration
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only, "*" = any origin)
    pub allowed_origins: Vec<String>,
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub config: ServerConfig,
    /// Assigns categories at insert time
    pub categorizer: Categorizer,
    pub forecaster: Forecaster,
    pub detector: AnomalyDetector,
    /// Currency recorded on parsed upload rows
    pub default_currency: String,
    /// Turns uploaded documents into text before parsing
    pub extractor: Box<dyn TextExtractor>,
}

impl AppState {
    /// Build state from loaded settings, using the plain-text extractor
    pub fn new(
        db: Database,
        settings: &Config,
        config: ServerConfig,
    ) -> finflow_core::Result<Self> {
        Ok(Self {
            db,
            config,
            categorizer: settings.categorizer()?,
            forecaster: settings.forecaster(),
            detector: settings.detector(),
            default_currency: settings.ingest.default_currency.clone(),
            extractor: Box::new(PlainTextExtractor),
        })
    }

    /// Swap in another text extractor (e.g. an OCR backend)
    pub fn with_extractor(mut self, extractor: Box<dyn TextExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Analytics over this server's database
    pub fn analytics(&self) -> AnalyticsService<'_, Database> {
        AnalyticsService::new(&self.db)
            .with_forecaster(self.forecaster)
            .with_detector(self.detector.clone())
    }
}

/// Create the application router from a database and loaded settings
pub fn create_router(
    db: Database,
    settings: &Config,
    config: ServerConfig,
) -> finflow_core::Result<Router> {
    let state = AppState::new(db, settings, config)?;
    Ok(create_router_with_state(state))
}

/// Create the application router around prepared state
pub fn create_router_with_state(state: AppState) -> Router {
    let cors = build_cors(&state.config);
    let state = Arc::new(state);

    let api_routes = Router::new()
        // Ingestion
        .route("/upload", post(handlers::upload_statements))
        // Transactions
        .route(
            "/transactions",
            get(handlers::list_transactions).post(handlers::submit_transactions),
        )
        .route("/transactions/:id", get(handlers::get_transaction))
        // Analytics
        .route("/summary", get(handlers::get_summary))
        .route("/anomalies", get(handlers::get_anomalies));

    Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        // Leave room for multipart framing around the file payload
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE + 64 * 1024))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
        ))
}

fn build_cors(config: &ServerConfig) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        base
    } else if config.allowed_origins.iter().any(|o| o == "*") {
        base.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| match o.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %o, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        base.allow_origin(origins)
    }
}

/// Start the server
pub async fn serve_with_config(
    db: Database,
    settings: &Config,
    host: &str,
    port: u16,
    config: ServerConfig,
) -> anyhow::Result<()> {
    if config.allowed_origins.iter().any(|o| o == "*") {
        warn!("⚠️  CORS allows any origin - do not expose to network!");
    }

    let app = create_router(db, settings, config)?;
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Application error type
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn payload_too_large(msg: &str) -> Self {
        Self {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn unsupported_media_type(msg: &str) -> Self {
        Self {
            status: StatusCode::UNSUPPORTED_MEDIA_TYPE,
            message: msg.to_string(),
            internal: None,
        }
    }

    /// Map core errors that are the caller's fault to 4xx; everything else is a 500
    pub fn from_core(err: finflow_core::Error) -> Self {
        match err {
            finflow_core::Error::InvalidData(msg) => Self::bad_request(&msg),
            finflow_core::Error::UnsupportedDocument(msg) => Self::unsupported_media_type(&msg),
            finflow_core::Error::NotFound(msg) => Self::not_found(&msg),
            other => other.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}
