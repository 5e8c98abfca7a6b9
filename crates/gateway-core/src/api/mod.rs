//! HTTP API for the voice gateway
//!
//! Every endpoint accepts GET and POST; parameters are normalized by
//! [`RequestParams`] before any handler sees them.

pub mod params;
pub mod security_headers;

use std::future::Future;
use std::sync::Arc;

use axum::{
    Router,
    routing::get,
    extract::{State, Json},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    middleware,
};
use chrono::Utc;
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::{
    CallRouter, CredentialIssuer, Error as GatewayError, GatewayConfig,
    greetings,
    jwt::JwtSigner,
    markup::{MarkupSerializer, TwimlSerializer},
    types::SubChannel,
};
pub use self::params::RequestParams;

const XML_CONTENT_TYPE: &str = "text/xml";

// API State
#[derive(Clone)]
pub struct GatewayState {
    pub issuer: Arc<CredentialIssuer>,
    pub router: Arc<CallRouter>,
    pub serializer: Arc<dyn MarkupSerializer>,
}

impl GatewayState {
    /// Wire the issuer and router to the JWT signer and TwiML serializer
    pub fn new(config: GatewayConfig) -> Self {
        let config = Arc::new(config);
        let signer = Arc::new(JwtSigner::new(config.token_ttl_seconds));
        let serializer: Arc<dyn MarkupSerializer> = Arc::new(TwimlSerializer::new());

        Self {
            issuer: Arc::new(CredentialIssuer::new(config.clone(), signer)),
            router: Arc::new(CallRouter::new(config, serializer.clone())),
            serializer,
        }
    }
}

// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

/// Create the REST API router
pub fn create_router(config: GatewayConfig) -> Router {
    create_router_with_state(GatewayState::new(config))
}

/// Create the REST API router with a custom GatewayState (useful for testing)
pub fn create_router_with_state(state: GatewayState) -> Router {
    Router::new()
        // Credentials
        .route("/accessToken", get(access_token).post(access_token))
        .route("/accessTokenVideo", get(video_access_token).post(video_access_token))

        // Call control
        .route("/makeCall", get(make_call).post(make_call))
        .route("/placeCall", get(make_call).post(make_call))
        .route("/incoming", get(incoming).post(incoming))
        .route("/", get(welcome).post(welcome))

        .route("/health", get(health_check))

        .layer(middleware::from_fn(security_headers::security_headers_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the router until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> crate::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    tracing::info!("Starting HTTP server on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

// Credential handlers

async fn access_token(
    State(state): State<GatewayState>,
    params: RequestParams,
) -> Result<String, AppError> {
    let claim = state.issuer.identity_claim(params.get("identity"));
    let sub_channel = SubChannel::from_param(params.get("type"));

    let credential = state.issuer.issue_voice_credential(&claim, sub_channel)?;
    Ok(credential.into_token())
}

async fn video_access_token(
    State(state): State<GatewayState>,
    params: RequestParams,
) -> Result<String, AppError> {
    let claim = state.issuer.identity_claim(params.get("identity"));

    let credential = state.issuer.issue_video_credential(&claim)?;
    Ok(credential.into_token())
}

// Call control handlers

async fn make_call(
    State(state): State<GatewayState>,
    params: RequestParams,
) -> Result<Response, AppError> {
    let markup = state.router.respond(&params.call_setup())?;
    Ok(xml(markup))
}

async fn incoming(State(state): State<GatewayState>) -> Result<Response, AppError> {
    Ok(xml(greetings::render_incoming(state.serializer.as_ref())?))
}

async fn welcome(State(state): State<GatewayState>) -> Result<Response, AppError> {
    Ok(xml(greetings::render_welcome(state.serializer.as_ref())?))
}

fn xml(markup: String) -> Response {
    ([(header::CONTENT_TYPE, XML_CONTENT_TYPE)], markup).into_response()
}

// Health

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "gateway-core",
        "timestamp": Utc::now(),
    }))
}

// Error handling

#[derive(Debug)]
pub enum AppError {
    Gateway(GatewayError),
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::Gateway(GatewayError::ConfigurationMissing(key)) => {
                tracing::error!("Request failed, {} is not configured", key);
                (StatusCode::INTERNAL_SERVER_ERROR, "CONFIGURATION_MISSING", "The gateway is not fully configured".to_string())
            },
            AppError::Gateway(GatewayError::Signing(e)) => {
                tracing::error!("Token signing failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "SIGNING_FAILED", "Could not sign access token".to_string())
            },
            AppError::Gateway(GatewayError::Markup(e)) => {
                tracing::error!("Markup generation failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "MARKUP_FAILED", "Could not generate call instructions".to_string())
            },
            AppError::Gateway(e) => {
                tracing::error!("Internal error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", "An internal error occurred".to_string())
            },
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg)
            },
        };

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        });

        (status, body).into_response()
    }
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        AppError::Gateway(err)
    }
}
