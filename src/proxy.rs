//! HTTP surface: the AI prompt proxy plus read-only catalog endpoints.
//!
//! Every response carries permissive CORS headers. `OPTIONS` requests are
//! answered by the CORS layer before they reach any handler.

use crate::catalog::{self, CatalogFilter, DEFAULT_PAGE_SIZE};
use crate::error::{BiopubsError, UNKNOWN_ERROR};
use crate::gateway::{ChatMessage, GatewayClient};
use crate::languages::LANGUAGES;
use crate::prompts::RequestType;
use crate::publications::Publication;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Query, State},
    http::{
        header::{ACCESS_CONTROL_ALLOW_HEADERS, AUTHORIZATION, CONTENT_TYPE},
        HeaderName, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::sync::Arc;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{self, AllowHeaders, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::{error, info};

/// Value of `Access-Control-Allow-Headers` on every response
pub const ALLOWED_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

/// Shared, read-only handler state
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<GatewayClient>,
    pub publications: Arc<Vec<Publication>>,
}

impl AppState {
    pub fn new(gateway: GatewayClient, publications: Vec<Publication>) -> Self {
        Self {
            gateway: Arc::new(gateway),
            publications: Arc::new(publications),
        }
    }
}

/// Prompt proxy request body
#[derive(Debug, Deserialize)]
pub struct ProxyRequest {
    pub messages: Vec<ChatMessage>,
    #[serde(default, rename = "type")]
    pub request_type: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
struct CompletionReply {
    response: String,
}

#[derive(Debug, Serialize)]
struct ErrorReply {
    error: String,
}

fn error_reply(status: StatusCode, message: String) -> Response {
    (status, Json(ErrorReply { error: message })).into_response()
}

impl IntoResponse for BiopubsError {
    fn into_response(self) -> Response {
        error_reply(self.status_code(), self.client_message())
    }
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(cors::Any)
        .allow_methods(cors::Any)
        .allow_headers(AllowHeaders::list([
            AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            CONTENT_TYPE,
        ]))
}

/// Turn a handler panic into the proxy's error shape.
fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        UNKNOWN_ERROR.to_string()
    };
    error!(panic = %message, "Handler panicked");
    error_reply(StatusCode::INTERNAL_SERVER_ERROR, message)
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/ai-chat", post(ai_chat_handler))
        .route("/publications", get(publications_handler))
        .route("/languages", get(languages_handler))
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        ))
        .layer(cors_layer())
}

/// Health check endpoint
async fn health_handler() -> &'static str {
    "OK"
}

/// Prompt proxy endpoint
///
/// Body rejections (oversized or unreadable) share the 500 error shape.
async fn ai_chat_handler(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            let message = rejection.body_text();
            error!(error = %message, "AI chat body rejected");
            return error_reply(StatusCode::INTERNAL_SERVER_ERROR, message);
        }
    };

    match relay(&state, &body).await {
        Ok(response) => Json(CompletionReply { response }).into_response(),
        Err(e) => {
            error!(error = %e, "AI chat error");
            e.into_response()
        }
    }
}

async fn relay(state: &AppState, body: &[u8]) -> crate::Result<String> {
    let request: ProxyRequest = serde_json::from_slice(body)?;
    let request_type = RequestType::from_tag(request.request_type.as_deref());

    info!(
        request_type = ?request_type,
        language = request.language.as_deref().unwrap_or_default(),
        turns = request.messages.len(),
        "AI chat request"
    );

    state
        .gateway
        .respond(request_type, request.language.as_deref(), &request.messages)
        .await
}

/// Catalog query string
#[derive(Debug, Deserialize)]
struct PublicationsQuery {
    search: Option<String>,
    year: Option<String>,
    topic: Option<String>,
    offset: Option<usize>,
    limit: Option<usize>,
}

/// Filtered, paged catalog endpoint
async fn publications_handler(
    State(state): State<AppState>,
    Query(query): Query<PublicationsQuery>,
) -> Response {
    let filter = CatalogFilter {
        search: query.search,
        year: query.year,
        topic: query.topic,
    };
    let page = catalog::page(
        &state.publications,
        &filter,
        query.offset.unwrap_or(0),
        query.limit.unwrap_or(DEFAULT_PAGE_SIZE),
    );
    Json(page).into_response()
}

/// Supported output languages
async fn languages_handler() -> Response {
    Json(LANGUAGES).into_response()
}
