//! # API REST
//!
//! REST API for the symptom service.
//!
//! Handles:
//! - HTTP endpoints with axum (`GET /health`, `POST /parse_input`)
//! - request validation and error bodies
//! - OpenAPI/Swagger documentation and CORS
//!
//! Uses `api-shared` for wire types and `symptom-core` for the engine.

#![warn(rust_2018_idioms)]

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::{
    DetailedRes, ErrorRes, HealthRes, HealthService, MentionRes, ParseInputReq, ParseInputRes,
    SymptomsRes,
};
use symptom_core::{extract_symptoms, DependencyParser, InputText, SymptomEngine};

pub const ERR_CONTENT_TYPE: &str = "Content-Type must be application/json";
pub const ERR_INVALID_JSON: &str = "Request body must be valid JSON";
pub const ERR_PARSER_UNAVAILABLE: &str = "Parser unavailable";

/// Port used when `PORT` is not set.
pub const DEFAULT_PORT: u16 = 5001;

/// Resolve the listen address from an optional port value. The service binds all interfaces.
///
/// If `value` is `None` or empty/whitespace, uses [`DEFAULT_PORT`].
pub fn bind_addr_from_env_value(
    value: Option<String>,
) -> Result<SocketAddr, std::num::ParseIntError> {
    let port = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(|v| v.parse::<u16>())
        .transpose()?
        .unwrap_or(DEFAULT_PORT);
    Ok(SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)))
}

type ApiError = (StatusCode, Json<ErrorRes>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ErrorRes::new(message)))
}

/// Application state shared across REST API handlers
///
/// Both members are built once at startup and are read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<SymptomEngine>,
    parser: Arc<dyn DependencyParser>,
}

impl AppState {
    pub fn new(engine: Arc<SymptomEngine>, parser: Arc<dyn DependencyParser>) -> Self {
        Self { engine, parser }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(health, parse_input),
    components(schemas(
        HealthRes,
        ParseInputReq,
        ParseInputRes,
        SymptomsRes,
        DetailedRes,
        MentionRes,
        ErrorRes,
    ))
)]
pub struct ApiDoc;

/// Build the service router with CORS and Swagger UI attached.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/parse_input", post(parse_input))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Accepts `application/json` and `application/<anything>+json`, ignoring parameters.
fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(value) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };
    let mime = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

/// Pull a non-blank `input` string out of a request body.
///
/// An empty body counts as `{}`; a missing, null, non-string or empty `input` is rejected with
/// the same message. Whitespace-only input is passed through.
fn input_from_body(body: &[u8]) -> Result<InputText, ApiError> {
    let value: serde_json::Value = if body.iter().all(u8::is_ascii_whitespace) {
        serde_json::Value::Object(Default::default())
    } else {
        serde_json::from_slice(body)
            .map_err(|_| api_error(StatusCode::BAD_REQUEST, ERR_INVALID_JSON))?
    };

    let raw = value
        .get("input")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default();
    InputText::new(raw).map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint
///
/// # Returns
/// * `Json<HealthRes>` - `{"status": "healthy"}`
async fn health() -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/parse_input",
    request_body = ParseInputReq,
    responses(
        (status = 200, description = "Symptoms resolved in the configured output mode", body = ParseInputRes),
        (status = 400, description = "Bad request", body = ErrorRes),
        (status = 502, description = "Parser unavailable", body = ErrorRes)
    )
)]
/// Extract current, non-negated symptoms from free text
///
/// Lowercases the input, has it parsed by the dependency parser and runs the symptom engine
/// over the result.
///
/// # Returns
/// * `Ok(Json<ParseInputRes>)` - summary or detailed body, per the configured output mode
/// * `Err((StatusCode, Json<ErrorRes>))` - validation or parser failure
///
/// # Errors
/// Returns `400 Bad Request` if:
/// - the content type is not JSON,
/// - the body is not valid JSON, or
/// - `input` is missing, not a string, or the empty string.
///
/// Returns `502 Bad Gateway` if the parser cannot produce a valid parse.
#[axum::debug_handler]
async fn parse_input(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ParseInputRes>, ApiError> {
    if !is_json_content_type(&headers) {
        return Err(api_error(StatusCode::BAD_REQUEST, ERR_CONTENT_TYPE));
    }
    let input = input_from_body(&body)?;

    match extract_symptoms(state.parser.as_ref(), &state.engine, &input).await {
        Ok(output) => Ok(Json(output.into())),
        Err(e) => {
            tracing::error!("Parse input error: {:?}", e);
            Err(api_error(StatusCode::BAD_GATEWAY, ERR_PARSER_UNAVAILABLE))
        }
    }
}
