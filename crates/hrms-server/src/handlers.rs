//! Route handlers.

use axum::Json;
use axum::extract::State;
use axum::http::{StatusCode, Uri, header};
use axum::response::{Html, IntoResponse, Response};
use axum_extra::extract::CookieJar;
use hrms_core::{BootRecord, SessionContext};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::health::{self, HealthResponse};
use crate::metrics::{
    BOOT_DEV_CONTEXT_REQUESTS_TOTAL, BOOT_PAGE_RENDERS_TOTAL, OUTCOME_DENIED, OUTCOME_SERVED,
};
use crate::page;
use crate::server::AppState;

/// Session cookie name.
pub const SESSION_COOKIE: &str = "sid";
/// Cookie value of an anonymous session.
pub const GUEST_SID: &str = "Guest";
/// Login page that unauthenticated page requests are sent to.
pub const LOGIN_PATH: &str = "/login";

const REDIRECT_TARGET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Envelope for whitelisted method responses.
#[derive(Debug, Serialize)]
pub struct MethodResponse<T> {
    /// Return value of the method.
    pub message: T,
}

/// GET /hrms, GET /hrms/{*app_path}
pub async fn page(
    State(state): State<AppState>,
    jar: CookieJar,
    uri: Uri,
) -> Result<Response, ApiError> {
    let Some(session) = authenticate(&state, &jar)? else {
        debug!(path = uri.path(), "no session, redirecting to login");
        return Ok(login_redirect(uri.path()));
    };

    let ctx = state.boot.build_page_context(&session)?;
    let html = page::render(&ctx)?;
    metrics::counter!(BOOT_PAGE_RENDERS_TOTAL).increment(1);

    Ok(([(header::CACHE_CONTROL, page::NO_CACHE)], Html(html)).into_response())
}

/// POST /api/method/hrms.www.hrms.get_context_for_dev
pub async fn dev_context(
    State(state): State<AppState>,
) -> Result<Json<MethodResponse<BootRecord>>, ApiError> {
    match state.boot.build_dev_context() {
        Ok(record) => {
            metrics::counter!(BOOT_DEV_CONTEXT_REQUESTS_TOTAL, "outcome" => OUTCOME_SERVED)
                .increment(1);
            Ok(Json(MethodResponse { message: record }))
        }
        Err(e) => {
            metrics::counter!(BOOT_DEV_CONTEXT_REQUESTS_TOTAL, "outcome" => OUTCOME_DENIED)
                .increment(1);
            Err(e.into())
        }
    }
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(health::health_check(
        state.start_time,
        state.boot.config().site_name(),
    ))
}

/// GET /metrics
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

fn authenticate(state: &AppState, jar: &CookieJar) -> Result<Option<SessionContext>, ApiError> {
    match jar.get(SESSION_COOKIE).map(|c| c.value()) {
        None | Some("" | GUEST_SID) => Ok(None),
        Some(sid) => Ok(state.sessions.resolve(sid)?),
    }
}

fn login_redirect(path: &str) -> Response {
    let location = format!(
        "{LOGIN_PATH}?redirect-to={}",
        utf8_percent_encode(path, REDIRECT_TARGET)
    );
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}
