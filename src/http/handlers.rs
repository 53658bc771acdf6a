//! Request handlers for the preview server.

use std::time::Instant;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::http::server::AppState;
use crate::observability::metrics;
use crate::resources::{MapEntry, RequestPath};
use crate::templates::TemplateError;

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub entries: usize,
}

#[derive(Serialize)]
pub struct MaskSummary {
    pub key: String,
    /// Mask kind, or `reference` for bare entries.
    pub kind: &'static str,
    pub references: usize,
}

#[derive(Deserialize)]
pub struct ResourceQuery {
    #[serde(default)]
    pub path: String,
}

/// Version and entry count.
pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        entries: state.pipeline.registry().snapshot().len(),
    })
}

/// Every map entry with its kind.
pub async fn get_masks(State(state): State<AppState>) -> Json<Vec<MaskSummary>> {
    let map = state.pipeline.registry().snapshot();
    let summaries = map
        .entries()
        .iter()
        .map(|entry| MaskSummary {
            key: entry.key().to_string(),
            kind: match entry {
                MapEntry::Bundle { mask, .. } => mask.kind().as_str(),
                MapEntry::Reference { .. } => "reference",
            },
            references: entry.references().len(),
        })
        .collect();

    Json(summaries)
}

/// Markup for `?path=`; `204` when nothing renders.
pub async fn get_resources(
    State(state): State<AppState>,
    Query(query): Query<ResourceQuery>,
) -> Response {
    let start = Instant::now();
    let path = RequestPath::from_target(&query.path);

    let response = match state.pipeline.resolve_resources(&path) {
        Some(markup) => Html(markup).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    };

    metrics::record_request("resources", response.status().as_u16(), start);
    response
}

/// Inline template blocks; `204` when no fragment was found.
pub async fn get_templates(State(state): State<AppState>) -> Response {
    let start = Instant::now();

    let response = match collect_templates(&state).await {
        Ok(Some(markup)) => Html(markup).into_response(),
        Ok(None) => StatusCode::NO_CONTENT.into_response(),
        Err(failure) => failure.into_response(),
    };

    metrics::record_request("templates", response.status().as_u16(), start);
    response
}

/// A page shell embedding the resources for its path and every template.
pub async fn get_page(State(state): State<AppState>, uri: Uri) -> Response {
    let start = Instant::now();
    let path = RequestPath::from(&uri);

    let response = match collect_templates(&state).await {
        Ok(templates) => {
            let resources = state.pipeline.resolve_resources(&path);
            Html(page_shell(resources.as_deref(), templates.as_deref())).into_response()
        }
        Err(failure) => failure.into_response(),
    };

    metrics::record_request("page", response.status().as_u16(), start);
    response
}

fn page_shell(resources: Option<&str>, templates: Option<&str>) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\" />\n{}\n</head>\n<body>\n{}\n</body>\n</html>\n",
        resources.unwrap_or_default(),
        templates.unwrap_or_default()
    )
}

/// Why a template scan produced no markup.
#[derive(Debug)]
pub enum ScanFailure {
    Timeout,
    Failed(TemplateError),
    Aborted,
}

impl IntoResponse for ScanFailure {
    fn into_response(self) -> Response {
        match self {
            ScanFailure::Timeout => {
                tracing::warn!("template scan timed out");
                (StatusCode::GATEWAY_TIMEOUT, "Template scan timed out").into_response()
            }
            ScanFailure::Failed(e) => {
                tracing::error!(error = %e, "template scan failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                    e.to_string(),
                )
                    .into_response()
            }
            ScanFailure::Aborted => {
                tracing::error!("template scan task aborted");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

/// Run the blocking scan off the async workers, bounded by the scan timeout.
async fn collect_templates(state: &AppState) -> Result<Option<String>, ScanFailure> {
    let pipeline = state.pipeline.clone();
    let task = tokio::task::spawn_blocking(move || pipeline.collect_templates());

    match tokio::time::timeout(state.scan_timeout, task).await {
        Err(_) => Err(ScanFailure::Timeout),
        Ok(Err(_)) => Err(ScanFailure::Aborted),
        Ok(Ok(result)) => result.map_err(ScanFailure::Failed),
    }
}
