//! HTTP handlers
//!
//! - `POST /api/analyze`: flatten an upload and ask the model for edits
//! - `GET /api/templates`, `GET /api/templates/:name`: template library
//! - `POST /api/generate-document`: apply edits to a template
//! - `POST /api/placeholders`: markers still to be filled in

use axum::{
    body::Bytes,
    extract::{Multipart, Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::error::ApiError;
use super::AppState;
use crate::document::DOCX_MIME_TYPE;
use crate::flatten::parse_clauses;
use crate::llm::validate_scenario;
use crate::placeholders::collect_placeholders;
use crate::reconstruct::generate_document as build_document;
use crate::schema::{AnalysisResponse, BaseFields, Clause, EditOperation, GenerateDocumentRequest};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Handler: GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "clause-redliner",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Handler: POST /api/analyze
pub async fn analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let mut upload: Option<(String, Bytes)> = None;
    let mut scenario = String::new();
    let mut base_fields = BaseFields::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "document" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                upload = Some((file_name, bytes));
            }
            "scenario" => scenario = field.text().await?,
            "base_fields" | "baseFields" => {
                let raw = field.text().await?;
                if !raw.trim().is_empty() {
                    base_fields = serde_json::from_str(&raw).map_err(|e| {
                        ApiError::InvalidRequest(format!("Base fields must be a JSON object: {}", e))
                    })?;
                }
            }
            other => debug!("Ignoring multipart field {:?}", other),
        }
    }

    let (file_name, bytes) =
        upload.ok_or_else(|| ApiError::InvalidRequest("No document file provided".to_string()))?;
    let scenario = validate_scenario(&scenario)?;
    if file_name.is_empty() {
        return Err(ApiError::InvalidRequest("No selected file".to_string()));
    }

    info!("Analyzing '{}' ({} bytes)", file_name, bytes.len());

    let original_doc = parse_clauses(&bytes)?;
    let suggestions = state
        .advisor
        .suggest(&original_doc, scenario, &base_fields)
        .await;

    Ok(Json(AnalysisResponse {
        original_doc,
        suggestions,
    }))
}

/// Handler: GET /api/templates
pub async fn list_templates(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.templates.list().await?))
}

/// Handler: GET /api/templates/:name
pub async fn download_template(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response, ApiError> {
    let bytes = state.templates.read(&name).await?;
    let mime = mime_guess::from_path(&name).first_or_octet_stream();
    Ok(attachment(mime.as_ref(), &name, bytes))
}

/// Handler: POST /api/generate-document
pub async fn generate_document(
    State(state): State<AppState>,
    Json(req): Json<GenerateDocumentRequest>,
) -> Result<Response, ApiError> {
    info!(
        "Generating from '{}' with {} operations",
        req.file_name,
        req.suggestions.len()
    );

    let template = state.templates.read(&req.file_name).await?;
    let generated = build_document(
        &template,
        &req.file_name,
        &req.suggestions,
        req.form_data.as_ref(),
    )?;

    Ok(attachment(DOCX_MIME_TYPE, &generated.file_name, generated.bytes))
}

#[derive(Debug, Deserialize)]
pub struct PlaceholderRequest {
    #[serde(rename = "originalDoc")]
    pub original_doc: Vec<Clause>,
    /// The operations the user accepted.
    #[serde(default)]
    pub suggestions: Vec<EditOperation>,
}

/// Handler: POST /api/placeholders
pub async fn placeholders(Json(req): Json<PlaceholderRequest>) -> Json<Vec<String>> {
    Json(collect_placeholders(&req.original_doc, &req.suggestions))
}

fn attachment(content_type: &str, file_name: &str, bytes: Vec<u8>) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", file_name.replace('"', ""));
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response()
}
