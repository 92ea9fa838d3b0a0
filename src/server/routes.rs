use std::path::{Component, Path as FsPath};

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use super::AppState;
use crate::agents::PronunciationResult;
use crate::engines::elevenlabs::{CatalogEntry, VoiceCategory};
use crate::pipeline::{NameQuery, Pipeline, PipelineOutput};
use crate::store::{NameRecord, NameStore, NewRecord, RecordPatch, RecordStatus};

// ---------------------------------------------------------------------------
// Pages and static files
// ---------------------------------------------------------------------------

pub async fn index(State(state): State<AppState>) -> Result<Response, ApiError> {
    serve_file(&state.static_dir, "index.html").await
}

pub async fn admin(State(state): State<AppState>) -> Result<Response, ApiError> {
    serve_file(&state.static_dir, "admin.html").await
}

pub async fn static_file(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Response, ApiError> {
    serve_file(&state.static_dir, &path).await
}

fn content_type(path: &FsPath) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") => "text/html; charset=utf-8",
        Some("js") => "text/javascript; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("json") => "application/json",
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        Some("ogg") => "audio/ogg",
        Some("png") => "image/png",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        _ => "application/octet-stream",
    }
}

/// Read `relative` from `root`. Anything but plain path segments is a 404.
async fn serve_file(root: &FsPath, relative: &str) -> Result<Response, ApiError> {
    let relative = FsPath::new(relative);
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return Err(ApiError::NotFound("File not found".to_string()));
    }

    let full = root.join(relative);
    match tokio::fs::read(&full).await {
        Ok(bytes) => Ok(([(header::CONTENT_TYPE, content_type(&full))], bytes).into_response()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ApiError::NotFound("File not found".to_string()))
        }
        Err(e) => Err(ApiError::Internal(format!(
            "failed to read {}: {e}",
            full.display()
        ))),
    }
}

// ---------------------------------------------------------------------------
// Pronunciation
// ---------------------------------------------------------------------------

pub async fn list_voices(State(state): State<AppState>) -> Json<Vec<CatalogEntry>> {
    Json(state.pipeline.voices().entries())
}

fn validated(query: NameQuery) -> Result<NameQuery, ApiError> {
    let name = query.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("Name must not be empty".to_string()));
    }
    Ok(NameQuery {
        name: name.to_string(),
        voice_id: query.voice_id,
    })
}

pub async fn pronounce(
    State(state): State<AppState>,
    Json(query): Json<NameQuery>,
) -> Result<Json<PipelineOutput<PronunciationResult>>, ApiError> {
    let query = validated(query)?;
    log::info!("Pronounce request for {:?}", query.name);
    Ok(Json(state.pipeline.process(&query).await))
}

pub async fn pronounce_all(
    State(state): State<AppState>,
    Json(query): Json<NameQuery>,
) -> Result<Json<PipelineOutput<Vec<PronunciationResult>>>, ApiError> {
    let query = validated(query)?;
    Ok(Json(
        state
            .pipeline
            .process_fan_out(&query.name, VoiceCategory::Specialized)
            .await,
    ))
}

pub async fn pronounce_general(
    State(state): State<AppState>,
    Json(query): Json<NameQuery>,
) -> Result<Json<PipelineOutput<Vec<PronunciationResult>>>, ApiError> {
    let query = validated(query)?;
    Ok(Json(
        state
            .pipeline
            .process_fan_out(&query.name, VoiceCategory::General)
            .await,
    ))
}

// ---------------------------------------------------------------------------
// Record store
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CreateName {
    pub name: String,
    #[serde(default)]
    pub expected_ethnicity: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: RecordStatus,
}

pub async fn list_names(State(state): State<AppState>) -> Json<Vec<NameRecord>> {
    Json(state.store.list())
}

pub async fn create_name(
    State(state): State<AppState>,
    Json(body): Json<CreateName>,
) -> Result<Json<NameRecord>, ApiError> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("Name must not be empty".to_string()));
    }
    let record = state.store.insert(NewRecord {
        name: name.to_string(),
        expected_ethnicity: body.expected_ethnicity,
        ..Default::default()
    });
    log::info!("Added name #{}: {:?}", record.id, record.name);
    Ok(Json(record))
}

pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(body): Json<StatusUpdate>,
) -> Result<Json<NameRecord>, ApiError> {
    let today = chrono::Local::now().date_naive();
    Ok(Json(state.store.set_status(id, body.status, today)?))
}

pub async fn update_record(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(patch): Json<RecordPatch>,
) -> Result<Json<NameRecord>, ApiError> {
    Ok(Json(state.store.update(id, patch)?))
}

// ---------------------------------------------------------------------------
// Bulk ingestion
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct BulkRequest {
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default)]
    pub generate_pronunciations: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkItem {
    pub name: String,
    pub success: bool,
    pub record: NameRecord,
    pub ethnicity_confidence: f64,
    pub transliteration_successful: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkResponse {
    pub processed_count: usize,
    pub failed_count: usize,
    pub results: Vec<BulkItem>,
}

/// Run each non-blank name through the pipeline and store the result.
///
/// Stage failures are already folded into sentinel values, so a name whose
/// classification failed is still stored, with `detected_ethnicity` set to
/// the error sentinel, for later review.
pub async fn ingest_names(
    pipeline: &Pipeline,
    store: &NameStore,
    names: &[String],
    generate_pronunciations: bool,
) -> BulkResponse {
    let mut results = Vec::new();

    for raw in names {
        let name = raw.trim();
        if name.is_empty() {
            continue;
        }

        let analysis = pipeline.analyze(name).await;
        if analysis.ethnicity.is_failure() {
            log::warn!("Storing {name:?} without a detected ethnicity");
        }

        let audio_path = if generate_pronunciations {
            pipeline
                .pronounce(name, &analysis, None)
                .await
                .audio_reference
        } else {
            None
        };

        let record = store.insert(NewRecord {
            name: name.to_string(),
            detected_ethnicity: Some(analysis.ethnicity.ethnicity.clone()),
            native_script: Some(analysis.transliteration.native_script.clone()),
            expected_ethnicity: None,
            audio_path,
        });

        results.push(BulkItem {
            name: name.to_string(),
            success: true,
            record,
            ethnicity_confidence: analysis.ethnicity.confidence,
            transliteration_successful: analysis.transliteration.success,
        });
    }

    let processed_count = results.iter().filter(|r| r.success).count();
    BulkResponse {
        processed_count,
        failed_count: results.len() - processed_count,
        results,
    }
}

pub async fn bulk_process(
    State(state): State<AppState>,
    Json(body): Json<BulkRequest>,
) -> Result<Json<BulkResponse>, ApiError> {
    if body.names.is_empty() {
        return Err(ApiError::BadRequest("No names provided".to_string()));
    }
    let response = ingest_names(
        &state.pipeline,
        &state.store,
        &body.names,
        body.generate_pronunciations,
    )
    .await;
    log::info!(
        "Bulk processed {} names ({} failed)",
        response.processed_count,
        response.failed_count
    );
    Ok(Json(response))
}
