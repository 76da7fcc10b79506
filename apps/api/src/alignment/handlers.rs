//! Axum route handlers for the Alignment API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::alignment::aligner::align;
use crate::alignment::coverage::CoverageReport;
use crate::alignment::extractor::extract_report;
use crate::errors::AppError;
use crate::models::aligned::AlignmentResult;
use crate::models::profile::{ProfileRecord, ProfileStore};
use crate::models::signal::JobSignal;
use crate::state::AppState;
use crate::vocabulary::Vocabulary;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SignalsRequest {
    pub job_texts: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SignalsResponse {
    pub signals: Vec<JobSignal>,
    pub vocabulary_misses: Vec<usize>,
}

#[derive(Debug, Deserialize)]
pub struct AlignRequest {
    /// Overrides the configured profile for this run.
    pub profile: Option<ProfileRecord>,
    pub job_texts: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct AlignResponse {
    pub run_id: Uuid,
    pub signals: Vec<JobSignal>,
    pub vocabulary_misses: Vec<usize>,
    pub result: AlignmentResult,
    pub coverage: CoverageReport,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/signals
///
/// Extracts weighted vocabulary signals from job texts without aligning anything.
pub async fn handle_extract_signals(
    State(state): State<AppState>,
    Json(request): Json<SignalsRequest>,
) -> Result<Json<SignalsResponse>, AppError> {
    let report = extract_report(&request.job_texts, &state.vocabulary);

    Ok(Json(SignalsResponse {
        signals: report.signals,
        vocabulary_misses: report.vocabulary_misses,
    }))
}

/// POST /api/v1/align
///
/// Full run: extract signals → align profile → score coverage.
/// Uses the request profile when given, otherwise the configured one.
pub async fn handle_align(
    State(state): State<AppState>,
    Json(request): Json<AlignRequest>,
) -> Result<Json<AlignResponse>, AppError> {
    let profile = match (request.profile, &state.profile) {
        (Some(record), _) => ProfileStore::try_from(record)?,
        (None, Some(configured)) => configured.as_ref().clone(),
        (None, None) => {
            return Err(AppError::Validation(
                "No profile supplied and none configured (set PROFILE_PATH).".to_string(),
            ))
        }
    };

    let run_id = Uuid::new_v4();
    info!(
        "Alignment run {run_id}: {} claims, {} job texts",
        profile.len(),
        request.job_texts.len()
    );

    let report = extract_report(&request.job_texts, &state.vocabulary);
    let result = align(&profile, &report.signals, &state.vocabulary, &state.config.policy);
    let coverage = state
        .coverage_scorer
        .score(&profile, &result, &report.signals)
        .await?;

    info!(
        "Alignment run {run_id}: coverage {}/100",
        coverage.overall_score
    );

    Ok(Json(AlignResponse {
        run_id,
        signals: report.signals,
        vocabulary_misses: report.vocabulary_misses,
        result,
        coverage,
    }))
}

/// GET /api/v1/vocabulary
pub async fn handle_get_vocabulary(State(state): State<AppState>) -> Json<Vocabulary> {
    Json(state.vocabulary.as_ref().clone())
}

/// GET /api/v1/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
) -> Result<Json<ProfileStore>, AppError> {
    state
        .profile
        .as_ref()
        .map(|p| Json(p.as_ref().clone()))
        .ok_or_else(|| AppError::NotFound("No profile configured".to_string()))
}
