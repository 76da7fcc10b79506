//! Coverage scoring: pluggable, trait-based scorer measuring how much of the
//! job signal weight an alignment run managed to surface.
//!
//! Default: `KeywordCoverageScorer` (pure-Rust, deterministic, fully testable).
//!
//! `AppState` holds an `Arc<dyn CoverageScorer>`, chosen at startup.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::aligned::AlignmentResult;
use crate::models::profile::ProfileStore;
use crate::models::signal::{JobSignal, SignalCategory};
use crate::vocabulary::normalize::{contains_phrase, normalize_phrase, tokenize};

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

/// How well one signal is represented in the aligned content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalCoverage {
    pub phrase: String,
    pub category: SignalCategory,
    pub weight: f64,
    pub strength: f64, // 0.0 – 1.0
    /// Claim that surfaces (or mentions) the phrase, if any.
    pub evidence: Option<String>,
}

/// Full coverage report returned to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageReport {
    pub overall_score: u32,           // 0 – 100
    pub covered: Vec<SignalCoverage>, // strength ≥ 0.8
    pub partial: Vec<SignalCoverage>, // 0.4 – 0.79
    pub gaps: Vec<SignalCoverage>,    // strength < 0.4
    pub recommendation: String,
    pub scorer_backend: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to swap scoring backends without touching the handlers.
#[async_trait]
pub trait CoverageScorer: Send + Sync {
    async fn score(
        &self,
        profile: &ProfileStore,
        result: &AlignmentResult,
        signals: &[JobSignal],
    ) -> Result<CoverageReport, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// KeywordCoverageScorer: default implementation
// ────────────────────────────────────────────────────────────────────────────

/// Algorithm:
/// 1. For each signal:
///    - surfaced by some bullet → strength 1.0
///    - phrase appears in some claim but was not surfaced → strength 0.6
///    - otherwise → strength 0.0
/// 2. overall_score = Σ(strength × weight) / Σ(weight) × 100
/// 3. Classify: covered (≥0.8), partial (0.4–0.79), gap (<0.4)
pub struct KeywordCoverageScorer;

#[async_trait]
impl CoverageScorer for KeywordCoverageScorer {
    async fn score(
        &self,
        profile: &ProfileStore,
        result: &AlignmentResult,
        signals: &[JobSignal],
    ) -> Result<CoverageReport, AppError> {
        Ok(compute_keyword_coverage(profile, result, signals))
    }
}

fn compute_keyword_coverage(
    profile: &ProfileStore,
    result: &AlignmentResult,
    signals: &[JobSignal],
) -> CoverageReport {
    if signals.is_empty() {
        return CoverageReport {
            overall_score: 0,
            covered: vec![],
            partial: vec![],
            gaps: vec![],
            recommendation: "No job signals extracted; nothing to cover.".to_string(),
            scorer_backend: "keyword".to_string(),
        };
    }

    let claim_tokens: Vec<(&str, Vec<String>)> = profile
        .claims()
        .iter()
        .map(|c| (c.id.as_str(), tokenize(&c.text)))
        .collect();

    let mut covered = Vec::new();
    let mut partial = Vec::new();
    let mut gaps = Vec::new();
    let mut total_weight = 0.0_f64;
    let mut total_score = 0.0_f64;

    for signal in signals {
        total_weight += signal.weight;

        let surfaced_by = result
            .bullets()
            .find(|b| b.surfaced_phrases.iter().any(|p| *p == signal.phrase))
            .map(|b| b.claim_id.clone());

        let (strength, evidence) = match surfaced_by {
            Some(id) => (1.0, Some(id)),
            None => {
                let normalized = normalize_phrase(&signal.phrase);
                let mentioned_by = claim_tokens
                    .iter()
                    .find(|(_, tokens)| contains_phrase(tokens, &normalized))
                    .map(|(id, _)| id.to_string());
                match mentioned_by {
                    Some(id) => (0.6, Some(id)),
                    None => (0.0, None),
                }
            }
        };

        total_score += strength * signal.weight;

        let coverage = SignalCoverage {
            phrase: signal.phrase.clone(),
            category: signal.category,
            weight: signal.weight,
            strength,
            evidence,
        };

        if strength >= 0.8 {
            covered.push(coverage);
        } else if strength >= 0.4 {
            partial.push(coverage);
        } else {
            gaps.push(coverage);
        }
    }

    let overall_score = if total_weight > 0.0 {
        ((total_score / total_weight) * 100.0).round() as u32
    } else {
        0
    };

    let recommendation = build_recommendation(overall_score, &gaps);

    CoverageReport {
        overall_score,
        covered,
        partial,
        gaps,
        recommendation,
        scorer_backend: "keyword".to_string(),
    }
}

/// Builds a human-readable recommendation string from score and gaps.
fn build_recommendation(score: u32, gaps: &[SignalCoverage]) -> String {
    let top_gaps: Vec<&str> = gaps.iter().take(3).map(|g| g.phrase.as_str()).collect();

    if score >= 80 {
        "Strong coverage. The aligned content surfaces the key job signals.".to_string()
    } else if top_gaps.is_empty() {
        format!("Moderate coverage ({score}/100). Some signals are mentioned but not surfaced.")
    } else if score >= 60 {
        format!(
            "Moderate coverage ({score}/100). No claim supports: {}.",
            top_gaps.join(", ")
        )
    } else {
        format!(
            "Low coverage ({score}/100). Missing evidence for: {}. Add claims only if they are true.",
            top_gaps.join(", ")
        )
    }
}
