use std::sync::Arc;

use crate::alignment::coverage::CoverageScorer;
use crate::config::Config;
use crate::models::profile::ProfileStore;
use crate::vocabulary::Vocabulary;

/// Shared application state injected into all route handlers via Axum extractors.
/// Immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub vocabulary: Arc<Vocabulary>,
    /// Profile loaded from PROFILE_PATH, used when a request carries none.
    pub profile: Option<Arc<ProfileStore>>,
    /// Pluggable coverage scorer. Default: KeywordCoverageScorer.
    pub coverage_scorer: Arc<dyn CoverageScorer>,
}
