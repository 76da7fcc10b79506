use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalCategory {
    Skill,
    Tool,
    Responsibility,
}

impl fmt::Display for SignalCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SignalCategory::Skill => "skill",
            SignalCategory::Tool => "tool",
            SignalCategory::Responsibility => "responsibility",
        })
    }
}

/// A vocabulary phrase weighted by how many target job texts mention it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSignal {
    /// Canonical vocabulary phrase, as spelled in the vocabulary.
    pub phrase: String,
    /// texts containing the phrase / total texts, in [0, 1]
    pub weight: f64,
    pub category: SignalCategory,
}

/// Orders signals by weight descending, then phrase ascending.
pub fn by_weight_then_phrase(a: &JobSignal, b: &JobSignal) -> std::cmp::Ordering {
    b.weight
        .partial_cmp(&a.weight)
        .unwrap_or(std::cmp::Ordering::Equal)
        .then_with(|| a.phrase.cmp(&b.phrase))
}
