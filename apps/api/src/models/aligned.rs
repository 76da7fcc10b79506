use serde::{Deserialize, Serialize};

use crate::models::profile::ClaimCategory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassthroughReason {
    NoCompatibleSignal,
    TemplateGap,
    GroundingRejected,
}

/// How a bullet relates to its source claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "reason")]
pub enum Disposition {
    Rewritten,
    /// Claim already contains every chosen phrase; text unchanged.
    ExactMatch,
    Passthrough(PassthroughReason),
}

/// A signal-informed rendering of exactly one claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedBullet {
    pub claim_id: String,
    pub category: ClaimCategory,
    pub text: String,
    pub surfaced_phrases: Vec<String>,
    pub disposition: Disposition,
}

impl AlignedBullet {
    pub fn is_verbatim(&self) -> bool {
        !matches!(self.disposition, Disposition::Rewritten)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedSection {
    pub category: ClaimCategory,
    pub bullets: Vec<AlignedBullet>,
}

/// Complete output of one alignment run, handed to the page renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentResult {
    pub sections: Vec<AlignedSection>,
    pub positioning_statement: String,
}

impl AlignmentResult {
    pub fn bullets(&self) -> impl Iterator<Item = &AlignedBullet> {
        self.sections.iter().flat_map(|s| s.bullets.iter())
    }

    pub fn section(&self, category: ClaimCategory) -> Option<&AlignedSection> {
        self.sections.iter().find(|s| s.category == category)
    }

    pub fn bullet_for(&self, claim_id: &str) -> Option<&AlignedBullet> {
        self.bullets().find(|b| b.claim_id == claim_id)
    }
}
