use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::AlignError;
use crate::models::signal::SignalCategory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimCategory {
    Role,
    Skill,
    Achievement,
    Education,
}

impl ClaimCategory {
    /// Order in which sections are emitted to the renderer.
    pub const SECTION_ORDER: [ClaimCategory; 4] = [
        ClaimCategory::Role,
        ClaimCategory::Achievement,
        ClaimCategory::Skill,
        ClaimCategory::Education,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimCategory::Role => "role",
            ClaimCategory::Skill => "skill",
            ClaimCategory::Achievement => "achievement",
            ClaimCategory::Education => "education",
        }
    }

    /// Signal categories a claim of this category may surface.
    pub fn compatible_signals(&self) -> &'static [SignalCategory] {
        match self {
            ClaimCategory::Skill => &[SignalCategory::Skill, SignalCategory::Tool],
            ClaimCategory::Achievement => &[
                SignalCategory::Responsibility,
                SignalCategory::Skill,
                SignalCategory::Tool,
            ],
            ClaimCategory::Role => &[SignalCategory::Responsibility],
            ClaimCategory::Education => &[SignalCategory::Skill, SignalCategory::Tool],
        }
    }
}

impl fmt::Display for ClaimCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Period a claim refers to. A missing `end` means the claim is ongoing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeframe {
    #[serde(default)]
    pub start: Option<NaiveDate>,
    #[serde(default)]
    pub end: Option<NaiveDate>,
}

/// Recency rank of a claim; greater is more recent.
///
/// Variant order gives ongoing > ended > undated. Ended claims compare by end
/// date, then by start date (a missing start sorts first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Recency {
    Undated,
    Ended {
        end: NaiveDate,
        start: Option<NaiveDate>,
    },
    Ongoing(Option<NaiveDate>),
}

/// An atomic factual statement about the profile owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub id: String,
    pub category: ClaimCategory,
    pub text: String,
    #[serde(default)]
    pub timeframe: Option<Timeframe>,
    /// Alignment never alters a claim. Profiles declaring otherwise are rejected.
    #[serde(default = "default_truth_invariant")]
    pub truth_invariant: bool,
}

fn default_truth_invariant() -> bool {
    true
}

impl Claim {
    pub fn new(id: impl Into<String>, category: ClaimCategory, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            category,
            text: text.into(),
            timeframe: None,
            truth_invariant: true,
        }
    }

    pub fn with_timeframe(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.timeframe = Some(Timeframe { start, end });
        self
    }

    pub fn recency(&self) -> Recency {
        match &self.timeframe {
            None => Recency::Undated,
            Some(Timeframe {
                start,
                end: Some(end),
            }) => Recency::Ended {
                end: *end,
                start: *start,
            },
            Some(Timeframe { start: Some(start), end: None }) => Recency::Ongoing(Some(*start)),
            Some(Timeframe { start: None, end: None }) => Recency::Undated,
        }
    }

    fn validate(&self) -> Result<(), AlignError> {
        if self.id.trim().is_empty() {
            return Err(AlignError::input("claim id cannot be empty"));
        }
        if self.text.trim().is_empty() {
            return Err(AlignError::input(format!(
                "claim '{}' has empty text",
                self.id
            )));
        }
        if !self.truth_invariant {
            return Err(AlignError::input(format!(
                "claim '{}' sets truth_invariant=false; claims are never altered",
                self.id
            )));
        }
        if let Some(Timeframe {
            start: Some(start),
            end: Some(end),
        }) = &self.timeframe
        {
            if start > end {
                return Err(AlignError::input(format!(
                    "claim '{}' ends ({end}) before it starts ({start})",
                    self.id
                )));
            }
        }
        Ok(())
    }
}

/// Raw profile record as authored, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileRecord {
    #[serde(default)]
    pub headline: Option<String>,
    pub claims: Vec<Claim>,
}

/// The canonical, validated set of claims. Read-only once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ProfileRecord")]
pub struct ProfileStore {
    headline: Option<String>,
    claims: Vec<Claim>,
}

impl ProfileStore {
    pub fn new(headline: Option<String>, claims: Vec<Claim>) -> Result<Self, AlignError> {
        if claims.is_empty() {
            return Err(AlignError::input("profile has no claims"));
        }

        let mut ids = HashSet::new();
        let mut texts: HashSet<String> = HashSet::new();
        for claim in &claims {
            claim.validate()?;
            if !ids.insert(claim.id.as_str()) {
                return Err(AlignError::input(format!(
                    "duplicate claim id '{}'",
                    claim.id
                )));
            }
            if !texts.insert(claim.text.trim().to_lowercase()) {
                warn!(
                    "Claim '{}' repeats the text of an earlier claim; both will be emitted",
                    claim.id
                );
            }
        }

        let headline = headline
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty());

        Ok(Self { headline, claims })
    }

    pub fn headline(&self) -> Option<&str> {
        self.headline.as_deref()
    }

    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }
}

impl TryFrom<ProfileRecord> for ProfileStore {
    type Error = AlignError;

    fn try_from(record: ProfileRecord) -> Result<Self, Self::Error> {
        ProfileStore::new(record.headline, record.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_empty_profile_rejected() {
        let err = ProfileStore::new(None, vec![]).unwrap_err();
        assert!(matches!(err, AlignError::Input(_)));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let claims = vec![
            Claim::new("a", ClaimCategory::Skill, "Python"),
            Claim::new("a", ClaimCategory::Skill, "SQL"),
        ];
        let err = ProfileStore::new(None, claims).unwrap_err();
        assert_eq!(err, AlignError::input("duplicate claim id 'a'"));
    }

    #[test]
    fn test_blank_text_rejected() {
        let claims = vec![Claim::new("a", ClaimCategory::Role, "   ")];
        assert!(ProfileStore::new(None, claims).is_err());
    }

    #[test]
    fn test_inverted_timeframe_rejected() {
        let claims = vec![Claim::new("a", ClaimCategory::Role, "Analyst at Acme")
            .with_timeframe(date(2022, 1, 1), date(2021, 1, 1))];
        assert!(ProfileStore::new(None, claims).is_err());
    }

    #[test]
    fn test_truth_invariant_false_rejected() {
        let json = r#"{"claims": [{"id": "a", "category": "skill", "text": "SQL", "truth_invariant": false}]}"#;
        let result: Result<ProfileStore, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_validates_and_defaults() {
        let json = r#"{
            "headline": "  Product engineer ",
            "claims": [
                {"id": "r1", "category": "role", "text": "Analyst at Acme",
                 "timeframe": {"start": "2021-03-01"}},
                {"id": "s1", "category": "skill", "text": "Python"}
            ]
        }"#;
        let profile: ProfileStore = serde_json::from_str(json).unwrap();
        assert_eq!(profile.headline(), Some("Product engineer"));
        assert_eq!(profile.len(), 2);
        assert!(profile.claims()[1].truth_invariant);
        assert_eq!(profile.claims()[0].recency(), Recency::Ongoing(date(2021, 3, 1)));
    }

    #[test]
    fn test_recency_ordering() {
        let ongoing = Claim::new("a", ClaimCategory::Role, "x").with_timeframe(date(2020, 1, 1), None);
        let ended = Claim::new("b", ClaimCategory::Role, "x").with_timeframe(None, date(2024, 1, 1));
        let older = Claim::new("c", ClaimCategory::Role, "x").with_timeframe(None, date(2019, 1, 1));
        let undated = Claim::new("d", ClaimCategory::Role, "x");
        assert!(ongoing.recency() > ended.recency());
        assert!(ended.recency() > older.recency());
        assert!(older.recency() > undated.recency());
    }

    #[test]
    fn test_same_end_ranked_by_later_start() {
        let early = Claim::new("early", ClaimCategory::Role, "x")
            .with_timeframe(date(2015, 1, 1), date(2020, 1, 1));
        let late = Claim::new("late", ClaimCategory::Role, "x")
            .with_timeframe(date(2019, 1, 1), date(2020, 1, 1));
        let no_start = Claim::new("no_start", ClaimCategory::Role, "x")
            .with_timeframe(None, date(2020, 1, 1));
        assert!(late.recency() > early.recency());
        assert!(early.recency() > no_start.recency());
    }

    #[test]
    fn test_category_serde_snake_case() {
        let c: ClaimCategory = serde_json::from_str(r#""achievement""#).unwrap();
        assert_eq!(c, ClaimCategory::Achievement);
        assert_eq!(c.to_string(), "achievement");
    }

    #[test]
    fn test_role_only_surfaces_responsibilities() {
        assert_eq!(
            ClaimCategory::Role.compatible_signals(),
            &[SignalCategory::Responsibility]
        );
    }
}
