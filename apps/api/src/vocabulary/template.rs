//! Rewrite templates. A template is literal connective text around four slots:
//! `{verb}`, `{core}`, `{metric}` and `{phrases}`. Slots are filled only with
//! pieces of the claim itself or with matched signal phrases, and the literal
//! text may only use words from [`CONNECTIVE_WORDS`].

use serde::{Deserialize, Serialize};

use crate::errors::AlignError;
use crate::models::profile::ClaimCategory;
use crate::vocabulary::normalize::tokenize;

/// Words a template may contribute around its slots. Anything else (an
/// employer, a title, a scope) would be a fact the claim never stated.
pub const CONNECTIVE_WORDS: &[&str] = &[
    "a", "an", "and", "applying", "by", "emphasis", "focus", "for", "in", "including", "of",
    "on", "resulting", "the", "through", "to", "using", "via", "while", "with",
];

pub fn is_connective(word: &str) -> bool {
    CONNECTIVE_WORDS.contains(&word)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Verb,
    Core,
    Metric,
    Phrases,
}

impl Slot {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "verb" => Some(Slot::Verb),
            "core" => Some(Slot::Core),
            "metric" => Some(Slot::Metric),
            "phrases" => Some(Slot::Phrases),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    Slot(Slot),
}

/// Authored form of a template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateRecord {
    pub category: ClaimCategory,
    pub pattern: String,
}

/// Values available for one claim.
#[derive(Debug, Clone, Default)]
pub struct TemplateFill<'a> {
    pub verb: Option<&'a str>,
    pub core: &'a str,
    pub metric: Option<&'a str>,
    pub phrases: &'a str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "TemplateRecord")]
pub struct Template {
    pub category: ClaimCategory,
    pub pattern: String,
    #[serde(skip)]
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(category: ClaimCategory, pattern: &str) -> Result<Self, AlignError> {
        let mut segments = Vec::new();
        let mut rest = pattern;

        while let Some(open) = rest.find('{') {
            if open > 0 {
                segments.push(Segment::Literal(rest[..open].to_string()));
            }
            let close = rest[open..].find('}').ok_or_else(|| {
                AlignError::input(format!("template '{pattern}' has an unclosed placeholder"))
            })? + open;
            let name = &rest[open + 1..close];
            let slot = Slot::parse(name).ok_or_else(|| {
                AlignError::input(format!("template '{pattern}' uses unknown placeholder '{{{name}}}'"))
            })?;
            segments.push(Segment::Slot(slot));
            rest = &rest[close + 1..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        let template = Self {
            category,
            pattern: pattern.to_string(),
            segments,
        };

        // Without {core} the claim would be lost; without {phrases} nothing is surfaced.
        for required in [Slot::Core, Slot::Phrases] {
            if !template.uses(required) {
                return Err(AlignError::input(format!(
                    "template '{pattern}' must contain {{core}} and {{phrases}}"
                )));
            }
        }

        if let Some(word) = template
            .connective_words()
            .into_iter()
            .find(|w| !is_connective(w))
        {
            return Err(AlignError::input(format!(
                "template '{pattern}' adds '{word}', which is not a connective word"
            )));
        }
        Ok(template)
    }

    pub fn uses(&self, slot: Slot) -> bool {
        self.segments.contains(&Segment::Slot(slot))
    }

    /// Renders the template, or `None` when a slot it uses has no value.
    pub fn render(&self, fill: &TemplateFill<'_>) -> Option<String> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Slot(Slot::Verb) => out.push_str(fill.verb?),
                Segment::Slot(Slot::Core) => out.push_str(fill.core),
                Segment::Slot(Slot::Metric) => out.push_str(fill.metric?),
                Segment::Slot(Slot::Phrases) => out.push_str(fill.phrases),
            }
        }
        Some(out)
    }

    /// Normalized words of the template's literal text.
    pub fn connective_words(&self) -> Vec<String> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Literal(text) => Some(tokenize(text)),
                Segment::Slot(_) => None,
            })
            .flatten()
            .collect()
    }
}

impl TryFrom<TemplateRecord> for Template {
    type Error = AlignError;

    fn try_from(record: TemplateRecord) -> Result<Self, Self::Error> {
        Template::parse(record.category, &record.pattern)
    }
}

/// Joins phrases as "a", "a and b", "a, b and c".
pub fn join_phrases(phrases: &[&str]) -> String {
    match phrases {
        [] => String::new(),
        [only] => only.to_string(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}
