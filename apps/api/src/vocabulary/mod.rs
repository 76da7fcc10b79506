//! Domain vocabulary: the controlled set of phrases the extractor recognizes,
//! the topic map that decides which claims may surface which phrases, the
//! rewrite templates, and the action verbs recognized at the start of a claim.
//!
//! This is configuration, not logic: the built-in default ships as
//! `config/vocabulary.json` and can be replaced via `VOCABULARY_PATH`.

pub mod normalize;
pub mod template;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::AlignError;
use crate::models::profile::ClaimCategory;
use crate::models::signal::SignalCategory;
use normalize::{contains_phrase, normalize_phrase};
use template::Template;

/// Longest phrase the extractor can match (1–3 word n-grams).
pub const MAX_PHRASE_TOKENS: usize = 3;

const BUILTIN_VOCABULARY: &str = include_str!("../../config/vocabulary.json");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyEntry {
    pub phrase: String,
    pub category: SignalCategory,
    pub topic: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// A semantic topic and the terms whose presence in a claim makes the claim
/// eligible to surface the topic's phrases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    pub name: String,
    #[serde(default)]
    pub triggers: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VocabularyRecord {
    pub entries: Vec<VocabularyEntry>,
    #[serde(default)]
    pub topics: Vec<Topic>,
    #[serde(default)]
    pub templates: Vec<Template>,
    #[serde(default)]
    pub action_verbs: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "VocabularyRecord")]
pub struct Vocabulary {
    entries: Vec<VocabularyEntry>,
    topics: Vec<Topic>,
    templates: Vec<Template>,
    action_verbs: Vec<String>,
    /// normalized phrase or alias -> entry index
    #[serde(skip)]
    index: BTreeMap<String, usize>,
    /// topic name -> normalized trigger terms
    #[serde(skip)]
    triggers: BTreeMap<String, Vec<String>>,
}

impl Vocabulary {
    pub fn new(record: VocabularyRecord) -> Result<Self, AlignError> {
        if record.entries.is_empty() {
            return Err(AlignError::input("vocabulary has no entries"));
        }

        let mut triggers = BTreeMap::new();
        for topic in &record.topics {
            let terms: Vec<String> = topic
                .triggers
                .iter()
                .map(|t| normalize_phrase(t))
                .filter(|t| !t.is_empty())
                .collect();
            if triggers.insert(topic.name.clone(), terms).is_some() {
                return Err(AlignError::input(format!(
                    "duplicate topic '{}'",
                    topic.name
                )));
            }
        }

        let mut index = BTreeMap::new();
        for (i, entry) in record.entries.iter().enumerate() {
            if !triggers.contains_key(&entry.topic) {
                return Err(AlignError::input(format!(
                    "phrase '{}' references unknown topic '{}'",
                    entry.phrase, entry.topic
                )));
            }
            for form in std::iter::once(&entry.phrase).chain(&entry.aliases) {
                let key = normalize_phrase(form);
                let len = key.split(' ').filter(|t| !t.is_empty()).count();
                if len == 0 || len > MAX_PHRASE_TOKENS {
                    return Err(AlignError::input(format!(
                        "phrase '{form}' must be 1 to {MAX_PHRASE_TOKENS} words"
                    )));
                }
                if let Some(prev) = index.insert(key, i) {
                    return Err(AlignError::input(format!(
                        "'{form}' is listed under both '{}' and '{}'",
                        record.entries[prev].phrase, entry.phrase
                    )));
                }
            }
        }

        let action_verbs = record
            .action_verbs
            .iter()
            .map(|v| v.trim().to_lowercase())
            .filter(|v| !v.is_empty())
            .collect();

        Ok(Self {
            entries: record.entries,
            topics: record.topics,
            templates: record.templates,
            action_verbs,
            index,
            triggers,
        })
    }

    /// The default product-management oriented vocabulary.
    pub fn builtin() -> Result<Self, AlignError> {
        serde_json::from_str(BUILTIN_VOCABULARY)
            .map_err(|e| AlignError::input(format!("built-in vocabulary is invalid: {e}")))
    }

    pub fn entries(&self) -> &[VocabularyEntry] {
        &self.entries
    }

    /// Resolves a normalized n-gram to its vocabulary entry.
    pub fn lookup(&self, normalized: &str) -> Option<&VocabularyEntry> {
        self.index.get(normalized).map(|&i| &self.entries[i])
    }

    /// Finds the entry for a canonical phrase as it appears in a signal.
    pub fn entry_for_phrase(&self, phrase: &str) -> Option<&VocabularyEntry> {
        self.lookup(&normalize_phrase(phrase))
    }

    /// Whether a claim's tokens support surfacing `entry`: the claim mentions
    /// one of its topic triggers, the phrase itself, or an alias.
    pub fn is_topic_compatible(&self, entry: &VocabularyEntry, claim_tokens: &[String]) -> bool {
        let forms = std::iter::once(&entry.phrase)
            .chain(&entry.aliases)
            .map(|f| normalize_phrase(f));
        let triggers = self
            .triggers
            .get(&entry.topic)
            .map(|t| t.as_slice())
            .unwrap_or_default();

        triggers.iter().any(|t| contains_phrase(claim_tokens, t))
            || forms.into_iter().any(|f| contains_phrase(claim_tokens, &f))
    }

    /// Templates for a category, in priority order.
    pub fn templates_for(&self, category: ClaimCategory) -> impl Iterator<Item = &Template> {
        self.templates.iter().filter(move |t| t.category == category)
    }

    pub fn is_action_verb(&self, word: &str) -> bool {
        let word = word.to_lowercase();
        self.action_verbs.iter().any(|v| *v == word)
    }
}

impl TryFrom<VocabularyRecord> for Vocabulary {
    type Error = AlignError;

    fn try_from(record: VocabularyRecord) -> Result<Self, Self::Error> {
        Vocabulary::new(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::normalize::tokenize;

    fn record(entries: Vec<VocabularyEntry>) -> VocabularyRecord {
        VocabularyRecord {
            entries,
            topics: vec![Topic {
                name: "data".to_string(),
                triggers: vec!["dashboards".to_string()],
            }],
            templates: vec![],
            action_verbs: vec!["Built".to_string()],
        }
    }

    fn entry(phrase: &str, aliases: &[&str]) -> VocabularyEntry {
        VocabularyEntry {
            phrase: phrase.to_string(),
            category: SignalCategory::Skill,
            topic: "data".to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        }
    }

    #[test]
    fn test_builtin_vocabulary_loads() {
        let vocab = Vocabulary::builtin().unwrap();
        assert!(vocab.entry_for_phrase("stakeholder management").is_some());
        assert!(vocab.entry_for_phrase("LLM integration").is_some());
        assert!(vocab.entry_for_phrase("risk management").is_some());
        assert!(vocab.templates_for(ClaimCategory::Achievement).count() >= 1);
        assert_eq!(vocab.templates_for(ClaimCategory::Skill).count(), 0);
    }

    #[test]
    fn test_lookup_by_alias() {
        let vocab = Vocabulary::new(record(vec![entry("SQL", &["structured query language"])])).unwrap();
        assert_eq!(vocab.lookup("structured query language").unwrap().phrase, "SQL");
        assert_eq!(vocab.lookup("sql").unwrap().phrase, "SQL");
    }

    #[test]
    fn test_phrase_longer_than_three_words_rejected() {
        let err = Vocabulary::new(record(vec![entry("a very long skill name", &[])])).unwrap_err();
        assert!(matches!(err, AlignError::Input(_)));
    }

    #[test]
    fn test_duplicate_normalized_form_rejected() {
        let result = Vocabulary::new(record(vec![entry("A/B testing", &[]), entry("a-b testing", &[])]));
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_topic_rejected() {
        let mut e = entry("SQL", &[]);
        e.topic = "missing".to_string();
        assert!(Vocabulary::new(record(vec![e])).is_err());
    }

    #[test]
    fn test_empty_vocabulary_rejected() {
        assert!(Vocabulary::new(record(vec![])).is_err());
    }

    #[test]
    fn test_topic_compatibility_via_trigger() {
        let vocab = Vocabulary::new(record(vec![entry("SQL", &[])])).unwrap();
        let e = vocab.entry_for_phrase("SQL").unwrap();
        assert!(vocab.is_topic_compatible(e, &tokenize("Built finance dashboards")));
        assert!(vocab.is_topic_compatible(e, &tokenize("Wrote SQL daily")));
        assert!(!vocab.is_topic_compatible(e, &tokenize("Ran offsites")));
    }

    #[test]
    fn test_action_verb_case_insensitive() {
        let vocab = Vocabulary::new(record(vec![entry("SQL", &[])])).unwrap();
        assert!(vocab.is_action_verb("built"));
        assert!(vocab.is_action_verb("BUILT"));
        assert!(!vocab.is_action_verb("Helped"));
    }

    #[test]
    fn test_serialize_omits_index() {
        let vocab = Vocabulary::new(record(vec![entry("SQL", &[])])).unwrap();
        let json = serde_json::to_value(&vocab).unwrap();
        assert!(json.get("index").is_none());
        assert_eq!(json["entries"][0]["phrase"], "SQL");
    }
}
