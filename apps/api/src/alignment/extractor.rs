//! Job signal extraction: turns raw job description texts into weighted vocabulary phrases.
//!
//! No LLM and no I/O: texts are tokenized, split into 1–3 word n-grams and matched
//! against the configured vocabulary. Anything outside the vocabulary is discarded.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::AlignError;
use crate::models::signal::{by_weight_then_phrase, JobSignal};
use crate::vocabulary::normalize::{ngrams, tokenize};
use crate::vocabulary::{Vocabulary, MAX_PHRASE_TOKENS};

/// Signals plus the texts that contributed nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub signals: Vec<JobSignal>,
    /// Indices of job texts without a single recognized phrase.
    pub vocabulary_misses: Vec<usize>,
}

/// Extracts weighted signals from a set of job texts.
///
/// weight = texts containing the phrase / total texts. Output is ordered by
/// weight descending, then phrase ascending.
pub fn extract(job_texts: &[String], vocabulary: &Vocabulary) -> Vec<JobSignal> {
    extract_report(job_texts, vocabulary).signals
}

pub fn extract_report(job_texts: &[String], vocabulary: &Vocabulary) -> ExtractionReport {
    if job_texts.is_empty() {
        return ExtractionReport {
            signals: Vec::new(),
            vocabulary_misses: Vec::new(),
        };
    }

    // canonical phrase -> number of texts mentioning it
    let mut document_counts: BTreeMap<&str, usize> = BTreeMap::new();
    let mut vocabulary_misses = Vec::new();

    for (index, text) in job_texts.iter().enumerate() {
        let phrases = phrases_in(text, vocabulary);
        if phrases.is_empty() {
            let miss = AlignError::VocabularyMiss { index };
            warn!("{miss}");
            vocabulary_misses.push(index);
            continue;
        }
        debug!("Job text #{index}: {} vocabulary phrases", phrases.len());
        for phrase in phrases {
            *document_counts.entry(phrase).or_insert(0) += 1;
        }
    }

    let total = job_texts.len() as f64;
    let mut signals: Vec<JobSignal> = document_counts
        .into_iter()
        .filter_map(|(phrase, count)| {
            vocabulary.entry_for_phrase(phrase).map(|entry| JobSignal {
                phrase: entry.phrase.clone(),
                weight: count as f64 / total,
                category: entry.category,
            })
        })
        .collect();
    signals.sort_by(by_weight_then_phrase);

    ExtractionReport {
        signals,
        vocabulary_misses,
    }
}

/// Distinct canonical phrases recognized in one text.
fn phrases_in<'v>(text: &str, vocabulary: &'v Vocabulary) -> BTreeSet<&'v str> {
    let tokens = tokenize(text);
    ngrams(&tokens, MAX_PHRASE_TOKENS)
        .iter()
        .filter_map(|gram| vocabulary.lookup(gram))
        .map(|entry| entry.phrase.as_str())
        .collect()
}
