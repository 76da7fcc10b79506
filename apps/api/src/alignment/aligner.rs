//! Aligner: ranks claims against job signals and rewrites them to surface matched phrases.
//!
//! Algorithm:
//! 1. Per claim, collect compatible signals (category map + topic map), strongest first
//! 2. Rank claims: best compatible weight desc, then recency desc, then declaration order
//! 3. In rank order, pick up to `max_phrases_per_bullet` signals still under the reuse limit
//! 4. Rewrite via the first fillable category template; guard the result against the claim
//! 5. Group bullets by category, keeping rank order inside each section
//!
//! A claim is never dropped. When nothing can be surfaced, it passes through verbatim.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::alignment::grounding::verify_paraphrase;
use crate::alignment::positioning::positioning_statement;
use crate::errors::AlignError;
use crate::models::aligned::{
    AlignedBullet, AlignedSection, AlignmentResult, Disposition, PassthroughReason,
};
use crate::models::profile::{Claim, ClaimCategory, ProfileStore};
use crate::models::signal::{by_weight_then_phrase, JobSignal};
use crate::vocabulary::normalize::{contains_phrase, normalize_phrase, tokenize};
use crate::vocabulary::template::{join_phrases, Slot, Template, TemplateFill};
use crate::vocabulary::Vocabulary;

pub const DEFAULT_MAX_PHRASES_PER_BULLET: usize = 2;
pub const DEFAULT_SIGNAL_REUSE_LIMIT: usize = 1;

const METRIC_MARKER: &str = " resulting in ";

/// Fixed rewrite policy for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignPolicy {
    /// Most signal phrases combined into one bullet.
    pub max_phrases_per_bullet: usize,
    /// Most bullets that may surface the same signal phrase.
    pub signal_reuse_limit: usize,
}

impl Default for AlignPolicy {
    fn default() -> Self {
        Self {
            max_phrases_per_bullet: DEFAULT_MAX_PHRASES_PER_BULLET,
            signal_reuse_limit: DEFAULT_SIGNAL_REUSE_LIMIT,
        }
    }
}

/// A claim with its compatible signals, ready for ranking.
struct ClaimPlan<'a> {
    index: usize,
    claim: &'a Claim,
    tokens: Vec<String>,
    candidates: Vec<&'a JobSignal>,
}

impl ClaimPlan<'_> {
    fn best_weight(&self) -> f64 {
        self.candidates.first().map(|s| s.weight).unwrap_or(0.0)
    }
}

/// Validates raw claims into a profile, then aligns it.
pub fn align_claims(
    claims: &[Claim],
    signals: &[JobSignal],
    vocabulary: &Vocabulary,
    policy: &AlignPolicy,
) -> Result<AlignmentResult, AlignError> {
    let profile = ProfileStore::new(None, claims.to_vec())?;
    Ok(align(&profile, signals, vocabulary, policy))
}

/// Aligns every claim of the profile against the signal set.
pub fn align(
    profile: &ProfileStore,
    signals: &[JobSignal],
    vocabulary: &Vocabulary,
    policy: &AlignPolicy,
) -> AlignmentResult {
    let mut ordered_signals: Vec<&JobSignal> = signals.iter().filter(|s| s.weight > 0.0).collect();
    ordered_signals.sort_by(|a, b| by_weight_then_phrase(a, b));

    let mut plans: Vec<ClaimPlan> = profile
        .claims()
        .iter()
        .enumerate()
        .map(|(index, claim)| {
            let tokens = tokenize(&claim.text);
            let candidates = ordered_signals
                .iter()
                .copied()
                .filter(|s| is_compatible(claim, &tokens, s, vocabulary))
                .collect();
            ClaimPlan {
                index,
                claim,
                tokens,
                candidates,
            }
        })
        .collect();

    plans.sort_by(|a, b| {
        b.best_weight()
            .partial_cmp(&a.best_weight())
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.claim.recency().cmp(&a.claim.recency()))
            .then_with(|| a.index.cmp(&b.index))
    });

    let max_phrases = policy.max_phrases_per_bullet.max(1);
    let reuse_limit = policy.signal_reuse_limit.max(1);
    let mut usage: BTreeMap<String, usize> = BTreeMap::new();
    let mut ranked_bullets = Vec::with_capacity(plans.len());

    for plan in &plans {
        let chosen: Vec<&str> = plan
            .candidates
            .iter()
            .filter(|s| usage.get(&s.phrase).copied().unwrap_or(0) < reuse_limit)
            .take(max_phrases)
            .map(|s| s.phrase.as_str())
            .collect();

        let bullet = if chosen.is_empty() {
            passthrough(plan.claim, Vec::new(), PassthroughReason::NoCompatibleSignal)
        } else {
            rewrite(plan, &chosen, vocabulary)
        };

        for phrase in &bullet.surfaced_phrases {
            *usage.entry(phrase.clone()).or_insert(0) += 1;
        }
        debug!(
            "Claim '{}' -> {:?} surfacing {:?}",
            bullet.claim_id, bullet.disposition, bullet.surfaced_phrases
        );
        ranked_bullets.push(bullet);
    }

    let mut result = AlignmentResult {
        sections: group_by_category(ranked_bullets),
        positioning_statement: String::new(),
    };
    let statement = positioning_statement(profile, &result, &ordered_signals);
    result.positioning_statement = statement;

    let rewritten = result
        .bullets()
        .filter(|b| b.disposition == Disposition::Rewritten)
        .count();
    info!(
        "Aligned {} claims against {} signals: {} rewritten",
        profile.len(),
        ordered_signals.len(),
        rewritten
    );

    result
}

/// Category map first, then topic map. Both are static configuration.
fn is_compatible(
    claim: &Claim,
    claim_tokens: &[String],
    signal: &JobSignal,
    vocabulary: &Vocabulary,
) -> bool {
    if !claim.category.compatible_signals().contains(&signal.category) {
        return false;
    }
    vocabulary
        .entry_for_phrase(&signal.phrase)
        .map(|entry| vocabulary.is_topic_compatible(entry, claim_tokens))
        .unwrap_or(false)
}

fn passthrough(claim: &Claim, surfaced: Vec<String>, reason: PassthroughReason) -> AlignedBullet {
    AlignedBullet {
        claim_id: claim.id.clone(),
        category: claim.category,
        text: claim.text.clone(),
        surfaced_phrases: surfaced,
        disposition: Disposition::Passthrough(reason),
    }
}

fn rewrite(plan: &ClaimPlan<'_>, chosen: &[&str], vocabulary: &Vocabulary) -> AlignedBullet {
    let claim = plan.claim;
    let (present, absent): (Vec<&str>, Vec<&str>) = chosen
        .iter()
        .copied()
        .partition(|p| contains_phrase(&plan.tokens, &normalize_phrase(p)));

    if absent.is_empty() {
        return AlignedBullet {
            claim_id: claim.id.clone(),
            category: claim.category,
            text: claim.text.clone(),
            surfaced_phrases: to_owned_phrases(chosen),
            disposition: Disposition::ExactMatch,
        };
    }

    let parts = ClaimParts::decompose(&claim.text, vocabulary);
    let joined = join_phrases(&absent);
    let rendered = vocabulary
        .templates_for(claim.category)
        .find_map(|template| parts.render(template, &joined).map(|text| (template, text)));

    let Some((template, text)) = rendered else {
        let gap = AlignError::TemplateGap {
            claim_id: claim.id.clone(),
            category: claim.category,
        };
        warn!("{gap}; emitting verbatim");
        return passthrough(claim, to_owned_phrases(&present), PassthroughReason::TemplateGap);
    };

    let check = verify_paraphrase(&claim.text, &text, &template.connective_words(), chosen);
    if !check.passed {
        warn!(
            "Rewrite of claim '{}' rejected (introduced {:?}, figures {:?}); emitting verbatim",
            claim.id, check.introduced_terms, check.altered_figures
        );
        return passthrough(claim, to_owned_phrases(&present), PassthroughReason::GroundingRejected);
    }

    AlignedBullet {
        claim_id: claim.id.clone(),
        category: claim.category,
        text,
        surfaced_phrases: to_owned_phrases(chosen),
        disposition: Disposition::Rewritten,
    }
}

fn to_owned_phrases(phrases: &[&str]) -> Vec<String> {
    phrases.iter().map(|p| p.to_string()).collect()
}

fn group_by_category(bullets: Vec<AlignedBullet>) -> Vec<AlignedSection> {
    let mut buckets: BTreeMap<ClaimCategory, Vec<AlignedBullet>> = BTreeMap::new();
    for bullet in bullets {
        buckets.entry(bullet.category).or_default().push(bullet);
    }
    ClaimCategory::SECTION_ORDER
        .iter()
        .filter_map(|category| {
            buckets.remove(category).map(|bullets| AlignedSection {
                category: *category,
                bullets,
            })
        })
        .collect()
}

/// A claim split into the pieces templates may reuse.
#[derive(Debug, Clone, PartialEq)]
struct ClaimParts<'a> {
    /// Whole claim, trailing punctuation trimmed.
    full: &'a str,
    /// Claim's own leading action verb, as written.
    verb: Option<&'a str>,
    /// Claim without its metric clause.
    head: &'a str,
    /// Clause after "resulting in".
    metric: Option<&'a str>,
    /// Closing punctuation of the claim, restored after rendering.
    terminal: Option<char>,
}

impl<'a> ClaimParts<'a> {
    fn decompose(text: &'a str, vocabulary: &Vocabulary) -> Self {
        let is_terminal = |c: char| matches!(c, '.' | ';' | '!');
        let terminal = text.trim_end().chars().last().filter(|c| is_terminal(*c));
        let full = text.trim().trim_end_matches(is_terminal).trim_end();

        let (head, metric) = match find_ascii_ci(full, METRIC_MARKER) {
            Some(pos) => {
                let head = full[..pos].trim_end().trim_end_matches(',').trim_end();
                let metric = full[pos + METRIC_MARKER.len()..].trim();
                if head.is_empty() || metric.is_empty() {
                    (full, None)
                } else {
                    (head, Some(metric))
                }
            }
            None => (full, None),
        };

        let verb = full
            .split_once(char::is_whitespace)
            .filter(|(first, rest)| vocabulary.is_action_verb(first) && !rest.trim().is_empty())
            .map(|(first, _)| first);

        Self {
            full,
            verb,
            head,
            metric,
            terminal,
        }
    }

    /// Fills `template` or returns `None` when it needs a piece this claim lacks.
    fn render(&self, template: &Template, phrases: &str) -> Option<String> {
        let use_verb = template.uses(Slot::Verb);
        let use_metric = template.uses(Slot::Metric);
        if (use_verb && self.verb.is_none()) || (use_metric && self.metric.is_none()) {
            return None;
        }

        let base = if use_metric { self.head } else { self.full };
        let core = match (use_verb, self.verb) {
            (true, Some(verb)) => base[verb.len()..].trim_start(),
            _ => base,
        };
        if core.trim().is_empty() {
            return None;
        }

        let rendered = template.render(&TemplateFill {
            verb: self.verb,
            core,
            metric: self.metric,
            phrases,
        })?;
        let mut text = rendered.split_whitespace().collect::<Vec<_>>().join(" ");
        if let Some(mark) = self.terminal {
            text.push(mark);
        }
        Some(text)
    }
}

fn find_ascii_ci(haystack: &str, needle: &str) -> Option<usize> {
    haystack.char_indices().map(|(i, _)| i).find(|&i| {
        haystack
            .get(i..i + needle.len())
            .map_or(false, |window| window.eq_ignore_ascii_case(needle))
    })
}
