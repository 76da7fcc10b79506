//! Grounding guard: verifies a rewritten bullet is a paraphrase of its claim.
//!
//! PASS requires both:
//! - every word of the bullet comes from the claim, from the template's literal
//!   text restricted to the fixed connective list, or from a surfaced phrase
//! - the figures (tokens with digits) of bullet and claim are the same multiset
//!
//! Anything else means the rewrite added a fact, and the claim is emitted verbatim.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::vocabulary::normalize::{numeric_tokens, tokenize};
use crate::vocabulary::template::is_connective;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundingCheck {
    pub passed: bool,
    /// Words present in the bullet but not allowed by the claim.
    pub introduced_terms: Vec<String>,
    /// Figures added to or dropped from the claim.
    pub altered_figures: Vec<String>,
}

pub fn verify_paraphrase(
    claim_text: &str,
    bullet_text: &str,
    connectives: &[String],
    surfaced_phrases: &[&str],
) -> GroundingCheck {
    let claim_tokens = tokenize(claim_text);
    let bullet_tokens = tokenize(bullet_text);

    let allowed: BTreeSet<&str> = claim_tokens
        .iter()
        .map(String::as_str)
        .chain(
            connectives
                .iter()
                .map(String::as_str)
                .filter(|w| is_connective(w)),
        )
        .collect();
    let phrase_words: BTreeSet<String> = surfaced_phrases
        .iter()
        .flat_map(|p| tokenize(p))
        .collect();

    let introduced_terms: Vec<String> = bullet_tokens
        .iter()
        .filter(|t| !allowed.contains(t.as_str()) && !phrase_words.contains(*t))
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let claim_figures = numeric_tokens(&claim_tokens);
    let bullet_figures = numeric_tokens(&bullet_tokens);
    let altered_figures = if claim_figures == bullet_figures {
        Vec::new()
    } else {
        symmetric_difference(&claim_figures, &bullet_figures)
    };

    GroundingCheck {
        passed: introduced_terms.is_empty() && altered_figures.is_empty(),
        introduced_terms,
        altered_figures,
    }
}

/// Multiset difference in both directions of two sorted lists.
fn symmetric_difference(a: &[String], b: &[String]) -> Vec<String> {
    let mut out = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < a.len() || j < b.len() {
        match (a.get(i), b.get(j)) {
            (Some(x), Some(y)) if x == y => {
                i += 1;
                j += 1;
            }
            (Some(x), Some(y)) if x < y => {
                out.push(x.clone());
                i += 1;
            }
            (Some(_), Some(y)) => {
                out.push(y.clone());
                j += 1;
            }
            (Some(x), None) => {
                out.push(x.clone());
                i += 1;
            }
            (None, Some(y)) => {
                out.push(y.clone());
                j += 1;
            }
            (None, None) => break,
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connectives() -> Vec<String> {
        tokenize("with a focus on resulting in")
    }

    #[test]
    fn test_pass_for_template_rewrite() {
        let check = verify_paraphrase(
            "Built churn dashboards resulting in 12% retention lift",
            "Built churn dashboards with a focus on SQL, resulting in 12% retention lift",
            &connectives(),
            &["SQL"],
        );
        assert!(check.passed, "{check:?}");
    }

    #[test]
    fn test_fail_when_new_noun_added() {
        let check = verify_paraphrase(
            "Built churn dashboards",
            "Built churn dashboards for Google with a focus on SQL",
            &connectives(),
            &["SQL"],
        );
        assert!(!check.passed);
        assert_eq!(check.introduced_terms, vec!["for", "google"]);
    }

    #[test]
    fn test_non_connective_template_words_not_grounded() {
        let check = verify_paraphrase(
            "Tuned Postgres queries",
            "Tuned Postgres queries as Staff Engineer at Google with a focus on SQL",
            &tokenize("as Staff Engineer at Google with a focus on"),
            &["SQL"],
        );
        assert!(!check.passed);
        assert_eq!(
            check.introduced_terms,
            vec!["as", "at", "engineer", "google", "staff"]
        );
    }

    #[test]
    fn test_fail_when_figure_inflated() {
        let check = verify_paraphrase(
            "Cut costs by 10%",
            "Cut costs by 40%",
            &connectives(),
            &[],
        );
        assert!(!check.passed);
        assert_eq!(check.altered_figures, vec!["10", "40"]);
        assert!(check.introduced_terms.contains(&"40".to_string()));
    }

    #[test]
    fn test_fail_when_figure_dropped() {
        let check = verify_paraphrase(
            "Led 3 launches in 2023",
            "Led launches in 2023",
            &connectives(),
            &[],
        );
        assert!(!check.passed);
        assert_eq!(check.altered_figures, vec!["3"]);
    }

    #[test]
    fn test_verbatim_always_passes() {
        let text = "Managed a $2M budget across 4 regions";
        assert!(verify_paraphrase(text, text, &[], &[]).passed);
    }
}
