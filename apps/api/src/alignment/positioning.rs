//! Positioning statement: one sentence summarizing the aligned profile.
//!
//! Built only from the profile headline and phrases some bullet actually surfaces,
//! so it never claims more than the bullets do.

use std::collections::BTreeSet;

use crate::models::aligned::AlignmentResult;
use crate::models::profile::{ClaimCategory, ProfileStore};
use crate::models::signal::JobSignal;
use crate::vocabulary::template::join_phrases;

const MAX_POSITIONING_PHRASES: usize = 3;

/// `signals` must already be ordered strongest first.
pub fn positioning_statement(
    profile: &ProfileStore,
    result: &AlignmentResult,
    signals: &[&JobSignal],
) -> String {
    let surfaced: BTreeSet<&str> = result
        .bullets()
        .flat_map(|b| b.surfaced_phrases.iter().map(String::as_str))
        .collect();

    let mut phrases: Vec<&str> = Vec::new();
    for signal in signals {
        let phrase = signal.phrase.as_str();
        if surfaced.contains(phrase) && !phrases.contains(&phrase) {
            phrases.push(phrase);
        }
        if phrases.len() == MAX_POSITIONING_PHRASES {
            break;
        }
    }

    let headline = profile
        .headline()
        .map(|h| h.trim_end_matches(|c: char| matches!(c, '.' | '!' | ';')).trim_end())
        .filter(|h| !h.is_empty());

    match (headline, phrases.is_empty()) {
        (Some(headline), false) => {
            format!("{headline} with experience in {}.", join_phrases(&phrases))
        }
        (Some(headline), true) => format!("{headline}."),
        (None, false) => format!("Experience spans {}.", join_phrases(&phrases)),
        (None, true) => format!("Profile covering {}.", category_summary(profile)),
    }
}

fn category_summary(profile: &ProfileStore) -> String {
    let parts: Vec<String> = ClaimCategory::SECTION_ORDER
        .iter()
        .filter_map(|category| {
            let count = profile
                .claims()
                .iter()
                .filter(|c| c.category == *category)
                .count();
            (count > 0).then(|| describe_count(*category, count))
        })
        .collect();
    let refs: Vec<&str> = parts.iter().map(String::as_str).collect();
    join_phrases(&refs)
}

fn describe_count(category: ClaimCategory, count: usize) -> String {
    let noun = match (category, count) {
        (ClaimCategory::Role, 1) => "role",
        (ClaimCategory::Role, _) => "roles",
        (ClaimCategory::Achievement, 1) => "achievement",
        (ClaimCategory::Achievement, _) => "achievements",
        (ClaimCategory::Skill, 1) => "skill",
        (ClaimCategory::Skill, _) => "skills",
        (ClaimCategory::Education, 1) => "education entry",
        (ClaimCategory::Education, _) => "education entries",
    };
    format!("{count} {noun}")
}
