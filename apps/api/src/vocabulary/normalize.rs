//! Text normalization shared by the vocabulary index, the extractor and the grounding guard.
//!
//! Tokens are lowercase runs of alphanumerics plus `+` and `#` (so "C++" and "C#"
//! survive). Everything else separates tokens, which means "A/B testing" and
//! "a b testing" normalize identically.

fn is_token_char(c: char) -> bool {
    c.is_alphanumeric() || c == '+' || c == '#'
}

pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !is_token_char(c))
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Canonical lookup key for a phrase: its tokens joined by single spaces.
pub fn normalize_phrase(phrase: &str) -> String {
    tokenize(phrase).join(" ")
}

/// All n-grams of length 1..=max_n, in text order, shortest first at each position.
pub fn ngrams(tokens: &[String], max_n: usize) -> Vec<String> {
    let mut grams = Vec::new();
    for start in 0..tokens.len() {
        for n in 1..=max_n {
            if start + n > tokens.len() {
                break;
            }
            grams.push(tokens[start..start + n].join(" "));
        }
    }
    grams
}

/// True when the normalized phrase occurs as a contiguous token run.
pub fn contains_phrase(tokens: &[String], normalized: &str) -> bool {
    let needle: Vec<&str> = normalized.split(' ').filter(|t| !t.is_empty()).collect();
    if needle.is_empty() || needle.len() > tokens.len() {
        return false;
    }
    tokens
        .windows(needle.len())
        .any(|w| w.iter().zip(&needle).all(|(a, b)| a == b))
}

/// Tokens carrying a figure (counts, percentages, amounts, years).
pub fn numeric_tokens(tokens: &[String]) -> Vec<String> {
    let mut figures: Vec<String> = tokens
        .iter()
        .filter(|t| t.chars().any(|c| c.is_ascii_digit()))
        .cloned()
        .collect();
    figures.sort();
    figures
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_lowercases_and_splits_punctuation() {
        assert_eq!(
            tokenize("Looking for strong Python, SQL skills."),
            vec!["looking", "for", "strong", "python", "sql", "skills"]
        );
    }

    #[test]
    fn test_tokenize_keeps_plus_and_hash() {
        assert_eq!(tokenize("C++ and C#"), vec!["c++", "and", "c#"]);
    }

    #[test]
    fn test_normalize_phrase_collapses_separators() {
        assert_eq!(normalize_phrase("A/B  Testing"), "a b testing");
        assert_eq!(normalize_phrase("cross-functional collaboration"), "cross functional collaboration");
    }

    #[test]
    fn test_ngrams_up_to_three() {
        let tokens = tokenize("risk management role");
        assert_eq!(
            ngrams(&tokens, 3),
            vec![
                "risk",
                "risk management",
                "risk management role",
                "management",
                "management role",
                "role"
            ]
        );
    }

    #[test]
    fn test_contains_phrase_requires_whole_tokens() {
        let tokens = tokenize("product roadmapping");
        assert!(!contains_phrase(&tokens, "roadmap"));
        assert!(contains_phrase(&tokens, "product roadmapping"));
    }

    #[test]
    fn test_numeric_tokens_sorted() {
        let tokens = tokenize("Cut costs 20% across 3 teams in 2023");
        assert_eq!(numeric_tokens(&tokens), vec!["20", "2023", "3"]);
    }
}
