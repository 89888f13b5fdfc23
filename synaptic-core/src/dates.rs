//! Date and year detection in short labels and free text.
//!
//! Patterns are tried in a fixed order, most specific first, so "March 3, 1921"
//! is recognised as a full date rather than the bare year 1921.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum DateKind {
    FullDate,
    IsoDate,
    SlashDate,
    YearRange,
    Year,
    Decade,
    Century,
    Era,
}

const MONTHS: &str = "jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?";

const ORDINAL_WORDS: &str = "first|second|third|fourth|fifth|sixth|seventh|eighth|ninth|tenth|eleventh|twelfth|thirteenth|fourteenth|fifteenth|sixteenth|seventeenth|eighteenth|nineteenth|twentieth|twenty-first";

static PATTERNS: Lazy<Vec<(DateKind, Regex)>> = Lazy::new(|| {
    let specs: Vec<(DateKind, String)> = vec![
        (
            DateKind::FullDate,
            format!(
                r"(?i)\b(?:{m})\.?(?:\s+\d{{1,2}}(?:st|nd|rd|th)?,?)?\s+\d{{3,4}}\b|\b\d{{1,2}}(?:st|nd|rd|th)?\s+(?:{m})\.?,?\s+\d{{3,4}}\b",
                m = MONTHS
            ),
        ),
        (DateKind::IsoDate, r"\b\d{4}-\d{2}-\d{2}\b".to_string()),
        (DateKind::SlashDate, r"\b\d{1,2}/\d{1,2}/\d{2,4}\b".to_string()),
        (
            DateKind::YearRange,
            r"\b\d{3,4}\s*(?:-|–|—|to)\s*\d{2,4}\b".to_string(),
        ),
        (
            DateKind::Year,
            r"\b(?:1\d{3}|20\d{2})\b(?:\s*(?:BCE|BC|AD|CE)\b)?".to_string(),
        ),
        (DateKind::Decade, r"\b(?:1\d|20)\d0s\b".to_string()),
        (
            DateKind::Century,
            format!(
                r"(?i)\b(?:\d{{1,2}}(?:st|nd|rd|th)|{o})\s+century(?:\s+(?:BCE|BC|AD|CE))?\b",
                o = ORDINAL_WORDS
            ),
        ),
        (
            DateKind::Era,
            r"\b\d{1,4}\s*(?:BCE|BC|AD|CE)\b|\b(?:AD|CE)\s*\d{1,4}\b".to_string(),
        ),
    ];

    specs
        .into_iter()
        .filter_map(|(kind, pattern)| match Regex::new(&pattern) {
            Ok(regex) => Some((kind, regex)),
            Err(err) => {
                tracing::error!("Invalid date pattern for {:?}: {}", kind, err);
                None
            }
        })
        .collect()
});

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex"));
static EMPTY_BRACKETS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(\s*\)|\[\s*\]").expect("static regex"));

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DateMatch {
    pub kind: DateKind,
    /// Matched date text as it appeared in the label
    pub text: String,
    /// Label with the date removed; the original label if nothing would remain
    pub remainder: String,
}

/// Find the first date in `label`, trying patterns in priority order.
pub fn extract_date(label: &str) -> Option<DateMatch> {
    PATTERNS.iter().find_map(|(kind, regex)| {
        regex.find(label).map(|m| {
            let mut rest = String::with_capacity(label.len());
            rest.push_str(&label[..m.start()]);
            rest.push(' ');
            rest.push_str(&label[m.end()..]);
            let cleaned = clean_label(&rest);
            DateMatch {
                kind: *kind,
                text: m.as_str().trim().to_string(),
                remainder: if cleaned.is_empty() {
                    label.trim().to_string()
                } else {
                    cleaned
                },
            }
        })
    })
}

pub fn contains_date(text: &str) -> bool {
    PATTERNS.iter().any(|(_, regex)| regex.is_match(text))
}

/// Number of distinct date expressions anywhere in `text`.
pub fn count_distinct_dates(text: &str) -> usize {
    let mut seen = HashSet::new();
    for (_, regex) in PATTERNS.iter() {
        for m in regex.find_iter(text) {
            seen.insert(m.as_str().to_string());
        }
    }
    seen.len()
}

fn clean_label(text: &str) -> String {
    let without_brackets = EMPTY_BRACKETS.replace_all(text, " ");
    let collapsed = WHITESPACE.replace_all(&without_brackets, " ");
    collapsed
        .trim_matches(|c: char| c.is_whitespace() || "-–—:,;.()[]".contains(c))
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind_of(label: &str) -> Option<DateKind> {
        extract_date(label).map(|m| m.kind)
    }

    #[test]
    fn test_pattern_priority() {
        assert_eq!(kind_of("Treaty signed March 3, 1921"), Some(DateKind::FullDate));
        assert_eq!(kind_of("4 July 1776: Independence"), Some(DateKind::FullDate));
        assert_eq!(kind_of("Launch 1969-07-16"), Some(DateKind::IsoDate));
        assert_eq!(kind_of("Filed 12/05/1998"), Some(DateKind::SlashDate));
        assert_eq!(kind_of("World War II (1939-1945)"), Some(DateKind::YearRange));
        assert_eq!(kind_of("Moon landing 1969"), Some(DateKind::Year));
        assert_eq!(kind_of("Jazz age 1920s"), Some(DateKind::Decade));
        assert_eq!(kind_of("Renaissance, 15th century"), Some(DateKind::Century));
        assert_eq!(kind_of("Fall of Rome 476 AD"), Some(DateKind::Era));
        assert_eq!(kind_of("Photosynthesis"), None);
    }

    #[test]
    fn test_remainder_strips_date() {
        let m = extract_date("World War II (1939-1945)").unwrap();
        assert_eq!(m.text, "1939-1945");
        assert_eq!(m.remainder, "World War II");

        let m = extract_date("1969: Moon landing").unwrap();
        assert_eq!(m.text, "1969");
        assert_eq!(m.remainder, "Moon landing");
    }

    #[test]
    fn test_date_only_label_keeps_label() {
        let m = extract_date("1848").unwrap();
        assert_eq!(m.remainder, "1848");
    }

    #[test]
    fn test_year_with_era_suffix() {
        let m = extract_date("Bronze collapse 1177 BC").unwrap();
        assert_eq!(m.kind, DateKind::Year);
        assert_eq!(m.text, "1177 BC");
        assert_eq!(m.remainder, "Bronze collapse");
    }

    #[test]
    fn test_counts() {
        assert!(contains_date("It began in 1914 and ended in 1918."));
        assert!(!contains_date("Cells divide by mitosis."));
        assert_eq!(count_distinct_dates("1914, 1918 and again 1914"), 2);
    }
}
