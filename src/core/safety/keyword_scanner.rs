// Keyword scanner - classifies free text into a risk level.
//
// Three disjoint keyword tiers are checked in order of severity. The first
// tier with a match wins and the lower tiers are never looked at.
// Matching is plain lower-cased substring containment, so a keyword inside a
// longer word still counts ("moe" matches "moeilijk").
//
// The scanner is pure: no I/O, no shared state, no failure modes.

use super::safety_models::{RiskLevel, ScanResult};
use serde::Deserialize;
use std::collections::HashSet;
use thiserror::Error;

pub const HIGH_RISK_REASON: &str = "High risk content detected - immediate attention may be needed";
pub const MEDIUM_RISK_REASON: &str = "Medium risk content detected - monitoring recommended";
pub const LOW_RISK_REASON: &str = "Low risk content detected - general wellbeing check";
pub const NO_MATCH_REASON: &str = "No concerning keywords found";

const DEFAULT_HIGH_RISK: &[&str] = &[
    "zelfmoord",
    "suicide",
    "zelfdoding",
    "dood wil",
    "niet meer leven",
    "afmaken",
    "einde aan maken",
    "niet verder kunnen",
    "geen uitweg",
];

const DEFAULT_MEDIUM_RISK: &[&str] = &[
    "depressief",
    "depressie",
    "wanhoop",
    "hopeloos",
    "geen zin meer",
    "leeg",
    "niks voelen",
    "afstandelijk",
    "niet meer eten",
    "niet slapen",
    "paniekaanval",
    "angstig",
    "overweldigd",
    "burn-out",
    "overspannen",
];

const DEFAULT_LOW_RISK: &[&str] = &[
    "verdrietig",
    "boos",
    "frustratie",
    "eenzaam",
    "alleen",
    "gestrest",
    "moe",
    "uitgeput",
    "overprikkeld",
    "rusteloos",
    "onzeker",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VocabularyError {
    #[error("Empty keyword in {0} tier")]
    EmptyKeyword(RiskLevel),

    #[error("Keyword '{keyword}' appears in both {first} and {second} tiers")]
    Overlap {
        keyword: String,
        first: RiskLevel,
        second: RiskLevel,
    },
}

/// Raw vocabulary as read from a JSON keyword file.
#[derive(Debug, Clone, Deserialize)]
pub struct VocabularyFile {
    pub high: Vec<String>,
    pub medium: Vec<String>,
    pub low: Vec<String>,
}

/// The three keyword tiers. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordVocabulary {
    high: Vec<String>,
    medium: Vec<String>,
    low: Vec<String>,
}

impl KeywordVocabulary {
    /// Build a vocabulary, normalizing keywords to trimmed lower-case.
    ///
    /// Fails on empty keywords and on keywords shared between tiers.
    /// Duplicates within one tier are collapsed.
    pub fn new<I, S>(high: I, medium: I, low: I) -> Result<Self, VocabularyError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let high = normalize_tier(high, RiskLevel::High)?;
        let medium = normalize_tier(medium, RiskLevel::Medium)?;
        let low = normalize_tier(low, RiskLevel::Low)?;

        let tiers = [
            (RiskLevel::High, &high),
            (RiskLevel::Medium, &medium),
            (RiskLevel::Low, &low),
        ];
        for (i, (first, first_words)) in tiers.iter().enumerate() {
            for (second, second_words) in tiers.iter().skip(i + 1) {
                if let Some(keyword) = first_words.iter().find(|k| second_words.contains(*k)) {
                    return Err(VocabularyError::Overlap {
                        keyword: keyword.clone(),
                        first: *first,
                        second: *second,
                    });
                }
            }
        }

        Ok(Self { high, medium, low })
    }

    pub fn from_file(file: VocabularyFile) -> Result<Self, VocabularyError> {
        Self::new(file.high, file.medium, file.low)
    }

    pub fn tier(&self, level: RiskLevel) -> &[String] {
        match level {
            RiskLevel::High => &self.high,
            RiskLevel::Medium => &self.medium,
            RiskLevel::Low => &self.low,
        }
    }
}

impl Default for KeywordVocabulary {
    /// The Dutch vocabulary used on the community platform.
    fn default() -> Self {
        let owned = |words: &[&str]| words.iter().map(|w| w.to_string()).collect::<Vec<_>>();
        Self {
            high: owned(DEFAULT_HIGH_RISK),
            medium: owned(DEFAULT_MEDIUM_RISK),
            low: owned(DEFAULT_LOW_RISK),
        }
    }
}

fn normalize_tier<I, S>(words: I, level: RiskLevel) -> Result<Vec<String>, VocabularyError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut tier = Vec::new();
    for word in words {
        let keyword = word.as_ref().trim().to_lowercase();
        if keyword.is_empty() {
            return Err(VocabularyError::EmptyKeyword(level));
        }
        if seen.insert(keyword.clone()) {
            tier.push(keyword);
        }
    }
    Ok(tier)
}

/// Rule-based risk classifier over a fixed vocabulary.
#[derive(Debug, Clone, Default)]
pub struct KeywordScanner {
    vocabulary: KeywordVocabulary,
}

impl KeywordScanner {
    pub fn new(vocabulary: KeywordVocabulary) -> Self {
        Self { vocabulary }
    }

    /// Classify `text`. HIGH short-circuits MEDIUM, MEDIUM short-circuits LOW.
    pub fn scan(&self, text: &str) -> ScanResult {
        let lowered = text.to_lowercase();

        let tiers = [
            (RiskLevel::High, HIGH_RISK_REASON),
            (RiskLevel::Medium, MEDIUM_RISK_REASON),
            (RiskLevel::Low, LOW_RISK_REASON),
        ];

        for (level, reason) in tiers {
            let matched: Vec<String> = self
                .vocabulary
                .tier(level)
                .iter()
                .filter(|keyword| lowered.contains(keyword.as_str()))
                .cloned()
                .collect();

            if !matched.is_empty() {
                return ScanResult {
                    risk_level: level,
                    reason: reason.to_string(),
                    matched_keywords: matched,
                };
            }
        }

        ScanResult {
            risk_level: RiskLevel::Low,
            reason: NO_MATCH_REASON.to_string(),
            matched_keywords: Vec::new(),
        }
    }
}
