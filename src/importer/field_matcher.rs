// ==========================================
// Field matcher
// ==========================================
// Scores each column profile against every field descriptor and keeps
// the best acceptable candidate. A column with no acceptable match is a
// legitimate outcome (vacuum parsing picks it up later), not an error.
// ==========================================

use crate::importer::profiler::{ColumnProfile, DominantType};
use crate::importer::vocabulary::{vocabulary, ExpectedType, FieldDescriptor};
use crate::tuning;

// ==========================================
// Match result
// ==========================================

#[derive(Debug, Clone)]
pub struct FieldMatchResult {
    pub profile: ColumnProfile,
    pub best_match: Option<&'static FieldDescriptor>,
    pub score: i32,
}

// ==========================================
// Matcher
// ==========================================

#[derive(Debug, Default)]
pub struct FieldMatcher;

impl FieldMatcher {
    pub fn new() -> Self {
        Self
    }

    /// Match one column against the whole vocabulary. Ties are broken by
    /// descriptor importance (higher wins).
    pub fn match_column(&self, profile: ColumnProfile) -> FieldMatchResult {
        let mut best: Option<(&'static FieldDescriptor, i32)> = None;

        for descriptor in vocabulary() {
            let score = self.score_against(&profile, descriptor);
            let better = match best {
                None => true,
                Some((current, current_score)) => {
                    score > current_score
                        || (score == current_score && descriptor.importance > current.importance)
                }
            };
            if better {
                best = Some((descriptor, score));
            }
        }

        match best {
            Some((descriptor, score)) if score >= tuning::MIN_FIELD_MATCH_SCORE => {
                FieldMatchResult {
                    profile,
                    best_match: Some(descriptor),
                    score,
                }
            }
            Some((_, score)) => FieldMatchResult {
                profile,
                best_match: None,
                score,
            },
            None => FieldMatchResult {
                profile,
                best_match: None,
                score: 0,
            },
        }
    }

    pub fn match_columns(&self, profiles: Vec<ColumnProfile>) -> Vec<FieldMatchResult> {
        profiles.into_iter().map(|p| self.match_column(p)).collect()
    }

    // ==========================================
    // Scoring
    // ==========================================
    // (a) normalized-header equality/containment against synonyms
    // (b) type-distribution compatibility with the expected type
    // (c) fill-rate/cardinality plausibility for identifiers

    fn score_against(&self, profile: &ColumnProfile, descriptor: &FieldDescriptor) -> i32 {
        let header = profile.header_normalized.as_str();
        if header.is_empty() {
            return 0;
        }

        let mut score = 0;
        score += header_points(header, descriptor.synonyms);
        if score == 0 {
            // No lexical evidence at all: type agreement alone is never
            // enough to claim a column.
            return 0;
        }

        score += type_points(profile, descriptor.expected_type);

        if descriptor.expected_type == ExpectedType::Identifier && profile.is_near_unique() {
            score += tuning::UNIQUENESS_BONUS_POINTS;
        }

        score
    }
}

fn header_points(header: &str, synonyms: &[&str]) -> i32 {
    if synonyms.iter().any(|s| *s == header) {
        return tuning::HEADER_EXACT_POINTS;
    }
    // Substring containment either way, guarded against trivially short
    // synonyms ("pn" inside "component" would be noise).
    let contained = synonyms.iter().any(|s| {
        (s.len() >= 3 && header.contains(s)) || (header.len() >= 3 && s.contains(header))
    });
    if contained {
        tuning::HEADER_SUBSTRING_POINTS
    } else {
        0
    }
}

fn type_points(profile: &ColumnProfile, expected: ExpectedType) -> i32 {
    let dominant = match profile.type_distribution.dominant() {
        Some(d) => d,
        // An all-empty column neither confirms nor contradicts.
        None => return 0,
    };

    let compatible = match expected {
        ExpectedType::Text | ExpectedType::Identifier => {
            matches!(dominant, DominantType::Text)
                // Numeric part numbers and station codes are common.
                || matches!(dominant, DominantType::Number)
        }
        ExpectedType::Numeric => matches!(dominant, DominantType::Number),
        ExpectedType::Percent => {
            matches!(dominant, DominantType::Number) || matches!(dominant, DominantType::Text)
        }
        ExpectedType::Flag => {
            matches!(dominant, DominantType::Bool) || matches!(dominant, DominantType::Text)
        }
    };

    if compatible {
        tuning::TYPE_COMPATIBLE_POINTS
    } else {
        tuning::TYPE_INCOMPATIBLE_POINTS
    }
}
