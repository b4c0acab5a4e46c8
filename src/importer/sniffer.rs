// ==========================================
// Sheet sniffer
// ==========================================
// Assigns each worksheet to exactly one category (or UNKNOWN) without
// trusting filenames or sheet order. Two paths:
//   1. keyword tiers: strong signatures (5 pts) + weak signatures (1 pt)
//      over the first SCAN_ROW_LIMIT rows, with a row-count guard and a
//      sheet-name bonus/penalty;
//   2. enhanced path: column profiles matched to the field vocabulary,
//      mapped to categories via a fixed field -> category signature
//      table. The field-based result wins when non-UNKNOWN.
// All configuration (overrides, skip patterns) is an explicit value
// threaded through the constructor; scans are reproducible in isolation.
// ==========================================

use crate::domain::types::SheetCategory;
use crate::importer::field_matcher::FieldMatcher;
use crate::importer::grid::{normalize_header, SheetGrid};
use crate::importer::parsers::columns::find_header_row;
use crate::importer::profiler::ColumnProfiler;
use crate::importer::vocabulary::{vocabulary, FieldId};
use crate::tuning;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

// ==========================================
// Detection result
// ==========================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetDetection {
    pub file_name: String,
    pub sheet_name: String,
    pub category: SheetCategory,
    pub score: i32,
    pub strong_matches: usize,
    pub weak_matches: usize,
}

impl SheetDetection {
    fn unknown(file_name: &str, sheet_name: &str) -> Self {
        Self {
            file_name: file_name.to_string(),
            sheet_name: sheet_name.to_string(),
            category: SheetCategory::Unknown,
            score: 0,
            strong_matches: 0,
            weak_matches: 0,
        }
    }
}

// ==========================================
// Configuration
// ==========================================

/// Forces a specific sheet (optionally only within a specific file) to a
/// category regardless of its content score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetOverride {
    /// None applies the override in every file.
    pub file_name: Option<String>,
    pub sheet_name: String,
    pub category: SheetCategory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnifferConfig {
    /// Sheets whose normalized name contains one of these patterns as
    /// whole words are skipped before any scoring ("toc" skips "TOC"
    /// but not "Stock").
    pub skip_sheet_patterns: Vec<String>,
    pub overrides: Vec<SheetOverride>,
    /// Enables the field-signature path on top of keyword scoring.
    pub use_field_signatures: bool,
}

impl Default for SnifferConfig {
    fn default() -> Self {
        Self {
            skip_sheet_patterns: vec![
                "introduction".to_string(),
                "table of contents".to_string(),
                "toc".to_string(),
                "cover".to_string(),
            ],
            overrides: Vec::new(),
            use_field_signatures: true,
        }
    }
}

// ==========================================
// Category signatures
// ==========================================
// Phrases are in normalized form (grid::normalize_header). Strong
// phrases are specific enough to uniquely imply the category; weak terms
// are generic corroboration.

struct CategorySignature {
    category: SheetCategory,
    strong: &'static [&'static str],
    weak: &'static [&'static str],
    /// Sheet-name fragments that reinforce this category.
    name_hints: &'static [&'static str],
    /// Vocabulary fields that, when matched in the columns, imply this
    /// category (enhanced path).
    field_signature: &'static [FieldId],
}

static SIGNATURES: &[CategorySignature] = &[
    CategorySignature {
        category: SheetCategory::SimulationStatus,
        strong: &[
            "simulation status",
            "1st stage simulation",
            "2nd stage simulation",
            "simulation progress",
        ],
        weak: &["simulation", "status", "progress", "station", "area"],
        name_hints: &["simulation", "sim status"],
        field_signature: &[FieldId::StationCode, FieldId::RobotId, FieldId::PercentComplete],
    },
    CategorySignature {
        category: SheetCategory::RobotSpecs,
        strong: &["robot type", "robot number", "dress pack"],
        weak: &["robot", "payload", "reach", "controller"],
        name_hints: &["robot"],
        field_signature: &[FieldId::RobotId, FieldId::Payload, FieldId::Reach],
    },
    CategorySignature {
        category: SheetCategory::InHouseTooling,
        strong: &["in house tooling", "tool list", "tool number"],
        weak: &["tool", "fixture", "detail", "station"],
        name_hints: &["tool"],
        field_signature: &[FieldId::ToolNumber, FieldId::StationCode, FieldId::Supplier],
    },
    CategorySignature {
        category: SheetCategory::AssembliesList,
        strong: &["assembly list", "assembly number"],
        weak: &["assembly", "assy", "station", "area"],
        name_hints: &["assembl"],
        field_signature: &[FieldId::AssemblyNumber, FieldId::StationCode, FieldId::Quantity],
    },
    CategorySignature {
        category: SheetCategory::ReuseRisers,
        strong: &["riser height", "robot riser", "riser reuse"],
        weak: &["riser", "height", "reuse"],
        name_hints: &["riser"],
        field_signature: &[FieldId::RiserHeight, FieldId::PartNumber, FieldId::AllocationStatus],
    },
    CategorySignature {
        category: SheetCategory::ReuseTipDressers,
        strong: &["tip dresser", "dresser type"],
        weak: &["dresser", "tip", "tips", "reuse"],
        name_hints: &["dresser", "tip dress"],
        field_signature: &[FieldId::SerialNumber, FieldId::Model, FieldId::AllocationStatus],
    },
    CategorySignature {
        category: SheetCategory::ReuseWeldGuns,
        strong: &["weld gun list", "weld gun reuse", "gun reuse"],
        weak: &["gun", "weld", "reuse"],
        name_hints: &["gun"],
        field_signature: &[FieldId::GunId, FieldId::PartNumber, FieldId::AllocationStatus],
    },
    CategorySignature {
        category: SheetCategory::GunForce,
        strong: &["gun force", "electrode force"],
        weak: &["force", "kn", "gun"],
        name_hints: &["force"],
        field_signature: &[FieldId::GunId, FieldId::GunForce],
    },
    CategorySignature {
        category: SheetCategory::Metadata,
        strong: &["document owner", "revision history", "change history"],
        weak: &["revision", "author", "date", "version"],
        name_hints: &["metadata", "info", "revision"],
        field_signature: &[],
    },
];

/// Sheet-name fragments marking glossary/definition sheets; matching
/// names are penalized because they describe categories without holding
/// category data.
static GLOSSARY_NAME_FRAGMENTS: &[&str] = &["_def", "definition", "legend", "glossary"];

// ==========================================
// Sniffer
// ==========================================

pub struct SheetSniffer {
    config: SnifferConfig,
    profiler: ColumnProfiler,
    matcher: FieldMatcher,
}

impl SheetSniffer {
    pub fn new(config: SnifferConfig) -> Self {
        Self {
            config,
            profiler: ColumnProfiler::new(),
            matcher: FieldMatcher::new(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(SnifferConfig::default())
    }

    /// Classify one worksheet. Always returns a detection; a category of
    /// UNKNOWN is a resolved answer, not an error.
    pub fn classify(&self, file_name: &str, sheet_name: &str, grid: &SheetGrid) -> SheetDetection {
        if self.is_skipped(sheet_name) {
            debug!(file_name, sheet_name, "sheet skipped by configured pattern");
            return SheetDetection::unknown(file_name, sheet_name);
        }

        if let Some(category) = self.override_for(file_name, sheet_name) {
            debug!(file_name, sheet_name, %category, "sheet category forced by override");
            return SheetDetection {
                file_name: file_name.to_string(),
                sheet_name: sheet_name.to_string(),
                category,
                score: tuning::OVERRIDE_SCORE,
                strong_matches: 0,
                weak_matches: 0,
            };
        }

        let keyword = self.keyword_detection(file_name, sheet_name, grid);

        if self.config.use_field_signatures {
            let field_category = self.field_based_category(grid);
            if field_category != SheetCategory::Unknown && field_category != keyword.category {
                debug!(
                    file_name,
                    sheet_name,
                    keyword_category = %keyword.category,
                    field_category = %field_category,
                    "field-signature path overrides keyword result"
                );
                let (strong, weak) = self.keyword_counts_for(grid, field_category);
                let raw = strong as i32 * tuning::STRONG_KEYWORD_POINTS
                    + weak as i32 * tuning::WEAK_KEYWORD_POINTS;
                return SheetDetection {
                    file_name: file_name.to_string(),
                    sheet_name: sheet_name.to_string(),
                    category: field_category,
                    score: raw.max(tuning::MIN_CATEGORY_SCORE),
                    strong_matches: strong,
                    weak_matches: weak,
                };
            }
        }

        keyword
    }

    // ==========================================
    // Keyword path
    // ==========================================

    fn keyword_detection(
        &self,
        file_name: &str,
        sheet_name: &str,
        grid: &SheetGrid,
    ) -> SheetDetection {
        let row_count = grid.row_count();
        let mut best: Option<(SheetCategory, i32, usize, usize)> = None;

        for signature in SIGNATURES {
            let (strong, weak) = count_keyword_hits(grid, signature);
            let score = strong as i32 * tuning::STRONG_KEYWORD_POINTS
                + weak as i32 * tuning::WEAK_KEYWORD_POINTS;

            if score < tuning::MIN_CATEGORY_SCORE {
                continue;
            }
            // Small sheets with only generic keywords are summary or
            // template sheets, not category data.
            if row_count < tuning::MIN_DATA_ROWS && strong == 0 {
                continue;
            }

            let better = match best {
                None => true,
                Some((_, best_score, best_strong, _)) => {
                    score > best_score || (score == best_score && strong > best_strong)
                }
            };
            if better {
                best = Some((signature.category, score, strong, weak));
            }
        }

        let (category, score, strong, weak) = match best {
            Some(b) => b,
            None => return SheetDetection::unknown(file_name, sheet_name),
        };

        let bonus = sheet_name_adjustment(category, sheet_name);
        let final_score = score + bonus;
        if final_score < tuning::MIN_CATEGORY_SCORE {
            debug!(
                file_name,
                sheet_name,
                %category,
                score,
                bonus,
                "sheet-name penalty dropped category below threshold"
            );
            return SheetDetection::unknown(file_name, sheet_name);
        }

        SheetDetection {
            file_name: file_name.to_string(),
            sheet_name: sheet_name.to_string(),
            category,
            score: final_score,
            strong_matches: strong,
            weak_matches: weak,
        }
    }

    fn keyword_counts_for(&self, grid: &SheetGrid, category: SheetCategory) -> (usize, usize) {
        SIGNATURES
            .iter()
            .find(|s| s.category == category)
            .map(|s| count_keyword_hits(grid, s))
            .unwrap_or((0, 0))
    }

    // ==========================================
    // Field-signature path
    // ==========================================

    fn field_based_category(&self, grid: &SheetGrid) -> SheetCategory {
        let all_synonyms: Vec<&str> = vocabulary()
            .iter()
            .flat_map(|d| d.synonyms.iter().copied())
            .collect();

        let header_row = match find_header_row(
            grid,
            &all_synonyms,
            tuning::HEADER_SCAN_LIMIT,
            tuning::HEADER_MIN_ALIAS_HITS,
        ) {
            Some(row) => row,
            None => return SheetCategory::Unknown,
        };

        let profiles = self.profiler.profile_sheet(grid, header_row);
        let matched: HashSet<FieldId> = self
            .matcher
            .match_columns(profiles)
            .into_iter()
            .filter_map(|r| r.best_match.map(|d| d.id))
            .collect();

        let mut best: Option<(SheetCategory, usize)> = None;
        for signature in SIGNATURES {
            let hits = signature
                .field_signature
                .iter()
                .filter(|f| matched.contains(f))
                .count();
            if hits < tuning::MIN_FIELD_SIGNATURE_HITS {
                continue;
            }
            // First signature in table order wins ties: the table is
            // ordered most-specific first.
            let better = match best {
                None => true,
                Some((_, best_hits)) => hits > best_hits,
            };
            if better {
                best = Some((signature.category, hits));
            }
        }

        best.map(|(c, _)| c).unwrap_or(SheetCategory::Unknown)
    }

    // ==========================================
    // Config lookups
    // ==========================================

    fn is_skipped(&self, sheet_name: &str) -> bool {
        // Space-padded whole-word containment over the normalized name.
        let padded = format!(" {} ", normalize_header(sheet_name));
        self.config.skip_sheet_patterns.iter().any(|p| {
            let pattern = normalize_header(p);
            !pattern.is_empty() && padded.contains(&format!(" {pattern} "))
        })
    }

    fn override_for(&self, file_name: &str, sheet_name: &str) -> Option<SheetCategory> {
        self.config
            .overrides
            .iter()
            .find(|o| {
                o.sheet_name.eq_ignore_ascii_case(sheet_name)
                    && o.file_name
                        .as_deref()
                        .is_none_or(|f| f.eq_ignore_ascii_case(file_name))
            })
            .map(|o| o.category)
    }
}

// ==========================================
// Helpers
// ==========================================

/// Each phrase counts at most once across the scanned rows: a glossary
/// sheet repeating "tip dresser" thirty times in its body must not
/// out-score the sheet-name penalty.
fn count_keyword_hits(grid: &SheetGrid, signature: &CategorySignature) -> (usize, usize) {
    let cells: Vec<String> = grid
        .rows
        .iter()
        .take(tuning::SCAN_ROW_LIMIT)
        .flat_map(|row| row.iter())
        .filter_map(|cell| cell.as_text())
        .map(normalize_header)
        .filter(|t| !t.is_empty())
        .collect();

    let strong = signature
        .strong
        .iter()
        .filter(|phrase| cells.iter().any(|c| c.contains(*phrase)))
        .count();
    let weak = signature
        .weak
        .iter()
        .filter(|term| cells.iter().any(|c| c.contains(*term)))
        .count();

    (strong, weak)
}

/// Bonus (or penalty) from how well the worksheet's own name matches the
/// winning category's naming conventions. Clamped to +/-SHEET_NAME_BONUS_MAX.
fn sheet_name_adjustment(category: SheetCategory, sheet_name: &str) -> i32 {
    let lower = sheet_name.to_lowercase();

    if GLOSSARY_NAME_FRAGMENTS.iter().any(|f| lower.contains(f)) {
        return -tuning::SHEET_NAME_BONUS_MAX;
    }

    let hinted = SIGNATURES
        .iter()
        .find(|s| s.category == category)
        .map(|s| s.name_hints.iter().any(|h| lower.contains(h)))
        .unwrap_or(false);

    if hinted {
        tuning::SHEET_NAME_BONUS_MAX
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::grid::CellValue;

    fn text_row(cells: &[&str]) -> Vec<CellValue> {
        cells.iter().map(|c| CellValue::from_text(c)).collect()
    }

    /// A grid with the given header plus enough filler rows to pass the
    /// row-count guard.
    fn padded_grid(header: Vec<CellValue>, filler: Vec<CellValue>, rows: usize) -> SheetGrid {
        let mut all = vec![header];
        for _ in 0..rows {
            all.push(filler.clone());
        }
        SheetGrid::new(all)
    }

    #[test]
    fn test_strong_signature_wins() {
        let grid = padded_grid(
            text_row(&["Station", "Robot", "Simulation Status", "Progress"]),
            text_row(&["S010", "R010", "ok", "50%"]),
            30,
        );
        let detection = SheetSniffer::with_defaults().classify("plan.xlsx", "Sheet1", &grid);
        assert_eq!(detection.category, SheetCategory::SimulationStatus);
        assert!(detection.strong_matches >= 1);
        assert!(detection.score >= tuning::MIN_CATEGORY_SCORE);
    }

    #[test]
    fn test_small_sheet_without_strong_matches_is_unknown() {
        // Plenty of weak keywords, zero strong, under 25 rows.
        let grid = padded_grid(
            text_row(&["area", "station", "status", "progress", "station"]),
            text_row(&["a", "b", "c", "d", "e"]),
            5,
        );
        let mut config = SnifferConfig::default();
        config.use_field_signatures = false;
        let detection = SheetSniffer::new(config).classify("small.xlsx", "Summary", &grid);
        assert_eq!(detection.category, SheetCategory::Unknown);
    }

    #[test]
    fn test_sheet_name_bonus_reinforces() {
        let grid = padded_grid(
            text_row(&["Riser Height", "Part Number", "Status"]),
            text_row(&["250", "Ka000292S", "available"]),
            30,
        );
        let sniffer = SheetSniffer::with_defaults();
        let named = sniffer.classify("reuse.xlsx", "Risers", &grid);
        let unnamed = sniffer.classify("reuse.xlsx", "Sheet3", &grid);
        assert_eq!(named.category, SheetCategory::ReuseRisers);
        assert!(named.score > unnamed.score);
    }

    #[test]
    fn test_definition_sheet_is_penalized_to_unknown() {
        // A glossary sheet mentioning a strong phrase once: 5 points,
        // -20 name penalty drops it below threshold.
        let grid = padded_grid(
            text_row(&["term", "meaning"]),
            text_row(&["tip dresser", "a device that dresses electrode tips"]),
            30,
        );
        let mut config = SnifferConfig::default();
        config.use_field_signatures = false;
        let detection = SheetSniffer::new(config).classify("doc.xlsx", "reuse_definitions", &grid);
        assert_eq!(detection.category, SheetCategory::Unknown);
    }

    #[test]
    fn test_repeated_strong_phrase_counts_once() {
        // Thirty body rows all mentioning "tip dresser" still count as a
        // single strong match; repetition must not inflate the score.
        let grid = padded_grid(
            text_row(&["term", "meaning"]),
            text_row(&["tip dresser", "tip dresser maintenance note"]),
            30,
        );
        let mut config = SnifferConfig::default();
        config.use_field_signatures = false;
        let detection = SheetSniffer::new(config).classify("doc.xlsx", "Sheet5", &grid);
        assert_eq!(detection.strong_matches, 1);
        assert!(detection.score <= tuning::STRONG_KEYWORD_POINTS + 4);
    }

    #[test]
    fn test_skip_pattern_matches_whole_words_only() {
        let grid = padded_grid(
            text_row(&["Riser Height", "Part Number", "Status"]),
            text_row(&["250", "Ka000292S", "available"]),
            30,
        );
        let sniffer = SheetSniffer::with_defaults();

        // "Stock" contains "toc" as a substring but is a real data sheet.
        let stock = sniffer.classify("reuse.xlsx", "Stock", &grid);
        assert_eq!(stock.category, SheetCategory::ReuseRisers);

        // A sheet actually named "TOC" is still skipped.
        let toc = sniffer.classify("reuse.xlsx", "TOC", &grid);
        assert_eq!(toc.category, SheetCategory::Unknown);
        assert_eq!(toc.score, 0);
    }

    #[test]
    fn test_skip_pattern_short_circuits() {
        let grid = padded_grid(
            text_row(&["Simulation Status"]),
            text_row(&["x"]),
            30,
        );
        let detection =
            SheetSniffer::with_defaults().classify("doc.xlsx", "Table of Contents", &grid);
        assert_eq!(detection.category, SheetCategory::Unknown);
        assert_eq!(detection.score, 0);
    }

    #[test]
    fn test_override_forces_category() {
        let grid = SheetGrid::new(vec![text_row(&["nothing", "useful"])]);
        let config = SnifferConfig {
            overrides: vec![SheetOverride {
                file_name: Some("legacy.xlsx".to_string()),
                sheet_name: "Sheet9".to_string(),
                category: SheetCategory::GunForce,
            }],
            ..SnifferConfig::default()
        };
        let sniffer = SheetSniffer::new(config);

        let forced = sniffer.classify("legacy.xlsx", "Sheet9", &grid);
        assert_eq!(forced.category, SheetCategory::GunForce);
        assert_eq!(forced.score, tuning::OVERRIDE_SCORE);

        // Same sheet name in another file is not forced.
        let other = sniffer.classify("other.xlsx", "Sheet9", &grid);
        assert_eq!(other.category, SheetCategory::Unknown);
    }

    #[test]
    fn test_field_signature_path_beats_keywords() {
        // Headers match RobotSpecs fields exactly, but the body text is
        // salted with weld-gun keywords that would mislead the keyword
        // path on their own.
        let mut rows = vec![text_row(&["Robot Number", "Payload kg", "Reach mm"])];
        for i in 0..30 {
            rows.push(vec![
                CellValue::Text(format!("R{i:03}")),
                CellValue::Number(210.0),
                CellValue::Number(2700.0),
            ]);
        }
        // Salt: generic gun/weld mentions in a comment row.
        rows.push(text_row(&["gun", "weld", "gun", "weld", "gun", "weld"]));
        let grid = SheetGrid::new(rows);

        let detection = SheetSniffer::with_defaults().classify("specs.xlsx", "Sheet1", &grid);
        assert_eq!(detection.category, SheetCategory::RobotSpecs);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let grid = padded_grid(
            text_row(&["Gun Id", "Part Number", "Status", "Weld Gun Reuse"]),
            text_row(&["G-01", "Ka000292S", "available", ""]),
            30,
        );
        let sniffer = SheetSniffer::with_defaults();
        let first = sniffer.classify("guns.xlsx", "Guns", &grid);
        for _ in 0..5 {
            let again = sniffer.classify("guns.xlsx", "Guns", &grid);
            assert_eq!(again.category, first.category);
            assert_eq!(again.score, first.score);
        }
    }
}
