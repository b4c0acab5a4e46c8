// ==========================================
// Tuning constants
// ==========================================
// Every numeric threshold used by the classification, matching, linking
// and bottleneck heuristics lives here. These are load-bearing business
// rules, not incidental tuning knobs: change them only together with the
// tests that pin their behavior.
// ==========================================

// ==========================================
// Sheet sniffer
// ==========================================

/// Points awarded per strong keyword hit (phrases specific enough to
/// uniquely imply a category).
pub const STRONG_KEYWORD_POINTS: i32 = 5;

/// Points awarded per weak keyword hit (generic terms like "station").
pub const WEAK_KEYWORD_POINTS: i32 = 1;

/// Minimum accumulated score for a category to be eligible at all.
pub const MIN_CATEGORY_SCORE: i32 = 5;

/// Maximum bonus or penalty contributed by the worksheet's own name.
pub const SHEET_NAME_BONUS_MAX: i32 = 20;

/// Worksheets with fewer rows than this and zero strong matches are
/// rejected as summary/template sheets.
pub const MIN_DATA_ROWS: usize = 25;

/// How many leading rows of a worksheet the sniffer scans for keywords.
pub const SCAN_ROW_LIMIT: usize = 30;

/// Score assigned to detections forced by a manual per-file override.
pub const OVERRIDE_SCORE: i32 = 100;

/// Minimum matched-field count before the field-signature path is allowed
/// to claim a category.
pub const MIN_FIELD_SIGNATURE_HITS: usize = 2;

// ==========================================
// Column profiler / field matcher
// ==========================================

/// How many data rows below the header are sampled per column profile.
pub const PROFILE_SAMPLE_ROWS: usize = 50;

/// Header normalized-equal to a synonym.
pub const HEADER_EXACT_POINTS: i32 = 10;

/// Header/synonym substring containment (weaker evidence).
pub const HEADER_SUBSTRING_POINTS: i32 = 4;

/// Dominant cell type agrees with the descriptor's expected type.
pub const TYPE_COMPATIBLE_POINTS: i32 = 2;

/// Dominant cell type contradicts the descriptor's expected type.
pub const TYPE_INCOMPATIBLE_POINTS: i32 = -2;

/// Identifier columns that are near-unique get a plausibility bonus.
pub const UNIQUENESS_BONUS_POINTS: i32 = 1;

/// Distinct/non-empty ratio above which a column counts as near-unique.
pub const NEAR_UNIQUE_RATIO: f64 = 0.9;

/// Minimum score for a descriptor to be accepted as a column's match.
pub const MIN_FIELD_MATCH_SCORE: i32 = 5;

// ==========================================
// Category parsers
// ==========================================

/// Rows with fewer populated cells than this are structurally
/// insufficient and skipped without a warning.
pub const MIN_POPULATED_CELLS: usize = 2;

/// How many leading rows are scanned when locating the header row.
pub const HEADER_SCAN_LIMIT: usize = 15;

/// Minimum alias hits in a row for it to qualify as the header row.
pub const HEADER_MIN_ALIAS_HITS: usize = 2;

// ==========================================
// Reuse linker
// ==========================================

/// Target line + station both match.
pub const SCORE_TARGET_LOCATION: i32 = 2;

/// Equipment-type category matches the asset's detailed kind.
pub const SCORE_ASSET_TYPE: i32 = 1;

/// Exact part-number match.
pub const SCORE_PART_NUMBER: i32 = 2;

/// Exact serial-number match.
pub const SCORE_SERIAL_NUMBER: i32 = 2;

/// Exact gun-identifier match.
pub const SCORE_GUN_ID: i32 = 2;

/// Exact model match.
pub const SCORE_MODEL: i32 = 1;

/// Scores at or above this are accepted immediately (high confidence).
pub const LINK_ACCEPT_SCORE: i32 = 3;

/// Minimum score for the single-best fuzzy fallback.
pub const LINK_MIN_SCORE: i32 = 2;

// ==========================================
// Workflow bottleneck engine
// ==========================================

/// Design below this percent (while in progress) still counts as
/// "not detailed".
pub const DESIGN_DETAILED_PCT: u8 = 75;

/// Simulation below this percent (design done) counts as lagging.
pub const SIM_LAG_PCT: u8 = 25;

/// Manufacture below this percent with an external supplier counts as a
/// supplier delay.
pub const SUPPLIER_DELAY_PCT: u8 = 50;

/// Severity boosts added onto the inverted percent-complete base.
pub const BOOST_CRITICAL: u32 = 30;
pub const BOOST_HIGH: u32 = 20;
pub const BOOST_MEDIUM: u32 = 10;

/// Hard cap for the combined severity score.
pub const SEVERITY_SCORE_CAP: u32 = 130;

// ==========================================
// Result validator
// ==========================================

/// Warn when more than this share of reuse records stayed unmatched.
pub const UNMATCHED_REUSE_WARN_RATIO: f64 = 0.5;

/// Warn when more than this share of reuse records has UNKNOWN allocation.
pub const UNKNOWN_ALLOCATION_WARN_RATIO: f64 = 0.3;

/// Warn when more than this share of assets carries no linked reuse info.
pub const ASSETS_WITHOUT_REUSE_WARN_RATIO: f64 = 0.8;
