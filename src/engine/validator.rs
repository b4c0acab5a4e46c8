// ==========================================
// Body-shop ingestion - result validation
// ==========================================
// Sanity thresholds over a completed run. Warnings only, never errors:
// a noisy source tree is a fact of life, not a failure.
// ==========================================

use crate::domain::types::AllocationStatus;
use crate::engine::orchestrator::IngestionResult;
use crate::tuning;

/// Inspect a completed result and report suspicious ratios as
/// human-readable warnings.
pub fn validate_result(result: &IngestionResult) -> Vec<String> {
    let mut warnings = Vec::new();

    let total_reuse = result.reuse_records.len();
    if total_reuse > 0 {
        let unmatched = result.unmatched_reuse_records.len();
        let ratio = unmatched as f64 / total_reuse as f64;
        if ratio > tuning::UNMATCHED_REUSE_WARN_RATIO {
            warnings.push(format!(
                "{unmatched} of {total_reuse} reuse records ({:.0}%) could not be linked to any asset",
                ratio * 100.0
            ));
        }

        let unknown = result
            .reuse_records
            .iter()
            .filter(|r| r.allocation_status == AllocationStatus::Unknown)
            .count();
        let ratio = unknown as f64 / total_reuse as f64;
        if ratio > tuning::UNKNOWN_ALLOCATION_WARN_RATIO {
            warnings.push(format!(
                "{unknown} of {total_reuse} reuse records ({:.0}%) have UNKNOWN allocation status",
                ratio * 100.0
            ));
        }
    }

    let total_assets = result.assets.len();
    if total_assets > 0 {
        let without_reuse = result
            .assets
            .iter()
            .filter(|a| !a.has_reuse_info())
            .count();
        let ratio = without_reuse as f64 / total_assets as f64;
        if ratio > tuning::ASSETS_WITHOUT_REUSE_WARN_RATIO {
            warnings.push(format!(
                "{without_reuse} of {total_assets} assets ({:.0}%) carry no reuse info",
                ratio * 100.0
            ));
        }
    }

    warnings
}
