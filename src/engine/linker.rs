// ==========================================
// Body-shop ingestion - reuse linker
// ==========================================
// Responsibility: attach the best-matching reuse record to each primary
// asset. Works on copies; the caller's assets are never mutated.
// Red line: every accept/reject follows the scored thresholds, no
// special cases per asset type.
// ==========================================

use crate::domain::asset::SimplifiedAsset;
use crate::domain::reuse::ReuseRecord;
use crate::domain::types::ReuseSource;
use crate::tuning;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

// ==========================================
// Outcome types
// ==========================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkingStats {
    pub total_reuse_records: usize,
    pub linked: usize,
    pub unmatched: usize,
}

#[derive(Debug, Clone)]
pub struct LinkOutcome {
    /// Updated copies of the input assets, same order.
    pub assets: Vec<SimplifiedAsset>,
    /// Records that matched nothing. Diagnostics, not an error.
    pub unmatched_reuse_records: Vec<ReuseRecord>,
    pub stats: LinkingStats,
}

// ==========================================
// ReuseLinker
// ==========================================

#[derive(Debug, Default)]
pub struct ReuseLinker;

impl ReuseLinker {
    pub fn new() -> Self {
        Self
    }

    /// Match every reuse record against every asset, then resolve
    /// per-asset conflicts (INTERNAL first, then score, then record
    /// order) and enrich each winning asset in place on its copy.
    pub fn link(&self, assets: &[SimplifiedAsset], records: &[ReuseRecord]) -> LinkOutcome {
        let mut out_assets: Vec<SimplifiedAsset> = assets.to_vec();
        // chosen[a] = (record index, score) currently holding asset a.
        let mut chosen: Vec<Option<(usize, i32)>> = vec![None; assets.len()];
        let mut unmatched: Vec<ReuseRecord> = Vec::new();

        for (record_idx, record) in records.iter().enumerate() {
            if !record.has_location_info() {
                debug!(record_id = %record.id, "record has no location info, excluded");
                unmatched.push(record.clone());
                continue;
            }

            match self.pick_asset(record, assets) {
                Some((asset_idx, score)) => {
                    match chosen[asset_idx] {
                        Some((held_idx, held_score))
                            if !Self::displaces(
                                record, score,
                                &records[held_idx], held_score,
                            ) =>
                        {
                            unmatched.push(record.clone());
                        }
                        Some((held_idx, _)) => {
                            unmatched.push(records[held_idx].clone());
                            chosen[asset_idx] = Some((record_idx, score));
                        }
                        None => {
                            chosen[asset_idx] = Some((record_idx, score));
                        }
                    }
                }
                None => unmatched.push(record.clone()),
            }
        }

        for (asset_idx, slot) in chosen.iter().enumerate() {
            if let Some((record_idx, score)) = slot {
                Self::enrich(&mut out_assets[asset_idx], &records[*record_idx]);
                debug!(
                    record_id = %records[*record_idx].id,
                    asset_idx,
                    score,
                    "reuse record linked"
                );
            }
        }

        let linked = chosen.iter().filter(|slot| slot.is_some()).count();
        let stats = LinkingStats {
            total_reuse_records: records.len(),
            linked,
            unmatched: records.len() - linked,
        };

        info!(
            total = stats.total_reuse_records,
            linked = stats.linked,
            unmatched = stats.unmatched,
            "reuse linking complete"
        );

        LinkOutcome { assets: out_assets, unmatched_reuse_records: unmatched, stats }
    }

    /// The asset this record should attach to, if any. High-confidence
    /// matches (score >= 3) are accepted outright, taking the highest
    /// scorer; otherwise the single best fuzzy match (score >= 2) is
    /// accepted only when it is unambiguous.
    fn pick_asset(&self, record: &ReuseRecord, assets: &[SimplifiedAsset]) -> Option<(usize, i32)> {
        let scores: Vec<i32> = assets
            .iter()
            .map(|asset| Self::match_score(record, asset))
            .collect();

        let best = scores.iter().copied().max().unwrap_or(0);

        if best >= tuning::LINK_ACCEPT_SCORE {
            let idx = scores.iter().position(|s| *s == best)?;
            return Some((idx, best));
        }

        if best >= tuning::LINK_MIN_SCORE {
            // Fuzzy tier: a tie means genuine ambiguity, leave unmatched.
            if scores.iter().filter(|s| **s == best).count() == 1 {
                let idx = scores.iter().position(|s| *s == best)?;
                return Some((idx, best));
            }
        }

        None
    }

    /// Additive match score between one record and one asset.
    fn match_score(record: &ReuseRecord, asset: &SimplifiedAsset) -> i32 {
        let mut score = 0;

        if record
            .target_location
            .matches_line_station(asset.line.as_deref(), asset.station.as_deref())
        {
            score += tuning::SCORE_TARGET_LOCATION;
        }
        if asset.asset_type() == Some(record.asset_type) {
            score += tuning::SCORE_ASSET_TYPE;
        }
        if Self::ids_eq(&record.identifiers.part_number, &asset.identifiers.part_number) {
            score += tuning::SCORE_PART_NUMBER;
        }
        if Self::ids_eq(&record.identifiers.serial_number, &asset.identifiers.serial_number) {
            score += tuning::SCORE_SERIAL_NUMBER;
        }
        if Self::ids_eq(&record.identifiers.gun_id, &asset.identifiers.gun_id) {
            score += tuning::SCORE_GUN_ID;
        }
        if Self::ids_eq(&record.identifiers.model, &asset.identifiers.model) {
            score += tuning::SCORE_MODEL;
        }

        score
    }

    fn ids_eq(a: &Option<String>, b: &Option<String>) -> bool {
        match (a, b) {
            (Some(x), Some(y)) => x.trim().eq_ignore_ascii_case(y.trim()),
            _ => false,
        }
    }

    /// Conflict resolution when two records claim the same asset:
    /// INTERNAL beats DESIGNOS, then the higher score wins, then the
    /// earlier record keeps its claim.
    fn displaces(
        challenger: &ReuseRecord,
        challenger_score: i32,
        holder: &ReuseRecord,
        holder_score: i32,
    ) -> bool {
        let challenger_internal = challenger.provenance.source == ReuseSource::Internal;
        let holder_internal = holder.provenance.source == ReuseSource::Internal;
        if challenger_internal != holder_internal {
            return challenger_internal;
        }
        challenger_score > holder_score
    }

    /// Fill missing identifiers and attach the three provenance tags.
    fn enrich(asset: &mut SimplifiedAsset, record: &ReuseRecord) {
        asset.identifiers.fill_missing_from(&record.identifiers);
        asset.add_tag(&format!(
            "reuse-source:{}",
            record.provenance.source.to_string().to_lowercase()
        ));
        asset.add_tag(&format!(
            "allocation:{}",
            record.allocation_status.to_string().to_lowercase()
        ));
        asset.add_tag(&format!("reuse-from:{}", record.provenance.breadcrumb()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::reuse::{EquipmentIdentifiers, LocationRef, Provenance};
    use crate::domain::types::{AllocationStatus, AssetType};

    fn record(
        asset_type: AssetType,
        source: ReuseSource,
        target: LocationRef,
        identifiers: EquipmentIdentifiers,
    ) -> ReuseRecord {
        ReuseRecord::new(
            asset_type,
            AllocationStatus::Available,
            LocationRef::new(Some("OLD".to_string()), None, Some("S1".to_string())),
            target,
            identifiers,
            Provenance {
                workbook_id: "RISERS.xlsx".to_string(),
                sheet_name: "Risers".to_string(),
                row_index: 2,
                source,
            },
        )
    }

    fn riser_asset(line: &str, station: &str) -> SimplifiedAsset {
        SimplifiedAsset {
            line: Some(line.to_string()),
            station: Some(station.to_string()),
            detailed_kind: "Riser".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_location_plus_part_number_is_accepted() {
        let mut asset = riser_asset("L2", "S2");
        asset.identifiers.part_number = Some("Ka000292S".to_string());
        // Kind left empty so only location (+2) and part number (+2) score.
        asset.detailed_kind = String::new();

        let rec = record(
            AssetType::Riser,
            ReuseSource::Internal,
            LocationRef::new(None, Some("L2".to_string()), Some("S2".to_string())),
            EquipmentIdentifiers {
                part_number: Some("Ka000292S".to_string()),
                ..Default::default()
            },
        );

        let outcome = ReuseLinker::new().link(&[asset], &[rec]);
        assert_eq!(outcome.stats.linked, 1);
        assert!(outcome.unmatched_reuse_records.is_empty());
        assert!(outcome.assets[0].has_reuse_info());
    }

    #[test]
    fn test_record_without_location_is_always_unmatched() {
        let asset = riser_asset("L2", "S2");
        let mut rec = record(
            AssetType::Riser,
            ReuseSource::Internal,
            LocationRef::default(),
            EquipmentIdentifiers::default(),
        );
        rec.old_location = LocationRef::default();
        assert!(!rec.has_location_info());

        let outcome = ReuseLinker::new().link(&[asset], &[rec.clone()]);
        assert_eq!(outcome.stats.linked, 0);
        assert_eq!(outcome.unmatched_reuse_records, vec![rec]);
    }

    #[test]
    fn test_fuzzy_tier_rejects_ambiguity() {
        // Type (+1) and model (+1) score 2 on both assets: a fuzzy-tier
        // tie, so the record stays unmatched.
        let mut a = riser_asset("L1", "S1");
        let mut b = riser_asset("L1", "S2");
        a.identifiers.model = Some("RT-1".to_string());
        b.identifiers.model = Some("RT-1".to_string());

        let rec = record(
            AssetType::Riser,
            ReuseSource::Internal,
            LocationRef::new(None, Some("L9".to_string()), Some("S9".to_string())),
            EquipmentIdentifiers {
                model: Some("RT-1".to_string()),
                ..Default::default()
            },
        );
        let outcome = ReuseLinker::new().link(&[a, b], &[rec]);
        assert_eq!(outcome.stats.unmatched, 1);
        assert_eq!(outcome.stats.linked, 0);
    }

    #[test]
    fn test_unique_fuzzy_match_is_accepted() {
        let mut a = riser_asset("L1", "S1");
        a.identifiers.model = Some("RT-1".to_string());
        let b = riser_asset("L1", "S2");

        let rec = record(
            AssetType::Riser,
            ReuseSource::Internal,
            LocationRef::new(None, Some("L9".to_string()), Some("S9".to_string())),
            EquipmentIdentifiers {
                model: Some("RT-1".to_string()),
                ..Default::default()
            },
        );
        let outcome = ReuseLinker::new().link(&[a, b], &[rec]);
        assert_eq!(outcome.stats.linked, 1);
        assert!(outcome.assets[0].has_reuse_info());
        assert!(!outcome.assets[1].has_reuse_info());
    }

    #[test]
    fn test_internal_displaces_designos_on_same_asset() {
        let mut asset = riser_asset("L2", "S2");
        asset.identifiers.part_number = Some("Ka000292S".to_string());

        let designos = record(
            AssetType::Riser,
            ReuseSource::Designos,
            LocationRef::new(None, Some("L2".to_string()), Some("S2".to_string())),
            EquipmentIdentifiers {
                part_number: Some("Ka000292S".to_string()),
                serial_number: Some("DES-1".to_string()),
                ..Default::default()
            },
        );
        let internal = record(
            AssetType::Riser,
            ReuseSource::Internal,
            LocationRef::new(None, Some("L2".to_string()), Some("S2".to_string())),
            EquipmentIdentifiers {
                part_number: Some("Ka000292S".to_string()),
                serial_number: Some("INT-1".to_string()),
                ..Default::default()
            },
        );

        // DESIGNOS arrives first but the INTERNAL record takes the asset.
        let outcome = ReuseLinker::new().link(&[asset], &[designos.clone(), internal]);
        assert_eq!(outcome.stats.linked, 1);
        assert_eq!(outcome.unmatched_reuse_records.len(), 1);
        assert_eq!(
            outcome.unmatched_reuse_records[0].provenance.source,
            ReuseSource::Designos
        );
        assert_eq!(
            outcome.assets[0].identifiers.serial_number.as_deref(),
            Some("INT-1")
        );
        assert!(outcome
            .assets[0]
            .tags
            .iter()
            .any(|t| t == "reuse-source:internal"));
    }

    #[test]
    fn test_enrichment_never_overwrites() {
        let mut asset = riser_asset("L2", "S2");
        asset.identifiers.part_number = Some("KEEP-ME".to_string());
        asset.identifiers.serial_number = None;

        let rec = record(
            AssetType::Riser,
            ReuseSource::Internal,
            LocationRef::new(None, Some("L2".to_string()), Some("S2".to_string())),
            EquipmentIdentifiers {
                part_number: Some("OTHER".to_string()),
                serial_number: Some("SN-77".to_string()),
                ..Default::default()
            },
        );

        let outcome = ReuseLinker::new().link(&[asset], &[rec]);
        let linked = &outcome.assets[0];
        assert_eq!(linked.identifiers.part_number.as_deref(), Some("KEEP-ME"));
        assert_eq!(linked.identifiers.serial_number.as_deref(), Some("SN-77"));
        assert!(linked.tags.iter().any(|t| t.starts_with("reuse-from:RISERS.xlsx/Risers#")));
        assert!(linked.tags.iter().any(|t| t == "allocation:available"));
    }
}
