// ==========================================
// Reuse records
// ==========================================
// Canonical equipment-pool entries: equipment moved from an old
// project/location to a target location for reuse. The dedup id is
// derived deterministically so two parses of the same logical row always
// collide.
// ==========================================

use crate::domain::types::{AllocationStatus, AssetType, ReuseSource};
use serde::{Deserialize, Serialize};

// ==========================================
// Location reference
// ==========================================

/// A project/line/station triple. Any part may be missing; a fully empty
/// reference carries no information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRef {
    pub project: Option<String>,
    pub line: Option<String>,
    pub station: Option<String>,
}

impl LocationRef {
    pub fn new(
        project: Option<String>,
        line: Option<String>,
        station: Option<String>,
    ) -> Self {
        Self { project, line, station }
    }

    /// True when no component carries a value.
    pub fn is_empty(&self) -> bool {
        self.project.is_none() && self.line.is_none() && self.station.is_none()
    }

    /// Case-insensitive line+station equality against an asset position.
    pub fn matches_line_station(&self, line: Option<&str>, station: Option<&str>) -> bool {
        fn eq(a: Option<&String>, b: Option<&str>) -> bool {
            match (a, b) {
                (Some(x), Some(y)) => x.trim().eq_ignore_ascii_case(y.trim()),
                _ => false,
            }
        }
        eq(self.line.as_ref(), line) && eq(self.station.as_ref(), station)
    }
}

// ==========================================
// Equipment identifiers
// ==========================================

/// The identifying fields a reuse row or asset may carry. All optional;
/// field-by-field exact matching is what the linker scores.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentIdentifiers {
    pub part_number: Option<String>,
    pub serial_number: Option<String>,
    pub model: Option<String>,
    pub gun_id: Option<String>,
}

impl EquipmentIdentifiers {
    /// Copy values from `other` into fields that are still empty here.
    /// Existing values are never overwritten.
    pub fn fill_missing_from(&mut self, other: &EquipmentIdentifiers) {
        if self.part_number.is_none() {
            self.part_number = other.part_number.clone();
        }
        if self.serial_number.is_none() {
            self.serial_number = other.serial_number.clone();
        }
        if self.model.is_none() {
            self.model = other.model.clone();
        }
        if self.gun_id.is_none() {
            self.gun_id = other.gun_id.clone();
        }
    }
}

// ==========================================
// Provenance
// ==========================================

/// Where a reuse record came from, down to the row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    pub workbook_id: String,
    pub sheet_name: String,
    pub row_index: usize,
    pub source: ReuseSource,
}

impl Provenance {
    /// Breadcrumb used in asset tags: `workbook/sheet#row`.
    pub fn breadcrumb(&self) -> String {
        format!("{}/{}#{}", self.workbook_id, self.sheet_name, self.row_index)
    }
}

// ==========================================
// Reuse record
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReuseRecord {
    /// Stable dedup key, derived from asset type + identifiers + old
    /// location. Never changes after construction.
    pub id: String,
    pub asset_type: AssetType,
    pub allocation_status: AllocationStatus,
    pub old_location: LocationRef,
    pub target_location: LocationRef,
    pub identifiers: EquipmentIdentifiers,
    pub provenance: Provenance,
    pub tags: Vec<String>,
}

impl ReuseRecord {
    pub fn new(
        asset_type: AssetType,
        allocation_status: AllocationStatus,
        old_location: LocationRef,
        target_location: LocationRef,
        identifiers: EquipmentIdentifiers,
        provenance: Provenance,
    ) -> Self {
        let id = Self::dedup_id(asset_type, &identifiers, &old_location);
        Self {
            id,
            asset_type,
            allocation_status,
            old_location,
            target_location,
            identifiers,
            provenance,
            tags: Vec::new(),
        }
    }

    /// Deterministic dedup key. Readable on purpose: collisions must be
    /// explainable from logs. Empty segments become `-` so the field
    /// positions stay fixed.
    pub fn dedup_id(
        asset_type: AssetType,
        identifiers: &EquipmentIdentifiers,
        old_location: &LocationRef,
    ) -> String {
        fn seg(v: Option<&String>) -> String {
            match v {
                Some(s) if !s.trim().is_empty() => s.trim().to_lowercase(),
                _ => "-".to_string(),
            }
        }
        format!(
            "{}|{}|{}|{}|{}|{}|{}",
            asset_type.to_string().to_lowercase(),
            seg(identifiers.part_number.as_ref()),
            seg(identifiers.serial_number.as_ref()),
            seg(identifiers.gun_id.as_ref()),
            seg(old_location.project.as_ref()),
            seg(old_location.line.as_ref()),
            seg(old_location.station.as_ref()),
        )
    }

    /// A record with neither target- nor old-location information cannot
    /// be matched to anything and is excluded from linking.
    pub fn has_location_info(&self) -> bool {
        !self.target_location.is_empty() || !self.old_location.is_empty()
    }

    /// Append a tag unless it is already present.
    pub fn add_tag(&mut self, tag: &str) {
        if !self.tags.iter().any(|t| t == tag) {
            self.tags.push(tag.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_provenance(source: ReuseSource) -> Provenance {
        Provenance {
            workbook_id: "RISERS.xlsx".to_string(),
            sheet_name: "Risers".to_string(),
            row_index: 4,
            source,
        }
    }

    #[test]
    fn test_dedup_id_is_deterministic() {
        let ids = EquipmentIdentifiers {
            part_number: Some("Ka000292S".to_string()),
            ..Default::default()
        };
        let old = LocationRef::new(Some("OLD".to_string()), None, Some("S1".to_string()));

        let a = ReuseRecord::dedup_id(AssetType::Riser, &ids, &old);
        let b = ReuseRecord::dedup_id(AssetType::Riser, &ids, &old);
        assert_eq!(a, b);
        assert_eq!(a, "riser|ka000292s|-|-|old|-|s1");
    }

    #[test]
    fn test_dedup_id_differs_per_asset_type() {
        let ids = EquipmentIdentifiers {
            part_number: Some("P-1".to_string()),
            ..Default::default()
        };
        let old = LocationRef::default();
        let a = ReuseRecord::dedup_id(AssetType::Riser, &ids, &old);
        let b = ReuseRecord::dedup_id(AssetType::WeldGun, &ids, &old);
        assert_ne!(a, b);
    }

    #[test]
    fn test_two_parses_of_same_row_collide() {
        let make = |source| {
            ReuseRecord::new(
                AssetType::Riser,
                AllocationStatus::Available,
                LocationRef::new(Some("OLD".to_string()), None, Some("S1".to_string())),
                LocationRef::new(None, Some("L2".to_string()), Some("S2".to_string())),
                EquipmentIdentifiers {
                    part_number: Some("Ka000292S".to_string()),
                    ..Default::default()
                },
                sample_provenance(source),
            )
        };
        assert_eq!(make(ReuseSource::Internal).id, make(ReuseSource::Designos).id);
    }

    #[test]
    fn test_location_info_guard() {
        let mut record = ReuseRecord::new(
            AssetType::WeldGun,
            AllocationStatus::Unknown,
            LocationRef::default(),
            LocationRef::default(),
            EquipmentIdentifiers::default(),
            sample_provenance(ReuseSource::Internal),
        );
        assert!(!record.has_location_info());

        record.target_location.station = Some("S9".to_string());
        assert!(record.has_location_info());
    }

    #[test]
    fn test_add_tag_deduplicates() {
        let mut record = ReuseRecord::new(
            AssetType::Riser,
            AllocationStatus::Unknown,
            LocationRef::default(),
            LocationRef::default(),
            EquipmentIdentifiers::default(),
            sample_provenance(ReuseSource::Designos),
        );
        record.add_tag("also-in-designos");
        record.add_tag("also-in-designos");
        assert_eq!(record.tags.len(), 1);
    }

    #[test]
    fn test_fill_missing_never_overwrites() {
        let mut target = EquipmentIdentifiers {
            part_number: Some("KEEP".to_string()),
            ..Default::default()
        };
        let incoming = EquipmentIdentifiers {
            part_number: Some("NEW".to_string()),
            serial_number: Some("SN-1".to_string()),
            ..Default::default()
        };
        target.fill_missing_from(&incoming);
        assert_eq!(target.part_number.as_deref(), Some("KEEP"));
        assert_eq!(target.serial_number.as_deref(), Some("SN-1"));
    }
}
