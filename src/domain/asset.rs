// ==========================================
// Primary equipment assets
// ==========================================
// The records the linker enriches. Owned by the caller; the linker works
// on copies and hands back a new array.
// ==========================================

use crate::domain::reuse::EquipmentIdentifiers;
use crate::domain::types::AssetType;
use serde::{Deserialize, Serialize};

/// A primary equipment record, simplified to the fields the linker needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimplifiedAsset {
    pub project: Option<String>,
    pub line: Option<String>,
    pub station: Option<String>,
    pub identifiers: EquipmentIdentifiers,
    /// Free-text kind ("Riser", "Weld Gun C-Type", ...), as it appears in
    /// the source workbook.
    pub detailed_kind: String,
    /// Build/manufacture progress percent, when the source sheet tracked
    /// one. Normalized to 0-100.
    pub completion_percent: Option<u8>,
    pub tags: Vec<String>,
}

impl SimplifiedAsset {
    /// The asset-type category implied by `detailed_kind`, if any.
    pub fn asset_type(&self) -> Option<AssetType> {
        AssetType::from_detailed_kind(&self.detailed_kind)
    }

    /// True once the linker has attached any reuse provenance.
    pub fn has_reuse_info(&self) -> bool {
        self.tags.iter().any(|t| t.starts_with("reuse-source:"))
    }

    /// Append a tag unless it is already present.
    pub fn add_tag(&mut self, tag: &str) {
        if !self.tags.iter().any(|t| t == tag) {
            self.tags.push(tag.to_string());
        }
    }
}
