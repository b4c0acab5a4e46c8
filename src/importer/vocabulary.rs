// ==========================================
// Field vocabulary
// ==========================================
// The canonical field identifiers the matcher resolves columns against.
// Pure static data: each descriptor carries the synonyms observed in
// real workbooks (including frequent typos) in normalized form
// (lowercase, single spaces - see grid::normalize_header).
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// Field identifiers
// ==========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldId {
    Project,
    Line,
    StationCode,
    RobotId,
    PartNumber,
    SerialNumber,
    Model,
    GunId,
    ToolNumber,
    AssemblyNumber,
    AllocationStatus,
    PercentComplete,
    Supplier,
    RiserHeight,
    GunForce,
    Payload,
    Reach,
    Quantity,
    Description,
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Debug form is the canonical name; serde carries the wire form.
        write!(f, "{self:?}")
    }
}

// ==========================================
// Expected value type
// ==========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpectedType {
    /// Free text.
    Text,
    /// Text expected to be near-unique per row (part numbers, ids).
    Identifier,
    /// Plain numeric values.
    Numeric,
    /// Percent-like values in any of the accepted forms.
    Percent,
    /// Yes/no style markers.
    Flag,
}

// ==========================================
// Field descriptor
// ==========================================

#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    pub id: FieldId,
    pub expected_type: ExpectedType,
    /// Tie-breaker between equally-scored matches; higher wins.
    pub importance: u8,
    /// Known header synonyms, normalized.
    pub synonyms: &'static [&'static str],
}

// ==========================================
// The registry
// ==========================================

static VOCABULARY: &[FieldDescriptor] = &[
    FieldDescriptor {
        id: FieldId::Project,
        expected_type: ExpectedType::Text,
        importance: 4,
        synonyms: &["project", "project code", "program", "car project", "old project"],
    },
    FieldDescriptor {
        id: FieldId::Line,
        expected_type: ExpectedType::Text,
        importance: 5,
        synonyms: &["line", "prod line", "production line", "area line"],
    },
    FieldDescriptor {
        id: FieldId::StationCode,
        expected_type: ExpectedType::Text,
        importance: 8,
        // "staton" is a recurring supplier typo.
        synonyms: &["station", "station code", "station no", "st code", "staton"],
    },
    FieldDescriptor {
        id: FieldId::RobotId,
        expected_type: ExpectedType::Identifier,
        importance: 9,
        synonyms: &["robot", "robot id", "robot number", "robot no", "robot name"],
    },
    FieldDescriptor {
        id: FieldId::PartNumber,
        expected_type: ExpectedType::Identifier,
        importance: 9,
        synonyms: &["part number", "part no", "partnumber", "pn", "part nr"],
    },
    FieldDescriptor {
        id: FieldId::SerialNumber,
        expected_type: ExpectedType::Identifier,
        importance: 8,
        synonyms: &["serial number", "serial no", "serial", "sn", "serial nr"],
    },
    FieldDescriptor {
        id: FieldId::Model,
        expected_type: ExpectedType::Text,
        importance: 5,
        synonyms: &["model", "type model", "model type", "manufacturer model"],
    },
    FieldDescriptor {
        id: FieldId::GunId,
        expected_type: ExpectedType::Identifier,
        importance: 9,
        synonyms: &["gun id", "gun number", "gun no", "weld gun id", "gun name"],
    },
    FieldDescriptor {
        id: FieldId::ToolNumber,
        expected_type: ExpectedType::Identifier,
        importance: 8,
        synonyms: &["tool number", "tool no", "tool id", "fixture number", "fixture no"],
    },
    FieldDescriptor {
        id: FieldId::AssemblyNumber,
        expected_type: ExpectedType::Identifier,
        importance: 8,
        synonyms: &["assembly number", "assembly no", "assy number", "assy no"],
    },
    FieldDescriptor {
        id: FieldId::AllocationStatus,
        expected_type: ExpectedType::Text,
        importance: 6,
        synonyms: &["status", "allocation", "allocation status", "availability", "disposition"],
    },
    FieldDescriptor {
        id: FieldId::PercentComplete,
        expected_type: ExpectedType::Percent,
        importance: 7,
        synonyms: &["progress", "percent complete", "complete", "completion", "1st stage", "pct"],
    },
    FieldDescriptor {
        id: FieldId::Supplier,
        expected_type: ExpectedType::Text,
        importance: 4,
        synonyms: &["supplier", "vendor", "manufacturer", "maker"],
    },
    FieldDescriptor {
        id: FieldId::RiserHeight,
        expected_type: ExpectedType::Numeric,
        importance: 7,
        synonyms: &["riser height", "height", "height mm", "riser height mm"],
    },
    FieldDescriptor {
        id: FieldId::GunForce,
        expected_type: ExpectedType::Numeric,
        importance: 7,
        synonyms: &["gun force", "electrode force", "force", "force kn", "max force"],
    },
    FieldDescriptor {
        id: FieldId::Payload,
        expected_type: ExpectedType::Numeric,
        importance: 6,
        synonyms: &["payload", "payload kg", "max payload"],
    },
    FieldDescriptor {
        id: FieldId::Reach,
        expected_type: ExpectedType::Numeric,
        importance: 6,
        synonyms: &["reach", "reach mm", "arm reach"],
    },
    FieldDescriptor {
        id: FieldId::Quantity,
        expected_type: ExpectedType::Numeric,
        importance: 3,
        synonyms: &["quantity", "qty", "count", "pcs"],
    },
    FieldDescriptor {
        id: FieldId::Description,
        expected_type: ExpectedType::Text,
        importance: 2,
        synonyms: &["description", "comment", "remarks", "notes"],
    },
];

/// The static field vocabulary, loaded once per process.
pub fn vocabulary() -> &'static [FieldDescriptor] {
    VOCABULARY
}

/// Look up a descriptor by id.
pub fn descriptor(id: FieldId) -> Option<&'static FieldDescriptor> {
    VOCABULARY.iter().find(|d| d.id == id)
}
