// ==========================================
// Domain types
// ==========================================
// Closed enumerations shared across the pipeline. Sheet categories and
// asset types are sum types on purpose: adding a category must force
// every match site to be revisited.
// Serialized form: SCREAMING_SNAKE_CASE (stable for downstream consumers)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// Sheet category
// ==========================================
// What kind of data a worksheet holds, decided by the sniffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SheetCategory {
    SimulationStatus,
    RobotSpecs,
    InHouseTooling,
    AssembliesList,
    ReuseRisers,
    ReuseTipDressers,
    ReuseWeldGuns,
    GunForce,
    Metadata,
    Unknown,
}

impl SheetCategory {
    /// The equipment-pool asset type a reuse category maps to, if any.
    pub fn reuse_asset_type(&self) -> Option<AssetType> {
        match self {
            SheetCategory::ReuseRisers => Some(AssetType::Riser),
            SheetCategory::ReuseTipDressers => Some(AssetType::TipDresser),
            SheetCategory::ReuseWeldGuns => Some(AssetType::WeldGun),
            _ => None,
        }
    }
}

impl fmt::Display for SheetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetCategory::SimulationStatus => write!(f, "SIMULATION_STATUS"),
            SheetCategory::RobotSpecs => write!(f, "ROBOT_SPECS"),
            SheetCategory::InHouseTooling => write!(f, "IN_HOUSE_TOOLING"),
            SheetCategory::AssembliesList => write!(f, "ASSEMBLIES_LIST"),
            SheetCategory::ReuseRisers => write!(f, "REUSE_RISERS"),
            SheetCategory::ReuseTipDressers => write!(f, "REUSE_TIP_DRESSERS"),
            SheetCategory::ReuseWeldGuns => write!(f, "REUSE_WELD_GUNS"),
            SheetCategory::GunForce => write!(f, "GUN_FORCE"),
            SheetCategory::Metadata => write!(f, "METADATA"),
            SheetCategory::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// ==========================================
// Asset type
// ==========================================
// Equipment-pool asset categories handled by the reuse pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetType {
    Riser,
    TipDresser,
    WeldGun,
    Tool,
    Assembly,
    Robot,
}

impl AssetType {
    /// Best-effort mapping from an asset's free-text detailed kind
    /// ("Weld Gun X-Type", "Robot riser 250mm", ...).
    pub fn from_detailed_kind(kind: &str) -> Option<Self> {
        let k = kind.trim().to_lowercase();
        if k.is_empty() {
            return None;
        }
        if k.contains("riser") {
            Some(AssetType::Riser)
        } else if k.contains("tip dress") || k.contains("dresser") {
            Some(AssetType::TipDresser)
        } else if k.contains("gun") {
            Some(AssetType::WeldGun)
        } else if k.contains("robot") {
            Some(AssetType::Robot)
        } else if k.contains("assembly") {
            Some(AssetType::Assembly)
        } else if k.contains("tool") || k.contains("fixture") || k.contains("gripper") {
            Some(AssetType::Tool)
        } else {
            None
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetType::Riser => write!(f, "RISER"),
            AssetType::TipDresser => write!(f, "TIP_DRESSER"),
            AssetType::WeldGun => write!(f, "WELD_GUN"),
            AssetType::Tool => write!(f, "TOOL"),
            AssetType::Assembly => write!(f, "ASSEMBLY"),
            AssetType::Robot => write!(f, "ROBOT"),
        }
    }
}

// ==========================================
// Reuse source
// ==========================================
// Precedence rule: INTERNAL always overrides DESIGNOS for the same
// logical record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReuseSource {
    Internal,
    Designos,
}

impl fmt::Display for ReuseSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReuseSource::Internal => write!(f, "INTERNAL"),
            ReuseSource::Designos => write!(f, "DESIGNOS"),
        }
    }
}

// ==========================================
// Allocation status
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AllocationStatus {
    Available,
    Reserved,
    Allocated,
    Scrapped,
    Unknown,
}

impl AllocationStatus {
    /// Parse a free-text status cell. Unrecognized values map to Unknown,
    /// never to an error.
    pub fn from_cell(value: &str) -> Self {
        let v = value.trim().to_lowercase();
        if v.is_empty() {
            return AllocationStatus::Unknown;
        }
        if v.contains("scrap") || v.contains("obsolete") {
            AllocationStatus::Scrapped
        } else if v.contains("alloc") || v.contains("assigned") || v.contains("in use") {
            AllocationStatus::Allocated
        } else if v.contains("reserv") || v.contains("planned") || v.contains("booked") {
            AllocationStatus::Reserved
        } else if v.contains("avail") || v.contains("free") || v.contains("open") {
            AllocationStatus::Available
        } else {
            AllocationStatus::Unknown
        }
    }
}

impl fmt::Display for AllocationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocationStatus::Available => write!(f, "AVAILABLE"),
            AllocationStatus::Reserved => write!(f, "RESERVED"),
            AllocationStatus::Allocated => write!(f, "ALLOCATED"),
            AllocationStatus::Scrapped => write!(f, "SCRAPPED"),
            AllocationStatus::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// ==========================================
// Stage status
// ==========================================
// One of seven statuses per workflow stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StageStatus {
    NotStarted,
    InProgress,
    ChangesRequested,
    Approved,
    Blocked,
    Complete,
    Unknown,
}

impl StageStatus {
    /// Approved or complete: the stage needs no further work.
    pub fn is_done(&self) -> bool {
        matches!(self, StageStatus::Approved | StageStatus::Complete)
    }

    /// Not started, or nothing known about it.
    pub fn is_not_started(&self) -> bool {
        matches!(self, StageStatus::NotStarted | StageStatus::Unknown)
    }
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageStatus::NotStarted => write!(f, "NOT_STARTED"),
            StageStatus::InProgress => write!(f, "IN_PROGRESS"),
            StageStatus::ChangesRequested => write!(f, "CHANGES_REQUESTED"),
            StageStatus::Approved => write!(f, "APPROVED"),
            StageStatus::Blocked => write!(f, "BLOCKED"),
            StageStatus::Complete => write!(f, "COMPLETE"),
            StageStatus::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// ==========================================
// Pipeline stage
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PipelineStage {
    Design,
    Simulation,
    Manufacture,
    ExternalSupplier,
    Unknown,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineStage::Design => write!(f, "DESIGN"),
            PipelineStage::Simulation => write!(f, "SIMULATION"),
            PipelineStage::Manufacture => write!(f, "MANUFACTURE"),
            PipelineStage::ExternalSupplier => write!(f, "EXTERNAL_SUPPLIER"),
            PipelineStage::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// ==========================================
// Bottleneck severity
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Ok,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Critical => write!(f, "CRITICAL"),
            Severity::High => write!(f, "HIGH"),
            Severity::Medium => write!(f, "MEDIUM"),
            Severity::Low => write!(f, "LOW"),
            Severity::Ok => write!(f, "OK"),
        }
    }
}

// ==========================================
// Bottleneck reason
// ==========================================
// One per rule in the bottleneck chain. The reason -> severity mapping is
// a fixed lookup, kept next to the reason so the two cannot drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BottleneckReason {
    DesignBlocked,
    DesignNotDetailed,
    SimBlocked,
    SimChangesRequested,
    SimNotStarted,
    SimBehindDesign,
    BuildAheadOfSim,
    MissingAssets,
    MissingReuse,
    SupplierDelay,
    ManufactureConstraint,
    Ok,
    Unknown,
}

impl BottleneckReason {
    /// Fixed reason -> severity lookup. BUILD_AHEAD_OF_SIM and a blocked
    /// manufacture stage are the blocked-dependency cases.
    pub fn severity(&self) -> Severity {
        match self {
            BottleneckReason::BuildAheadOfSim => Severity::Critical,
            BottleneckReason::ManufactureConstraint => Severity::Critical,
            BottleneckReason::DesignBlocked => Severity::High,
            BottleneckReason::SimBlocked => Severity::High,
            BottleneckReason::SimChangesRequested => Severity::High,
            BottleneckReason::DesignNotDetailed => Severity::Medium,
            BottleneckReason::SimNotStarted => Severity::Medium,
            BottleneckReason::SimBehindDesign => Severity::Medium,
            BottleneckReason::SupplierDelay => Severity::Medium,
            BottleneckReason::MissingAssets => Severity::Low,
            BottleneckReason::MissingReuse => Severity::Low,
            BottleneckReason::Unknown => Severity::Low,
            BottleneckReason::Ok => Severity::Ok,
        }
    }
}

impl fmt::Display for BottleneckReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BottleneckReason::DesignBlocked => write!(f, "DESIGN_BLOCKED"),
            BottleneckReason::DesignNotDetailed => write!(f, "DESIGN_NOT_DETAILED"),
            BottleneckReason::SimBlocked => write!(f, "SIM_BLOCKED"),
            BottleneckReason::SimChangesRequested => write!(f, "SIM_CHANGES_REQUESTED"),
            BottleneckReason::SimNotStarted => write!(f, "SIM_NOT_STARTED"),
            BottleneckReason::SimBehindDesign => write!(f, "SIM_BEHIND_DESIGN"),
            BottleneckReason::BuildAheadOfSim => write!(f, "BUILD_AHEAD_OF_SIM"),
            BottleneckReason::MissingAssets => write!(f, "MISSING_ASSETS"),
            BottleneckReason::MissingReuse => write!(f, "MISSING_REUSE"),
            BottleneckReason::SupplierDelay => write!(f, "SUPPLIER_DELAY"),
            BottleneckReason::ManufactureConstraint => write!(f, "MANUFACTURE_CONSTRAINT"),
            BottleneckReason::Ok => write!(f, "OK"),
            BottleneckReason::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_type_from_detailed_kind() {
        assert_eq!(AssetType::from_detailed_kind("Riser"), Some(AssetType::Riser));
        assert_eq!(
            AssetType::from_detailed_kind("Weld Gun C-Type"),
            Some(AssetType::WeldGun)
        );
        assert_eq!(
            AssetType::from_detailed_kind("tip dresser unit"),
            Some(AssetType::TipDresser)
        );
        assert_eq!(
            AssetType::from_detailed_kind("Handling ROBOT"),
            Some(AssetType::Robot)
        );
        assert_eq!(AssetType::from_detailed_kind(""), None);
        assert_eq!(AssetType::from_detailed_kind("conveyor"), None);
    }

    #[test]
    fn test_allocation_status_from_cell() {
        assert_eq!(AllocationStatus::from_cell("Available"), AllocationStatus::Available);
        assert_eq!(AllocationStatus::from_cell("  reserved "), AllocationStatus::Reserved);
        assert_eq!(AllocationStatus::from_cell("ALLOCATED"), AllocationStatus::Allocated);
        assert_eq!(AllocationStatus::from_cell("to be scrapped"), AllocationStatus::Scrapped);
        assert_eq!(AllocationStatus::from_cell("???"), AllocationStatus::Unknown);
        assert_eq!(AllocationStatus::from_cell(""), AllocationStatus::Unknown);
    }

    #[test]
    fn test_stage_status_helpers() {
        assert!(StageStatus::Approved.is_done());
        assert!(StageStatus::Complete.is_done());
        assert!(!StageStatus::InProgress.is_done());
        assert!(StageStatus::NotStarted.is_not_started());
        assert!(StageStatus::Unknown.is_not_started());
        assert!(!StageStatus::Blocked.is_not_started());
    }

    #[test]
    fn test_reason_severity_lookup() {
        assert_eq!(BottleneckReason::BuildAheadOfSim.severity(), Severity::Critical);
        assert_eq!(BottleneckReason::SimBlocked.severity(), Severity::High);
        assert_eq!(BottleneckReason::SimNotStarted.severity(), Severity::Medium);
        assert_eq!(BottleneckReason::MissingAssets.severity(), Severity::Low);
        assert_eq!(BottleneckReason::Ok.severity(), Severity::Ok);
    }

    #[test]
    fn test_display_is_screaming_snake() {
        assert_eq!(SheetCategory::ReuseTipDressers.to_string(), "REUSE_TIP_DRESSERS");
        assert_eq!(ReuseSource::Designos.to_string(), "DESIGNOS");
        assert_eq!(BottleneckReason::BuildAheadOfSim.to_string(), "BUILD_AHEAD_OF_SIM");
    }
}
