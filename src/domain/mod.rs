// ==========================================
// Domain layer
// ==========================================
// Entities and closed type enumerations. No IO, no heuristics: the
// scoring and matching logic lives in the importer and engine layers.
// ==========================================

pub mod asset;
pub mod reuse;
pub mod types;
pub mod workflow;

pub use asset::SimplifiedAsset;
pub use reuse::{EquipmentIdentifiers, LocationRef, Provenance, ReuseRecord};
pub use types::{
    AllocationStatus, AssetType, BottleneckReason, PipelineStage, ReuseSource, Severity,
    SheetCategory, StageStatus,
};
pub use workflow::{StageStatusSnapshot, WorkflowBottleneckStatus, WorkflowItem};
