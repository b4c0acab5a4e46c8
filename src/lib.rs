// ==========================================
// Body-shop equipment workbook ingestion - core library
// ==========================================
// Pipeline: workbook files -> sheet classification -> category parsing
// -> reuse deduplication -> asset linking -> bottleneck analysis.
// System role: decision support (results carry reasons, humans decide)
// ==========================================

// ==========================================
// Module declarations
// ==========================================

// Domain layer - entities and types
pub mod domain;

// Import layer - workbook reading, classification, parsing
pub mod importer;

// Engine layer - business rules
pub mod engine;

// Logging
pub mod logging;

// Named thresholds and scoring weights
pub mod tuning;

// ==========================================
// Re-export core types
// ==========================================

// Domain types
pub use domain::types::{
    AllocationStatus, AssetType, BottleneckReason, PipelineStage, ReuseSource, Severity,
    SheetCategory, StageStatus,
};

// Domain entities
pub use domain::{
    EquipmentIdentifiers, LocationRef, Provenance, ReuseRecord, SimplifiedAsset,
    StageStatusSnapshot, WorkflowBottleneckStatus, WorkflowItem,
};

// Import layer
pub use importer::{
    FsWorkbookSource, IngestError, IngestResult, NamedSheet, SheetDetection, SheetOverride,
    SheetSniffer, SnifferConfig, WorkbookSource,
};

// Engines
pub use engine::{
    ingest, IngestOptions, IngestionOrchestrator, IngestionResult, LinkingStats, ReuseLinker,
    ReuseListCoordinator, ReuseSummary, WorkflowBottleneckEngine,
};
pub use engine::validate_result;

/// Crate version, from Cargo metadata.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application display name.
pub const APP_NAME: &str = "bodyshop-ingest";
