// ==========================================
// Body-shop ingestion - engine layer
// ==========================================
// Responsibility: the business rules downstream of parsing. Every
// decision (dedup, link, bottleneck) is deterministic and explainable
// from its inputs.
// ==========================================

pub mod bottleneck;
pub mod coordinator;
pub mod linker;
pub mod orchestrator;
pub mod validator;

// Re-export core engines
pub use bottleneck::WorkflowBottleneckEngine;
pub use coordinator::{ReuseListCoordinator, ReuseListOutcome};
pub use linker::{LinkOutcome, LinkingStats, ReuseLinker};
pub use orchestrator::{
    ingest, IngestOptions, IngestionOrchestrator, IngestionResult, ReuseSummary,
};
pub use validator::validate_result;
