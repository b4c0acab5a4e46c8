// ==========================================
// Workflow items and bottleneck statuses
// ==========================================
// A workflow item tracks one unit of work through the three-stage
// pipeline design -> simulation -> manufacture. The bottleneck status is
// the derived, read-only classification of where it is stuck.
// ==========================================

use crate::domain::types::{BottleneckReason, PipelineStage, Severity, StageStatus};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// Stage snapshot
// ==========================================

/// One stage's status plus percent complete (None when the source sheet
/// did not carry a usable value).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageStatusSnapshot {
    pub stage: PipelineStage,
    pub status: StageStatus,
    pub percent_complete: Option<u8>,
}

impl StageStatusSnapshot {
    pub fn new(stage: PipelineStage, status: StageStatus, percent_complete: Option<u8>) -> Self {
        Self { stage, status, percent_complete }
    }

    /// Percent complete with missing values treated as zero progress.
    pub fn percent_or_zero(&self) -> u8 {
        self.percent_complete.unwrap_or(0).min(100)
    }
}

// ==========================================
// Workflow item
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowItem {
    pub id: String,
    /// What kind of work this is ("station", "gun", "tool", ...).
    pub kind: String,
    /// Key into the simulation context this item belongs to.
    pub simulation_context_key: String,
    pub design_stage: StageStatusSnapshot,
    pub simulation_stage: StageStatusSnapshot,
    pub manufacture_stage: StageStatusSnapshot,
    pub external_supplier_name: Option<String>,
    /// Metadata flag: reuse equipment is planned for this item. Absent
    /// means the flag was not tracked, not that it is false.
    pub is_reuse: Option<bool>,
    /// Metadata flag: manufacturing assets exist for this item.
    pub has_assets: Option<bool>,
}

impl WorkflowItem {
    /// Snapshot for a given dominant stage. EXTERNAL_SUPPLIER delays are
    /// measured on the manufacture stage; UNKNOWN has no snapshot.
    pub fn stage_snapshot(&self, stage: PipelineStage) -> Option<&StageStatusSnapshot> {
        match stage {
            PipelineStage::Design => Some(&self.design_stage),
            PipelineStage::Simulation => Some(&self.simulation_stage),
            PipelineStage::Manufacture | PipelineStage::ExternalSupplier => {
                Some(&self.manufacture_stage)
            }
            PipelineStage::Unknown => None,
        }
    }

    pub fn has_external_supplier(&self) -> bool {
        self.external_supplier_name
            .as_deref()
            .is_some_and(|n| !n.trim().is_empty())
    }
}

// ==========================================
// Bottleneck status
// ==========================================

/// Derived classification of one workflow item's current bottleneck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowBottleneckStatus {
    pub workflow_item_id: String,
    pub dominant_stage: PipelineStage,
    pub bottleneck_reason: BottleneckReason,
    pub severity: Severity,
    /// 0-130, usable directly as a "worst first" sort key.
    pub severity_score: u32,
    pub design_stage: StageStatusSnapshot,
    pub simulation_stage: StageStatusSnapshot,
    pub manufacture_stage: StageStatusSnapshot,
}

impl fmt::Display for WorkflowBottleneckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} @ {} ({}, score {})",
            self.workflow_item_id,
            self.bottleneck_reason,
            self.dominant_stage,
            self.severity,
            self.severity_score
        )
    }
}
