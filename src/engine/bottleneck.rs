// ==========================================
// Body-shop ingestion - workflow bottleneck engine
// ==========================================
// Responsibility: classify where each workflow item is stuck in the
// design -> simulation -> manufacture pipeline.
// Red line: every classification carries a reason; rule order is an
// explicit list, never nested conditionals.
// ==========================================

use crate::domain::types::{BottleneckReason, PipelineStage, Severity, StageStatus};
use crate::domain::workflow::{StageStatusSnapshot, WorkflowBottleneckStatus, WorkflowItem};
use crate::tuning;
use tracing::debug;

// ==========================================
// Rule table
// ==========================================

/// One entry of the ordered rule chain. The first rule whose predicate
/// matches decides the classification; later rules are never consulted.
struct BottleneckRule {
    reason: BottleneckReason,
    dominant: PipelineStage,
    applies: fn(&WorkflowItem) -> bool,
}

fn design_incomplete(item: &WorkflowItem) -> bool {
    let d = &item.design_stage;
    d.status.is_not_started()
        || (d.status == StageStatus::InProgress
            && d.percent_or_zero() < tuning::DESIGN_DETAILED_PCT)
}

fn simulation_done(item: &WorkflowItem) -> bool {
    item.simulation_stage.status.is_done()
}

/// Physical build outran its simulation sign-off. This anomaly outranks
/// every simulation-lag rule: those rules carry a `!build_ahead` guard
/// so an in-progress build is never reported as mere simulation lag.
fn build_ahead(item: &WorkflowItem) -> bool {
    matches!(
        item.manufacture_stage.status,
        StageStatus::InProgress | StageStatus::Complete
    ) && !simulation_done(item)
}

static RULES: &[BottleneckRule] = &[
    BottleneckRule {
        reason: BottleneckReason::DesignBlocked,
        dominant: PipelineStage::Design,
        applies: |item| item.design_stage.status == StageStatus::Blocked,
    },
    BottleneckRule {
        reason: BottleneckReason::DesignNotDetailed,
        dominant: PipelineStage::Design,
        applies: |item| {
            design_incomplete(item)
                && item.simulation_stage.status.is_not_started()
                && !build_ahead(item)
        },
    },
    BottleneckRule {
        reason: BottleneckReason::SimBlocked,
        dominant: PipelineStage::Simulation,
        applies: |item| item.simulation_stage.status == StageStatus::Blocked,
    },
    BottleneckRule {
        reason: BottleneckReason::SimChangesRequested,
        dominant: PipelineStage::Simulation,
        applies: |item| item.simulation_stage.status == StageStatus::ChangesRequested,
    },
    BottleneckRule {
        reason: BottleneckReason::SimNotStarted,
        dominant: PipelineStage::Simulation,
        applies: |item| {
            item.design_stage.status.is_done()
                && item.simulation_stage.status.is_not_started()
                && !build_ahead(item)
        },
    },
    BottleneckRule {
        reason: BottleneckReason::SimBehindDesign,
        dominant: PipelineStage::Simulation,
        applies: |item| {
            item.design_stage.status.is_done()
                && item.simulation_stage.status == StageStatus::InProgress
                && item.simulation_stage.percent_or_zero() < tuning::SIM_LAG_PCT
                && !build_ahead(item)
        },
    },
    BottleneckRule {
        reason: BottleneckReason::BuildAheadOfSim,
        dominant: PipelineStage::Design,
        applies: build_ahead,
    },
    BottleneckRule {
        reason: BottleneckReason::MissingAssets,
        dominant: PipelineStage::Manufacture,
        applies: |item| simulation_done(item) && item.has_assets == Some(false),
    },
    // An untracked flag (None) never fires this rule; only an explicit
    // "assets exist, reuse not planned" combination does.
    BottleneckRule {
        reason: BottleneckReason::MissingReuse,
        dominant: PipelineStage::Manufacture,
        applies: |item| {
            simulation_done(item) && item.has_assets == Some(true) && item.is_reuse == Some(false)
        },
    },
    BottleneckRule {
        reason: BottleneckReason::SupplierDelay,
        dominant: PipelineStage::ExternalSupplier,
        applies: |item| {
            item.has_external_supplier()
                && matches!(
                    item.manufacture_stage.status,
                    StageStatus::InProgress | StageStatus::Blocked
                )
                && item.manufacture_stage.percent_or_zero() < tuning::SUPPLIER_DELAY_PCT
        },
    },
    BottleneckRule {
        reason: BottleneckReason::ManufactureConstraint,
        dominant: PipelineStage::Manufacture,
        applies: |item| item.manufacture_stage.status == StageStatus::Blocked,
    },
    BottleneckRule {
        reason: BottleneckReason::Ok,
        dominant: PipelineStage::Manufacture,
        applies: |item| {
            item.design_stage.status.is_done()
                && item.simulation_stage.status.is_done()
                && item.manufacture_stage.status.is_done()
        },
    },
    BottleneckRule {
        reason: BottleneckReason::Unknown,
        dominant: PipelineStage::Unknown,
        applies: |_| true,
    },
];

// ==========================================
// WorkflowBottleneckEngine
// ==========================================

#[derive(Debug, Default)]
pub struct WorkflowBottleneckEngine;

impl WorkflowBottleneckEngine {
    pub fn new() -> Self {
        Self
    }

    /// Classify one workflow item. Always returns a status; the final
    /// catch-all rule guarantees a match.
    pub fn evaluate(&self, item: &WorkflowItem) -> WorkflowBottleneckStatus {
        let rule = RULES
            .iter()
            .find(|r| (r.applies)(item))
            .unwrap_or(&RULES[RULES.len() - 1]);

        let severity = rule.reason.severity();
        let severity_score = Self::severity_score(item, rule.dominant, severity);

        debug!(
            item_id = %item.id,
            reason = %rule.reason,
            dominant = %rule.dominant,
            severity_score,
            "bottleneck classified"
        );

        WorkflowBottleneckStatus {
            workflow_item_id: item.id.clone(),
            dominant_stage: rule.dominant,
            bottleneck_reason: rule.reason,
            severity,
            severity_score,
            design_stage: item.design_stage,
            simulation_stage: item.simulation_stage,
            manufacture_stage: item.manufacture_stage,
        }
    }

    /// Classify a batch and sort worst-first. Equal scores keep input
    /// order (stable sort).
    pub fn evaluate_all(&self, items: &[WorkflowItem]) -> Vec<WorkflowBottleneckStatus> {
        let mut statuses: Vec<WorkflowBottleneckStatus> =
            items.iter().map(|item| self.evaluate(item)).collect();
        statuses.sort_by(|a, b| b.severity_score.cmp(&a.severity_score));
        statuses
    }

    /// `(100 - dominant-stage percent) + severity boost`, capped.
    /// A done stage with no recorded percent counts as 100, so a fully
    /// complete item scores 0. An UNKNOWN dominant stage has no
    /// snapshot and counts as zero progress.
    fn severity_score(item: &WorkflowItem, dominant: PipelineStage, severity: Severity) -> u32 {
        let pct = item
            .stage_snapshot(dominant)
            .map(Self::effective_percent)
            .unwrap_or(0);

        let boost = match severity {
            Severity::Critical => tuning::BOOST_CRITICAL,
            Severity::High => tuning::BOOST_HIGH,
            Severity::Medium => tuning::BOOST_MEDIUM,
            Severity::Low | Severity::Ok => 0,
        };

        ((100 - u32::from(pct)) + boost).min(tuning::SEVERITY_SCORE_CAP)
    }

    fn effective_percent(snapshot: &StageStatusSnapshot) -> u8 {
        match snapshot.percent_complete {
            Some(pct) => pct.min(100),
            None if snapshot.status.is_done() => 100,
            None => 0,
        }
    }
}
