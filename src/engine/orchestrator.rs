// ==========================================
// Body-shop ingestion - pipeline orchestrator
// ==========================================
// Responsibility: sequence the four phases (primary assets, reuse
// lists, linking, bottlenecks) and hand back one consolidated result.
// Red line: errors and warnings accumulate, nothing is thrown past
// this boundary; a caller always receives a complete, possibly
// partial, result.
// ==========================================

use crate::domain::asset::SimplifiedAsset;
use crate::domain::reuse::ReuseRecord;
use crate::domain::types::SheetCategory;
use crate::domain::workflow::{WorkflowBottleneckStatus, WorkflowItem};
use crate::engine::bottleneck::WorkflowBottleneckEngine;
use crate::engine::coordinator::ReuseListCoordinator;
use crate::engine::linker::{LinkingStats, ReuseLinker};
use crate::importer::file_reader::{FsWorkbookSource, WorkbookSource};
use crate::importer::parsers::{
    AssembliesListParser, EquipmentRow, ParsedSheet, RobotListParser, ToolListParser,
};
use crate::importer::sniffer::{SheetSniffer, SnifferConfig};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, info};
use uuid::Uuid;

// ==========================================
// Options
// ==========================================

/// Run options. All phase toggles default to on; disabling one
/// short-circuits that phase with empty pass-through results.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    pub data_root: PathBuf,
    pub load_primary_assets: bool,
    pub load_reuse_lists: bool,
    pub attach_reuse_info: bool,
    /// Workflow items to classify; supplied by the caller, not read
    /// from workbooks.
    pub workflow_items: Vec<WorkflowItem>,
    pub sniffer: SnifferConfig,
}

impl IngestOptions {
    pub fn new(data_root: impl Into<PathBuf>) -> Self {
        Self {
            data_root: data_root.into(),
            load_primary_assets: true,
            load_reuse_lists: true,
            attach_reuse_info: true,
            workflow_items: Vec::new(),
            sniffer: SnifferConfig::default(),
        }
    }
}

// ==========================================
// Result
// ==========================================

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReuseSummary {
    pub by_asset_type: BTreeMap<String, usize>,
    pub by_allocation_status: BTreeMap<String, usize>,
}

impl ReuseSummary {
    fn from_records(records: &[ReuseRecord]) -> Self {
        let mut summary = Self::default();
        for record in records {
            *summary
                .by_asset_type
                .entry(record.asset_type.to_string())
                .or_insert(0) += 1;
            *summary
                .by_allocation_status
                .entry(record.allocation_status.to_string())
                .or_insert(0) += 1;
        }
        summary
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestionResult {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub assets: Vec<SimplifiedAsset>,
    pub reuse_records: Vec<ReuseRecord>,
    pub unmatched_reuse_records: Vec<ReuseRecord>,
    pub reuse_summary: ReuseSummary,
    pub linking_stats: LinkingStats,
    pub bottlenecks: Vec<WorkflowBottleneckStatus>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl IngestionResult {
    pub fn empty() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            assets: Vec::new(),
            reuse_records: Vec::new(),
            unmatched_reuse_records: Vec::new(),
            reuse_summary: ReuseSummary::default(),
            linking_stats: LinkingStats::default(),
            bottlenecks: Vec::new(),
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

// ==========================================
// IngestionOrchestrator
// ==========================================

pub struct IngestionOrchestrator<S>
where
    S: WorkbookSource,
{
    source: S,
}

impl<S> IngestionOrchestrator<S>
where
    S: WorkbookSource,
{
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Execute the full pipeline for one data root.
    pub async fn run(&self, options: IngestOptions) -> IngestionResult {
        let mut result = IngestionResult::empty();
        let sniffer = SheetSniffer::new(options.sniffer.clone());

        info!(
            run_id = %result.run_id,
            data_root = %options.data_root.display(),
            load_primary_assets = options.load_primary_assets,
            load_reuse_lists = options.load_reuse_lists,
            attach_reuse_info = options.attach_reuse_info,
            workflow_items = options.workflow_items.len(),
            "starting ingestion run"
        );

        // ==========================================
        // Phase 1: primary assets
        // ==========================================
        if options.load_primary_assets {
            debug!("phase 1: loading primary assets");
            self.load_primary_assets(&options, &sniffer, &mut result)
                .await;
        }

        // ==========================================
        // Phase 2: reuse lists
        // ==========================================
        if options.load_reuse_lists {
            debug!("phase 2: collecting reuse lists");
            let coordinator = ReuseListCoordinator::new(SheetSniffer::new(options.sniffer.clone()));
            let outcome = coordinator.collect(&self.source, &options.data_root).await;
            result.reuse_records = outcome.records;
            result.errors.extend(outcome.errors);
            result.warnings.extend(outcome.warnings);
        }

        // ==========================================
        // Phase 3: linking
        // ==========================================
        if options.attach_reuse_info && !result.reuse_records.is_empty() {
            debug!("phase 3: linking reuse records to assets");
            let outcome = ReuseLinker::new().link(&result.assets, &result.reuse_records);
            result.assets = outcome.assets;
            result.unmatched_reuse_records = outcome.unmatched_reuse_records;
            result.linking_stats = outcome.stats;
        } else {
            // Linking skipped: nothing is linked, nothing is unmatched.
            result.linking_stats = LinkingStats {
                total_reuse_records: result.reuse_records.len(),
                linked: 0,
                unmatched: 0,
            };
        }

        // ==========================================
        // Phase 4: workflow bottlenecks
        // ==========================================
        if !options.workflow_items.is_empty() {
            debug!("phase 4: classifying workflow bottlenecks");
            result.bottlenecks = WorkflowBottleneckEngine::new().evaluate_all(&options.workflow_items);
        }

        result.reuse_summary = ReuseSummary::from_records(&result.reuse_records);

        info!(
            run_id = %result.run_id,
            assets = result.assets.len(),
            reuse_records = result.reuse_records.len(),
            linked = result.linking_stats.linked,
            bottlenecks = result.bottlenecks.len(),
            errors = result.errors.len(),
            warnings = result.warnings.len(),
            "ingestion run complete"
        );

        result
    }

    /// Scan workbooks directly under the data root, classify every
    /// sheet, and parse the recognized primary-equipment categories.
    async fn load_primary_assets(
        &self,
        options: &IngestOptions,
        sniffer: &SheetSniffer,
        result: &mut IngestionResult,
    ) {
        let paths = match self.source.list_workbooks(&options.data_root).await {
            Ok(paths) => paths,
            Err(e) => {
                result
                    .errors
                    .push(format!("{}: {e}", options.data_root.display()));
                return;
            }
        };

        for path in paths {
            let workbook_id = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("workbook")
                .to_string();

            let sheets = match self.source.read_sheets(&path).await {
                Ok(sheets) => sheets,
                Err(e) => {
                    result.errors.push(format!("{workbook_id}: {e}"));
                    continue;
                }
            };

            for sheet in &sheets {
                let detection = sniffer.classify(&workbook_id, &sheet.name, &sheet.grid);
                let parsed = match detection.category {
                    SheetCategory::RobotSpecs => {
                        RobotListParser::new().parse(&sheet.name, &sheet.grid)
                    }
                    SheetCategory::InHouseTooling => {
                        ToolListParser::new().parse(&sheet.name, &sheet.grid)
                    }
                    SheetCategory::AssembliesList => {
                        AssembliesListParser::new().parse(&sheet.name, &sheet.grid)
                    }
                    other => {
                        debug!(
                            workbook = %workbook_id,
                            sheet = %sheet.name,
                            category = %other,
                            "sheet skipped by primary-asset phase"
                        );
                        continue;
                    }
                };

                match parsed {
                    Ok(mut parsed) => {
                        result.warnings.append(&mut parsed.warnings);
                        Self::push_assets(result, parsed, &workbook_id, &sheet.name);
                    }
                    Err(e) => {
                        result
                            .errors
                            .push(format!("{workbook_id}/{}: {e}", sheet.name));
                    }
                }
            }
        }
    }

    fn push_assets(
        result: &mut IngestionResult,
        parsed: ParsedSheet<EquipmentRow>,
        workbook_id: &str,
        sheet_name: &str,
    ) {
        let count = parsed.rows.len();
        for row in parsed.rows {
            result.assets.push(SimplifiedAsset {
                project: row.project,
                line: row.line,
                station: row.station,
                identifiers: row.identifiers,
                detailed_kind: row.detailed_kind,
                completion_percent: row.completion_percent,
                tags: Vec::new(),
            });
        }
        info!(
            workbook = %workbook_id,
            sheet = %sheet_name,
            rows = count,
            "primary asset sheet parsed"
        );
    }
}

// ==========================================
// Convenience entry point
// ==========================================

/// Run the full pipeline against the local filesystem.
pub async fn ingest(options: IngestOptions) -> IngestionResult {
    IngestionOrchestrator::new(FsWorkbookSource).run(options).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{PipelineStage, StageStatus};
    use crate::domain::workflow::StageStatusSnapshot;
    use crate::importer::error::{IngestError, IngestResult};
    use crate::importer::file_reader::NamedSheet;
    use crate::importer::grid::{CellValue, SheetGrid};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::path::Path;

    #[derive(Default)]
    struct MapWorkbookSource {
        files: HashMap<PathBuf, Vec<NamedSheet>>,
    }

    #[async_trait]
    impl WorkbookSource for MapWorkbookSource {
        async fn exists(&self, path: &Path) -> bool {
            self.files.contains_key(path)
        }

        async fn read_sheets(&self, path: &Path) -> IngestResult<Vec<NamedSheet>> {
            self.files
                .get(path)
                .cloned()
                .ok_or_else(|| IngestError::FileNotFound(path.display().to_string()))
        }

        async fn list_workbooks(&self, dir: &Path) -> IngestResult<Vec<PathBuf>> {
            let mut paths: Vec<PathBuf> = self
                .files
                .keys()
                .filter(|p| p.parent() == Some(dir))
                .cloned()
                .collect();
            paths.sort();
            Ok(paths)
        }
    }

    fn grid(rows: Vec<Vec<&str>>) -> SheetGrid {
        SheetGrid::new(
            rows.into_iter()
                .map(|r| r.into_iter().map(CellValue::from_text).collect())
                .collect(),
        )
    }

    fn workflow_item_all_complete() -> WorkflowItem {
        let snap = |stage| StageStatusSnapshot::new(stage, StageStatus::Complete, Some(100));
        WorkflowItem {
            id: "W1".to_string(),
            kind: "station".to_string(),
            simulation_context_key: "ctx".to_string(),
            design_stage: snap(PipelineStage::Design),
            simulation_stage: snap(PipelineStage::Simulation),
            manufacture_stage: snap(PipelineStage::Manufacture),
            external_supplier_name: None,
            is_reuse: None,
            has_assets: None,
        }
    }

    #[tokio::test]
    async fn test_empty_root_yields_empty_result() {
        let orchestrator = IngestionOrchestrator::new(MapWorkbookSource::default());
        let result = orchestrator.run(IngestOptions::new("/data")).await;
        assert!(result.assets.is_empty());
        assert!(result.reuse_records.is_empty());
        assert!(result.errors.is_empty());
        assert_eq!(result.linking_stats, LinkingStats::default());
    }

    #[tokio::test]
    async fn test_disabled_phases_short_circuit() {
        let mut source = MapWorkbookSource::default();
        source.files.insert(
            PathBuf::from("/data/reuse/RISERS.xlsx"),
            vec![NamedSheet {
                name: "Risers".to_string(),
                grid: grid(vec![
                    vec!["Part Number", "Old Station", "Target Station"],
                    vec!["Ka000292S", "S1", "S2"],
                ]),
            }],
        );

        let mut options = IngestOptions::new("/data");
        options.load_reuse_lists = false;
        let result = IngestionOrchestrator::new(source).run(options).await;
        assert!(result.reuse_records.is_empty());
        assert_eq!(result.linking_stats.total_reuse_records, 0);
    }

    #[tokio::test]
    async fn test_workflow_items_classified_without_workbooks() {
        let orchestrator = IngestionOrchestrator::new(MapWorkbookSource::default());
        let mut options = IngestOptions::new("/data");
        options.workflow_items = vec![workflow_item_all_complete()];
        let result = orchestrator.run(options).await;
        assert_eq!(result.bottlenecks.len(), 1);
        assert_eq!(result.bottlenecks[0].severity_score, 0);
    }

    #[tokio::test]
    async fn test_parser_warnings_propagate_alongside_assets() {
        let mut source = MapWorkbookSource::default();
        source.files.insert(
            PathBuf::from("/data/TOOLING.csv"),
            vec![NamedSheet {
                name: "Tools".to_string(),
                grid: grid(vec![
                    vec!["Tool Number", "Tool Type", "Station"],
                    // Thin row: warned about, then skipped.
                    vec!["T-1", "", ""],
                    vec!["T-2", "Gripper", "S3"],
                ]),
            }],
        );

        let result = IngestionOrchestrator::new(source)
            .run(IngestOptions::new("/data"))
            .await;

        assert_eq!(result.assets.len(), 1);
        assert_eq!(result.assets[0].detailed_kind, "Gripper");
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("structurally insufficient")));
    }

    #[tokio::test]
    async fn test_reuse_summary_counts() {
        let mut source = MapWorkbookSource::default();
        source.files.insert(
            PathBuf::from("/data/reuse/RISERS.xlsx"),
            vec![NamedSheet {
                name: "Risers".to_string(),
                grid: grid(vec![
                    vec!["Part Number", "Old Station", "Target Station", "Status"],
                    vec!["Ka000292S", "S1", "S2", "available"],
                    vec!["Ka000293S", "S3", "S4", "scrapped"],
                ]),
            }],
        );

        let result = IngestionOrchestrator::new(source)
            .run(IngestOptions::new("/data"))
            .await;
        assert_eq!(result.reuse_summary.by_asset_type.get("RISER"), Some(&2));
        assert_eq!(
            result.reuse_summary.by_allocation_status.get("AVAILABLE"),
            Some(&1)
        );
        assert_eq!(
            result.reuse_summary.by_allocation_status.get("SCRAPPED"),
            Some(&1)
        );
    }
}
