// ==========================================
// Body-shop ingestion - reuse list coordinator
// ==========================================
// Responsibility: discover the reuse-list workbooks under both source
// trees, parse them, convert rows to canonical records, deduplicate.
// Precedence: INTERNAL always beats DESIGNOS for the same dedup id.
// ==========================================

use crate::domain::reuse::{Provenance, ReuseRecord};
use crate::domain::types::{AssetType, ReuseSource, SheetCategory};
use crate::importer::file_reader::{NamedSheet, WorkbookSource, WORKBOOK_EXTENSIONS};
use crate::importer::grid::SheetGrid;
use crate::importer::parsers::{
    ParsedSheet, ReuseRow, RiserListParser, TipDresserListParser, WeldGunListParser,
};
use crate::importer::sniffer::SheetSniffer;
use crate::importer::IngestResult;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

// Filename stems per reuse category; extensions are tried in order.
const REUSE_FILE_STEMS: &[(SheetCategory, &str)] = &[
    (SheetCategory::ReuseRisers, "RISERS"),
    (SheetCategory::ReuseTipDressers, "TIP_DRESSERS"),
    (SheetCategory::ReuseWeldGuns, "WELD_GUNS"),
];

// ==========================================
// Outcome
// ==========================================

#[derive(Debug, Default)]
pub struct ReuseListOutcome {
    pub records: Vec<ReuseRecord>,
    /// Per-file failures; the run continues past each one.
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

// ==========================================
// ReuseListCoordinator
// ==========================================

pub struct ReuseListCoordinator {
    sniffer: SheetSniffer,
}

impl ReuseListCoordinator {
    pub fn new(sniffer: SheetSniffer) -> Self {
        Self { sniffer }
    }

    /// Walk both source trees, parse every reuse workbook found, and
    /// return the deduplicated record pool. Missing files are skipped
    /// without comment; unreadable ones become error strings.
    pub async fn collect<S: WorkbookSource>(
        &self,
        source: &S,
        data_root: &Path,
    ) -> ReuseListOutcome {
        let mut outcome = ReuseListOutcome::default();
        let mut raw_records: Vec<ReuseRecord> = Vec::new();

        // INTERNAL first: dedup keeps the earlier record on equal source.
        let roots = [
            (ReuseSource::Internal, data_root.join("reuse")),
            (ReuseSource::Designos, data_root.join("designos").join("reuse")),
        ];

        for (reuse_source, root) in &roots {
            for &(category, stem) in REUSE_FILE_STEMS {
                let Some(path) = Self::find_workbook(source, root, stem).await else {
                    debug!(source = %reuse_source, stem, "reuse workbook absent, skipped");
                    continue;
                };

                let workbook_id = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or(stem)
                    .to_string();

                let sheets = match source.read_sheets(&path).await {
                    Ok(sheets) => sheets,
                    Err(e) => {
                        outcome
                            .errors
                            .push(format!("{}: {e}", path.display()));
                        continue;
                    }
                };

                let Some(sheet) = self.pick_sheet(&workbook_id, &sheets, category) else {
                    continue;
                };

                match Self::parse_category(category, &sheet.name, &sheet.grid) {
                    Ok(parsed) => {
                        outcome.warnings.extend(parsed.warnings);
                        let count = parsed.rows.len();
                        for row in parsed.rows {
                            raw_records.push(Self::to_record(
                                category,
                                row,
                                &workbook_id,
                                &sheet.name,
                                *reuse_source,
                            ));
                        }
                        info!(
                            source = %reuse_source,
                            workbook = %workbook_id,
                            sheet = %sheet.name,
                            rows = count,
                            "reuse workbook parsed"
                        );
                    }
                    Err(e) => {
                        outcome
                            .errors
                            .push(format!("{workbook_id}/{}: {e}", sheet.name));
                    }
                }
            }
        }

        self.deduplicate(raw_records, &mut outcome);
        outcome
    }

    /// First existing `<root>/<stem>.<ext>` over the known extensions.
    async fn find_workbook<S: WorkbookSource>(
        source: &S,
        root: &Path,
        stem: &str,
    ) -> Option<PathBuf> {
        for ext in WORKBOOK_EXTENSIONS {
            let candidate = root.join(format!("{stem}.{ext}"));
            if source.exists(&candidate).await {
                return Some(candidate);
            }
        }
        None
    }

    /// Prefer the sheet the sniffer classifies into the expected
    /// category; a single-sheet workbook with an unrecognizable sheet
    /// still parses via the first sheet.
    fn pick_sheet<'a>(
        &self,
        workbook_id: &str,
        sheets: &'a [NamedSheet],
        category: SheetCategory,
    ) -> Option<&'a NamedSheet> {
        sheets
            .iter()
            .find(|s| {
                self.sniffer
                    .classify(workbook_id, &s.name, &s.grid)
                    .category
                    == category
            })
            .or_else(|| sheets.first())
    }

    fn parse_category(
        category: SheetCategory,
        sheet_name: &str,
        grid: &SheetGrid,
    ) -> IngestResult<ParsedSheet<ReuseRow>> {
        match category {
            SheetCategory::ReuseRisers => RiserListParser::new().parse(sheet_name, grid),
            SheetCategory::ReuseTipDressers => TipDresserListParser::new().parse(sheet_name, grid),
            SheetCategory::ReuseWeldGuns => WeldGunListParser::new().parse(sheet_name, grid),
            other => unreachable!("not a reuse category: {other}"),
        }
    }

    fn to_record(
        category: SheetCategory,
        row: ReuseRow,
        workbook_id: &str,
        sheet_name: &str,
        source: ReuseSource,
    ) -> ReuseRecord {
        // REUSE_FILE_STEMS only lists categories with an asset type.
        let asset_type = category.reuse_asset_type().unwrap_or(AssetType::Riser);
        ReuseRecord::new(
            asset_type,
            row.allocation_status,
            row.old_location,
            row.target_location,
            row.identifiers,
            Provenance {
                workbook_id: workbook_id.to_string(),
                sheet_name: sheet_name.to_string(),
                row_index: row.row_index,
                source,
            },
        )
    }

    /// Collapse id collisions. INTERNAL wins over DESIGNOS (tagged
    /// `also-in-designos`); two DESIGNOS records keep the first, tag it
    /// `duplicate-in-designos` and warn; two INTERNAL records keep the
    /// first silently.
    fn deduplicate(&self, raw: Vec<ReuseRecord>, outcome: &mut ReuseListOutcome) {
        let mut index_by_id: HashMap<String, usize> = HashMap::new();

        for record in raw {
            let Some(&existing_idx) = index_by_id.get(&record.id) else {
                index_by_id.insert(record.id.clone(), outcome.records.len());
                outcome.records.push(record);
                continue;
            };

            let existing = &mut outcome.records[existing_idx];
            match (existing.provenance.source, record.provenance.source) {
                (ReuseSource::Internal, ReuseSource::Designos) => {
                    existing.add_tag("also-in-designos");
                }
                (ReuseSource::Designos, ReuseSource::Internal) => {
                    let mut winner = record;
                    winner.add_tag("also-in-designos");
                    // Tags already earned by the stored record survive
                    // the replacement.
                    for tag in &existing.tags {
                        winner.add_tag(tag);
                    }
                    *existing = winner;
                }
                (ReuseSource::Designos, ReuseSource::Designos) => {
                    existing.add_tag("duplicate-in-designos");
                    warn!(id = %existing.id, "duplicate DESIGNOS reuse record");
                    outcome.warnings.push(format!(
                        "duplicate DESIGNOS reuse record: {}",
                        existing.id
                    ));
                }
                (ReuseSource::Internal, ReuseSource::Internal) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::reuse::{EquipmentIdentifiers, LocationRef};
    use crate::domain::types::AllocationStatus;
    use crate::importer::error::IngestError;
    use crate::importer::grid::CellValue;
    use async_trait::async_trait;

    /// In-memory workbook tree keyed by full path.
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
    }

    fn riser_sheet(part: &str) -> NamedSheet {
        let rows = vec![
            vec!["Part Number", "Old Project", "Old Station", "Target Line", "Target Station"],
            vec![part, "OLD", "S1", "L2", "S2"],
        ];
        NamedSheet {
            name: "Risers".to_string(),
            grid: SheetGrid::new(
                rows.into_iter()
                    .map(|r| r.into_iter().map(CellValue::from_text).collect())
                    .collect(),
            ),
        }
    }

    fn coordinator() -> ReuseListCoordinator {
        ReuseListCoordinator::new(SheetSniffer::with_defaults())
    }

    #[tokio::test]
    async fn test_missing_workbooks_are_silently_skipped() {
        let source = MapWorkbookSource::default();
        let outcome = coordinator().collect(&source, Path::new("/data")).await;
        assert!(outcome.records.is_empty());
        assert!(outcome.errors.is_empty());
        assert!(outcome.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_internal_beats_designos() {
        let mut source = MapWorkbookSource::default();
        source.files.insert(
            PathBuf::from("/data/reuse/RISERS.xlsx"),
            vec![riser_sheet("Ka000292S")],
        );
        source.files.insert(
            PathBuf::from("/data/designos/reuse/RISERS.xlsx"),
            vec![riser_sheet("Ka000292S")],
        );

        let outcome = coordinator().collect(&source, Path::new("/data")).await;
        assert_eq!(outcome.records.len(), 1);
        let record = &outcome.records[0];
        assert_eq!(record.provenance.source, ReuseSource::Internal);
        assert_eq!(record.tags, vec!["also-in-designos".to_string()]);
        assert!(outcome.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_designos_only_record_kept_as_is() {
        let mut source = MapWorkbookSource::default();
        source.files.insert(
            PathBuf::from("/data/designos/reuse/RISERS.xlsx"),
            vec![riser_sheet("Ka000300S")],
        );

        let outcome = coordinator().collect(&source, Path::new("/data")).await;
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].provenance.source, ReuseSource::Designos);
        assert!(outcome.records[0].tags.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_within_designos_warns() {
        let mut sheet = riser_sheet("Ka000292S");
        // Same logical row twice in one DESIGNOS workbook.
        let dup_row = sheet.grid.rows[1].clone();
        sheet.grid.rows.push(dup_row);

        let mut source = MapWorkbookSource::default();
        source
            .files
            .insert(PathBuf::from("/data/designos/reuse/RISERS.xlsx"), vec![sheet]);

        let outcome = coordinator().collect(&source, Path::new("/data")).await;
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(
            outcome.records[0].tags,
            vec!["duplicate-in-designos".to_string()]
        );
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[test]
    fn test_internal_replacement_keeps_designos_duplicate_tag() {
        fn riser_record(source: ReuseSource, row_index: usize) -> ReuseRecord {
            ReuseRecord::new(
                AssetType::Riser,
                AllocationStatus::Available,
                LocationRef::new(Some("OLD".to_string()), None, Some("S1".to_string())),
                LocationRef::default(),
                EquipmentIdentifiers {
                    part_number: Some("Ka000292S".to_string()),
                    ..EquipmentIdentifiers::default()
                },
                Provenance {
                    workbook_id: "RISERS.xlsx".to_string(),
                    sheet_name: "Risers".to_string(),
                    row_index,
                    source,
                },
            )
        }

        // Two DESIGNOS copies first (earning the duplicate tag), then
        // the INTERNAL record that displaces them.
        let raw = vec![
            riser_record(ReuseSource::Designos, 1),
            riser_record(ReuseSource::Designos, 2),
            riser_record(ReuseSource::Internal, 1),
        ];
        let mut outcome = ReuseListOutcome::default();
        coordinator().deduplicate(raw, &mut outcome);

        assert_eq!(outcome.records.len(), 1);
        let record = &outcome.records[0];
        assert_eq!(record.provenance.source, ReuseSource::Internal);
        assert!(record.tags.contains(&"also-in-designos".to_string()));
        assert!(record.tags.contains(&"duplicate-in-designos".to_string()));
    }

    #[tokio::test]
    async fn test_unreadable_workbook_becomes_error_entry() {
        struct FailingSource;

        #[async_trait]
        impl WorkbookSource for FailingSource {
            async fn exists(&self, path: &Path) -> bool {
                path == Path::new("/data/reuse/RISERS.xlsx")
            }
            async fn read_sheets(&self, path: &Path) -> IngestResult<Vec<NamedSheet>> {
                Err(IngestError::ExcelParseError(format!(
                    "corrupt: {}",
                    path.display()
                )))
            }
        }

        let outcome = coordinator().collect(&FailingSource, Path::new("/data")).await;
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.errors.len(), 1);
        assert!(outcome.errors[0].contains("corrupt"));
    }

    #[tokio::test]
    async fn test_csv_extension_fallback() {
        let mut source = MapWorkbookSource::default();
        source.files.insert(
            PathBuf::from("/data/reuse/TIP_DRESSERS.csv"),
            vec![NamedSheet {
                name: "TIP_DRESSERS".to_string(),
                grid: SheetGrid::new(
                    vec![
                        vec!["Serial Number", "Old Station", "Target Station"],
                        vec!["TD-1", "S1", "S9"],
                    ]
                    .into_iter()
                    .map(|r| r.into_iter().map(CellValue::from_text).collect())
                    .collect(),
                ),
            }],
        );

        let outcome = coordinator().collect(&source, Path::new("/data")).await;
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].asset_type, AssetType::TipDresser);
    }
}
