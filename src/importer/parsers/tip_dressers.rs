// ==========================================
// Tip-dresser reuse-list parser
// ==========================================
// Tip dressers are serialized units: serial number (with model as the
// fallback) is how the pool tracks them. Rows carrying neither are
// flagged, they are nearly impossible to link later.
// ==========================================

use crate::importer::error::IngestResult;
use crate::importer::grid::SheetGrid;
use crate::importer::parsers::{parse_reuse_sheet, ParsedSheet, ReuseColumnAliases, ReuseRow};

static ALIASES: ReuseColumnAliases = ReuseColumnAliases {
    old_project: &["old project", "previous project", "from project"],
    old_line: &["old line", "previous line", "from line"],
    old_station: &["old station", "previous station", "from station"],
    target_project: &["target project", "new project", "to project"],
    target_line: &["target line", "new line", "to line"],
    target_station: &["target station", "new station", "to station"],
    part_number: &["part number", "part no", "partnumber"],
    serial_number: &["serial number", "serial no", "serial", "unit serial"],
    model: &["model", "dresser type", "dresser model", "type"],
    gun_id: &[],
    allocation_status: &["status", "allocation", "availability", "disposition"],
};

#[derive(Debug, Default)]
pub struct TipDresserListParser;

impl TipDresserListParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, sheet_name: &str, grid: &SheetGrid) -> IngestResult<ParsedSheet<ReuseRow>> {
        let mut parsed = parse_reuse_sheet(sheet_name, grid, &ALIASES)?;

        for row in &parsed.rows {
            if row.identifiers.serial_number.is_none() && row.identifiers.model.is_none() {
                parsed.warnings.push(format!(
                    "{sheet_name} row {}: tip dresser without serial number or model",
                    row.row_index
                ));
            }
        }

        Ok(parsed)
    }
}
