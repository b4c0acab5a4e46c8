// ==========================================
// Riser reuse-list parser
// ==========================================
// Risers are passive robot pedestals: identified by part number, moved
// between stations wholesale. Height is the one metric that matters for
// reuse decisions; it arrives under wildly varying headers and is left
// to vacuum capture.
// ==========================================

use crate::importer::error::IngestResult;
use crate::importer::grid::SheetGrid;
use crate::importer::parsers::{parse_reuse_sheet, ParsedSheet, ReuseColumnAliases, ReuseRow};

static ALIASES: ReuseColumnAliases = ReuseColumnAliases {
    old_project: &["old project", "previous project", "donor project", "from project"],
    old_line: &["old line", "previous line", "from line"],
    old_station: &["old station", "previous station", "from station", "source station"],
    target_project: &["target project", "new project", "to project"],
    target_line: &["target line", "new line", "to line"],
    target_station: &["target station", "new station", "to station"],
    part_number: &["part number", "part no", "partnumber", "riser part number"],
    serial_number: &["serial number", "serial no", "serial"],
    model: &["model", "riser type"],
    gun_id: &[],
    allocation_status: &["status", "allocation", "availability", "disposition"],
};

pub(crate) fn aliases() -> &'static ReuseColumnAliases {
    &ALIASES
}

#[derive(Debug, Default)]
pub struct RiserListParser;

impl RiserListParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, sheet_name: &str, grid: &SheetGrid) -> IngestResult<ParsedSheet<ReuseRow>> {
        parse_reuse_sheet(sheet_name, grid, &ALIASES)
    }
}
