// ==========================================
// In-house tooling parser
// ==========================================
// Grippers, fixtures and stands built in-house. The tool number doubles
// as the part number; the free-text type/description column is the
// detailed kind so downstream asset typing can tell a gripper from a
// fixture.
// ==========================================

use crate::importer::error::IngestResult;
use crate::importer::grid::SheetGrid;
use crate::importer::parsers::{
    parse_equipment_sheet, EquipmentColumnAliases, EquipmentRow, ParsedSheet,
};

static ALIASES: EquipmentColumnAliases = EquipmentColumnAliases {
    project: &["project", "project code", "program"],
    line: &["line", "prod line", "production line"],
    station: &["station", "station code", "station no"],
    part_number: &["tool number", "tool no", "tool id", "fixture number"],
    serial_number: &["serial number", "serial no", "serial"],
    model: &["model"],
    kind: &["type", "tool type", "description"],
    completion: &["progress", "percent complete", "completion", "complete"],
    default_kind: "Tool",
};

#[derive(Debug, Default)]
pub struct ToolListParser;

impl ToolListParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(
        &self,
        sheet_name: &str,
        grid: &SheetGrid,
    ) -> IngestResult<ParsedSheet<EquipmentRow>> {
        parse_equipment_sheet(sheet_name, grid, &ALIASES)
    }
}
