// ==========================================
// Assemblies-list parser
// ==========================================
// Welded sub-assemblies tracked per station. The assembly number is the
// part identifier; quantity and variant columns are left to vacuum
// capture since they never drive linking.
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
    part_number: &["assembly number", "assembly no", "assy number", "assy no"],
    serial_number: &[],
    model: &[],
    kind: &["type", "assembly type", "description"],
    completion: &[],
    default_kind: "Assembly",
};

#[derive(Debug, Default)]
pub struct AssembliesListParser;

impl AssembliesListParser {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::grid::CellValue;

    fn row(cells: &[&str]) -> Vec<CellValue> {
        cells.iter().map(|c| CellValue::from_text(c)).collect()
    }

    #[test]
    fn test_assembly_number_maps_to_part_number() {
        let grid = SheetGrid::new(vec![
            row(&["Assembly Number", "Station", "Qty"]),
            row(&["AS-77-001", "S9", "2"]),
        ]);
        let parsed = AssembliesListParser::new().parse("Assemblies", &grid).unwrap();

        let r = &parsed.rows[0];
        assert_eq!(r.identifiers.part_number.as_deref(), Some("AS-77-001"));
        assert_eq!(r.detailed_kind, "Assembly");
        assert_eq!(r.metrics.get("Qty").map(String::as_str), Some("2"));
    }
}
