// ==========================================
// Robot-list parser
// ==========================================
// Primary-equipment sheet: one row per installed robot. The robot number
// is its unique identifier (carried as the serial), the mechanical type
// as the model. Payload/reach/controller columns stay vacuumed metrics.
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
    part_number: &[],
    serial_number: &["robot number", "robot no", "robot id", "robot name"],
    model: &["robot type", "model", "type model"],
    kind: &["application", "function", "robot function"],
    completion: &[],
    default_kind: "Robot",
};

#[derive(Debug, Default)]
pub struct RobotListParser;

impl RobotListParser {
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
    fn test_parse_robot_row() {
        let grid = SheetGrid::new(vec![
            row(&["Robot Number", "Robot Type", "Line", "Station", "Payload kg"]),
            row(&["R010", "IRB 6700", "L2", "S2", "210"]),
        ]);
        let parsed = RobotListParser::new().parse("Robots", &grid).unwrap();

        let r = &parsed.rows[0];
        assert_eq!(r.identifiers.serial_number.as_deref(), Some("R010"));
        assert_eq!(r.identifiers.model.as_deref(), Some("IRB 6700"));
        assert_eq!(r.station.as_deref(), Some("S2"));
        assert_eq!(r.detailed_kind, "Robot");
        assert_eq!(r.metrics.get("Payload kg").map(String::as_str), Some("210"));
    }

    #[test]
    fn test_application_column_refines_kind() {
        let grid = SheetGrid::new(vec![
            row(&["Robot Number", "Application", "Station"]),
            row(&["R020", "Handling Robot", "S5"]),
        ]);
        let parsed = RobotListParser::new().parse("Robots", &grid).unwrap();
        assert_eq!(parsed.rows[0].detailed_kind, "Handling Robot");
    }
}
