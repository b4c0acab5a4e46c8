// ==========================================
// Weld-gun reuse-list parser
// ==========================================
// Weld guns carry a plant-wide gun identifier on top of the usual
// part/serial fields; that id is the strongest linking signal, so rows
// missing it are flagged for diagnostics.
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
    serial_number: &["serial number", "serial no", "serial"],
    model: &["model", "gun type", "gun model"],
    gun_id: &["gun id", "gun number", "gun no", "weld gun id", "gun name"],
    allocation_status: &["status", "allocation", "availability", "disposition"],
};

#[derive(Debug, Default)]
pub struct WeldGunListParser;

impl WeldGunListParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, sheet_name: &str, grid: &SheetGrid) -> IngestResult<ParsedSheet<ReuseRow>> {
        let mut parsed = parse_reuse_sheet(sheet_name, grid, &ALIASES)?;

        for row in &parsed.rows {
            if row.identifiers.gun_id.is_none() {
                parsed.warnings.push(format!(
                    "{sheet_name} row {}: weld gun without gun id",
                    row.row_index
                ));
            }
        }

        Ok(parsed)
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
    fn test_gun_id_resolution() {
        let grid = SheetGrid::new(vec![
            row(&["Gun Id", "Part Number", "Old Station", "Target Line", "Target Station", "Force kN"]),
            row(&["G-0042", "Kb110200", "S3", "L1", "S12", "4.5"]),
        ]);
        let parsed = WeldGunListParser::new().parse("WeldGuns", &grid).unwrap();

        let r = &parsed.rows[0];
        assert_eq!(r.identifiers.gun_id.as_deref(), Some("G-0042"));
        assert_eq!(r.identifiers.part_number.as_deref(), Some("Kb110200"));
        // Force stays a vacuumed metric, not a logical column.
        assert_eq!(r.metrics.get("Force kN").map(String::as_str), Some("4.5"));
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn test_missing_gun_id_warns() {
        let grid = SheetGrid::new(vec![
            row(&["Part Number", "Old Station", "Target Station"]),
            row(&["Kb110201", "S4", "S13"]),
        ]);
        let parsed = WeldGunListParser::new().parse("WeldGuns", &grid).unwrap();
        assert_eq!(parsed.rows.len(), 1);
        assert!(parsed.warnings.iter().any(|w| w.contains("without gun id")));
    }
}
