// ==========================================
// Category parsers
// ==========================================
// One parser per sheet category. All of them share the same toolkit:
// alias-based column resolution, row filtering, percent normalization
// and vacuum capture of unmapped columns as free-form metrics keyed by
// their literal header text. Rows that cannot be interpreted produce
// warnings, never exceptions; a missing header row is the one fatal
// condition per invocation.
// ==========================================

pub mod assemblies;
pub mod columns;
pub mod risers;
pub mod robot_list;
pub mod tip_dressers;
pub mod tool_list;
pub mod weld_guns;

use crate::domain::reuse::{EquipmentIdentifiers, LocationRef};
use crate::domain::types::AllocationStatus;
use crate::importer::error::{IngestError, IngestResult};
use crate::importer::grid::{
    is_effectively_empty_row, is_total_row, parse_percent, populated_cell_count, CellValue,
    SheetGrid,
};
use crate::tuning;
use columns::{find_header_row, ColumnResolver};
use std::collections::BTreeMap;

pub use assemblies::AssembliesListParser;
pub use risers::RiserListParser;
pub use robot_list::RobotListParser;
pub use tip_dressers::TipDresserListParser;
pub use tool_list::ToolListParser;
pub use weld_guns::WeldGunListParser;

// ==========================================
// Parse output
// ==========================================

#[derive(Debug, Clone)]
pub struct ParsedSheet<T> {
    pub rows: Vec<T>,
    /// Non-fatal per-row problems. Effectively empty rows never warn.
    pub warnings: Vec<String>,
}

impl<T> ParsedSheet<T> {
    fn new() -> Self {
        Self { rows: Vec::new(), warnings: Vec::new() }
    }
}

// ==========================================
// Normalized row shapes
// ==========================================

/// A normalized equipment-pool row from one of the reuse-list parsers.
#[derive(Debug, Clone, PartialEq)]
pub struct ReuseRow {
    /// Zero-based row index in the source sheet.
    pub row_index: usize,
    pub old_location: LocationRef,
    pub target_location: LocationRef,
    pub identifiers: EquipmentIdentifiers,
    pub allocation_status: AllocationStatus,
    /// Vacuum capture: every unmapped, non-empty column keyed by its
    /// literal header text. BTreeMap keeps output deterministic.
    pub metrics: BTreeMap<String, String>,
}

/// A normalized primary-equipment row (robots, tools, assemblies).
#[derive(Debug, Clone, PartialEq)]
pub struct EquipmentRow {
    pub row_index: usize,
    pub project: Option<String>,
    pub line: Option<String>,
    pub station: Option<String>,
    pub identifiers: EquipmentIdentifiers,
    pub detailed_kind: String,
    /// Normalized progress percent (0-100), when the sheet carries one.
    pub completion_percent: Option<u8>,
    pub metrics: BTreeMap<String, String>,
}

// ==========================================
// Alias tables
// ==========================================
// All aliases are normalized (grid::normalize_header form). An empty
// slice means the logical column never occurs for that category.

pub(crate) struct ReuseColumnAliases {
    pub old_project: &'static [&'static str],
    pub old_line: &'static [&'static str],
    pub old_station: &'static [&'static str],
    pub target_project: &'static [&'static str],
    pub target_line: &'static [&'static str],
    pub target_station: &'static [&'static str],
    pub part_number: &'static [&'static str],
    pub serial_number: &'static [&'static str],
    pub model: &'static [&'static str],
    pub gun_id: &'static [&'static str],
    pub allocation_status: &'static [&'static str],
}

pub(crate) struct EquipmentColumnAliases {
    pub project: &'static [&'static str],
    pub line: &'static [&'static str],
    pub station: &'static [&'static str],
    pub part_number: &'static [&'static str],
    pub serial_number: &'static [&'static str],
    pub model: &'static [&'static str],
    pub kind: &'static [&'static str],
    /// Progress/completion column; values go through percent
    /// normalization (numeric, fractional and textual forms).
    pub completion: &'static [&'static str],
    /// Used when no kind column resolves or the cell is empty.
    pub default_kind: &'static str,
}

// ==========================================
// Shared parse engines
// ==========================================

fn cell_string(row: &[CellValue], col: Option<usize>) -> Option<String> {
    let idx = col?;
    let cell = row.get(idx)?;
    let text = cell.as_display();
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn vacuum_metrics(
    row: &[CellValue],
    resolver: &ColumnResolver,
    mapped: &[Option<usize>],
) -> BTreeMap<String, String> {
    let mut metrics = BTreeMap::new();
    for (idx, cell) in row.iter().enumerate() {
        if mapped.iter().any(|m| *m == Some(idx)) {
            continue;
        }
        if cell.is_empty() {
            continue;
        }
        let header = resolver.raw_header(idx);
        if header.trim().is_empty() {
            continue;
        }
        metrics.insert(header.to_string(), cell.as_display());
    }
    metrics
}

/// True for rows the parsers skip without comment: fully empty rows and
/// summary ("total") rows.
fn is_silently_skipped(row: &[CellValue]) -> bool {
    is_effectively_empty_row(row) || is_total_row(row)
}

pub(crate) fn parse_reuse_sheet(
    sheet_name: &str,
    grid: &SheetGrid,
    aliases: &ReuseColumnAliases,
) -> IngestResult<ParsedSheet<ReuseRow>> {
    let header_aliases: Vec<&str> = [
        aliases.old_project,
        aliases.old_line,
        aliases.old_station,
        aliases.target_project,
        aliases.target_line,
        aliases.target_station,
        aliases.part_number,
        aliases.serial_number,
        aliases.model,
        aliases.gun_id,
        aliases.allocation_status,
    ]
    .concat();

    let header_row = find_header_row(
        grid,
        &header_aliases,
        tuning::HEADER_SCAN_LIMIT,
        tuning::HEADER_MIN_ALIAS_HITS,
    )
    .ok_or_else(|| IngestError::HeaderRowNotFound { sheet: sheet_name.to_string() })?;

    let resolver = ColumnResolver::from_row(grid.row(header_row).unwrap_or(&[]));

    let col_old_project = resolver.resolve(aliases.old_project);
    let col_old_line = resolver.resolve(aliases.old_line);
    let col_old_station = resolver.resolve(aliases.old_station);
    let col_target_project = resolver.resolve(aliases.target_project);
    let col_target_line = resolver.resolve(aliases.target_line);
    let col_target_station = resolver.resolve(aliases.target_station);
    let col_part = resolver.resolve(aliases.part_number);
    let col_serial = resolver.resolve(aliases.serial_number);
    let col_model = resolver.resolve(aliases.model);
    let col_gun = resolver.resolve(aliases.gun_id);
    let col_status = resolver.resolve(aliases.allocation_status);

    let mapped = [
        col_old_project,
        col_old_line,
        col_old_station,
        col_target_project,
        col_target_line,
        col_target_station,
        col_part,
        col_serial,
        col_model,
        col_gun,
        col_status,
    ];

    let mut parsed = ParsedSheet::new();

    for (row_index, row) in grid.rows.iter().enumerate().skip(header_row + 1) {
        if is_silently_skipped(row) {
            continue;
        }
        if populated_cell_count(row) < tuning::MIN_POPULATED_CELLS {
            parsed.warnings.push(format!(
                "{sheet_name} row {row_index}: structurally insufficient, skipped"
            ));
            continue;
        }

        let old_location = LocationRef::new(
            cell_string(row, col_old_project),
            cell_string(row, col_old_line),
            cell_string(row, col_old_station),
        );
        let target_location = LocationRef::new(
            cell_string(row, col_target_project),
            cell_string(row, col_target_line),
            cell_string(row, col_target_station),
        );
        let identifiers = EquipmentIdentifiers {
            part_number: cell_string(row, col_part),
            serial_number: cell_string(row, col_serial),
            model: cell_string(row, col_model),
            gun_id: cell_string(row, col_gun),
        };

        if old_location.is_empty()
            && target_location.is_empty()
            && identifiers == EquipmentIdentifiers::default()
        {
            parsed.warnings.push(format!(
                "{sheet_name} row {row_index}: no identifying or location data, skipped"
            ));
            continue;
        }

        let allocation_status = cell_string(row, col_status)
            .map(|s| AllocationStatus::from_cell(&s))
            .unwrap_or(AllocationStatus::Unknown);

        parsed.rows.push(ReuseRow {
            row_index,
            old_location,
            target_location,
            identifiers,
            allocation_status,
            metrics: vacuum_metrics(row, &resolver, &mapped),
        });
    }

    Ok(parsed)
}

pub(crate) fn parse_equipment_sheet(
    sheet_name: &str,
    grid: &SheetGrid,
    aliases: &EquipmentColumnAliases,
) -> IngestResult<ParsedSheet<EquipmentRow>> {
    let header_aliases: Vec<&str> = [
        aliases.project,
        aliases.line,
        aliases.station,
        aliases.part_number,
        aliases.serial_number,
        aliases.model,
        aliases.kind,
        aliases.completion,
    ]
    .concat();

    let header_row = find_header_row(
        grid,
        &header_aliases,
        tuning::HEADER_SCAN_LIMIT,
        tuning::HEADER_MIN_ALIAS_HITS,
    )
    .ok_or_else(|| IngestError::HeaderRowNotFound { sheet: sheet_name.to_string() })?;

    let resolver = ColumnResolver::from_row(grid.row(header_row).unwrap_or(&[]));

    let col_project = resolver.resolve(aliases.project);
    let col_line = resolver.resolve(aliases.line);
    let col_station = resolver.resolve(aliases.station);
    let col_part = resolver.resolve(aliases.part_number);
    let col_serial = resolver.resolve(aliases.serial_number);
    let col_model = resolver.resolve(aliases.model);
    let col_kind = resolver.resolve(aliases.kind);
    let col_completion = resolver.resolve(aliases.completion);

    let mapped = [
        col_project,
        col_line,
        col_station,
        col_part,
        col_serial,
        col_model,
        col_kind,
        col_completion,
    ];

    let mut parsed = ParsedSheet::new();

    for (row_index, row) in grid.rows.iter().enumerate().skip(header_row + 1) {
        if is_silently_skipped(row) {
            continue;
        }
        if populated_cell_count(row) < tuning::MIN_POPULATED_CELLS {
            parsed.warnings.push(format!(
                "{sheet_name} row {row_index}: structurally insufficient, skipped"
            ));
            continue;
        }

        let identifiers = EquipmentIdentifiers {
            part_number: cell_string(row, col_part),
            serial_number: cell_string(row, col_serial),
            model: cell_string(row, col_model),
            gun_id: None,
        };
        let station = cell_string(row, col_station);

        if identifiers == EquipmentIdentifiers::default() && station.is_none() {
            parsed.warnings.push(format!(
                "{sheet_name} row {row_index}: no identifying or location data, skipped"
            ));
            continue;
        }

        let detailed_kind = cell_string(row, col_kind)
            .unwrap_or_else(|| aliases.default_kind.to_string());
        let completion_percent = col_completion
            .and_then(|idx| row.get(idx))
            .and_then(parse_percent);

        parsed.rows.push(EquipmentRow {
            row_index,
            project: cell_string(row, col_project),
            line: cell_string(row, col_line),
            station,
            identifiers,
            detailed_kind,
            completion_percent,
            metrics: vacuum_metrics(row, &resolver, &mapped),
        });
    }

    Ok(parsed)
}
