// ==========================================
// Column profiler
// ==========================================
// Reduces one column (header cell + sampled data cells) to a normalized
// profile: tokenized header, type distribution, fill rate, cardinality.
// Profiles are created fresh per ingestion run and never mutated.
// ==========================================

use crate::importer::grid::{normalize_header, CellValue, SheetGrid};
use crate::tuning;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ==========================================
// Type distribution
// ==========================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDistribution {
    pub text: usize,
    pub number: usize,
    pub boolean: usize,
    pub empty: usize,
}

impl TypeDistribution {
    pub fn total(&self) -> usize {
        self.text + self.number + self.boolean + self.empty
    }

    pub fn non_empty(&self) -> usize {
        self.text + self.number + self.boolean
    }

    /// The dominant non-empty cell shape, if the column has any values.
    pub fn dominant(&self) -> Option<DominantType> {
        if self.non_empty() == 0 {
            return None;
        }
        if self.number >= self.text && self.number >= self.boolean {
            Some(DominantType::Number)
        } else if self.text >= self.boolean {
            Some(DominantType::Text)
        } else {
            Some(DominantType::Bool)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DominantType {
    Text,
    Number,
    Bool,
}

// ==========================================
// Column profile
// ==========================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub column_index: usize,
    pub header_raw: String,
    pub header_normalized: String,
    pub type_distribution: TypeDistribution,
    /// Share of sampled cells that are non-empty, 0.0-1.0.
    pub fill_rate: f64,
    /// Distinct non-empty display values in the sample.
    pub cardinality: usize,
}

impl ColumnProfile {
    /// Near-unique columns are plausible identifiers.
    pub fn is_near_unique(&self) -> bool {
        let non_empty = self.type_distribution.non_empty();
        non_empty > 0
            && (self.cardinality as f64) >= tuning::NEAR_UNIQUE_RATIO * (non_empty as f64)
    }
}

// ==========================================
// Profiler
// ==========================================

#[derive(Debug, Default)]
pub struct ColumnProfiler;

impl ColumnProfiler {
    pub fn new() -> Self {
        Self
    }

    /// Profile a single column from its header cell and sampled values.
    pub fn profile_column(
        &self,
        column_index: usize,
        header: &CellValue,
        values: &[&CellValue],
    ) -> ColumnProfile {
        let header_raw = header.as_display();
        let header_normalized = normalize_header(&header_raw);

        let mut distribution = TypeDistribution::default();
        let mut distinct: HashSet<String> = HashSet::new();
        for value in values {
            match value {
                CellValue::Text(_) => distribution.text += 1,
                CellValue::Number(_) => distribution.number += 1,
                CellValue::Bool(_) => distribution.boolean += 1,
                CellValue::Empty => distribution.empty += 1,
            }
            if !value.is_empty() {
                distinct.insert(value.as_display());
            }
        }

        let total = distribution.total();
        let fill_rate = if total == 0 {
            0.0
        } else {
            distribution.non_empty() as f64 / total as f64
        };

        ColumnProfile {
            column_index,
            header_raw,
            header_normalized,
            type_distribution: distribution,
            fill_rate,
            cardinality: distinct.len(),
        }
    }

    /// Profile every column of a sheet given its resolved header row.
    /// Samples at most PROFILE_SAMPLE_ROWS data rows below the header.
    pub fn profile_sheet(&self, grid: &SheetGrid, header_row: usize) -> Vec<ColumnProfile> {
        let header = match grid.row(header_row) {
            Some(row) => row,
            None => return Vec::new(),
        };

        let sample_end = grid
            .row_count()
            .min(header_row + 1 + tuning::PROFILE_SAMPLE_ROWS);

        (0..header.len())
            .map(|col| {
                let values: Vec<&CellValue> = (header_row + 1..sample_end)
                    .map(|r| grid.cell(r, col).unwrap_or(&CellValue::Empty))
                    .collect();
                self.profile_column(col, &header[col], &values)
            })
            .collect()
    }
}
