// ==========================================
// Column resolution
// ==========================================
// Maps a parser's logical columns onto physical columns via alias lists
// tolerant of whitespace, casing and typos. Exact normalized equality is
// always preferred; substring containment is the fallback.
// ==========================================

use crate::importer::grid::{normalize_header, CellValue, SheetGrid};

// ==========================================
// Resolver
// ==========================================

/// Resolves logical columns against one header row.
#[derive(Debug)]
pub struct ColumnResolver {
    raw: Vec<String>,
    normalized: Vec<String>,
}

impl ColumnResolver {
    pub fn from_row(row: &[CellValue]) -> Self {
        let raw: Vec<String> = row.iter().map(|c| c.as_display()).collect();
        let normalized = raw.iter().map(|h| normalize_header(h)).collect();
        Self { raw, normalized }
    }

    pub fn column_count(&self) -> usize {
        self.raw.len()
    }

    /// The header exactly as it appears in the sheet (used as the vacuum
    /// metric key).
    pub fn raw_header(&self, index: usize) -> &str {
        self.raw.get(index).map(String::as_str).unwrap_or("")
    }

    /// Resolve a logical column. Aliases must be normalized. Two passes:
    /// exact equality over every column first, then substring
    /// containment, so "station" never hijacks "old station" when an
    /// exact "station" column exists.
    pub fn resolve(&self, aliases: &[&str]) -> Option<usize> {
        for alias in aliases {
            if let Some(idx) = self.normalized.iter().position(|h| h == alias) {
                return Some(idx);
            }
        }
        for alias in aliases {
            if alias.len() < 3 {
                continue;
            }
            if let Some(idx) = self
                .normalized
                .iter()
                .position(|h| !h.is_empty() && h.contains(alias))
            {
                return Some(idx);
            }
        }
        None
    }
}

// ==========================================
// Header row detection
// ==========================================

/// Scan the first `scan_limit` rows for the one that looks like a header:
/// the first row whose cells hit at least `min_hits` distinct aliases.
pub fn find_header_row(
    grid: &SheetGrid,
    aliases: &[&str],
    scan_limit: usize,
    min_hits: usize,
) -> Option<usize> {
    for (row_index, row) in grid.rows.iter().enumerate().take(scan_limit) {
        let mut hits = 0usize;
        for cell in row {
            let normalized = normalize_header(&cell.as_display());
            if normalized.is_empty() {
                continue;
            }
            if aliases
                .iter()
                .any(|a| normalized == *a || (a.len() >= 3 && normalized.contains(a)))
            {
                hits += 1;
            }
        }
        if hits >= min_hits {
            return Some(row_index);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<CellValue> {
        cells.iter().map(|c| CellValue::from_text(c)).collect()
    }

    #[test]
    fn test_exact_beats_substring() {
        let resolver = ColumnResolver::from_row(&row(&["Old Station", "Station", "Target Station"]));
        // Plain "station" resolves to the exact column, not the first
        // substring hit.
        assert_eq!(resolver.resolve(&["station"]), Some(1));
        assert_eq!(resolver.resolve(&["old station"]), Some(0));
        assert_eq!(resolver.resolve(&["target station"]), Some(2));
    }

    #[test]
    fn test_substring_fallback_tolerates_decorations() {
        let resolver = ColumnResolver::from_row(&row(&["Part-No. (new)", "Qty"]));
        assert_eq!(resolver.resolve(&["part no"]), Some(0));
    }

    #[test]
    fn test_unresolvable_column() {
        let resolver = ColumnResolver::from_row(&row(&["alpha", "beta"]));
        assert_eq!(resolver.resolve(&["part number", "part no"]), None);
    }

    #[test]
    fn test_short_aliases_never_substring_match() {
        // "pn" must not match inside arbitrary headers.
        let resolver = ColumnResolver::from_row(&row(&["component", "notes"]));
        assert_eq!(resolver.resolve(&["pn"]), None);
    }

    #[test]
    fn test_find_header_row_skips_banners() {
        let grid = SheetGrid::new(vec![
            row(&["Riser Reuse List - Plant 3"]),
            row(&["", ""]),
            row(&["Part Number", "Old Station", "Height"]),
            row(&["Ka000292S", "S1", "250"]),
        ]);
        let header = find_header_row(&grid, &["part number", "old station"], 10, 2);
        assert_eq!(header, Some(2));
    }

    #[test]
    fn test_find_header_row_missing() {
        let grid = SheetGrid::new(vec![row(&["nothing"]), row(&["relevant"])]);
        assert_eq!(find_header_row(&grid, &["part number"], 10, 1), None);
    }
}
