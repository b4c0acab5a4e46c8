// ==========================================
// Cell grid primitives
// ==========================================
// Row-major cell grids plus the normalization helpers shared by the
// profiler, sniffer and category parsers: header normalization, percent
// parsing, empty/total-row detection.
// ==========================================

use calamine::Data;

// ==========================================
// Cell value
// ==========================================

/// A single spreadsheet cell, reduced to the four shapes the pipeline
/// distinguishes.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Empty,
}

impl CellValue {
    pub fn from_calamine(data: &Data) -> Self {
        match data {
            Data::Empty => CellValue::Empty,
            Data::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    CellValue::Empty
                } else {
                    CellValue::Text(trimmed.to_string())
                }
            }
            Data::Float(f) => CellValue::Number(*f),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Bool(b) => CellValue::Bool(*b),
            // Formula errors carry no usable value.
            Data::Error(_) => CellValue::Empty,
            other => {
                let text = other.to_string();
                if text.trim().is_empty() {
                    CellValue::Empty
                } else {
                    CellValue::Text(text.trim().to_string())
                }
            }
        }
    }

    /// A cell parsed from text input (CSV). Numeric- and boolean-looking
    /// strings are promoted so CSV behaves like Excel.
    pub fn from_text(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return CellValue::Empty;
        }
        if let Ok(n) = trimmed.parse::<f64>() {
            return CellValue::Number(n);
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "true" => CellValue::Bool(true),
            "false" => CellValue::Bool(false),
            _ => CellValue::Text(trimmed.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Display form; integers render without a trailing `.0`.
    pub fn as_display(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{n}")
                }
            }
            CellValue::Bool(b) => b.to_string(),
            CellValue::Empty => String::new(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

// ==========================================
// Sheet grid
// ==========================================

/// One worksheet as a row-major cell grid.
#[derive(Debug, Clone, Default)]
pub struct SheetGrid {
    pub rows: Vec<Vec<CellValue>>,
}

impl SheetGrid {
    pub fn new(rows: Vec<Vec<CellValue>>) -> Self {
        Self { rows }
    }

    pub fn from_calamine_range(range: &calamine::Range<Data>) -> Self {
        let rows = range
            .rows()
            .map(|row| row.iter().map(CellValue::from_calamine).collect())
            .collect();
        Self { rows }
    }

    pub fn from_text_rows(rows: Vec<Vec<String>>) -> Self {
        let rows = rows
            .into_iter()
            .map(|row| row.iter().map(|c| CellValue::from_text(c)).collect())
            .collect();
        Self { rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, index: usize) -> Option<&[CellValue]> {
        self.rows.get(index).map(|r| r.as_slice())
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(col))
    }
}

// ==========================================
// Normalization helpers
// ==========================================

/// Normalize a header for matching: lowercase, alphanumeric tokens
/// joined by single spaces. "Part-No. (new)" -> "part no new".
pub fn normalize_header(raw: &str) -> String {
    let mut tokens: Vec<String> = Vec::new();
    let mut current = String::new();
    for ch in raw.chars() {
        if ch.is_alphanumeric() {
            current.extend(ch.to_lowercase());
        } else if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens.join(" ")
}

/// Normalize a percentage-like cell into an integer 0-100.
///
/// Accepted forms: numeric 0-100, fractional 0-1 (scaled by 100), textual
/// with an optional `%` suffix. Out-of-range or unparseable values map to
/// None, never to an error.
pub fn parse_percent(cell: &CellValue) -> Option<u8> {
    let value = match cell {
        CellValue::Number(n) => *n,
        CellValue::Text(s) => {
            let stripped = s.trim().trim_end_matches('%').trim();
            stripped.parse::<f64>().ok()?
        }
        _ => return None,
    };
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    let scaled = if value <= 1.0 { value * 100.0 } else { value };
    if scaled > 100.0 {
        return None;
    }
    Some(scaled.round() as u8)
}

/// Number of non-empty cells in a row.
pub fn populated_cell_count(row: &[CellValue]) -> usize {
    row.iter().filter(|c| !c.is_empty()).count()
}

/// A row with no populated cells at all.
pub fn is_effectively_empty_row(row: &[CellValue]) -> bool {
    populated_cell_count(row) == 0
}

/// Summary rows ("Total", "Grand total", "Sum of ...") are not data.
pub fn is_total_row(row: &[CellValue]) -> bool {
    let first = row.iter().find(|c| !c.is_empty());
    match first {
        Some(CellValue::Text(s)) => {
            let normalized = normalize_header(s);
            normalized.starts_with("total")
                || normalized.starts_with("grand total")
                || normalized.starts_with("sum")
        }
        _ => false,
    }
}
