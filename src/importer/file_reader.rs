// ==========================================
// Workbook reading
// ==========================================
// Excel (.xlsx/.xlsm) via calamine, CSV via the csv crate. Every sheet
// comes back as a raw SheetGrid; interpretation happens downstream. The
// WorkbookSource trait is the seam tests use to substitute fixtures.
// ==========================================

use crate::importer::error::{IngestError, IngestResult};
use crate::importer::grid::SheetGrid;
use async_trait::async_trait;
use calamine::{open_workbook, Reader, Xlsx};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::{Path, PathBuf};

// ==========================================
// Named sheet
// ==========================================

#[derive(Debug, Clone)]
pub struct NamedSheet {
    pub name: String,
    pub grid: SheetGrid,
}

// ==========================================
// WorkbookSource trait
// ==========================================

/// Access to workbook files. Existence checks and reads are independent
/// async operations; decoding itself stays synchronous (small files,
/// sequential by design).
#[async_trait]
pub trait WorkbookSource: Send + Sync {
    async fn exists(&self, path: &Path) -> bool;
    async fn read_sheets(&self, path: &Path) -> IngestResult<Vec<NamedSheet>>;

    /// Workbook files directly under `dir`, sorted by name. A missing
    /// directory is an empty listing, not an error.
    async fn list_workbooks(&self, _dir: &Path) -> IngestResult<Vec<PathBuf>> {
        Ok(Vec::new())
    }
}

/// Extensions recognized as workbook files.
pub const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "csv"];

// ==========================================
// Filesystem implementation
// ==========================================

#[derive(Debug, Clone, Default)]
pub struct FsWorkbookSource;

#[async_trait]
impl WorkbookSource for FsWorkbookSource {
    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }

    async fn read_sheets(&self, path: &Path) -> IngestResult<Vec<NamedSheet>> {
        if !path.exists() {
            return Err(IngestError::FileNotFound(path.display().to_string()));
        }

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "xlsx" | "xlsm" => read_excel(path),
            "csv" => read_csv(path),
            _ => Err(IngestError::UnsupportedFormat(ext)),
        }
    }

    async fn list_workbooks(&self, dir: &Path) -> IngestResult<Vec<PathBuf>> {
        if !tokio::fs::try_exists(dir).await.unwrap_or(false) {
            return Ok(Vec::new());
        }

        let mut entries = tokio::fs::read_dir(dir).await?;
        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("")
                .to_lowercase();
            if WORKBOOK_EXTENSIONS.contains(&ext.as_str()) {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }
}

// ==========================================
// Excel
// ==========================================

fn read_excel(path: &Path) -> IngestResult<Vec<NamedSheet>> {
    let mut workbook: Xlsx<_> = open_workbook(path)
        .map_err(|e: calamine::XlsxError| IngestError::ExcelParseError(e.to_string()))?;

    let sheet_names = workbook.sheet_names();
    if sheet_names.is_empty() {
        return Err(IngestError::EmptyWorkbook(path.display().to_string()));
    }

    let mut sheets = Vec::with_capacity(sheet_names.len());
    for name in sheet_names {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|e| IngestError::ExcelParseError(format!("{name}: {e}")))?;
        sheets.push(NamedSheet {
            name,
            grid: SheetGrid::from_calamine_range(&range),
        });
    }

    Ok(sheets)
}

// ==========================================
// CSV
// ==========================================
// A CSV file is exposed as a single sheet named after the file stem, with
// the header left in the grid. Header detection downstream is the same
// for both formats.

fn read_csv(path: &Path) -> IngestResult<Vec<NamedSheet>> {
    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut rows: Vec<Vec<String>> = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(|v| v.to_string()).collect());
    }

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Sheet1")
        .to_string();

    Ok(vec![NamedSheet {
        name,
        grid: SheetGrid::from_text_rows(rows),
    }])
}
