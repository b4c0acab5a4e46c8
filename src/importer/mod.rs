// ==========================================
// Body-shop ingestion - import layer
// ==========================================
// Responsibility: turn messy workbook files into typed, classified rows.
// Supports: Excel (xlsx/xlsm), CSV
// ==========================================

// Module declarations
pub mod error;
pub mod field_matcher;
pub mod file_reader;
pub mod grid;
pub mod parsers;
pub mod profiler;
pub mod sniffer;
pub mod vocabulary;

// Re-export core types
pub use error::{IngestError, IngestResult};
pub use field_matcher::{FieldMatchResult, FieldMatcher};
pub use file_reader::{FsWorkbookSource, NamedSheet, WorkbookSource};
pub use grid::{CellValue, SheetGrid};
pub use parsers::{
    AssembliesListParser, EquipmentRow, ParsedSheet, ReuseRow, RiserListParser, RobotListParser,
    TipDresserListParser, ToolListParser, WeldGunListParser,
};
pub use profiler::{ColumnProfile, ColumnProfiler};
pub use sniffer::{SheetDetection, SheetOverride, SheetSniffer, SnifferConfig};
pub use vocabulary::{descriptor, vocabulary, ExpectedType, FieldDescriptor, FieldId};
