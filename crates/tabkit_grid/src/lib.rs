//! `tabkit_grid`:
//! Grid layout and style-interning engine for tabular report documents.
//!
//! - `conf`   : constants and default style presets
//! - `spec`   : style/column/merge/error models
//! - `util`   : pure helper functions (row-height heuristic, rendering)
//! - `grid`   : sparse workbook/sheet/cell model with style interning
//! - `layout` : metadata-driven sheet composition
pub mod conf;
pub mod grid;
pub mod layout;
pub mod spec;
pub mod util;

pub use conf::{
    C_SHEET_NAME_DEFAULT, N_HEIGHT_ROW_DEFAULT_POINTS, N_LEN_EXCEL_SHEET_NAME_MAX,
    N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX, N_ROWS_WINDOW_DEFAULT, TUP_EXCEL_ILLEGAL,
};
pub use grid::{CellSlot, EnumGridAccess, GridWorkbook, RowCells, SheetGrid};
pub use layout::{
    build_column_values, generate_matrix_sheet, generate_row_span_sheet, generate_sheet,
};
pub use spec::{
    EnumBorderWeight, EnumCellValue, EnumHorizontalAlign, EnumVerticalAlign, GridError,
    HandleStyle, SpecBorderEdges, SpecCellStyle, SpecColumnRule, SpecFontStyle,
    SpecGenerateOptions, SpecMatrixSheet, SpecMergedRegion,
};
pub use util::{
    calculate_auto_row_height, calculate_needed_lines, derive_style_from_rule,
    estimate_text_width, render_cell_text, sanitize_sheet_name,
};
