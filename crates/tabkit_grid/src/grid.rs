//! Sparse workbook/sheet/cell grid model with workbook-scoped style interning.

use std::collections::BTreeMap;

use crate::conf::{
    C_SHEET_NAME_DEFAULT, N_FACTOR_WIDTH_SHEET, N_FONT_SIZE_DEFAULT, N_HEIGHT_ROW_DEFAULT_POINTS,
    N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX, N_ROWS_WINDOW_DEFAULT, N_WIDTH_COL_DEFAULT,
};
use crate::spec::{EnumCellValue, GridError, HandleStyle, SpecCellStyle, SpecMergedRegion};
use crate::util::{calculate_auto_row_height, estimate_text_width, render_cell_text};

////////////////////////////////////////////////////////////////////////////////
// #region AccessStrategy

/// Container access strategy selected at construction.
///
/// `Buffered` is the large-write strategy: rows falling more than the window
/// below the highest row touched are finalized and can no longer be revised.
/// `Random` keeps every row mutable for read-modify-write flows. The
/// addressing layer enforces the difference internally; callers never branch
/// on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumGridAccess {
    /// Full random access; every row stays mutable.
    Random,
    /// Write-optimized access with a trailing mutable row window.
    Buffered {
        /// Number of trailing rows kept mutable.
        n_rows_window: usize,
    },
}

impl Default for EnumGridAccess {
    fn default() -> Self {
        Self::Buffered {
            n_rows_window: N_ROWS_WINDOW_DEFAULT,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region CellsAndRows

/// One grid cell: a typed value plus an optional interned style.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CellSlot {
    /// Typed cell content.
    pub value: EnumCellValue,
    /// Interned style; the sheet/workbook default style when `None`.
    pub style: Option<HandleStyle>,
}

/// One sparse row: cells keyed by column index, created lazily.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RowCells {
    dict_cells: BTreeMap<usize, CellSlot>,
    n_height_points: Option<f64>,
}

impl RowCells {
    /// Cell at `n_idx_col`, if it was ever written.
    pub fn cell(&self, n_idx_col: usize) -> Option<&CellSlot> {
        self.dict_cells.get(&n_idx_col)
    }

    /// Iterate written cells in column order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, &CellSlot)> {
        self.dict_cells.iter().map(|(n_idx_col, cell)| (*n_idx_col, cell))
    }

    /// Highest written column index.
    pub fn col_last_index(&self) -> Option<usize> {
        self.dict_cells.keys().next_back().copied()
    }

    /// Explicit row height in points, if one was set.
    pub fn height_points(&self) -> Option<f64> {
        self.n_height_points
    }

    /// Whether every written cell is blank (or none was written).
    pub fn is_blank(&self) -> bool {
        self.dict_cells
            .values()
            .all(|cell| matches!(cell.value, EnumCellValue::Blank))
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SheetGrid

/// One named sheet: sparse rows, column widths, merge regions.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetGrid {
    c_name: String,
    dict_rows: BTreeMap<usize, RowCells>,
    dict_widths_by_col: BTreeMap<usize, i64>,
    l_merged_regions: Vec<SpecMergedRegion>,
    rule_access: EnumGridAccess,
    n_idx_row_highest: Option<usize>,
}

impl SheetGrid {
    fn new(c_name: String, rule_access: EnumGridAccess) -> Self {
        Self {
            c_name,
            dict_rows: BTreeMap::new(),
            dict_widths_by_col: BTreeMap::new(),
            l_merged_regions: Vec::new(),
            rule_access,
            n_idx_row_highest: None,
        }
    }

    /// Sheet name.
    pub fn name(&self) -> &str {
        &self.c_name
    }

    /// First row that is still mutable under the buffered window.
    fn derive_row_mutable_first(&self) -> usize {
        match (self.rule_access, self.n_idx_row_highest) {
            (EnumGridAccess::Buffered { n_rows_window }, Some(n_idx_row_highest))
                if n_idx_row_highest + 1 > n_rows_window =>
            {
                n_idx_row_highest + 1 - n_rows_window
            }
            _ => 0,
        }
    }

    fn validate_row_mutable(&self, n_idx_row: usize) -> Result<(), GridError> {
        if n_idx_row >= N_NROWS_EXCEL_MAX {
            return Err(GridError::RowIndexOverflow(n_idx_row));
        }
        let n_idx_row_mutable_first = self.derive_row_mutable_first();
        if n_idx_row < n_idx_row_mutable_first {
            return Err(GridError::RowFinalized {
                n_idx_row,
                n_idx_row_mutable_first,
            });
        }
        Ok(())
    }

    /// Row at `n_idx_row`, creating it on first access.
    ///
    /// Repeated calls with the same index return the same row; no duplicate
    /// is ever created.
    pub fn row_get_or_create(&mut self, n_idx_row: usize) -> Result<&mut RowCells, GridError> {
        self.validate_row_mutable(n_idx_row)?;
        self.n_idx_row_highest = Some(match self.n_idx_row_highest {
            Some(n_idx_row_highest) => usize::max(n_idx_row_highest, n_idx_row),
            None => n_idx_row,
        });
        Ok(self.dict_rows.entry(n_idx_row).or_default())
    }

    /// Row at `n_idx_row`, if it was ever written.
    pub fn row(&self, n_idx_row: usize) -> Option<&RowCells> {
        self.dict_rows.get(&n_idx_row)
    }

    /// Iterate written rows in index order.
    pub fn rows(&self) -> impl Iterator<Item = (usize, &RowCells)> {
        self.dict_rows.iter().map(|(n_idx_row, row)| (*n_idx_row, row))
    }

    /// Lowest written row index.
    pub fn row_first_index(&self) -> Option<usize> {
        self.dict_rows.keys().next().copied()
    }

    /// Highest written row index.
    pub fn row_last_index(&self) -> Option<usize> {
        self.dict_rows.keys().next_back().copied()
    }

    /// Number of written rows.
    pub fn row_count(&self) -> usize {
        self.dict_rows.len()
    }

    /// Cell at `(n_idx_row, n_idx_col)`, creating row and cell on first access.
    pub fn cell_get_or_create(
        &mut self,
        n_idx_row: usize,
        n_idx_col: usize,
    ) -> Result<&mut CellSlot, GridError> {
        if n_idx_col >= N_NCOLS_EXCEL_MAX {
            return Err(GridError::ColumnIndexOverflow(n_idx_col));
        }
        let row = self.row_get_or_create(n_idx_row)?;
        Ok(row.dict_cells.entry(n_idx_col).or_default())
    }

    /// Cell at `(n_idx_row, n_idx_col)`, if it was ever written.
    pub fn cell(&self, n_idx_row: usize, n_idx_col: usize) -> Option<&CellSlot> {
        self.dict_rows
            .get(&n_idx_row)
            .and_then(|row| row.dict_cells.get(&n_idx_col))
    }

    /// Set one cell's value, keeping its current style.
    pub fn set_cell_value(
        &mut self,
        n_idx_row: usize,
        n_idx_col: usize,
        value: EnumCellValue,
    ) -> Result<(), GridError> {
        self.cell_get_or_create(n_idx_row, n_idx_col)?.value = value;
        Ok(())
    }

    /// Set one cell's style, keeping its current value.
    pub fn set_cell_style(
        &mut self,
        n_idx_row: usize,
        n_idx_col: usize,
        handle: HandleStyle,
    ) -> Result<(), GridError> {
        self.cell_get_or_create(n_idx_row, n_idx_col)?.style = Some(handle);
        Ok(())
    }

    /// Set one cell's value and style together.
    pub fn set_cell(
        &mut self,
        n_idx_row: usize,
        n_idx_col: usize,
        value: EnumCellValue,
        handle: Option<HandleStyle>,
    ) -> Result<(), GridError> {
        let cell = self.cell_get_or_create(n_idx_row, n_idx_col)?;
        cell.value = value;
        if handle.is_some() {
            cell.style = handle;
        }
        Ok(())
    }

    /// Whether the row at `n_idx_row` is absent or entirely blank.
    pub fn row_is_blank(&self, n_idx_row: usize) -> bool {
        self.dict_rows
            .get(&n_idx_row)
            .is_none_or(RowCells::is_blank)
    }

    /// Register a merged region over `rows x cols`, all bounds inclusive.
    ///
    /// A 1x1 extent is a no-op on the region table and returns `Ok(false)`;
    /// style application at the anchor is the caller's normal cell write.
    /// Inverted extents and overlaps with an existing region are rejected.
    pub fn merge_region(
        &mut self,
        n_idx_row_start: usize,
        n_idx_row_end: usize,
        n_idx_col_start: usize,
        n_idx_col_end: usize,
    ) -> Result<bool, GridError> {
        let region = SpecMergedRegion {
            n_idx_row_start,
            n_idx_row_end,
            n_idx_col_start,
            n_idx_col_end,
        };
        if n_idx_row_end < n_idx_row_start || n_idx_col_end < n_idx_col_start {
            return Err(GridError::MergeExtentInverted { region });
        }
        if n_idx_row_end >= N_NROWS_EXCEL_MAX {
            return Err(GridError::RowIndexOverflow(n_idx_row_end));
        }
        if n_idx_col_end >= N_NCOLS_EXCEL_MAX {
            return Err(GridError::ColumnIndexOverflow(n_idx_col_end));
        }
        if region.is_single_cell() {
            return Ok(false);
        }
        if let Some(existing) = self
            .l_merged_regions
            .iter()
            .find(|existing| existing.overlaps(&region))
        {
            return Err(GridError::MergeOverlap {
                requested: region,
                existing: *existing,
            });
        }

        self.l_merged_regions.push(region);
        Ok(true)
    }

    /// Registered merged regions in registration order.
    pub fn merged_regions(&self) -> &[SpecMergedRegion] {
        &self.l_merged_regions
    }

    /// Set one column's width in character units.
    pub fn set_column_width(&mut self, n_idx_col: usize, n_width: i64) {
        self.dict_widths_by_col.insert(n_idx_col, n_width);
    }

    /// Set leading column widths from a list, applying the sheet width factor.
    pub fn set_sheet_column_widths(&mut self, l_widths: &[i64]) {
        for (n_idx_col, n_width) in l_widths.iter().enumerate() {
            self.set_column_width(n_idx_col, n_width * N_FACTOR_WIDTH_SHEET);
        }
    }

    /// Width of one column in character units, defaulting when never set.
    pub fn column_width(&self, n_idx_col: usize) -> i64 {
        self.dict_widths_by_col
            .get(&n_idx_col)
            .copied()
            .unwrap_or(N_WIDTH_COL_DEFAULT)
    }

    /// Iterate explicitly set column widths in column order.
    pub fn column_widths(&self) -> impl Iterator<Item = (usize, i64)> {
        self.dict_widths_by_col
            .iter()
            .map(|(n_idx_col, n_width)| (*n_idx_col, *n_width))
    }

    /// Sum of the widths of columns `n_idx_col_start..=n_idx_col_end`.
    pub fn col_width_sum(
        &self,
        n_idx_col_start: usize,
        n_idx_col_end: usize,
    ) -> Result<i64, GridError> {
        if n_idx_col_end < n_idx_col_start {
            return Err(GridError::ColumnSpanInverted {
                n_idx_col_start,
                n_idx_col_end,
            });
        }
        Ok((n_idx_col_start..=n_idx_col_end)
            .map(|n_idx_col| self.column_width(n_idx_col))
            .sum())
    }

    /// Set one row's height in points.
    pub fn set_row_height_points(
        &mut self,
        n_idx_row: usize,
        n_height_points: f64,
    ) -> Result<(), GridError> {
        self.row_get_or_create(n_idx_row)?.n_height_points = Some(n_height_points);
        Ok(())
    }

    /// Height of one row in points, defaulting when never set.
    pub fn row_height_points(&self, n_idx_row: usize) -> f64 {
        self.dict_rows
            .get(&n_idx_row)
            .and_then(RowCells::height_points)
            .unwrap_or(N_HEIGHT_ROW_DEFAULT_POINTS)
    }

    /// Raise one row's height from the line-count heuristic.
    ///
    /// `n_width_total` is the character width the text spans. The height only
    /// ever increases; a smaller estimate never shrinks a prior height.
    pub fn set_row_height_auto(
        &mut self,
        n_idx_row: usize,
        n_width_total: i64,
        n_chars: usize,
        n_size_font: i64,
    ) -> Result<(), GridError> {
        let n_height_new = calculate_auto_row_height(
            n_chars,
            n_width_total,
            n_size_font,
            N_HEIGHT_ROW_DEFAULT_POINTS,
        );
        if n_height_new > self.row_height_points(n_idx_row) {
            self.set_row_height_points(n_idx_row, n_height_new)?;
        }
        Ok(())
    }

    /// Render rows `0..=last` as display text, one string per cell.
    ///
    /// Absent rows render as empty vectors; `n_cols_max` caps the cell count
    /// per row. Each call re-reads from the start.
    pub fn read_rows(&self, n_cols_max: Option<usize>) -> Vec<Vec<String>> {
        let Some(n_idx_row_last) = self.row_last_index() else {
            return Vec::new();
        };

        let mut l_rows = Vec::with_capacity(n_idx_row_last + 1);
        for n_idx_row in 0..=n_idx_row_last {
            let Some(row) = self.dict_rows.get(&n_idx_row) else {
                l_rows.push(Vec::new());
                continue;
            };
            let Some(n_idx_col_last) = row.col_last_index() else {
                l_rows.push(Vec::new());
                continue;
            };
            let n_idx_col_cap = match n_cols_max {
                Some(n_cols) if n_cols > 0 => usize::min(n_idx_col_last, n_cols - 1),
                Some(_) => {
                    l_rows.push(Vec::new());
                    continue;
                }
                None => n_idx_col_last,
            };

            let mut l_cells = Vec::with_capacity(n_idx_col_cap + 1);
            for n_idx_col in 0..=n_idx_col_cap {
                let c_text = row
                    .cell(n_idx_col)
                    .map(|cell| render_cell_text(&cell.value))
                    .unwrap_or_default();
                l_cells.push(c_text);
            }
            l_rows.push(l_cells);
        }
        l_rows
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region GridWorkbook

/// Ownership root: sheets plus the workbook-scoped style intern cache.
#[derive(Debug, Clone, Default)]
pub struct GridWorkbook {
    l_sheets: Vec<SheetGrid>,
    dict_style_handles: BTreeMap<SpecCellStyle, HandleStyle>,
    l_styles_realized: Vec<SpecCellStyle>,
    rule_access: EnumGridAccess,
}

impl GridWorkbook {
    /// Create an empty workbook with the given access strategy.
    pub fn new(rule_access: EnumGridAccess) -> Self {
        Self {
            rule_access,
            ..Default::default()
        }
    }

    /// Create a random-access workbook.
    pub fn new_random() -> Self {
        Self::new(EnumGridAccess::Random)
    }

    /// Create a buffered workbook with an explicit row window.
    pub fn new_buffered(n_rows_window: usize) -> Self {
        Self::new(EnumGridAccess::Buffered { n_rows_window })
    }

    /// Create a buffered workbook holding one default-named sheet.
    pub fn with_default_sheet() -> Self {
        let mut workbook = Self::default();
        workbook.sheet_get_or_create(C_SHEET_NAME_DEFAULT);
        workbook
    }

    /// Access strategy this workbook was constructed with.
    pub fn rule_access(&self) -> EnumGridAccess {
        self.rule_access
    }

    /// Intern one style descriptor, returning its realized handle.
    ///
    /// Idempotent under value equality: structurally equal descriptors
    /// always yield the same handle, so at most one realized style exists
    /// per distinct descriptor per workbook. The cache never evicts.
    pub fn intern_style(&mut self, style: &SpecCellStyle) -> HandleStyle {
        if let Some(handle) = self.dict_style_handles.get(style) {
            return *handle;
        }
        let handle = HandleStyle(self.l_styles_realized.len() as u32);
        self.l_styles_realized.push(style.clone());
        self.dict_style_handles.insert(style.clone(), handle);
        handle
    }

    /// Realized style table, indexed by [`HandleStyle::index`].
    pub fn styles_realized(&self) -> &[SpecCellStyle] {
        &self.l_styles_realized
    }

    /// Descriptor behind one realized handle.
    pub fn style_at(&self, handle: HandleStyle) -> Option<&SpecCellStyle> {
        self.l_styles_realized.get(handle.index())
    }

    /// Number of realized styles.
    pub fn style_count(&self) -> usize {
        self.l_styles_realized.len()
    }

    /// Sheet named `c_name`, creating it on first access.
    pub fn sheet_get_or_create(&mut self, c_name: &str) -> &mut SheetGrid {
        let n_idx_sheet = match self
            .l_sheets
            .iter()
            .position(|sheet| sheet.c_name == c_name)
        {
            Some(n_idx_sheet) => n_idx_sheet,
            None => {
                self.l_sheets
                    .push(SheetGrid::new(c_name.to_string(), self.rule_access));
                self.l_sheets.len() - 1
            }
        };
        &mut self.l_sheets[n_idx_sheet]
    }

    /// Sheet at `n_idx_sheet`.
    pub fn sheet_at(&self, n_idx_sheet: usize) -> Option<&SheetGrid> {
        self.l_sheets.get(n_idx_sheet)
    }

    /// Mutable sheet at `n_idx_sheet`.
    pub fn sheet_at_mut(&mut self, n_idx_sheet: usize) -> Option<&mut SheetGrid> {
        self.l_sheets.get_mut(n_idx_sheet)
    }

    /// Sheet named `c_name`.
    pub fn sheet_by_name(&self, c_name: &str) -> Option<&SheetGrid> {
        self.l_sheets.iter().find(|sheet| sheet.c_name == c_name)
    }

    /// Index of the sheet named `c_name`.
    pub fn sheet_index_by_name(&self, c_name: &str) -> Option<usize> {
        self.l_sheets.iter().position(|sheet| sheet.c_name == c_name)
    }

    /// Whether a sheet named `c_name` exists.
    pub fn sheet_exists(&self, c_name: &str) -> bool {
        self.sheet_by_name(c_name).is_some()
    }

    /// Whether a sheet exists at `n_idx_sheet`.
    pub fn sheet_exists_at(&self, n_idx_sheet: usize) -> bool {
        n_idx_sheet < self.l_sheets.len()
    }

    /// Remove the sheet at `n_idx_sheet`; absent indices are ignored.
    pub fn remove_sheet(&mut self, n_idx_sheet: usize) {
        if self.sheet_exists_at(n_idx_sheet) {
            self.l_sheets.remove(n_idx_sheet);
        }
    }

    /// All sheets in creation order.
    pub fn sheets(&self) -> &[SheetGrid] {
        &self.l_sheets
    }

    /// Number of sheets.
    pub fn sheet_count(&self) -> usize {
        self.l_sheets.len()
    }

    /// Render all rows of the named sheet as display text.
    ///
    /// An absent sheet renders as no rows.
    pub fn read_rows(&self, c_sheet_name: &str, n_cols_max: Option<usize>) -> Vec<Vec<String>> {
        self.sheet_by_name(c_sheet_name)
            .map(|sheet| sheet.read_rows(n_cols_max))
            .unwrap_or_default()
    }

    /// Recompute every row's height on one sheet from its cells.
    ///
    /// Each row takes the largest line estimate over its cells (minimum one
    /// line), using each cell's styled font size and its column's width.
    pub fn auto_fit_row_heights(&mut self, n_idx_sheet: usize) -> Result<(), GridError> {
        let sheet = self
            .l_sheets
            .get(n_idx_sheet)
            .ok_or(GridError::SheetIndexOutOfRange(n_idx_sheet))?;

        let mut l_heights: Vec<(usize, f64)> = Vec::new();
        for (n_idx_row, row) in sheet.rows() {
            let mut n_lines_max = 1i64;
            for (n_idx_col, cell) in row.cells() {
                let n_size_font = cell
                    .style
                    .and_then(|handle| self.l_styles_realized.get(handle.index()))
                    .and_then(|style| style.font.as_ref())
                    .map(|font| font.n_size_font)
                    .unwrap_or(N_FONT_SIZE_DEFAULT);
                let n_chars = render_cell_text(&cell.value).chars().count();
                let n_lines = crate::util::calculate_needed_lines(
                    n_chars,
                    sheet.column_width(n_idx_col),
                    n_size_font,
                );
                n_lines_max = i64::max(n_lines_max, n_lines);
            }
            l_heights.push((n_idx_row, n_lines_max as f64 * N_HEIGHT_ROW_DEFAULT_POINTS));
        }

        let sheet = &mut self.l_sheets[n_idx_sheet];
        for (n_idx_row, n_height_points) in l_heights {
            sheet.set_row_height_points(n_idx_row, n_height_points)?;
        }
        Ok(())
    }

    /// Size every written column on one sheet from its longest rendered cell.
    pub fn auto_fit_column_widths(&mut self, n_idx_sheet: usize) -> Result<(), GridError> {
        let sheet = self
            .l_sheets
            .get_mut(n_idx_sheet)
            .ok_or(GridError::SheetIndexOutOfRange(n_idx_sheet))?;

        let mut dict_width_by_col: BTreeMap<usize, usize> = BTreeMap::new();
        for (_, row) in sheet.rows() {
            for (n_idx_col, cell) in row.cells() {
                let n_width = estimate_text_width(&render_cell_text(&cell.value));
                let n_width_seen = dict_width_by_col.entry(n_idx_col).or_insert(0);
                *n_width_seen = usize::max(*n_width_seen, n_width);
            }
        }
        for (n_idx_col, n_width) in dict_width_by_col {
            sheet.set_column_width(n_idx_col, i64::max(1, n_width as i64));
        }
        Ok(())
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conf::derive_style_header;

    #[test]
    fn test_intern_style_is_idempotent_under_value_equality() {
        let mut workbook = GridWorkbook::new_random();
        let style_a = derive_style_header();
        let style_b = derive_style_header();

        let handle_a = workbook.intern_style(&style_a);
        let handle_b = workbook.intern_style(&style_b);
        for _ in 0..10 {
            workbook.intern_style(&style_a);
        }

        assert_eq!(handle_a, handle_b);
        assert_eq!(workbook.style_count(), 1);

        let style_c = SpecCellStyle {
            if_wrap: !style_a.if_wrap,
            ..style_a.clone()
        };
        let handle_c = workbook.intern_style(&style_c);
        assert_ne!(handle_a, handle_c);
        assert_eq!(workbook.style_count(), 2);
        assert_eq!(workbook.style_at(handle_c), Some(&style_c));
    }

    #[test]
    fn test_get_or_create_row_and_cell_never_duplicate() {
        let mut workbook = GridWorkbook::new_random();
        let sheet = workbook.sheet_get_or_create("data");
        sheet
            .set_cell_value(5, 2, EnumCellValue::Text("x".to_string()))
            .unwrap();
        sheet.row_get_or_create(5).unwrap();
        sheet.cell_get_or_create(5, 2).unwrap();

        assert_eq!(sheet.row_count(), 1);
        assert_eq!(sheet.row(5).unwrap().cells().count(), 1);
        assert_eq!(
            sheet.cell(5, 2).unwrap().value,
            EnumCellValue::Text("x".to_string())
        );

        workbook.sheet_get_or_create("data");
        assert_eq!(workbook.sheet_count(), 1);
    }

    #[test]
    fn test_merge_region_rejects_overlap_and_skips_single_cell() {
        let mut workbook = GridWorkbook::new_random();
        let sheet = workbook.sheet_get_or_create("data");

        assert!(sheet.merge_region(0, 1, 0, 3).unwrap());
        let err = sheet.merge_region(1, 2, 3, 5).unwrap_err();
        assert!(matches!(err, GridError::MergeOverlap { .. }));

        assert!(!sheet.merge_region(9, 9, 9, 9).unwrap());
        assert_eq!(sheet.merged_regions().len(), 1);

        let err = sheet.merge_region(4, 3, 0, 0).unwrap_err();
        assert!(matches!(err, GridError::MergeExtentInverted { .. }));
    }

    #[test]
    fn buffered_access_finalizes_rows_below_the_window() {
        let mut workbook = GridWorkbook::new_buffered(2);
        let sheet = workbook.sheet_get_or_create("data");
        for n_idx_row in 0..5 {
            sheet
                .set_cell_value(n_idx_row, 0, EnumCellValue::Number(n_idx_row as f64))
                .unwrap();
        }

        let err = sheet
            .set_cell_value(0, 0, EnumCellValue::Blank)
            .unwrap_err();
        assert!(matches!(err, GridError::RowFinalized { .. }));
        // Rows inside the trailing window stay mutable; reads are unaffected.
        sheet.set_cell_value(4, 1, EnumCellValue::Blank).unwrap();
        assert_eq!(sheet.cell(0, 0).unwrap().value, EnumCellValue::Number(0.0));

        let mut workbook = GridWorkbook::new_random();
        let sheet = workbook.sheet_get_or_create("data");
        for n_idx_row in 0..5 {
            sheet
                .set_cell_value(n_idx_row, 0, EnumCellValue::Blank)
                .unwrap();
        }
        sheet.set_cell_value(0, 0, EnumCellValue::Blank).unwrap();
    }

    #[test]
    fn test_read_rows_renders_gaps_and_caps_columns() {
        let mut workbook = GridWorkbook::new_random();
        let sheet = workbook.sheet_get_or_create("data");
        sheet
            .set_cell_value(0, 0, EnumCellValue::Number(1.5))
            .unwrap();
        sheet
            .set_cell_value(0, 2, EnumCellValue::Text("c".to_string()))
            .unwrap();
        sheet
            .set_cell_value(2, 1, EnumCellValue::Boolean(false))
            .unwrap();

        let l_rows = sheet.read_rows(None);
        assert_eq!(l_rows.len(), 3);
        assert_eq!(l_rows[0], vec!["1.5", "", "c"]);
        assert!(l_rows[1].is_empty());
        assert_eq!(l_rows[2], vec!["", "false"]);

        let l_rows_capped = sheet.read_rows(Some(2));
        assert_eq!(l_rows_capped[0], vec!["1.5", ""]);
    }

    #[test]
    fn test_row_height_auto_only_increases() {
        let mut workbook = GridWorkbook::new_random();
        let sheet = workbook.sheet_get_or_create("data");

        sheet.set_row_height_auto(0, 40, 20, 12).unwrap();
        assert_eq!(sheet.row_height_points(0), 30.0);
        // A smaller estimate never shrinks the row.
        sheet.set_row_height_auto(0, 40, 1, 12).unwrap();
        assert_eq!(sheet.row_height_points(0), 30.0);
        sheet.set_row_height_auto(0, 40, 60, 12).unwrap();
        assert_eq!(sheet.row_height_points(0), 60.0);
    }

    #[test]
    fn sheet_housekeeping_by_name_and_index() {
        let mut workbook = GridWorkbook::with_default_sheet();
        workbook.sheet_get_or_create("extra");

        assert!(workbook.sheet_exists("Sheet1"));
        assert!(workbook.sheet_exists_at(1));
        assert_eq!(workbook.sheet_index_by_name("extra"), Some(1));

        workbook.remove_sheet(0);
        assert!(!workbook.sheet_exists("Sheet1"));
        assert_eq!(workbook.sheet_count(), 1);
        workbook.remove_sheet(7);
        assert_eq!(workbook.sheet_count(), 1);
    }

    #[test]
    fn test_column_width_accounting() {
        let mut workbook = GridWorkbook::new_random();
        let sheet = workbook.sheet_get_or_create("data");
        sheet.set_column_width(0, 12);
        sheet.set_sheet_column_widths(&[10, 10]);

        // Index 0 is overwritten by the sheet-width list (10 * 4).
        assert_eq!(sheet.column_width(0), 40);
        assert_eq!(sheet.column_width(1), 40);
        assert_eq!(sheet.column_width(5), N_WIDTH_COL_DEFAULT);
        assert_eq!(sheet.col_width_sum(0, 2).unwrap(), 88);
        assert!(matches!(
            sheet.col_width_sum(3, 1),
            Err(GridError::ColumnSpanInverted { .. })
        ));
    }
}
