//! Shared grid/style specification models.

use std::fmt;

use chrono::NaiveDateTime;

use crate::conf::{C_FONT_NAME_DEFAULT, N_FONT_SIZE_DEFAULT, N_WIDTH_COL_RULE_DEFAULT};

////////////////////////////////////////////////////////////////////////////////
// #region StyleSpecification

/// Horizontal cell alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum EnumHorizontalAlign {
    /// Format-dependent default alignment.
    #[default]
    General,
    /// Left aligned.
    Left,
    /// Centered.
    Center,
    /// Right aligned.
    Right,
    /// Fill across the cell.
    Fill,
    /// Justified.
    Justify,
}

/// Vertical cell alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum EnumVerticalAlign {
    /// Top of the cell.
    Top,
    /// Vertically centered.
    #[default]
    Center,
    /// Bottom of the cell.
    Bottom,
}

/// Border line weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum EnumBorderWeight {
    /// No border line.
    None,
    /// Thin line.
    #[default]
    Thin,
    /// Medium line.
    Medium,
    /// Thick line.
    Thick,
    /// Double line.
    Double,
}

/// Which edges of a cell carry the border weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpecBorderEdges {
    /// Left edge.
    pub if_left: bool,
    /// Right edge.
    pub if_right: bool,
    /// Top edge.
    pub if_top: bool,
    /// Bottom edge.
    pub if_bottom: bool,
}

impl Default for SpecBorderEdges {
    fn default() -> Self {
        Self {
            if_left: true,
            if_right: true,
            if_top: true,
            if_bottom: true,
        }
    }
}

/// Font attributes of a cell style.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpecFontStyle {
    /// Font family name.
    pub c_name_font: String,
    /// Font size in points.
    pub n_size_font: i64,
    /// Bold style.
    pub if_bold: bool,
    /// Italic style.
    pub if_italic: bool,
    /// Font color as `#RRGGBB`; workbook default when `None`.
    pub c_color: Option<String>,
}

impl Default for SpecFontStyle {
    fn default() -> Self {
        Self {
            c_name_font: C_FONT_NAME_DEFAULT.to_string(),
            n_size_font: N_FONT_SIZE_DEFAULT,
            if_bold: false,
            if_italic: false,
            c_color: None,
        }
    }
}

/// Immutable cell style descriptor.
///
/// Two descriptors with identical field values denote the same style
/// regardless of creation order; all fields participate in equality, so the
/// descriptor can key the workbook-scoped intern cache directly.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpecCellStyle {
    /// Font attributes; workbook default font when `None`.
    pub font: Option<SpecFontStyle>,
    /// Horizontal alignment.
    pub rule_halign: EnumHorizontalAlign,
    /// Vertical alignment.
    pub rule_valign: EnumVerticalAlign,
    /// Wrap long text onto multiple lines.
    pub if_wrap: bool,
    /// Border line weight shared by all drawn edges.
    pub rule_border: EnumBorderWeight,
    /// Which edges draw the border.
    pub edges_border: SpecBorderEdges,
    /// Background fill as `#RRGGBB`; no fill when `None`.
    pub c_color_background: Option<String>,
}

impl Default for SpecCellStyle {
    fn default() -> Self {
        Self {
            font: None,
            rule_halign: EnumHorizontalAlign::General,
            rule_valign: EnumVerticalAlign::Center,
            if_wrap: false,
            rule_border: EnumBorderWeight::Thin,
            edges_border: SpecBorderEdges::default(),
            c_color_background: None,
        }
    }
}

/// Opaque handle to a realized style record inside one workbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandleStyle(pub(crate) u32);

impl HandleStyle {
    /// Index into the workbook's realized style table.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region CellValueSpecification

/// Typed content of one grid cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EnumCellValue {
    /// No content.
    #[default]
    Blank,
    /// Text content.
    Text(String),
    /// Numeric content.
    Number(f64),
    /// Boolean content.
    Boolean(bool),
    /// Formula reference kept as its formula text; never evaluated.
    Formula(String),
    /// Date/time content.
    DateTime(NaiveDateTime),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region MergeSpecification

/// Rectangular merged cell range, all bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecMergedRegion {
    /// First row of the range.
    pub n_idx_row_start: usize,
    /// Last row of the range.
    pub n_idx_row_end: usize,
    /// First column of the range.
    pub n_idx_col_start: usize,
    /// Last column of the range.
    pub n_idx_col_end: usize,
}

impl SpecMergedRegion {
    /// Whether the range degenerates to a single cell.
    pub fn is_single_cell(&self) -> bool {
        self.n_idx_row_start == self.n_idx_row_end && self.n_idx_col_start == self.n_idx_col_end
    }

    /// Whether any (row, col) cell belongs to both ranges.
    pub fn overlaps(&self, other: &SpecMergedRegion) -> bool {
        !(other.n_idx_row_end < self.n_idx_row_start
            || other.n_idx_row_start > self.n_idx_row_end
            || other.n_idx_col_end < self.n_idx_col_start
            || other.n_idx_col_start > self.n_idx_col_end)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ColumnRuleSpecification

/// Per-field column descriptor driving header rendering and content placement.
///
/// A record type registers an ordered `Vec<SpecColumnRule>`; that vector
/// order is the discovery order, and content extraction pairs the i-th
/// record value with the i-th rule. `n_idx_col` is used only for final grid
/// placement, so reordering a registration silently misaligns output against
/// previously produced files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecColumnRule {
    /// Target column index relative to the layout start column.
    pub n_idx_col: usize,
    /// Header display name.
    pub c_name_col: String,
    /// Column width in character units.
    pub n_width_col: i64,
    /// Font family for header and content cells.
    pub c_name_font: String,
    /// Font size in points for header and content cells.
    pub n_size_font: i64,
    /// Horizontal alignment.
    pub rule_halign: EnumHorizontalAlign,
    /// Vertical alignment.
    pub rule_valign: EnumVerticalAlign,
    /// Number of header rows this column's header cell occupies.
    pub n_rows_span: usize,
    /// Wrap text in header and content cells.
    pub if_wrap: bool,
    /// Merge-group name; empty when the column belongs to no group.
    pub c_merge_group: String,
    /// Number of columns the merge-group cell spans.
    pub n_merge_group_size: usize,
}

impl Default for SpecColumnRule {
    fn default() -> Self {
        Self {
            n_idx_col: 0,
            c_name_col: String::new(),
            n_width_col: N_WIDTH_COL_RULE_DEFAULT,
            c_name_font: C_FONT_NAME_DEFAULT.to_string(),
            n_size_font: N_FONT_SIZE_DEFAULT,
            rule_halign: EnumHorizontalAlign::General,
            rule_valign: EnumVerticalAlign::Center,
            n_rows_span: 1,
            if_wrap: true,
            c_merge_group: String::new(),
            n_merge_group_size: 1,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region LayoutOptions

/// Options for one `generate_sheet` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecGenerateOptions {
    /// First grid row of the generated block.
    pub n_idx_row_start: usize,
    /// First grid column of the generated block.
    pub n_idx_col_start: usize,
    /// Title text merged across all data columns; no title row when `None`.
    pub c_title: Option<String>,
    /// Render the column header row(s).
    pub if_show_header: bool,
    /// Rows reserved between the title row and the header row.
    pub n_rows_title_shift: usize,
    /// Render a right-aligned generated-on date line under the title.
    pub if_create_date: bool,
}

impl Default for SpecGenerateOptions {
    fn default() -> Self {
        Self {
            n_idx_row_start: 0,
            n_idx_col_start: 0,
            c_title: None,
            if_show_header: true,
            n_rows_title_shift: 1,
            if_create_date: false,
        }
    }
}

/// Input for one `generate_matrix_sheet` call: a labeled numeric cross-tab
/// with per-row subtotals, per-column totals, and a grand total.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecMatrixSheet {
    /// Caption lines merged across the full sheet width, one row each.
    pub l_captions: Vec<String>,
    /// Label/value meta rows rendered under the captions.
    pub l_meta_rows: Vec<(String, String)>,
    /// Header label of the sidebar column.
    pub c_corner_label: String,
    /// Ordered column labels.
    pub l_column_labels: Vec<String>,
    /// Ordered sidebar row labels.
    pub l_row_labels: Vec<String>,
    /// Value matrix, `l_values[row][col]`.
    pub l_values: Vec<Vec<f64>>,
    /// Header label of the per-row subtotal column.
    pub c_subtotal_label: String,
    /// Sidebar label of the per-column total row.
    pub c_total_label: String,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Grid configuration and addressing failures.
///
/// Row-level validation failures are data, not errors; this type only covers
/// caller misconfiguration and addressing violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// Generation was requested for an empty record list.
    NoData,
    /// Generation was requested for a record type with no column rules.
    NoColumnRules,
    /// A record holds fewer values than the registered column rules.
    RecordArityMismatch {
        /// Index of the offending record.
        n_idx_record: usize,
        /// Number of values in the record.
        n_len_record: usize,
        /// Number of registered column rules.
        n_len_rules: usize,
    },
    /// Merge extents run backwards (end before start).
    MergeExtentInverted {
        /// The rejected range.
        region: SpecMergedRegion,
    },
    /// The requested merge shares at least one cell with an existing region.
    MergeOverlap {
        /// The rejected range.
        requested: SpecMergedRegion,
        /// The already registered range it collides with.
        existing: SpecMergedRegion,
    },
    /// A column span ran backwards during width summation.
    ColumnSpanInverted {
        /// First column of the span.
        n_idx_col_start: usize,
        /// Last column of the span.
        n_idx_col_end: usize,
    },
    /// A header row-span reaches above the sheet's first row.
    HeaderRowUnderflow {
        /// Header row the span ends at.
        n_idx_row_header: usize,
        /// Rows the span reaches upward.
        n_rows_span: usize,
    },
    /// A buffered-access workbook rejected a write below the row window.
    RowFinalized {
        /// The row that was addressed.
        n_idx_row: usize,
        /// First row that is still mutable.
        n_idx_row_mutable_first: usize,
    },
    /// Row index beyond the worksheet row limit.
    RowIndexOverflow(usize),
    /// Column index beyond the worksheet column limit.
    ColumnIndexOverflow(usize),
    /// Sheet index beyond the workbook's sheet list.
    SheetIndexOutOfRange(usize),
    /// Matrix value dimensions disagree with the label lists.
    MatrixShapeMismatch {
        /// Number of sidebar labels.
        n_len_rows: usize,
        /// Number of column labels.
        n_len_cols: usize,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoData => write!(f, "No data to generate."),
            Self::NoColumnRules => {
                write!(f, "Record type declares no column rules.")
            }
            Self::RecordArityMismatch {
                n_idx_record,
                n_len_record,
                n_len_rules,
            } => write!(
                f,
                "Record {n_idx_record} holds {n_len_record} values but {n_len_rules} column rules are registered."
            ),
            Self::MergeExtentInverted { region } => write!(
                f,
                "Merge extents run backwards: rows {}..={}, cols {}..={}.",
                region.n_idx_row_start,
                region.n_idx_row_end,
                region.n_idx_col_start,
                region.n_idx_col_end
            ),
            Self::MergeOverlap {
                requested,
                existing,
            } => write!(
                f,
                "Merge rows {}..={} cols {}..={} overlaps existing region rows {}..={} cols {}..={}.",
                requested.n_idx_row_start,
                requested.n_idx_row_end,
                requested.n_idx_col_start,
                requested.n_idx_col_end,
                existing.n_idx_row_start,
                existing.n_idx_row_end,
                existing.n_idx_col_start,
                existing.n_idx_col_end
            ),
            Self::ColumnSpanInverted {
                n_idx_col_start,
                n_idx_col_end,
            } => write!(
                f,
                "Column span must not be negative: {n_idx_col_start}..={n_idx_col_end}."
            ),
            Self::HeaderRowUnderflow {
                n_idx_row_header,
                n_rows_span,
            } => write!(
                f,
                "Header span of {n_rows_span} rows reaches above row 0 from header row {n_idx_row_header}."
            ),
            Self::RowFinalized {
                n_idx_row,
                n_idx_row_mutable_first,
            } => write!(
                f,
                "Row {n_idx_row} is finalized; rows below {n_idx_row_mutable_first} can no longer be revised."
            ),
            Self::RowIndexOverflow(n_idx_row) => {
                write!(f, "Row index exceeds the worksheet limit: {n_idx_row}.")
            }
            Self::ColumnIndexOverflow(n_idx_col) => {
                write!(f, "Column index exceeds the worksheet limit: {n_idx_col}.")
            }
            Self::SheetIndexOutOfRange(n_idx_sheet) => {
                write!(f, "Sheet index out of range: {n_idx_sheet}.")
            }
            Self::MatrixShapeMismatch {
                n_len_rows,
                n_len_cols,
            } => write!(
                f,
                "Matrix values do not form a {n_len_rows} x {n_len_cols} grid."
            ),
        }
    }
}

impl std::error::Error for GridError {}

// #endregion
////////////////////////////////////////////////////////////////////////////////
