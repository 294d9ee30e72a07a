//! Shared decode/boundary specification models.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use tabkit_grid::spec::{EnumCellValue, GridError};

use crate::conf::N_ROWS_BANNER_DEFAULT;

////////////////////////////////////////////////////////////////////////////////
// #region FieldSpecification

/// Typed conversion target of one decoded field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumFieldKind {
    /// Text field; numeric cells render as fixed-point integers.
    Text,
    /// Integer field; validated against non-integer text.
    Integer,
    /// Timestamp field in epoch milliseconds; validated against unparsable
    /// date text.
    Timestamp,
    /// Boolean field decoded by text equality against a truthy constant.
    Flag {
        /// Cell text that decodes to `true`.
        c_truthy: String,
    },
}

/// One decoded field value.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumFieldValue {
    /// Absent or unconvertible source cell.
    None,
    /// Text value.
    Text(String),
    /// Integer value.
    Integer(i64),
    /// Epoch-millisecond timestamp.
    Timestamp(i64),
    /// Boolean value.
    Flag(bool),
}

impl EnumFieldValue {
    /// Map the decoded value back onto a grid cell value, the way generated
    /// documents carry these fields.
    pub fn to_cell_value(&self) -> EnumCellValue {
        match self {
            Self::None => EnumCellValue::Text(String::new()),
            Self::Text(c_text) => EnumCellValue::Text(c_text.clone()),
            Self::Integer(n_value) => EnumCellValue::Number(*n_value as f64),
            Self::Timestamp(n_millis) => EnumCellValue::Number(*n_millis as f64),
            Self::Flag(if_value) => EnumCellValue::Boolean(*if_value),
        }
    }
}

/// Declarative column-position contract of one decoded field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecFieldRule {
    /// Fixed source column offset; column order is a structural contract
    /// with the document layout, never matched by header name.
    pub n_offset: usize,
    /// Logical field name keying the decoded record.
    pub c_name: String,
    /// Locale key of the field's display label in validation messages.
    pub c_label_key: String,
    /// Typed conversion target.
    pub kind: EnumFieldKind,
    /// Reject rows where this field's cell is empty.
    pub if_required: bool,
}

impl SpecFieldRule {
    /// Optional text field shorthand.
    pub fn text(n_offset: usize, c_name: &str, c_label_key: &str) -> Self {
        Self {
            n_offset,
            c_name: c_name.to_string(),
            c_label_key: c_label_key.to_string(),
            kind: EnumFieldKind::Text,
            if_required: false,
        }
    }

    /// Mark the field required.
    pub fn required(mut self) -> Self {
        self.if_required = true;
        self
    }

    /// Replace the conversion target.
    pub fn with_kind(mut self, kind: EnumFieldKind) -> Self {
        self.kind = kind;
        self
    }
}

/// Per-record-type decode contract: ordered field rules plus the sheet
/// window geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecRecordContract {
    /// Ordered field rules.
    pub l_fields: Vec<SpecFieldRule>,
    /// Column that receives composite row error messages.
    pub n_idx_col_error: usize,
    /// Leading banner rows (title block + header) skipped before decoding.
    pub n_rows_banner: usize,
}

impl SpecRecordContract {
    /// Contract with the default banner height.
    pub fn new(l_fields: Vec<SpecFieldRule>, n_idx_col_error: usize) -> Self {
        Self {
            l_fields,
            n_idx_col_error,
            n_rows_banner: N_ROWS_BANNER_DEFAULT,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region DecodeReport

/// Result of one sheet decode: typed rows keyed by their physical row index
/// plus the sheet-level validity flag.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSheetDecode {
    /// Decoded records keyed by originating physical row index.
    pub dict_rows: BTreeMap<usize, BTreeMap<String, EnumFieldValue>>,
    /// Starts `true`; set `false` by the first failing row, never reset.
    pub if_valid: bool,
}

impl Default for ReportSheetDecode {
    fn default() -> Self {
        Self {
            dict_rows: BTreeMap::new(),
            if_valid: true,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Boundary and configuration failures of the XLSX side.
///
/// Row validation failures never surface here; they are written back into
/// the document and folded into [`ReportSheetDecode::if_valid`].
#[derive(Debug)]
pub enum XlsxError {
    /// Grid configuration/addressing failure.
    Grid(GridError),
    /// Caller configuration failure (bad file name, bad contract, bad
    /// sheet index).
    Config(String),
    /// Filesystem failure on the given path.
    Io {
        /// Path of the failed operation.
        path: PathBuf,
        /// Underlying error text.
        message: String,
    },
    /// Unreadable or unwritable workbook container.
    Container(String),
}

impl fmt::Display for XlsxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grid(err) => write!(f, "{err}"),
            Self::Config(c_msg) => write!(f, "{c_msg}"),
            Self::Io { path, message } => {
                write!(f, "IO failure on {}: {message}", path.display())
            }
            Self::Container(c_msg) => write!(f, "Workbook container failure: {c_msg}"),
        }
    }
}

impl std::error::Error for XlsxError {}

impl From<GridError> for XlsxError {
    fn from(err: GridError) -> Self {
        Self::Grid(err)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_rule_builders() {
        let rule = SpecFieldRule::text(3, "price", "entity.price")
            .required()
            .with_kind(EnumFieldKind::Integer);

        assert_eq!(rule.n_offset, 3);
        assert!(rule.if_required);
        assert_eq!(rule.kind, EnumFieldKind::Integer);

        let contract = SpecRecordContract::new(vec![rule], 5);
        assert_eq!(contract.n_rows_banner, N_ROWS_BANNER_DEFAULT);
    }

    #[test]
    fn field_values_map_back_onto_cells() {
        assert_eq!(
            EnumFieldValue::Integer(7).to_cell_value(),
            EnumCellValue::Number(7.0)
        );
        assert_eq!(
            EnumFieldValue::None.to_cell_value(),
            EnumCellValue::Text(String::new())
        );
        assert_eq!(
            EnumFieldValue::Flag(true).to_cell_value(),
            EnumCellValue::Boolean(true)
        );
    }
}
