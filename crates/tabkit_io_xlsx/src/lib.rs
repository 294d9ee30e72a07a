//! `tabkit_io_xlsx`:
//! XLSX boundary and row decode/validate pipeline over `tabkit_grid`.
//!
//! - `conf`   : constants, accepted date formats, default message catalog
//! - `spec`   : field rules, record contracts, decode reports, errors
//! - `locale` : localized validation message lookup
//! - `util`   : pure conversion helpers
//! - `reader` : container import (calamine)
//! - `writer` : container export (rust_xlsxwriter)
//! - `decode` : per-row validation, annotation write-back, typed decoding
pub mod conf;
pub mod decode;
pub mod locale;
pub mod reader;
pub mod spec;
pub mod util;
pub mod writer;

pub use conf::{
    C_EXTENSION_XLSX, C_MEDIA_TYPE_XLSX, N_ROWS_BANNER_DEFAULT, derive_default_locale_catalog,
};
pub use decode::{decode_sheet, safe_cell_number, safe_cell_text};
pub use locale::LocaleCatalog;
pub use reader::{load_workbook_from_bytes, load_workbook_from_path};
pub use spec::{
    EnumFieldKind, EnumFieldValue, ReportSheetDecode, SpecFieldRule, SpecRecordContract,
    XlsxError,
};
pub use util::{convert_datetime_to_epoch_millis, is_integer_text, parse_date_text};
pub use writer::{export_workbook_to_path, save_workbook_to_bytes};
