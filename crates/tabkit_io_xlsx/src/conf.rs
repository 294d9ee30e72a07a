//! XLSX boundary constants and default presets.

use crate::locale::LocaleCatalog;

/// File extension produced and accepted by the boundary.
pub const C_EXTENSION_XLSX: &str = ".xlsx";
/// Media type of exported workbooks.
pub const C_MEDIA_TYPE_XLSX: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Number format applied to date/time cells without an explicit one.
pub const C_FORMAT_NUM_DATE_DEFAULT: &str = "yyyy/m/d";

/// Banner rows (title block + header) skipped before decoding starts.
pub const N_ROWS_BANNER_DEFAULT: usize = 3;

/// Date-only text formats accepted by the locale date parser.
pub const TUP_FORMATS_DATE: [&str; 2] = ["%Y/%m/%d", "%Y-%m-%d"];
/// Date-time text formats accepted by the locale date parser.
pub const TUP_FORMATS_DATETIME: [&str; 3] = [
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

/// Default English validation messages.
pub const TUP_LOCALE_DEFAULTS: [(&str, &str); 3] = [
    ("parser.required", "Missing required fields: {0}"),
    ("parser.invalid.integer", "Integer fields contain non-integer values"),
    ("parser.invalid.datetime", "Date fields contain unparsable values"),
];

/// Build the default validation message catalog.
pub fn derive_default_locale_catalog() -> LocaleCatalog {
    LocaleCatalog::from_pairs(&TUP_LOCALE_DEFAULTS)
}
