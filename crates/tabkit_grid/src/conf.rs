//! Grid constants and default style preset factories.

use crate::spec::{EnumHorizontalAlign, EnumVerticalAlign, SpecCellStyle, SpecFontStyle};

/// Excel worksheet maximum row count.
pub const N_NROWS_EXCEL_MAX: usize = 1_048_576;
/// Excel worksheet maximum column count.
pub const N_NCOLS_EXCEL_MAX: usize = 16_384;
/// Excel sheet name maximum length.
pub const N_LEN_EXCEL_SHEET_NAME_MAX: usize = 31;
/// Characters not allowed in sheet names.
pub const TUP_EXCEL_ILLEGAL: [&str; 7] = ["*", ":", "?", "/", "\\", "[", "]"];

/// Sheet name used when a caller never names one.
pub const C_SHEET_NAME_DEFAULT: &str = "Sheet1";
/// Default row height in points; the auto-height heuristic scales this.
pub const N_HEIGHT_ROW_DEFAULT_POINTS: f64 = 15.0;
/// Width of a column that was never given an explicit width, in characters.
pub const N_WIDTH_COL_DEFAULT: i64 = 8;
/// Default declared width of a column rule, in characters.
pub const N_WIDTH_COL_RULE_DEFAULT: i64 = 20;
/// Character multiplier applied by `set_sheet_column_widths`.
pub const N_FACTOR_WIDTH_SHEET: i64 = 4;
/// Trailing mutable rows kept by a buffered-access workbook by default.
pub const N_ROWS_WINDOW_DEFAULT: usize = 100;

/// Default font family.
pub const C_FONT_NAME_DEFAULT: &str = "Times New Roman";
/// Default font size in points.
pub const N_FONT_SIZE_DEFAULT: i64 = 12;
/// Title font size in points.
pub const N_FONT_SIZE_TITLE: i64 = 20;
/// Text prefix of the generated-on date line.
pub const C_PREFIX_CREATE_DATE: &str = "Generated on ";

/// Uniform column width of a matrix sheet, in characters.
pub const N_WIDTH_COL_MATRIX: i64 = 10;

/// Default content font.
pub fn derive_font_default() -> SpecFontStyle {
    SpecFontStyle::default()
}

/// Bold emphasis font.
pub fn derive_font_bold() -> SpecFontStyle {
    SpecFontStyle {
        n_size_font: 14,
        if_bold: true,
        ..Default::default()
    }
}

/// Centered wrapped content cell with the default font.
pub fn derive_style_cell_center() -> SpecCellStyle {
    SpecCellStyle {
        font: Some(derive_font_default()),
        rule_halign: EnumHorizontalAlign::Center,
        rule_valign: EnumVerticalAlign::Center,
        if_wrap: true,
        ..Default::default()
    }
}

/// Left-aligned wrapped content cell with the default font.
pub fn derive_style_cell_left() -> SpecCellStyle {
    SpecCellStyle {
        rule_halign: EnumHorizontalAlign::Left,
        ..derive_style_cell_center()
    }
}

/// Right-aligned wrapped content cell with the default font.
pub fn derive_style_cell_right() -> SpecCellStyle {
    SpecCellStyle {
        rule_halign: EnumHorizontalAlign::Right,
        ..derive_style_cell_center()
    }
}

/// Left-aligned wrapped content cell with the bold emphasis font.
pub fn derive_style_cell_left_bold() -> SpecCellStyle {
    SpecCellStyle {
        font: Some(derive_font_bold()),
        ..derive_style_cell_left()
    }
}

/// Dark header cell: white bold Arial on a charcoal fill.
pub fn derive_style_header() -> SpecCellStyle {
    SpecCellStyle {
        font: Some(SpecFontStyle {
            c_name_font: "Arial".to_string(),
            n_size_font: 10,
            if_bold: true,
            c_color: Some("#FFFFFF".to_string()),
            ..Default::default()
        }),
        rule_halign: EnumHorizontalAlign::Center,
        rule_valign: EnumVerticalAlign::Center,
        if_wrap: true,
        c_color_background: Some("#3F3F3F".to_string()),
        ..Default::default()
    }
}

/// Title cell: large centered wrapped text.
pub fn derive_style_title() -> SpecCellStyle {
    SpecCellStyle {
        font: Some(SpecFontStyle {
            n_size_font: N_FONT_SIZE_TITLE,
            ..Default::default()
        }),
        rule_halign: EnumHorizontalAlign::Center,
        if_wrap: true,
        ..Default::default()
    }
}

/// Generated-on date line: right-aligned default font.
pub fn derive_style_create_date() -> SpecCellStyle {
    SpecCellStyle {
        font: Some(derive_font_default()),
        rule_halign: EnumHorizontalAlign::Right,
        if_wrap: true,
        ..Default::default()
    }
}

/// Totals cell of a matrix sheet: centered on a green fill.
pub fn derive_style_amount() -> SpecCellStyle {
    SpecCellStyle {
        c_color_background: Some("#70AD47".to_string()),
        ..derive_style_cell_center()
    }
}
