//! Stateless helper utilities used by the grid and layout kernels.

use crate::conf::{N_LEN_EXCEL_SHEET_NAME_MAX, TUP_EXCEL_ILLEGAL};
use crate::spec::{EnumCellValue, SpecCellStyle, SpecColumnRule, SpecFontStyle};

////////////////////////////////////////////////////////////////////////////////
// #region RowHeightHeuristic

/// Estimate how many text lines a cell needs.
///
/// `needed_lines = ceil(ceil(n_chars * n_size_font / (4.8 * n_width_total))
/// * ceil(n_size_font / 12))`. The 4.8 width factor and the 12-point font
/// divisor are empirical constants kept exactly for rendered parity with
/// previously produced documents.
pub fn calculate_needed_lines(n_chars: usize, n_width_total: i64, n_size_font: i64) -> i64 {
    let n_width_effective = 4.8 * i64::max(1, n_width_total) as f64;
    let n_chars_weighted = (n_chars as f64) * (n_size_font as f64);
    let n_lines_text = (n_chars_weighted / n_width_effective).ceil();
    let n_scale_font = (n_size_font as f64 / 12.0).ceil();
    (n_lines_text * n_scale_font).ceil() as i64
}

/// Row height in points for a cell of `n_chars` characters spanning columns
/// totalling `n_width_total` character units.
pub fn calculate_auto_row_height(
    n_chars: usize,
    n_width_total: i64,
    n_size_font: i64,
    n_height_default_points: f64,
) -> f64 {
    calculate_needed_lines(n_chars, n_width_total, n_size_font) as f64 * n_height_default_points
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region CellRendering

/// Render one cell value as display text.
///
/// Dates use the default date rendering, numerics the default numeric
/// rendering, formulas return their formula text, blanks an empty string.
pub fn render_cell_text(value: &EnumCellValue) -> String {
    match value {
        EnumCellValue::Blank => String::new(),
        EnumCellValue::Text(c_text) => c_text.clone(),
        EnumCellValue::Number(n_value) => n_value.to_string(),
        EnumCellValue::Boolean(if_value) => if_value.to_string(),
        EnumCellValue::Formula(c_formula) => c_formula.clone(),
        EnumCellValue::DateTime(dt_value) => dt_value.to_string(),
    }
}

/// Estimate displayed width units of rendered text.
///
/// Non-ASCII glyphs count 1.6 units, mirroring how wide CJK glyphs render.
pub fn estimate_text_width(c_text: &str) -> usize {
    let n_ascii = c_text.chars().filter(|chr| chr.is_ascii()).count();
    let n_non_ascii = c_text.chars().count().saturating_sub(n_ascii);
    n_ascii + (n_non_ascii as f64 * 1.6).round() as usize
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SheetNormalization

/// Replace invalid chars and trim to a valid Excel sheet name.
pub fn sanitize_sheet_name(name: &str, replace_to: &str) -> String {
    let mut c_name = name.to_string();
    for c_illegal in TUP_EXCEL_ILLEGAL {
        c_name = c_name.replace(c_illegal, replace_to);
    }
    c_name = c_name.trim().to_string();
    if c_name.is_empty() {
        c_name = "Sheet".to_string();
    }

    c_name.chars().take(N_LEN_EXCEL_SHEET_NAME_MAX).collect()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ColumnRuleDerivation

/// Build the header/content cell style a column rule declares.
pub fn derive_style_from_rule(rule: &SpecColumnRule) -> SpecCellStyle {
    SpecCellStyle {
        font: Some(SpecFontStyle {
            c_name_font: rule.c_name_font.clone(),
            n_size_font: rule.n_size_font,
            ..Default::default()
        }),
        rule_halign: rule.rule_halign,
        rule_valign: rule.rule_valign,
        if_wrap: rule.if_wrap,
        ..Default::default()
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
