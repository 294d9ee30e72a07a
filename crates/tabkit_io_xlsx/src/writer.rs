//! XLSX container export: a grid workbook into bytes or a file.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDateTime, Timelike};
use rust_xlsxwriter::{ExcelDateTime, Format, FormatAlign, FormatBorder, Workbook, Worksheet};

use tabkit_grid::grid::GridWorkbook;
use tabkit_grid::spec::{
    EnumBorderWeight, EnumCellValue, EnumHorizontalAlign, EnumVerticalAlign, SpecCellStyle,
};
use tabkit_grid::util::sanitize_sheet_name;

use crate::conf::{C_EXTENSION_XLSX, C_FORMAT_NUM_DATE_DEFAULT};
use crate::spec::XlsxError;

////////////////////////////////////////////////////////////////////////////////
// #region WorkbookExport

/// Serialize a grid workbook into `.xlsx` bytes.
///
/// Every interned style descriptor realizes exactly one container format,
/// indexed by its handle, so the realized style count equals the distinct
/// descriptor count regardless of how many cells reference each style.
pub fn save_workbook_to_bytes(grid: &GridWorkbook) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();

    let l_formats: Vec<Format> = grid
        .styles_realized()
        .iter()
        .map(derive_rust_xlsx_format)
        .collect();
    let l_formats_date: Vec<Format> = l_formats
        .iter()
        .map(|format| format.clone().set_num_format(C_FORMAT_NUM_DATE_DEFAULT))
        .collect();
    let fmt_default = Format::new();
    let fmt_date_default = Format::new().set_num_format(C_FORMAT_NUM_DATE_DEFAULT);

    if grid.sheets().is_empty() {
        workbook.add_worksheet();
    }
    for sheet in grid.sheets() {
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(sanitize_sheet_name(sheet.name(), "_"))
            .map_err(derive_xlsx_error)?;

        for (n_idx_col, n_width) in sheet.column_widths() {
            worksheet
                .set_column_width(cast_col_num(n_idx_col)?, n_width as f64)
                .map_err(derive_xlsx_error)?;
        }

        // Regions go in first with blank anchors; the typed anchor write
        // below replaces the blank, which the container permits for the
        // first cell of a merged range.
        let mut set_covered: BTreeSet<(usize, usize)> = BTreeSet::new();
        for region in sheet.merged_regions() {
            let fmt_anchor = sheet
                .cell(region.n_idx_row_start, region.n_idx_col_start)
                .and_then(|cell| cell.style)
                .map(|handle| &l_formats[handle.index()])
                .unwrap_or(&fmt_default);
            worksheet
                .merge_range(
                    cast_row_num(region.n_idx_row_start)?,
                    cast_col_num(region.n_idx_col_start)?,
                    cast_row_num(region.n_idx_row_end)?,
                    cast_col_num(region.n_idx_col_end)?,
                    "",
                    fmt_anchor,
                )
                .map_err(derive_xlsx_error)?;
            for n_idx_row in region.n_idx_row_start..=region.n_idx_row_end {
                for n_idx_col in region.n_idx_col_start..=region.n_idx_col_end {
                    if (n_idx_row, n_idx_col)
                        != (region.n_idx_row_start, region.n_idx_col_start)
                    {
                        set_covered.insert((n_idx_row, n_idx_col));
                    }
                }
            }
        }

        for (n_idx_row, row) in sheet.rows() {
            if let Some(n_height) = row.height_points() {
                worksheet
                    .set_row_height(cast_row_num(n_idx_row)?, n_height)
                    .map_err(derive_xlsx_error)?;
            }
            for (n_idx_col, cell) in row.cells() {
                if set_covered.contains(&(n_idx_row, n_idx_col)) {
                    continue;
                }
                let fmt_cell = cell.style.map(|handle| &l_formats[handle.index()]);
                let fmt_cell_date = cell
                    .style
                    .map(|handle| &l_formats_date[handle.index()])
                    .unwrap_or(&fmt_date_default);
                write_cell(
                    worksheet,
                    cast_row_num(n_idx_row)?,
                    cast_col_num(n_idx_col)?,
                    &cell.value,
                    fmt_cell,
                    fmt_cell_date,
                )?;
            }
        }
    }

    workbook.save_to_buffer().map_err(derive_xlsx_error)
}

/// Export a workbook under `dir_out`, appending the `.xlsx` extension when
/// the file name lacks it. A blank file name is a configuration error.
pub fn export_workbook_to_path(
    grid: &GridWorkbook,
    dir_out: impl AsRef<Path>,
    c_file_name: &str,
) -> Result<PathBuf, XlsxError> {
    let c_file_name_full = append_extension_if_missing(c_file_name)?;
    let path_file_out = dir_out.as_ref().join(c_file_name_full);
    let v_bytes = save_workbook_to_bytes(grid)?;
    fs::write(&path_file_out, v_bytes).map_err(|err| {
        log::error!(
            "failed to export workbook to {}: {err}",
            path_file_out.display()
        );
        XlsxError::Io {
            path: path_file_out.clone(),
            message: err.to_string(),
        }
    })?;
    Ok(path_file_out)
}

fn append_extension_if_missing(c_file_name: &str) -> Result<String, XlsxError> {
    if c_file_name.trim().is_empty() {
        return Err(XlsxError::Config("File name must not be blank.".to_string()));
    }
    if c_file_name.ends_with(C_EXTENSION_XLSX) {
        Ok(c_file_name.to_string())
    } else {
        Ok(format!("{c_file_name}{C_EXTENSION_XLSX}"))
    }
}

fn write_cell(
    worksheet: &mut Worksheet,
    n_idx_row: u32,
    n_idx_col: u16,
    value: &EnumCellValue,
    fmt_cell: Option<&Format>,
    fmt_cell_date: &Format,
) -> Result<(), XlsxError> {
    match (value, fmt_cell) {
        (EnumCellValue::Blank, Some(format)) => worksheet
            .write_blank(n_idx_row, n_idx_col, format)
            .map(|_| ())
            .map_err(derive_xlsx_error),
        (EnumCellValue::Blank, None) => Ok(()),
        (EnumCellValue::Text(c_text), Some(format)) => worksheet
            .write_string_with_format(n_idx_row, n_idx_col, c_text, format)
            .map(|_| ())
            .map_err(derive_xlsx_error),
        (EnumCellValue::Text(c_text), None) => worksheet
            .write_string(n_idx_row, n_idx_col, c_text)
            .map(|_| ())
            .map_err(derive_xlsx_error),
        (EnumCellValue::Number(n_value), Some(format)) => worksheet
            .write_number_with_format(n_idx_row, n_idx_col, *n_value, format)
            .map(|_| ())
            .map_err(derive_xlsx_error),
        (EnumCellValue::Number(n_value), None) => worksheet
            .write_number(n_idx_row, n_idx_col, *n_value)
            .map(|_| ())
            .map_err(derive_xlsx_error),
        (EnumCellValue::Boolean(if_value), Some(format)) => worksheet
            .write_boolean_with_format(n_idx_row, n_idx_col, *if_value, format)
            .map(|_| ())
            .map_err(derive_xlsx_error),
        (EnumCellValue::Boolean(if_value), None) => worksheet
            .write_boolean(n_idx_row, n_idx_col, *if_value)
            .map(|_| ())
            .map_err(derive_xlsx_error),
        (EnumCellValue::Formula(c_formula), Some(format)) => worksheet
            .write_formula_with_format(n_idx_row, n_idx_col, c_formula.as_str(), format)
            .map(|_| ())
            .map_err(derive_xlsx_error),
        (EnumCellValue::Formula(c_formula), None) => worksheet
            .write_formula(n_idx_row, n_idx_col, c_formula.as_str())
            .map(|_| ())
            .map_err(derive_xlsx_error),
        // Date cells always need a number format to render as dates.
        (EnumCellValue::DateTime(dt_value), _) => worksheet
            .write_datetime_with_format(
                n_idx_row,
                n_idx_col,
                convert_datetime_to_excel(dt_value)?,
                fmt_cell_date,
            )
            .map(|_| ())
            .map_err(derive_xlsx_error),
    }
}

fn convert_datetime_to_excel(dt_value: &NaiveDateTime) -> Result<ExcelDateTime, XlsxError> {
    ExcelDateTime::from_ymd(
        dt_value.year() as u16,
        dt_value.month() as u8,
        dt_value.day() as u8,
    )
    .and_then(|dt_excel| {
        dt_excel.and_hms(
            dt_value.hour() as u16,
            dt_value.minute() as u8,
            dt_value.second() as f64,
        )
    })
    .map_err(derive_xlsx_error)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region FormatRealization

fn derive_rust_xlsx_format(style: &SpecCellStyle) -> Format {
    let mut format = Format::new();

    if let Some(font) = &style.font {
        format = format
            .set_font_name(&font.c_name_font)
            .set_font_size(font.n_size_font as f64);
        if font.if_bold {
            format = format.set_bold();
        }
        if font.if_italic {
            format = format.set_italic();
        }
        if let Some(c_color) = &font.c_color {
            format = format.set_font_color(c_color.as_str());
        }
    }

    format = format
        .set_align(derive_format_halign(style.rule_halign))
        .set_align(derive_format_valign(style.rule_valign));
    if style.if_wrap {
        format = format.set_text_wrap();
    }
    if let Some(c_color) = &style.c_color_background {
        format = format.set_background_color(c_color.as_str());
    }

    let border = derive_format_border(style.rule_border);
    if style.edges_border.if_top {
        format = format.set_border_top(border);
    }
    if style.edges_border.if_bottom {
        format = format.set_border_bottom(border);
    }
    if style.edges_border.if_left {
        format = format.set_border_left(border);
    }
    if style.edges_border.if_right {
        format = format.set_border_right(border);
    }

    format
}

fn derive_format_halign(rule_halign: EnumHorizontalAlign) -> FormatAlign {
    match rule_halign {
        EnumHorizontalAlign::General => FormatAlign::General,
        EnumHorizontalAlign::Left => FormatAlign::Left,
        EnumHorizontalAlign::Center => FormatAlign::Center,
        EnumHorizontalAlign::Right => FormatAlign::Right,
        EnumHorizontalAlign::Fill => FormatAlign::Fill,
        EnumHorizontalAlign::Justify => FormatAlign::Justify,
    }
}

fn derive_format_valign(rule_valign: EnumVerticalAlign) -> FormatAlign {
    match rule_valign {
        EnumVerticalAlign::Top => FormatAlign::Top,
        EnumVerticalAlign::Center => FormatAlign::VerticalCenter,
        EnumVerticalAlign::Bottom => FormatAlign::Bottom,
    }
}

fn derive_format_border(rule_border: EnumBorderWeight) -> FormatBorder {
    match rule_border {
        EnumBorderWeight::None => FormatBorder::None,
        EnumBorderWeight::Thin => FormatBorder::Thin,
        EnumBorderWeight::Medium => FormatBorder::Medium,
        EnumBorderWeight::Thick => FormatBorder::Thick,
        EnumBorderWeight::Double => FormatBorder::Double,
    }
}

fn cast_row_num(value: usize) -> Result<u32, XlsxError> {
    u32::try_from(value).map_err(|_| XlsxError::Config(format!("row index overflow: {value}")))
}

fn cast_col_num(value: usize) -> Result<u16, XlsxError> {
    u16::try_from(value).map_err(|_| XlsxError::Config(format!("column index overflow: {value}")))
}

fn derive_xlsx_error(err: rust_xlsxwriter::XlsxError) -> XlsxError {
    XlsxError::Container(err.to_string())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
