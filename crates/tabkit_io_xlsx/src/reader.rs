//! XLSX container import: bytes/file into a grid workbook.

use std::collections::BTreeMap;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use calamine::{CellType, Data, DataType, Range, Reader, Xlsx, open_workbook};

use tabkit_grid::grid::{EnumGridAccess, GridWorkbook};
use tabkit_grid::spec::EnumCellValue;

use crate::spec::XlsxError;

/// Load a workbook from in-memory `.xlsx` bytes.
///
/// An unreadable container is a hard failure; no partial workbook is
/// returned.
pub fn load_workbook_from_bytes(
    v_bytes: &[u8],
    rule_access: EnumGridAccess,
) -> Result<GridWorkbook, XlsxError> {
    let mut xlsx: Xlsx<_> = Xlsx::new(Cursor::new(v_bytes))
        .map_err(|err| XlsxError::Container(format!("failed to open workbook bytes: {err}")))?;
    load_workbook_from_reader(&mut xlsx, rule_access)
}

/// Load a workbook from an `.xlsx` file on disk.
pub fn load_workbook_from_path(
    path_file: impl AsRef<Path>,
    rule_access: EnumGridAccess,
) -> Result<GridWorkbook, XlsxError> {
    let path_file = path_file.as_ref();
    let mut xlsx: Xlsx<std::io::BufReader<std::fs::File>> = open_workbook(path_file).map_err(|err: calamine::XlsxError| {
        log::error!("failed to open workbook {}: {err}", path_file.display());
        XlsxError::Io {
            path: path_file.to_path_buf(),
            message: err.to_string(),
        }
    })?;
    load_workbook_from_reader(&mut xlsx, rule_access)
}

fn load_workbook_from_reader<RS: Read + Seek>(
    xlsx: &mut Xlsx<RS>,
    rule_access: EnumGridAccess,
) -> Result<GridWorkbook, XlsxError> {
    xlsx.load_merged_regions()
        .map_err(|err| XlsxError::Container(format!("failed to load merged regions: {err}")))?;

    let mut grid = GridWorkbook::new(rule_access);
    for c_sheet_name in xlsx.sheet_names() {
        let range = xlsx
            .worksheet_range(&c_sheet_name)
            .map_err(|err| XlsxError::Container(format!("failed to read sheet: {err}")))?;
        let range_formulas = xlsx
            .worksheet_formula(&c_sheet_name)
            .unwrap_or_else(|_| Range::new((0, 0), (0, 0)));
        let l_merges = xlsx
            .worksheet_merge_cells(&c_sheet_name)
            .unwrap_or(Ok(Vec::new()))
            .unwrap_or_default();

        // Collect values first and formula text on top, then write in row
        // order so a buffered workbook never revisits a finalized row.
        let mut dict_cells: BTreeMap<(usize, usize), EnumCellValue> = BTreeMap::new();
        collect_range_cells(&range, &mut dict_cells, convert_data_to_cell_value);
        collect_range_cells(&range_formulas, &mut dict_cells, |c_formula| {
            if c_formula.is_empty() {
                EnumCellValue::Blank
            } else {
                EnumCellValue::Formula(c_formula.clone())
            }
        });

        let sheet = grid.sheet_get_or_create(&c_sheet_name);
        for ((n_idx_row, n_idx_col), value) in dict_cells {
            sheet.set_cell_value(n_idx_row, n_idx_col, value)?;
        }
        for dims in l_merges {
            let result_merge = sheet.merge_region(
                dims.start.0 as usize,
                dims.end.0 as usize,
                dims.start.1 as usize,
                dims.end.1 as usize,
            );
            if let Err(err) = result_merge {
                // Best-effort read: a malformed in-file region must not lose
                // the sheet's data.
                log::warn!("skipping malformed merged region in sheet {c_sheet_name}: {err}");
            }
        }
    }
    Ok(grid)
}

fn collect_range_cells<T: CellType>(
    range: &Range<T>,
    dict_cells: &mut BTreeMap<(usize, usize), EnumCellValue>,
    convert: impl Fn(&T) -> EnumCellValue,
) {
    let Some((n_idx_row_base, n_idx_col_base)) = range.start() else {
        return;
    };
    for (n_idx_row_rel, n_idx_col_rel, data) in range.used_cells() {
        let value = convert(data);
        if matches!(value, EnumCellValue::Blank) {
            continue;
        }
        dict_cells.insert(
            (
                n_idx_row_base as usize + n_idx_row_rel,
                n_idx_col_base as usize + n_idx_col_rel,
            ),
            value,
        );
    }
}

fn convert_data_to_cell_value(data: &Data) -> EnumCellValue {
    match data {
        Data::Empty => EnumCellValue::Blank,
        Data::String(c_text) => EnumCellValue::Text(c_text.clone()),
        Data::Float(n_value) => EnumCellValue::Number(*n_value),
        Data::Int(n_value) => EnumCellValue::Number(*n_value as f64),
        Data::Bool(if_value) => EnumCellValue::Boolean(*if_value),
        Data::DateTime(_) | Data::DateTimeIso(_) => data
            .as_datetime()
            .map(EnumCellValue::DateTime)
            .unwrap_or_else(|| EnumCellValue::Text(data.to_string())),
        Data::DurationIso(c_text) => EnumCellValue::Text(c_text.clone()),
        // Error cells degrade to blank; display reads stay best-effort.
        Data::Error(_) => EnumCellValue::Blank,
    }
}
