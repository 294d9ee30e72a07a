//! Row decode/validate pipeline.
//!
//! Each physical row either decodes into a typed record or collects all of
//! its violations into one composite message written back into the source
//! document's error column; a bad row never aborts the batch.

use std::collections::BTreeMap;

use tabkit_grid::grid::{GridWorkbook, SheetGrid};
use tabkit_grid::spec::EnumCellValue;

use crate::locale::LocaleCatalog;
use crate::spec::{
    EnumFieldKind, EnumFieldValue, ReportSheetDecode, SpecRecordContract, XlsxError,
};
use crate::util::{convert_datetime_to_epoch_millis, is_integer_text, parse_date_text};

////////////////////////////////////////////////////////////////////////////////
// #region SheetDecode

/// Decode one sheet under a record contract.
///
/// Rows before `first_row + n_rows_banner` are the title/header banner and
/// are never decoded. Entirely blank rows are skipped without affecting
/// validity. A row failing validation is annotated in the error column of
/// the source workbook, flips the validity flag, and is excluded from the
/// decoded output; decoding then continues with the next row.
pub fn decode_sheet(
    workbook: &mut GridWorkbook,
    n_idx_sheet: usize,
    contract: &SpecRecordContract,
    locale: &LocaleCatalog,
) -> Result<ReportSheetDecode, XlsxError> {
    if contract.l_fields.is_empty() {
        return Err(XlsxError::Config(
            "Record contract declares no fields.".to_string(),
        ));
    }
    let sheet = workbook
        .sheet_at(n_idx_sheet)
        .ok_or_else(|| XlsxError::Config(format!("Sheet index out of range: {n_idx_sheet}.")))?;

    let mut report = ReportSheetDecode::default();
    let Some(n_idx_row_last) = sheet.row_last_index() else {
        return Ok(report);
    };
    let n_idx_row_first = sheet.row_first_index().unwrap_or(0);
    let n_idx_row_start = n_idx_row_first + contract.n_rows_banner;

    // Validation pass over the immutable sheet; annotations apply afterwards.
    let mut l_annotations: Vec<(usize, String)> = Vec::new();
    for n_idx_row in n_idx_row_start..=n_idx_row_last {
        if sheet.row_is_blank(n_idx_row) {
            continue;
        }
        if let Some(c_msg) = validate_row(sheet, n_idx_row, contract, locale) {
            log::debug!(
                "row {n_idx_row} failed validation: {}",
                c_msg.trim_end().replace('\n', "; ")
            );
            l_annotations.push((n_idx_row, c_msg));
            report.if_valid = false;
            continue;
        }
        report
            .dict_rows
            .insert(n_idx_row, convert_row(sheet, n_idx_row, contract));
    }

    if !l_annotations.is_empty() {
        let sheet = workbook
            .sheet_at_mut(n_idx_sheet)
            .ok_or_else(|| XlsxError::Config(format!("Sheet index out of range: {n_idx_sheet}.")))?;
        for (n_idx_row, c_msg) in l_annotations {
            sheet.set_cell_value(
                n_idx_row,
                contract.n_idx_col_error,
                EnumCellValue::Text(c_msg),
            )?;
        }
    }
    Ok(report)
}

/// Run every field-level check for one row, accumulating all violation
/// classes into one composite message.
fn validate_row(
    sheet: &SheetGrid,
    n_idx_row: usize,
    contract: &SpecRecordContract,
    locale: &LocaleCatalog,
) -> Option<String> {
    let mut l_labels_missing: Vec<String> = Vec::new();
    let mut if_integer_invalid = false;
    let mut if_date_invalid = false;

    for rule in &contract.l_fields {
        let value = cell_value(sheet, n_idx_row, rule.n_offset);
        if rule.if_required && cell_is_empty(value) {
            l_labels_missing.push(locale.lookup(&rule.c_label_key, &[]));
        }
        match rule.kind {
            EnumFieldKind::Integer => {
                if_integer_invalid = if_integer_invalid || !validate_cell_integer(value);
            }
            EnumFieldKind::Timestamp => {
                if_date_invalid = if_date_invalid || !validate_cell_date(value);
            }
            EnumFieldKind::Text | EnumFieldKind::Flag { .. } => {}
        }
    }

    let mut c_msg = String::new();
    if !l_labels_missing.is_empty() {
        c_msg.push_str(&locale.lookup("parser.required", &[&l_labels_missing.join(",")]));
        c_msg.push('\n');
    }
    if if_integer_invalid {
        c_msg.push_str(&locale.lookup("parser.invalid.integer", &[]));
        c_msg.push('\n');
    }
    if if_date_invalid {
        c_msg.push_str(&locale.lookup("parser.invalid.datetime", &[]));
        c_msg.push('\n');
    }

    (!c_msg.is_empty()).then_some(c_msg)
}

/// Convert one validated row into its typed record.
fn convert_row(
    sheet: &SheetGrid,
    n_idx_row: usize,
    contract: &SpecRecordContract,
) -> BTreeMap<String, EnumFieldValue> {
    let mut dict_record = BTreeMap::new();
    for rule in &contract.l_fields {
        let value = cell_value(sheet, n_idx_row, rule.n_offset);
        let field_value = match &rule.kind {
            EnumFieldKind::Text => convert_cell_text(value)
                .map(EnumFieldValue::Text)
                .unwrap_or(EnumFieldValue::None),
            EnumFieldKind::Integer => convert_cell_integer(value)
                .map(EnumFieldValue::Integer)
                .unwrap_or(EnumFieldValue::None),
            EnumFieldKind::Timestamp => convert_cell_timestamp(value)
                .map(EnumFieldValue::Timestamp)
                .unwrap_or(EnumFieldValue::None),
            EnumFieldKind::Flag { c_truthy } => {
                EnumFieldValue::Flag(convert_cell_flag(value, c_truthy))
            }
        };
        dict_record.insert(rule.c_name.clone(), field_value);
    }
    dict_record
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region CellReaders

fn cell_value(sheet: &SheetGrid, n_idx_row: usize, n_idx_col: usize) -> Option<&EnumCellValue> {
    sheet.cell(n_idx_row, n_idx_col).map(|cell| &cell.value)
}

/// Whether a source cell is absent or blank.
pub fn cell_is_empty(value: Option<&EnumCellValue>) -> bool {
    value.is_none_or(|value| matches!(value, EnumCellValue::Blank))
}

/// Text conversion: numeric cells render as fixed-point integers (ties to
/// even, no decimals); other non-text kinds are absent.
pub fn convert_cell_text(value: Option<&EnumCellValue>) -> Option<String> {
    match value? {
        EnumCellValue::Text(c_text) => Some(c_text.clone()),
        EnumCellValue::Number(n_value) => Some(format!("{n_value:.0}")),
        _ => None,
    }
}

/// Integer conversion: numeric cells truncate toward zero, text parses as
/// base-10; everything else is absent.
pub fn convert_cell_integer(value: Option<&EnumCellValue>) -> Option<i64> {
    match value? {
        EnumCellValue::Number(n_value) => Some(*n_value as i64),
        EnumCellValue::Text(c_text) => c_text.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Timestamp conversion: date-formatted cells and parsable date text become
/// epoch milliseconds (UTC); a bare numeric cell is absent rather than a
/// guessed serial date.
pub fn convert_cell_timestamp(value: Option<&EnumCellValue>) -> Option<i64> {
    match value? {
        EnumCellValue::DateTime(dt_value) => Some(convert_datetime_to_epoch_millis(dt_value)),
        EnumCellValue::Text(c_text) => {
            parse_date_text(c_text).map(|dt_value| convert_datetime_to_epoch_millis(&dt_value))
        }
        _ => None,
    }
}

/// Flag conversion: text equality against the rule's truthy constant.
pub fn convert_cell_flag(value: Option<&EnumCellValue>, c_truthy: &str) -> bool {
    convert_cell_text(value).as_deref() == Some(c_truthy)
}

/// Integer check: only non-integer text fails; empty and numeric cells pass.
pub fn validate_cell_integer(value: Option<&EnumCellValue>) -> bool {
    match value {
        Some(EnumCellValue::Text(c_text)) => is_integer_text(c_text),
        _ => true,
    }
}

/// Date check: only unparsable text fails; empty, numeric, and
/// date-formatted cells pass.
pub fn validate_cell_date(value: Option<&EnumCellValue>) -> bool {
    match value {
        Some(EnumCellValue::Text(c_text)) => parse_date_text(c_text).is_some(),
        _ => true,
    }
}

/// Best-effort text read absorbing any coercion trouble into "".
pub fn safe_cell_text(sheet: &SheetGrid, n_idx_row: usize, n_idx_col: usize) -> String {
    cell_value(sheet, n_idx_row, n_idx_col)
        .map(tabkit_grid::util::render_cell_text)
        .unwrap_or_default()
}

/// Best-effort numeric read absorbing any coercion trouble into 0.0.
pub fn safe_cell_number(sheet: &SheetGrid, n_idx_row: usize, n_idx_col: usize) -> f64 {
    match cell_value(sheet, n_idx_row, n_idx_col) {
        Some(EnumCellValue::Number(n_value)) => *n_value,
        Some(EnumCellValue::Boolean(if_value)) => f64::from(*if_value),
        Some(EnumCellValue::Text(c_text)) => c_text.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conf::derive_default_locale_catalog;
    use crate::spec::SpecFieldRule;
    use chrono::NaiveDate;

    fn derive_contract() -> SpecRecordContract {
        let l_fields = vec![
            SpecFieldRule::text(0, "name", "entity.name").required(),
            SpecFieldRule::text(1, "price", "entity.price").with_kind(EnumFieldKind::Integer),
            SpecFieldRule::text(2, "purchased", "entity.purchased")
                .with_kind(EnumFieldKind::Timestamp),
            SpecFieldRule::text(3, "standard", "entity.standard").with_kind(EnumFieldKind::Flag {
                c_truthy: "standard".to_string(),
            }),
        ];
        SpecRecordContract::new(l_fields, 4)
    }

    fn derive_locale() -> LocaleCatalog {
        let mut locale = derive_default_locale_catalog();
        locale.insert("entity.name", "Name");
        locale.insert("entity.price", "Price");
        locale.insert("entity.purchased", "Purchased");
        locale.insert("entity.standard", "Class");
        locale
    }

    fn write_row(workbook: &mut GridWorkbook, n_idx_row: usize, l_values: &[EnumCellValue]) {
        let sheet = workbook.sheet_get_or_create("upload");
        for (n_idx_col, value) in l_values.iter().enumerate() {
            sheet
                .set_cell_value(n_idx_row, n_idx_col, value.clone())
                .unwrap();
        }
    }

    fn text(c_text: &str) -> EnumCellValue {
        EnumCellValue::Text(c_text.to_string())
    }

    #[test]
    fn test_partial_failure_keeps_good_rows_and_annotates_bad_ones() {
        let mut workbook = GridWorkbook::new_random();
        // Banner rows 0-2.
        write_row(&mut workbook, 0, &[text("banner")]);
        write_row(
            &mut workbook,
            3,
            &[text("laptop"), text("1200"), text("2024/03/01"), text("standard")],
        );
        write_row(
            &mut workbook,
            4,
            &[EnumCellValue::Blank, text("800"), text("2024/03/02"), text("other")],
        );
        write_row(
            &mut workbook,
            5,
            &[text("monitor"), EnumCellValue::Number(450.0), text("2024/03/03"), text("x")],
        );

        let report =
            decode_sheet(&mut workbook, 0, &derive_contract(), &derive_locale()).unwrap();

        assert!(!report.if_valid);
        assert_eq!(
            report.dict_rows.keys().copied().collect::<Vec<_>>(),
            vec![3, 5]
        );

        let sheet = workbook.sheet_by_name("upload").unwrap();
        let c_annotation = match &sheet.cell(4, 4).unwrap().value {
            EnumCellValue::Text(c_text) => c_text.clone(),
            other => panic!("unexpected annotation cell: {other:?}"),
        };
        assert_eq!(c_annotation, "Missing required fields: Name\n");
        // Good rows carry no annotation.
        assert!(sheet.cell(3, 4).is_none());

        let dict_record = &report.dict_rows[&3];
        assert_eq!(
            dict_record["name"],
            EnumFieldValue::Text("laptop".to_string())
        );
        assert_eq!(dict_record["price"], EnumFieldValue::Integer(1200));
        let dt_expected = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(
            dict_record["purchased"],
            EnumFieldValue::Timestamp(convert_datetime_to_epoch_millis(&dt_expected))
        );
        assert_eq!(dict_record["standard"], EnumFieldValue::Flag(true));
        assert_eq!(report.dict_rows[&5]["standard"], EnumFieldValue::Flag(false));
    }

    #[test]
    fn test_violations_accumulate_into_one_composite_message() {
        let mut workbook = GridWorkbook::new_random();
        write_row(
            &mut workbook,
            3,
            &[EnumCellValue::Blank, text("cheap"), text("someday"), text("x")],
        );

        let report =
            decode_sheet(&mut workbook, 0, &derive_contract(), &derive_locale()).unwrap();

        assert!(!report.if_valid);
        assert!(report.dict_rows.is_empty());
        let sheet = workbook.sheet_by_name("upload").unwrap();
        let c_annotation = safe_cell_text(sheet, 3, 4);
        assert_eq!(
            c_annotation,
            "Missing required fields: Name\nInteger fields contain non-integer values\nDate fields contain unparsable values\n"
        );
    }

    #[test]
    fn test_blank_rows_and_banner_rows_are_skipped() {
        let mut workbook = GridWorkbook::new_random();
        write_row(&mut workbook, 0, &[text("title")]);
        // Row 3 blank cells only, row 4 decodable, rows 1-2 absent.
        write_row(&mut workbook, 3, &[EnumCellValue::Blank, EnumCellValue::Blank]);
        write_row(
            &mut workbook,
            4,
            &[text("dock"), text("300"), text("2024/05/05"), text("x")],
        );

        let report =
            decode_sheet(&mut workbook, 0, &derive_contract(), &derive_locale()).unwrap();

        assert!(report.if_valid);
        assert_eq!(report.dict_rows.len(), 1);
        assert!(report.dict_rows.contains_key(&4));
    }

    #[test]
    fn decode_rejects_misconfiguration() {
        let mut workbook = GridWorkbook::new_random();
        let locale = derive_locale();

        let contract_empty = SpecRecordContract::new(vec![], 0);
        assert!(matches!(
            decode_sheet(&mut workbook, 0, &contract_empty, &locale),
            Err(XlsxError::Config(_))
        ));
        assert!(matches!(
            decode_sheet(&mut workbook, 3, &derive_contract(), &locale),
            Err(XlsxError::Config(_))
        ));
    }

    #[test]
    fn test_cell_conversions() {
        // Fixed-point integer rendering rounds ties to even.
        assert_eq!(
            convert_cell_text(Some(&EnumCellValue::Number(2.5))),
            Some("2".to_string())
        );
        assert_eq!(
            convert_cell_text(Some(&EnumCellValue::Number(3.5))),
            Some("4".to_string())
        );
        assert_eq!(convert_cell_text(Some(&EnumCellValue::Boolean(true))), None);

        assert_eq!(convert_cell_integer(Some(&EnumCellValue::Number(9.7))), Some(9));
        assert_eq!(convert_cell_integer(Some(&text("  42 "))), Some(42));
        assert_eq!(convert_cell_integer(Some(&text("n/a"))), None);

        // A bare numeric cell is not a guessed serial date.
        assert_eq!(convert_cell_timestamp(Some(&EnumCellValue::Number(45000.0))), None);
        assert!(validate_cell_date(Some(&EnumCellValue::Number(45000.0))));
        assert!(!validate_cell_date(Some(&text("not a date"))));
        assert!(validate_cell_integer(None));
        assert!(!validate_cell_integer(Some(&text("12.5"))));
    }

    #[test]
    fn safe_readers_absorb_coercion_trouble() {
        let mut workbook = GridWorkbook::new_random();
        write_row(
            &mut workbook,
            0,
            &[text("12.5"), EnumCellValue::Boolean(true), text("junk")],
        );
        let sheet = workbook.sheet_by_name("upload").unwrap();

        assert_eq!(safe_cell_number(sheet, 0, 0), 12.5);
        assert_eq!(safe_cell_number(sheet, 0, 1), 1.0);
        assert_eq!(safe_cell_number(sheet, 0, 2), 0.0);
        assert_eq!(safe_cell_number(sheet, 9, 9), 0.0);
        assert_eq!(safe_cell_text(sheet, 0, 2), "junk");
        assert_eq!(safe_cell_text(sheet, 9, 9), "");
    }
}
