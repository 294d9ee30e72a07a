//! Metadata-driven sheet composition: titles, grouped headers, content
//! blocks, row-span groups, and cross-tab matrices.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Local;

use crate::conf::{
    C_PREFIX_CREATE_DATE, N_FONT_SIZE_TITLE, N_WIDTH_COL_MATRIX, N_WIDTH_COL_RULE_DEFAULT,
    derive_style_amount, derive_style_cell_center, derive_style_cell_left,
    derive_style_create_date, derive_style_header, derive_style_title,
};
use crate::grid::GridWorkbook;
use crate::spec::{
    EnumCellValue, GridError, HandleStyle, SpecCellStyle, SpecColumnRule, SpecGenerateOptions,
    SpecMatrixSheet,
};
use crate::util::derive_style_from_rule;

////////////////////////////////////////////////////////////////////////////////
// #region SheetGeneration

/// Compose one record block onto a sheet: optional title and generated-on
/// line, optional grouped header, content rows, and declared column widths.
///
/// Records are ordered value vectors; the i-th value pairs with the i-th
/// column rule, and each rule's `n_idx_col` places it on the grid. Empty
/// input and missing column rules are caller configuration errors.
pub fn generate_sheet(
    workbook: &mut GridWorkbook,
    c_sheet_name: &str,
    l_records: &[Vec<EnumCellValue>],
    l_rules: &[SpecColumnRule],
    options: &SpecGenerateOptions,
) -> Result<(), GridError> {
    if l_records.is_empty() {
        return Err(GridError::NoData);
    }
    if l_rules.is_empty() {
        return Err(GridError::NoColumnRules);
    }
    for (n_idx_record, record) in l_records.iter().enumerate() {
        if record.len() < l_rules.len() {
            return Err(GridError::RecordArityMismatch {
                n_idx_record,
                n_len_record: record.len(),
                n_len_rules: l_rules.len(),
            });
        }
    }

    let mut n_rows_shift = options.n_rows_title_shift + usize::from(options.if_create_date);
    build_title(workbook, c_sheet_name, l_rules.len(), options)?;
    if options.if_show_header {
        n_rows_shift += 1;
        build_header(
            workbook,
            c_sheet_name,
            l_rules,
            options.n_idx_row_start + n_rows_shift,
            options.n_idx_col_start,
        )?;
    }
    n_rows_shift += 1;
    build_content(
        workbook,
        c_sheet_name,
        l_records,
        l_rules,
        options.n_idx_row_start + n_rows_shift,
        options.n_idx_col_start,
    )?;
    apply_column_widths(workbook, c_sheet_name, l_rules, options.n_idx_col_start);
    Ok(())
}

fn build_title(
    workbook: &mut GridWorkbook,
    c_sheet_name: &str,
    n_len_rules: usize,
    options: &SpecGenerateOptions,
) -> Result<(), GridError> {
    let Some(c_title) = options.c_title.as_deref() else {
        return Ok(());
    };
    if c_title.is_empty() {
        return Ok(());
    }

    let n_idx_row = options.n_idx_row_start;
    let n_idx_col = options.n_idx_col_start;
    let n_idx_col_end = n_idx_col + n_len_rules - 1;
    let handle_title = workbook.intern_style(&derive_style_title());
    let handle_date = options
        .if_create_date
        .then(|| workbook.intern_style(&derive_style_create_date()));

    let sheet = workbook.sheet_get_or_create(c_sheet_name);
    sheet.merge_region(n_idx_row, n_idx_row, n_idx_col, n_idx_col_end)?;
    sheet.set_cell(
        n_idx_row,
        n_idx_col,
        EnumCellValue::Text(c_title.to_string()),
        Some(handle_title),
    )?;
    sheet.set_row_height_auto(
        n_idx_row,
        N_WIDTH_COL_RULE_DEFAULT * n_len_rules as i64,
        c_title.chars().count(),
        N_FONT_SIZE_TITLE,
    )?;

    if let Some(handle_date) = handle_date {
        let c_date_line = format!(
            "{C_PREFIX_CREATE_DATE}{}",
            Local::now().format("%Y-%m-%d")
        );
        sheet.merge_region(n_idx_row + 1, n_idx_row + 1, n_idx_col, n_idx_col_end)?;
        sheet.set_cell(
            n_idx_row + 1,
            n_idx_col,
            EnumCellValue::Text(c_date_line),
            Some(handle_date),
        )?;
    }
    Ok(())
}

fn build_header(
    workbook: &mut GridWorkbook,
    c_sheet_name: &str,
    l_rules: &[SpecColumnRule],
    n_idx_row_header: usize,
    n_idx_col_start: usize,
) -> Result<(), GridError> {
    let l_handles = intern_rule_styles(workbook, l_rules);
    let mut set_groups_rendered: BTreeSet<&str> = BTreeSet::new();
    let sheet = workbook.sheet_get_or_create(c_sheet_name);

    for (n_idx_rule, rule) in l_rules.iter().enumerate() {
        let n_idx_col = n_idx_col_start + rule.n_idx_col;
        let handle = l_handles[n_idx_rule];

        // The first rule of each group anchors the group cell one row above
        // its span; later siblings reuse it.
        if !rule.c_merge_group.is_empty() && set_groups_rendered.insert(&rule.c_merge_group) {
            let n_idx_row_group = n_idx_row_header.checked_sub(rule.n_rows_span).ok_or(
                GridError::HeaderRowUnderflow {
                    n_idx_row_header,
                    n_rows_span: rule.n_rows_span,
                },
            )?;
            if rule.n_merge_group_size > 1 {
                sheet.merge_region(
                    n_idx_row_group,
                    n_idx_row_group,
                    n_idx_col,
                    n_idx_col + rule.n_merge_group_size - 1,
                )?;
            }
            sheet.set_cell(
                n_idx_row_group,
                n_idx_col,
                EnumCellValue::Text(rule.c_merge_group.clone()),
                Some(handle),
            )?;
            sheet.set_row_height_auto(
                n_idx_row_group,
                rule.n_width_col * rule.n_merge_group_size as i64,
                rule.c_merge_group.chars().count(),
                rule.n_size_font,
            )?;
        }

        if rule.n_rows_span > 1 {
            let n_idx_row_top = n_idx_row_header.checked_sub(rule.n_rows_span - 1).ok_or(
                GridError::HeaderRowUnderflow {
                    n_idx_row_header,
                    n_rows_span: rule.n_rows_span,
                },
            )?;
            sheet.merge_region(n_idx_row_top, n_idx_row_header, n_idx_col, n_idx_col)?;
            sheet.set_cell(
                n_idx_row_top,
                n_idx_col,
                EnumCellValue::Text(rule.c_name_col.clone()),
                Some(handle),
            )?;
        } else {
            sheet.set_cell(
                n_idx_row_header,
                n_idx_col,
                EnumCellValue::Text(rule.c_name_col.clone()),
                Some(handle),
            )?;
        }
    }
    Ok(())
}

fn build_content(
    workbook: &mut GridWorkbook,
    c_sheet_name: &str,
    l_records: &[Vec<EnumCellValue>],
    l_rules: &[SpecColumnRule],
    n_idx_row_start: usize,
    n_idx_col_start: usize,
) -> Result<(), GridError> {
    let l_handles = intern_rule_styles(workbook, l_rules);
    let sheet = workbook.sheet_get_or_create(c_sheet_name);

    for (n_idx_record, record) in l_records.iter().enumerate() {
        let n_idx_row = n_idx_row_start + n_idx_record;
        for (n_idx_rule, rule) in l_rules.iter().enumerate() {
            sheet.set_cell(
                n_idx_row,
                n_idx_col_start + rule.n_idx_col,
                record[n_idx_rule].clone(),
                Some(l_handles[n_idx_rule]),
            )?;
        }
    }
    Ok(())
}

fn apply_column_widths(
    workbook: &mut GridWorkbook,
    c_sheet_name: &str,
    l_rules: &[SpecColumnRule],
    n_idx_col_start: usize,
) {
    let sheet = workbook.sheet_get_or_create(c_sheet_name);
    for rule in l_rules {
        sheet.set_column_width(n_idx_col_start + rule.n_idx_col, rule.n_width_col);
    }
}

fn intern_rule_styles(
    workbook: &mut GridWorkbook,
    l_rules: &[SpecColumnRule],
) -> Vec<HandleStyle> {
    l_rules
        .iter()
        .map(|rule| workbook.intern_style(&derive_style_from_rule(rule)))
        .collect()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region RowSpanGeneration

/// Compose grouped header-less blocks with vertically merged identifier
/// columns and per-block sequential ids.
///
/// Each group lays out as an independent block starting one row below the
/// cursor. Blocks of more than one row merge the leading columns up to
/// `n_idx_col_set_id` across the block; a one-row block never merges. The id
/// column receives 1..N per block, styled from the first column rule.
pub fn generate_row_span_sheet(
    workbook: &mut GridWorkbook,
    c_sheet_name: &str,
    dict_groups: &BTreeMap<i64, Vec<Vec<EnumCellValue>>>,
    l_rules: &[SpecColumnRule],
    n_idx_row_start: usize,
    n_idx_col_start: usize,
    n_idx_col_set_id: usize,
) -> Result<(), GridError> {
    let Some(rule_first) = l_rules.first() else {
        return Err(GridError::NoColumnRules);
    };
    let handle_id = workbook.intern_style(&derive_style_from_rule(rule_first));

    let mut n_idx_row = n_idx_row_start;
    for l_records in dict_groups.values() {
        let options = SpecGenerateOptions {
            n_idx_row_start: n_idx_row,
            n_idx_col_start,
            c_title: None,
            if_show_header: false,
            n_rows_title_shift: 0,
            if_create_date: false,
        };
        generate_sheet(workbook, c_sheet_name, l_records, l_rules, &options)?;

        let n_rows_merge = l_records.len();
        let sheet = workbook.sheet_get_or_create(c_sheet_name);
        if n_rows_merge > 1 {
            for n_idx_col in n_idx_col_start..n_idx_col_start + n_idx_col_set_id {
                sheet.merge_region(
                    n_idx_row + 1,
                    n_idx_row + n_rows_merge,
                    n_idx_col,
                    n_idx_col,
                )?;
            }
        }
        for n_id in 1..=n_rows_merge {
            sheet.set_cell(
                n_idx_row + n_id,
                n_idx_col_start + n_idx_col_set_id,
                EnumCellValue::Number(n_id as f64),
                Some(handle_id),
            )?;
        }
        n_idx_row += n_rows_merge;
    }
    Ok(())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region PlainValueGeneration

/// Write records as a bare value grid with the default style, no metadata.
pub fn build_column_values(
    workbook: &mut GridWorkbook,
    c_sheet_name: &str,
    l_records: &[Vec<EnumCellValue>],
    n_idx_row_start: usize,
    n_idx_col_start: usize,
) -> Result<(), GridError> {
    let handle = workbook.intern_style(&SpecCellStyle::default());
    let sheet = workbook.sheet_get_or_create(c_sheet_name);

    for (n_idx_record, record) in l_records.iter().enumerate() {
        for (n_idx_value, value) in record.iter().enumerate() {
            sheet.set_cell(
                n_idx_row_start + n_idx_record,
                n_idx_col_start + n_idx_value,
                value.clone(),
                Some(handle),
            )?;
        }
    }
    Ok(())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region MatrixGeneration

/// Compose a labeled numeric cross-tab with per-row subtotals, per-column
/// totals, and a grand total.
///
/// Layout top to bottom: caption lines merged across the full width,
/// label/value meta rows, the dark header row (corner label, column labels,
/// subtotal label), one body row per sidebar label ending in its subtotal,
/// and the totals row ending in the grand total.
pub fn generate_matrix_sheet(
    workbook: &mut GridWorkbook,
    c_sheet_name: &str,
    matrix: &SpecMatrixSheet,
) -> Result<(), GridError> {
    let n_len_rows = matrix.l_row_labels.len();
    let n_len_cols = matrix.l_column_labels.len();
    if matrix.l_values.len() != n_len_rows
        || matrix.l_values.iter().any(|l_row| l_row.len() != n_len_cols)
    {
        return Err(GridError::MatrixShapeMismatch {
            n_len_rows,
            n_len_cols,
        });
    }

    let n_cols_total = n_len_cols + 2;
    let handle_center = workbook.intern_style(&derive_style_cell_center());
    let handle_left = workbook.intern_style(&derive_style_cell_left());
    let handle_header = workbook.intern_style(&derive_style_header());
    let handle_amount = workbook.intern_style(&derive_style_amount());
    let sheet = workbook.sheet_get_or_create(c_sheet_name);

    let mut n_idx_row = 0usize;
    for c_caption in &matrix.l_captions {
        sheet.merge_region(n_idx_row, n_idx_row, 0, n_cols_total - 1)?;
        sheet.set_cell(
            n_idx_row,
            0,
            EnumCellValue::Text(c_caption.clone()),
            Some(handle_center),
        )?;
        n_idx_row += 1;
    }
    for (c_label, c_value) in &matrix.l_meta_rows {
        sheet.set_cell(
            n_idx_row,
            0,
            EnumCellValue::Text(c_label.clone()),
            Some(handle_left),
        )?;
        sheet.merge_region(n_idx_row, n_idx_row, 1, n_cols_total - 1)?;
        sheet.set_cell(
            n_idx_row,
            1,
            EnumCellValue::Text(c_value.clone()),
            Some(handle_center),
        )?;
        n_idx_row += 1;
    }

    sheet.set_cell(
        n_idx_row,
        0,
        EnumCellValue::Text(matrix.c_corner_label.clone()),
        Some(handle_header),
    )?;
    for (n_idx, c_label) in matrix.l_column_labels.iter().enumerate() {
        sheet.set_cell(
            n_idx_row,
            1 + n_idx,
            EnumCellValue::Text(c_label.clone()),
            Some(handle_header),
        )?;
    }
    sheet.set_cell(
        n_idx_row,
        n_cols_total - 1,
        EnumCellValue::Text(matrix.c_subtotal_label.clone()),
        Some(handle_header),
    )?;
    n_idx_row += 1;

    let mut l_totals_by_col = vec![0.0f64; n_len_cols];
    let mut n_total_grand = 0.0f64;
    for (n_idx_row_body, c_label) in matrix.l_row_labels.iter().enumerate() {
        sheet.set_cell(
            n_idx_row,
            0,
            EnumCellValue::Text(c_label.clone()),
            Some(handle_center),
        )?;
        let mut n_subtotal_row = 0.0f64;
        for (n_idx_col_body, n_value) in matrix.l_values[n_idx_row_body].iter().enumerate() {
            sheet.set_cell(
                n_idx_row,
                1 + n_idx_col_body,
                EnumCellValue::Number(*n_value),
                Some(handle_center),
            )?;
            n_subtotal_row += n_value;
            l_totals_by_col[n_idx_col_body] += n_value;
        }
        sheet.set_cell(
            n_idx_row,
            n_cols_total - 1,
            EnumCellValue::Number(n_subtotal_row),
            Some(handle_center),
        )?;
        n_total_grand += n_subtotal_row;
        n_idx_row += 1;
    }

    sheet.set_cell(
        n_idx_row,
        0,
        EnumCellValue::Text(matrix.c_total_label.clone()),
        Some(handle_amount),
    )?;
    for (n_idx_col_body, n_total) in l_totals_by_col.iter().enumerate() {
        sheet.set_cell(
            n_idx_row,
            1 + n_idx_col_body,
            EnumCellValue::Number(*n_total),
            Some(handle_amount),
        )?;
    }
    sheet.set_cell(
        n_idx_row,
        n_cols_total - 1,
        EnumCellValue::Number(n_total_grand),
        Some(handle_amount),
    )?;

    for n_idx_col in 0..n_cols_total {
        sheet.set_column_width(n_idx_col, N_WIDTH_COL_MATRIX);
    }
    Ok(())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::SpecMergedRegion;

    fn derive_rules_pair() -> Vec<SpecColumnRule> {
        vec![
            SpecColumnRule {
                n_idx_col: 0,
                c_name_col: "Identifier".to_string(),
                ..Default::default()
            },
            SpecColumnRule {
                n_idx_col: 1,
                c_name_col: "Name".to_string(),
                ..Default::default()
            },
        ]
    }

    fn derive_records(n_rows: usize) -> Vec<Vec<EnumCellValue>> {
        (0..n_rows)
            .map(|n_idx| {
                vec![
                    EnumCellValue::Number(n_idx as f64),
                    EnumCellValue::Text(format!("row-{n_idx}")),
                ]
            })
            .collect()
    }

    #[test]
    fn test_generate_sheet_places_header_and_content_by_col_index() {
        let mut workbook = GridWorkbook::new_random();
        generate_sheet(
            &mut workbook,
            "data",
            &derive_records(3),
            &derive_rules_pair(),
            &SpecGenerateOptions::default(),
        )
        .unwrap();

        let sheet = workbook.sheet_by_name("data").unwrap();
        // Default shift of one leaves rows 0-1 blank: header row 2, content 3+.
        assert_eq!(
            sheet.cell(2, 0).unwrap().value,
            EnumCellValue::Text("Identifier".to_string())
        );
        assert_eq!(
            sheet.cell(2, 1).unwrap().value,
            EnumCellValue::Text("Name".to_string())
        );
        assert_eq!(sheet.cell(3, 0).unwrap().value, EnumCellValue::Number(0.0));
        assert_eq!(
            sheet.cell(5, 1).unwrap().value,
            EnumCellValue::Text("row-2".to_string())
        );
        assert_eq!(sheet.column_width(0), 20);
        assert_eq!(sheet.column_width(1), 20);
        // Header and content share one interned style per rule.
        assert_eq!(workbook.style_count(), 1);
    }

    #[test]
    fn test_generate_sheet_rejects_misconfiguration() {
        let mut workbook = GridWorkbook::new_random();
        let options = SpecGenerateOptions::default();

        let err = generate_sheet(&mut workbook, "data", &[], &derive_rules_pair(), &options)
            .unwrap_err();
        assert_eq!(err, GridError::NoData);

        let err =
            generate_sheet(&mut workbook, "data", &derive_records(1), &[], &options).unwrap_err();
        assert_eq!(err, GridError::NoColumnRules);

        let l_records_short = vec![vec![EnumCellValue::Blank]];
        let err = generate_sheet(
            &mut workbook,
            "data",
            &l_records_short,
            &derive_rules_pair(),
            &options,
        )
        .unwrap_err();
        assert!(matches!(err, GridError::RecordArityMismatch { .. }));
    }

    #[test]
    fn test_title_and_create_date_occupy_leading_rows() {
        let mut workbook = GridWorkbook::new_random();
        let options = SpecGenerateOptions {
            c_title: Some("Hardware asset inventory report".to_string()),
            if_create_date: true,
            ..Default::default()
        };
        generate_sheet(
            &mut workbook,
            "data",
            &derive_records(1),
            &derive_rules_pair(),
            &options,
        )
        .unwrap();

        let sheet = workbook.sheet_by_name("data").unwrap();
        assert_eq!(
            sheet.merged_regions()[0],
            SpecMergedRegion {
                n_idx_row_start: 0,
                n_idx_row_end: 0,
                n_idx_col_start: 0,
                n_idx_col_end: 1,
            }
        );
        assert_eq!(
            sheet.merged_regions()[1],
            SpecMergedRegion {
                n_idx_row_start: 1,
                n_idx_row_end: 1,
                n_idx_col_start: 0,
                n_idx_col_end: 1,
            }
        );
        let c_date_line = match &sheet.cell(1, 0).unwrap().value {
            EnumCellValue::Text(c_text) => c_text.clone(),
            other => panic!("unexpected date cell: {other:?}"),
        };
        assert!(c_date_line.starts_with(C_PREFIX_CREATE_DATE));
        // Title text is long enough to raise the row above one line.
        assert!(sheet.row_height_points(0) > 15.0);
        // Shift 1 + date line 1: header lands on row 3, content on row 4.
        assert_eq!(
            sheet.cell(3, 0).unwrap().value,
            EnumCellValue::Text("Identifier".to_string())
        );
        assert_eq!(sheet.cell(4, 0).unwrap().value, EnumCellValue::Number(0.0));
    }

    #[test]
    fn test_merge_group_header_round_trip() {
        let mut workbook = GridWorkbook::new_random();
        let l_rules = vec![
            SpecColumnRule {
                n_idx_col: 0,
                c_name_col: "Start".to_string(),
                c_merge_group: "A".to_string(),
                n_merge_group_size: 2,
                ..Default::default()
            },
            SpecColumnRule {
                n_idx_col: 1,
                c_name_col: "End".to_string(),
                c_merge_group: "A".to_string(),
                n_merge_group_size: 2,
                ..Default::default()
            },
        ];
        generate_sheet(
            &mut workbook,
            "data",
            &derive_records(1),
            &l_rules,
            &SpecGenerateOptions::default(),
        )
        .unwrap();

        let sheet = workbook.sheet_by_name("data").unwrap();
        // One group cell one row above the header, spanning both columns.
        assert_eq!(
            sheet.merged_regions(),
            &[SpecMergedRegion {
                n_idx_row_start: 1,
                n_idx_row_end: 1,
                n_idx_col_start: 0,
                n_idx_col_end: 1,
            }]
        );
        assert_eq!(
            sheet.cell(1, 0).unwrap().value,
            EnumCellValue::Text("A".to_string())
        );
        assert_eq!(
            sheet.cell(2, 0).unwrap().value,
            EnumCellValue::Text("Start".to_string())
        );
        assert_eq!(
            sheet.cell(2, 1).unwrap().value,
            EnumCellValue::Text("End".to_string())
        );
    }

    #[test]
    fn test_row_span_groups_merge_and_number_rows() {
        let mut workbook = GridWorkbook::new_random();
        let l_rules = vec![
            SpecColumnRule {
                n_idx_col: 0,
                c_name_col: "Owner".to_string(),
                ..Default::default()
            },
            SpecColumnRule {
                n_idx_col: 1,
                c_name_col: "Location".to_string(),
                ..Default::default()
            },
            SpecColumnRule {
                n_idx_col: 2,
                c_name_col: "Seq".to_string(),
                ..Default::default()
            },
        ];
        let mut dict_groups = BTreeMap::new();
        dict_groups.insert(
            1i64,
            (0..3)
                .map(|n_idx| {
                    vec![
                        EnumCellValue::Text("alpha".to_string()),
                        EnumCellValue::Text(format!("loc-{n_idx}")),
                        EnumCellValue::Blank,
                    ]
                })
                .collect::<Vec<_>>(),
        );
        dict_groups.insert(
            2i64,
            vec![vec![
                EnumCellValue::Text("beta".to_string()),
                EnumCellValue::Text("loc-9".to_string()),
                EnumCellValue::Blank,
            ]],
        );

        generate_row_span_sheet(&mut workbook, "data", &dict_groups, &l_rules, 0, 0, 2).unwrap();

        let sheet = workbook.sheet_by_name("data").unwrap();
        // The three-row group merges its two identifier columns; the one-row
        // group adds no region.
        assert_eq!(sheet.merged_regions().len(), 2);
        assert!(sheet.merged_regions().contains(&SpecMergedRegion {
            n_idx_row_start: 1,
            n_idx_row_end: 3,
            n_idx_col_start: 0,
            n_idx_col_end: 0,
        }));
        assert!(sheet.merged_regions().contains(&SpecMergedRegion {
            n_idx_row_start: 1,
            n_idx_row_end: 3,
            n_idx_col_start: 1,
            n_idx_col_end: 1,
        }));
        for (n_idx_row, n_id) in [(1, 1.0), (2, 2.0), (3, 3.0)] {
            assert_eq!(
                sheet.cell(n_idx_row, 2).unwrap().value,
                EnumCellValue::Number(n_id)
            );
        }
        // The one-row group restarts numbering below the first block.
        assert_eq!(sheet.cell(4, 2).unwrap().value, EnumCellValue::Number(1.0));
        assert_eq!(
            sheet.cell(4, 0).unwrap().value,
            EnumCellValue::Text("beta".to_string())
        );
    }

    #[test]
    fn test_build_column_values_writes_every_field_in_order() {
        let mut workbook = GridWorkbook::new_random();
        build_column_values(&mut workbook, "data", &derive_records(2), 4, 1).unwrap();

        let sheet = workbook.sheet_by_name("data").unwrap();
        assert_eq!(sheet.cell(4, 1).unwrap().value, EnumCellValue::Number(0.0));
        assert_eq!(
            sheet.cell(5, 2).unwrap().value,
            EnumCellValue::Text("row-1".to_string())
        );
    }

    #[test]
    fn test_matrix_sheet_totals() {
        let mut workbook = GridWorkbook::new_random();
        let matrix = SpecMatrixSheet {
            l_captions: vec!["Acme Corp".to_string(), "Daily rent".to_string()],
            l_meta_rows: vec![("Download date".to_string(), "2024-03-01".to_string())],
            c_corner_label: "Asset type".to_string(),
            l_column_labels: vec!["Dept A".to_string(), "Dept B".to_string()],
            l_row_labels: vec!["Laptop".to_string(), "Monitor".to_string()],
            l_values: vec![vec![1.0, 2.0], vec![3.0, 4.0]],
            c_subtotal_label: "Subtotal".to_string(),
            c_total_label: "Total".to_string(),
        };
        generate_matrix_sheet(&mut workbook, "rent", &matrix).unwrap();

        let sheet = workbook.sheet_by_name("rent").unwrap();
        // Captions row 0-1, meta row 2, header row 3, body rows 4-5, totals 6.
        assert_eq!(
            sheet.cell(3, 0).unwrap().value,
            EnumCellValue::Text("Asset type".to_string())
        );
        assert_eq!(sheet.cell(4, 3).unwrap().value, EnumCellValue::Number(3.0));
        assert_eq!(sheet.cell(5, 3).unwrap().value, EnumCellValue::Number(7.0));
        assert_eq!(sheet.cell(6, 1).unwrap().value, EnumCellValue::Number(4.0));
        assert_eq!(sheet.cell(6, 2).unwrap().value, EnumCellValue::Number(6.0));
        assert_eq!(sheet.cell(6, 3).unwrap().value, EnumCellValue::Number(10.0));
        assert_eq!(sheet.column_width(3), N_WIDTH_COL_MATRIX);

        let matrix_bad = SpecMatrixSheet {
            l_values: vec![vec![1.0]],
            ..matrix
        };
        let err = generate_matrix_sheet(&mut workbook, "rent2", &matrix_bad).unwrap_err();
        assert!(matches!(err, GridError::MatrixShapeMismatch { .. }));
    }
}
