//! Template inspector - reads a generated workbook back and checks its layout

use crate::error::{TemplateError, TemplateResult};
use crate::excel::cell_ref;
use crate::layout::{
    self, Field, CATEGORIES, DATA_SHEET, FIRST_DATA_ROW, LAST_DATA_ROW, LOOKUP_SHEET,
};
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A formula that points at a row other than its own
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForeignReference {
    /// Cell holding the formula, e.g. `J5`
    pub cell: String,
    pub formula: String,
}

/// Layout of a template as read back from disk
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateReport {
    /// Row 1 of the data sheet
    pub headers: Vec<String>,
    /// Lookup column A from row 2 until the first blank
    pub stores: Vec<String>,
    /// Lookup column B from row 2 until the first blank
    pub categories: Vec<String>,
    /// Formula cells found anywhere on the data sheet
    pub formula_cells: usize,
    /// Derived cells whose formula is missing or differs from the layout
    pub formula_mismatches: Vec<String>,
    pub foreign_row_references: Vec<ForeignReference>,
}

impl TemplateReport {
    /// Number of formula cells a complete template carries
    pub fn expected_formula_cells() -> usize {
        layout::derived_fields().len() * layout::DATA_ROW_COUNT as usize
    }

    /// True when the workbook matches the fixed layout in every checked aspect
    pub fn is_well_formed(&self) -> bool {
        self.headers == layout::headers()
            && self.categories == CATEGORIES
            && !self.stores.is_empty()
            && self.formula_cells == Self::expected_formula_cells()
            && self.formula_mismatches.is_empty()
            && self.foreign_row_references.is_empty()
    }

    /// Human-readable reasons why [`is_well_formed`](Self::is_well_formed) fails
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.headers != layout::headers() {
            problems.push(format!(
                "header row has {} columns, expected {}",
                self.headers.len(),
                Field::ALL.len()
            ));
        }
        if self.categories != CATEGORIES {
            problems.push(format!("category list is {:?}", self.categories));
        }
        if self.stores.is_empty() {
            problems.push("store list is empty".to_string());
        }
        if self.formula_cells != Self::expected_formula_cells() {
            problems.push(format!(
                "found {} formula cells, expected {}",
                self.formula_cells,
                Self::expected_formula_cells()
            ));
        }
        if !self.formula_mismatches.is_empty() {
            problems.push(format!(
                "{} formula cells differ from the layout (first: {})",
                self.formula_mismatches.len(),
                self.formula_mismatches[0]
            ));
        }
        if let Some(first) = self.foreign_row_references.first() {
            problems.push(format!(
                "{} formulas reference another row (first: {} = {})",
                self.foreign_row_references.len(),
                first.cell,
                first.formula
            ));
        }

        problems
    }
}

/// Reads a template workbook and produces a [`TemplateReport`]
pub struct TemplateInspector {
    path: PathBuf,
}

impl TemplateInspector {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn inspect(&self) -> TemplateResult<TemplateReport> {
        let mut workbook: Xlsx<_> = open_workbook(&self.path)
            .map_err(|e| TemplateError::Import(format!("Failed to open Excel file: {}", e)))?;

        let data = workbook.worksheet_range(DATA_SHEET).map_err(|e| {
            TemplateError::Import(format!("Failed to read sheet '{}': {}", DATA_SHEET, e))
        })?;
        let formulas = workbook.worksheet_formula(DATA_SHEET).map_err(|e| {
            TemplateError::Import(format!("Failed to read formulas of '{}': {}", DATA_SHEET, e))
        })?;
        let lookup = workbook.worksheet_range(LOOKUP_SHEET).map_err(|e| {
            TemplateError::Import(format!("Failed to read sheet '{}': {}", LOOKUP_SHEET, e))
        })?;

        let headers = (0..Field::ALL.len() as u32)
            .map_while(|col| text_at(&data, 0, col))
            .collect();

        let (formula_cells, foreign_row_references) = Self::scan_formulas(&formulas)?;
        let formula_mismatches = Self::compare_formulas(&formulas);

        let report = TemplateReport {
            headers,
            stores: column_until_blank(&lookup, 0),
            categories: column_until_blank(&lookup, 1),
            formula_cells,
            formula_mismatches,
            foreign_row_references,
        };

        debug!(
            path = %self.path.display(),
            formula_cells = report.formula_cells,
            stores = report.stores.len(),
            "template inspected"
        );

        Ok(report)
    }

    /// Count formula cells and collect those referencing a foreign row
    fn scan_formulas(
        formulas: &Range<String>,
    ) -> TemplateResult<(usize, Vec<ForeignReference>)> {
        let cell_ref_pattern = Regex::new(r"\$?\b([A-Z]{1,3})\$?(\d+)\b")
            .map_err(|e| TemplateError::Import(format!("Regex error: {}", e)))?;

        let (start_row, start_col) = formulas.start().unwrap_or((0, 0));
        let mut count = 0;
        let mut foreign = Vec::new();

        for (rel_row, rel_col, formula) in formulas.used_cells() {
            count += 1;
            let excel_row = start_row + rel_row as u32 + 1;
            let col = (start_col + rel_col as u32) as u16;

            let references_other_row = cell_ref_pattern.captures_iter(formula).any(|caps| {
                caps.get(2)
                    .and_then(|m| m.as_str().parse::<u32>().ok())
                    .is_some_and(|row| row != excel_row)
            });

            if references_other_row {
                foreign.push(ForeignReference {
                    cell: cell_ref::cell(col, excel_row),
                    formula: formula.clone(),
                });
            }
        }

        Ok((count, foreign))
    }

    /// Cells of derived columns whose formula is absent or differs
    fn compare_formulas(formulas: &Range<String>) -> Vec<String> {
        let mut mismatches = Vec::new();

        for excel_row in FIRST_DATA_ROW..=LAST_DATA_ROW {
            for field in layout::derived_fields() {
                let expected = field.formula(excel_row).unwrap_or_default();
                let actual = formulas
                    .get_value((excel_row - 1, field.index() as u32))
                    .map(String::as_str)
                    .unwrap_or("");

                if normalize(actual) != normalize(&expected) {
                    mismatches.push(cell_ref::cell(field.index(), excel_row));
                }
            }
        }

        mismatches
    }
}

/// Formula text without the leading `=` (readers differ on keeping it)
fn normalize(formula: &str) -> &str {
    formula.trim().trim_start_matches('=')
}

fn text_at(range: &Range<Data>, row: u32, col: u32) -> Option<String> {
    match range.get_value((row, col))? {
        Data::String(s) if !s.is_empty() => Some(s.clone()),
        Data::Empty => None,
        Data::String(_) => None,
        other => Some(other.to_string()),
    }
}

/// Values of one column from row 2 down to the first blank cell
fn column_until_blank(range: &Range<Data>, col: u32) -> Vec<String> {
    (1u32..).map_while(|row| text_at(range, row, col)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::excel::TemplateBuilder;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn report_for(stores: Vec<String>) -> TemplateReport {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("template.xlsx");
        TemplateBuilder::new(stores).build(&path).unwrap();
        TemplateInspector::new(&path).inspect().unwrap()
    }

    #[test]
    fn test_expected_formula_cells() {
        assert_eq!(TemplateReport::expected_formula_cells(), 8000);
    }

    #[test]
    fn test_inspect_generated_template() {
        let report = report_for(vec!["杭州-首店".to_string(), "苏州-二店".to_string()]);

        assert_eq!(report.headers, layout::headers());
        assert_eq!(report.stores, vec!["杭州-首店", "苏州-二店"]);
        assert_eq!(report.categories, CATEGORIES);
        assert_eq!(report.formula_cells, 8000);
        assert!(report.formula_mismatches.is_empty());
        assert!(report.foreign_row_references.is_empty());
        assert!(report.is_well_formed());
        assert!(report.problems().is_empty());
    }

    #[test]
    fn test_inspect_missing_file() {
        let result = TemplateInspector::new("/nonexistent/template.xlsx").inspect();
        assert!(matches!(result, Err(TemplateError::Import(_))));
    }

    #[test]
    fn test_inspect_workbook_without_template_sheets() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("other.xlsx");
        let mut workbook = rust_xlsxwriter::Workbook::new();
        workbook.add_worksheet().write_string(0, 0, "hello").unwrap();
        workbook.save(&path).unwrap();

        let result = TemplateInspector::new(&path).inspect();
        assert!(matches!(result, Err(TemplateError::Import(_))));
    }

    #[test]
    fn test_problems_describe_foreign_references() {
        let mut report = report_for(Vec::new());
        report.foreign_row_references.push(ForeignReference {
            cell: "J3".to_string(),
            formula: "G2*(1+H3)+I3".to_string(),
        });

        assert!(!report.is_well_formed());
        let problems = report.problems();
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("J3"));
    }

    #[test]
    fn test_scan_formulas_detects_foreign_row() {
        let mut formulas: Range<String> = Range::new((1, 9), (2, 9));
        formulas.set_value((1, 9), "G2*(1+H2)+I2".to_string());
        formulas.set_value((2, 9), "G2*(1+H3)+I3".to_string());

        let (count, foreign) = TemplateInspector::scan_formulas(&formulas).unwrap();
        assert_eq!(count, 2);
        assert_eq!(
            foreign,
            vec![ForeignReference {
                cell: "J3".to_string(),
                formula: "G2*(1+H3)+I3".to_string(),
            }]
        );
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("=W2-V2"), "W2-V2");
        assert_eq!(normalize("W2-V2"), "W2-V2");
    }
}
