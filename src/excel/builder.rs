//! Template builder - writes the profit-margin workbook

use crate::error::{TemplateError, TemplateResult};
use crate::excel::cell_ref;
use crate::layout::{
    self, Field, NumberFormat, CATEGORIES, CATEGORY_LIST_TITLE, DATA_SHEET, FIRST_DATA_ROW,
    LAST_DATA_ROW, LOOKUP_SHEET, STORE_LIST_TITLE,
};
use crate::stores::{discover_stores, DEFAULT_STORE};
use rust_xlsxwriter::{
    Color, DataValidation, Format, FormatAlign, FormatBorder, FormatPattern, Formula, Workbook,
    Worksheet,
};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Lookup sheet column holding the store names
const STORE_LOOKUP_COL: u16 = 0;

/// Lookup sheet column holding the category names
const CATEGORY_LOOKUP_COL: u16 = 1;

const HEADER_FILL: u32 = 0xD9D9D9;
const HEADER_BORDER: u32 = 0xBBBBBB;

/// Builds the profit-margin tracking template
pub struct TemplateBuilder {
    stores: Vec<String>,
}

/// Number formats shared by every data row
struct RowFormats {
    date: Format,
    currency: Format,
    percent: Format,
}

impl RowFormats {
    fn new() -> Self {
        Self {
            date: Format::new().set_num_format(layout::DATE_FORMAT),
            currency: Format::new().set_num_format(layout::CURRENCY_FORMAT),
            percent: Format::new().set_num_format(layout::PERCENT_FORMAT),
        }
    }

    fn get(&self, kind: NumberFormat) -> Option<&Format> {
        match kind {
            NumberFormat::Date => Some(&self.date),
            NumberFormat::Currency => Some(&self.currency),
            NumberFormat::Percent => Some(&self.percent),
            NumberFormat::None => None,
        }
    }
}

impl TemplateBuilder {
    /// Create a builder for the given store names
    ///
    /// An empty list falls back to the default store so the store dropdown
    /// always has a source row.
    pub fn new(stores: Vec<String>) -> Self {
        let stores = if stores.is_empty() {
            vec![DEFAULT_STORE.to_string()]
        } else {
            stores
        };
        Self { stores }
    }

    /// Create a builder whose stores come from the repository's store archive
    pub fn from_repo(repo_root: &Path) -> Self {
        Self::new(discover_stores(repo_root))
    }

    pub fn stores(&self) -> &[String] {
        &self.stores
    }

    pub fn categories(&self) -> &'static [&'static str] {
        &CATEGORIES
    }

    /// List source for the store dropdown, e.g. `'字典'!$A$2:$A$4` for 3 stores
    pub fn store_validation_source(&self) -> String {
        cell_ref::absolute_column_range(
            LOOKUP_SHEET,
            STORE_LOOKUP_COL,
            2,
            1 + self.stores.len() as u32,
        )
    }

    /// List source for the category dropdown
    pub fn category_validation_source(&self) -> String {
        cell_ref::absolute_column_range(
            LOOKUP_SHEET,
            CATEGORY_LOOKUP_COL,
            2,
            1 + CATEGORIES.len() as u32,
        )
    }

    /// Write the template to `output_path`, creating parent directories
    ///
    /// An existing file at that path is overwritten. The workbook is
    /// serialized in memory first, so a writer failure leaves no file behind.
    pub fn build(&self, output_path: &Path) -> TemplateResult<()> {
        let mut workbook = self.to_workbook()?;

        let buffer = workbook
            .save_to_buffer()
            .map_err(|e| TemplateError::Export(format!("Failed to serialize workbook: {}", e)))?;

        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(output_path, buffer)?;

        info!(path = %output_path.display(), stores = self.stores.len(), "template written");
        Ok(())
    }

    /// Assemble the in-memory workbook: data sheet first, lookup sheet second
    pub fn to_workbook(&self) -> TemplateResult<Workbook> {
        let mut workbook = Workbook::new();

        let data_sheet = workbook.add_worksheet();
        data_sheet
            .set_name(DATA_SHEET)
            .map_err(|e| TemplateError::Export(format!("Failed to set worksheet name: {}", e)))?;
        self.write_header(data_sheet)?;
        self.apply_validation(data_sheet)?;
        self.write_rows(data_sheet)?;

        let lookup_sheet = workbook.add_worksheet();
        lookup_sheet
            .set_name(LOOKUP_SHEET)
            .map_err(|e| TemplateError::Export(format!("Failed to set worksheet name: {}", e)))?;
        self.write_lookup_sheet(lookup_sheet)?;

        Ok(workbook)
    }

    /// Styled header row, column widths, frozen pane and auto-filter
    fn write_header(&self, worksheet: &mut Worksheet) -> TemplateResult<()> {
        let header_format = Format::new()
            .set_bold()
            .set_pattern(FormatPattern::Solid)
            .set_background_color(Color::RGB(HEADER_FILL))
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_border(FormatBorder::Thin)
            .set_border_color(Color::RGB(HEADER_BORDER));

        for field in Field::ALL {
            worksheet
                .write_string_with_format(0, field.index(), field.title(), &header_format)
                .map_err(|e| TemplateError::Export(format!("Failed to write header: {}", e)))?;
            worksheet
                .set_column_width(field.index(), field.width())
                .map_err(|e| {
                    TemplateError::Export(format!("Failed to set column width: {}", e))
                })?;
        }

        worksheet
            .set_freeze_panes(1, 0)
            .map_err(|e| TemplateError::Export(format!("Failed to freeze panes: {}", e)))?;

        let last_col = Field::ALL.len() as u16 - 1;
        worksheet
            .autofilter(0, 0, 0, last_col)
            .map_err(|e| TemplateError::Export(format!("Failed to add auto-filter: {}", e)))?;

        Ok(())
    }

    /// Store and category dropdowns over the data rows, blanks allowed
    fn apply_validation(&self, worksheet: &mut Worksheet) -> TemplateResult<()> {
        let first_row = FIRST_DATA_ROW - 1;
        let last_row = LAST_DATA_ROW - 1;

        let dropdowns = [
            (Field::Store, self.store_validation_source()),
            (Field::Category, self.category_validation_source()),
        ];

        for (field, source) in dropdowns {
            debug!(column = %field.letter(), %source, "adding list validation");
            let validation = DataValidation::new()
                .allow_list_formula(Formula::new(format!("={}", source)))
                .ignore_blank(true);
            worksheet
                .add_data_validation(first_row, field.index(), last_row, field.index(), &validation)
                .map_err(|e| {
                    TemplateError::Export(format!("Failed to add data validation: {}", e))
                })?;
        }

        Ok(())
    }

    /// Number formats and formulas for rows 2..=1001
    fn write_rows(&self, worksheet: &mut Worksheet) -> TemplateResult<()> {
        let formats = RowFormats::new();
        let plain = Format::new();

        for excel_row in FIRST_DATA_ROW..=LAST_DATA_ROW {
            let row = excel_row - 1; // worksheet API is 0-indexed

            for field in Field::ALL {
                let format = formats.get(field.number_format());

                if let Some(formula) = field.formula(excel_row) {
                    worksheet
                        .write_formula_with_format(
                            row,
                            field.index(),
                            Formula::new(&formula),
                            format.unwrap_or(&plain),
                        )
                        .map_err(|e| {
                            TemplateError::Export(format!("Failed to write formula: {}", e))
                        })?;
                } else if let Some(format) = format {
                    worksheet.write_blank(row, field.index(), format).map_err(|e| {
                        TemplateError::Export(format!("Failed to format cell: {}", e))
                    })?;
                }
            }
        }

        debug!(rows = layout::DATA_ROW_COUNT, "data rows formatted");
        Ok(())
    }

    /// Titles in row 1, stores in column A and categories in column B
    fn write_lookup_sheet(&self, worksheet: &mut Worksheet) -> TemplateResult<()> {
        let lists: [(u16, &str, Vec<&str>); 2] = [
            (
                STORE_LOOKUP_COL,
                STORE_LIST_TITLE,
                self.stores.iter().map(String::as_str).collect(),
            ),
            (CATEGORY_LOOKUP_COL, CATEGORY_LIST_TITLE, CATEGORIES.to_vec()),
        ];

        for (col, title, values) in lists {
            worksheet.write_string(0, col, title).map_err(|e| {
                TemplateError::Export(format!("Failed to write lookup title: {}", e))
            })?;
            for (idx, value) in values.iter().enumerate() {
                worksheet
                    .write_string(idx as u32 + 1, col, *value)
                    .map_err(|e| {
                        TemplateError::Export(format!("Failed to write lookup value: {}", e))
                    })?;
            }
        }

        Ok(())
    }
}

/// Discover stores under `repo_root` and write the template to `output_path`
pub fn build_template(output_path: &Path, repo_root: &Path) -> TemplateResult<()> {
    TemplateBuilder::from_repo(repo_root).build(output_path)
}
