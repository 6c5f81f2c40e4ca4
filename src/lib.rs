//! Margin Template - profit-margin tracking workbook generator
//!
//! This library writes a ready-to-fill Excel template for tracking per-item
//! profit margins of a retail or restaurant business, and reads such a
//! template back to check its layout.
//!
//! # Features
//!
//! - 27-column data sheet with styled header, frozen pane and auto-filter
//! - Store and category dropdowns fed from a lookup sheet
//! - Per-row formulas for cost, fees, tax, gross/net profit and margins
//! - Store list discovered from the repository's store archive
//!
//! # Example
//!
//! ```no_run
//! use margin_template::excel::{build_template, TemplateInspector};
//! use std::path::Path;
//!
//! let output = Path::new("模板与示例/财务模板/商品利润率模板.xlsx");
//! build_template(output, Path::new("."))?;
//!
//! let report = TemplateInspector::new(output).inspect()?;
//! println!("Stores: {}", report.stores.len());
//! # Ok::<(), margin_template::error::TemplateError>(())
//! ```

pub mod cli;
pub mod error;
pub mod excel;
pub mod layout;
pub mod stores;

// Re-export commonly used types
pub use error::{TemplateError, TemplateResult};
pub use excel::{build_template, TemplateBuilder, TemplateInspector, TemplateReport};
pub use layout::Field;
