//! Excel template generation and inspection
//!
//! - Build: fixed layout → styled `.xlsx` template with dropdowns and formulas
//! - Inspect: `.xlsx` template → layout report

mod builder;
pub mod cell_ref;
mod inspector;

pub use builder::{build_template, TemplateBuilder};
pub use inspector::{ForeignReference, TemplateInspector, TemplateReport};
