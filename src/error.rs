use thiserror::Error;

pub type TemplateResult<T> = Result<T, TemplateError>;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Excel export error: {0}")]
    Export(String),

    #[error("Excel import error: {0}")]
    Import(String),

    #[error("Validation error: {0}")]
    Validation(String),
}
