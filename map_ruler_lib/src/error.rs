use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RulerError {
    #[error("unknown unit '{0}', expected one of km, mi, nmi")]
    UnknownUnit(String),
    #[error("invalid color for {field}: '{value}'")]
    InvalidColor { field: &'static str, value: String },
    #[error("font size must be positive")]
    InvalidFontSize,
    #[error("line width must be a positive number, got {0}")]
    InvalidLineWidth(f64),
    #[error("{0} must not be empty")]
    EmptyIdentifier(&'static str),
}
