use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConversionError>;

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Date parsing error: {0}")]
    DateParse(#[from] chrono::ParseError),

    #[error("GPX error: {0}")]
    Gpx(#[from] gpx::errors::GpxError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Settings error: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid sexagesimal format: {0}")]
    Format(String),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Submission to conversion service failed: {detail}")]
    Submission { detail: String },

    #[error("Conversion trigger failed: {detail}")]
    Trigger { detail: String },

    #[error("Result retrieval failed: {detail}")]
    Retrieval { detail: String },

    #[error("Converter returned {actual} points for {expected} submitted")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Local datum transform error: {0}")]
    LocalTransform(String),
}
