use thiserror::Error;

pub type Result<T> = std::result::Result<T, SheetsError>;

#[derive(Error, Debug)]
pub enum SheetsError {
    /// Credential or connection failure. Callers degrade to "no data".
    #[error("Spreadsheet store unavailable: {0}")]
    Unavailable(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Sheets API error: {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid range: {0}")]
    InvalidRange(String),
}
