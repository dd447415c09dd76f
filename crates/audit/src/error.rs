use thiserror::Error;

pub type Result<T> = std::result::Result<T, AuditError>;

#[derive(Error, Debug)]
pub enum AuditError {
    /// Durable logging was never configured. Reads fail with this so the
    /// dispatch layer can tell "no data" apart from "no log sheet".
    #[error("Activity log disabled")]
    Disabled,

    #[error("Spreadsheet error: {0}")]
    Sheets(#[from] desk_sheets::SheetsError),
}
