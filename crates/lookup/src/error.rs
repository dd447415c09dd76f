use thiserror::Error;

pub type Result<T> = std::result::Result<T, LookupError>;

#[derive(Error, Debug)]
pub enum LookupError {
    /// The directory never reached its backing sheet. The dispatch layer
    /// maps this to the same "not found" reply a miss produces.
    #[error("Record store not connected")]
    NotConnected,

    #[error("Spreadsheet error: {0}")]
    Sheets(#[from] desk_sheets::SheetsError),
}
