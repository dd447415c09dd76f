//! # Desk Sheets
//!
//! Tabular-store collaborator for the clientdesk service: a Google Sheets
//! values-API client behind the [`Spreadsheet`] trait.
//!
//! The rest of the workspace only ever sees ranges of string rows: reads
//! via `get_range`, appends via `append_row`. "No data" is an empty Vec,
//! never an error; unrecoverable connection/auth failure surfaces as
//! [`SheetsError::Unavailable`] and callers degrade to an empty result.

mod client;
mod error;
mod memory;
mod store;
mod types;

pub use client::SheetsClient;
pub use error::{Result, SheetsError};
pub use memory::MemorySheet;
pub use store::{SheetTab, Spreadsheet};
pub use types::{ApiErrorBody, AppendBody, ValueRange};
