mod columns;
mod directory;
mod error;
mod matcher;
mod record;

pub use columns::{resolve_key_column, KEY_COLUMN_KEYWORDS};
pub use directory::{ClientDirectory, SheetInfo, COUNT_RANGE, HEADER_RANGE, TABLE_RANGE};
pub use error::{LookupError, Result};
pub use matcher::find_record;
pub use record::Record;
