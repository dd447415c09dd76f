use crate::client::SheetsClient;
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Tabular-store collaborator seam.
///
/// Everything above this trait sees a spreadsheet as ranges of string rows:
/// `get_range` for reads, `append_row` for the append-only log. Reads are
/// idempotent and return an empty Vec on "no data"; implementations raise
/// only for unrecoverable connection/auth failure.
#[async_trait]
pub trait Spreadsheet: Send + Sync {
    async fn get_range(&self, range: &str) -> Result<Vec<Vec<String>>>;

    async fn append_row(&self, range: &str, row: Vec<String>) -> Result<()>;
}

/// One spreadsheet bound to the shared values-API client, so consumers
/// address ranges without carrying spreadsheet ids around.
pub struct SheetTab {
    client: Arc<SheetsClient>,
    spreadsheet_id: String,
}

impl SheetTab {
    pub fn new(client: Arc<SheetsClient>, spreadsheet_id: impl Into<String>) -> Self {
        Self {
            client,
            spreadsheet_id: spreadsheet_id.into(),
        }
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }
}

#[async_trait]
impl Spreadsheet for SheetTab {
    async fn get_range(&self, range: &str) -> Result<Vec<Vec<String>>> {
        self.client.values_get(&self.spreadsheet_id, range).await
    }

    async fn append_row(&self, range: &str, row: Vec<String>) -> Result<()> {
        self.client
            .values_append(&self.spreadsheet_id, range, row)
            .await
    }
}
