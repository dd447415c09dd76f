use serde::{Deserialize, Serialize};

/// Response payload of a `values/{range}` read.
///
/// Rows come back ragged: trailing empty cells are omitted, so a row may be
/// shorter than the header it belongs to. Callers must not assume uniform
/// width.
#[derive(Debug, Clone, Deserialize)]
pub struct ValueRange {
    #[serde(default)]
    pub range: Option<String>,
    #[serde(default, rename = "majorDimension")]
    pub major_dimension: Option<String>,
    #[serde(default)]
    pub values: Vec<Vec<String>>,
}

/// Request body of a `values/{range}:append` call.
#[derive(Debug, Clone, Serialize)]
pub struct AppendBody {
    pub values: Vec<Vec<String>>,
}

/// Error envelope returned by the values API on non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
}
