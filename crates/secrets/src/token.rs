use crate::{Result, SecretsError};
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Tokens are refreshed this long before the server-reported expiry so an
/// in-flight request never carries a token that dies mid-call.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

const METADATA_TOKEN_PATH: &str =
    "/computeMetadata/v1/instance/service-accounts/default/token";
const DEFAULT_METADATA_HOST: &str = "metadata.google.internal";

/// Response of the metadata-server token endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: u64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: Instant,
}

/// Bearer-token source for Google API calls.
///
/// Resolution order:
/// 1. `GCP_ACCESS_TOKEN` env var (development override, never expires)
/// 2. the GCE/Cloud Run metadata server, cached until near expiry
pub struct TokenProvider {
    http: reqwest::Client,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenProvider {
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            cached: Mutex::new(None),
        }
    }

    pub async fn access_token(&self) -> Result<String> {
        if let Ok(value) = std::env::var("GCP_ACCESS_TOKEN") {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Ok(trimmed.to_string());
            }
        }

        let mut guard = self.cached.lock().await;
        if let Some(token) = guard.as_ref() {
            if Instant::now() < token.expires_at {
                return Ok(token.value.clone());
            }
        }

        let fresh = self.fetch_from_metadata().await?;
        let value = fresh.value.clone();
        *guard = Some(fresh);
        Ok(value)
    }

    async fn fetch_from_metadata(&self) -> Result<CachedToken> {
        let url = format!("http://{}{}", metadata_host(), METADATA_TOKEN_PATH);
        let response = self
            .http
            .get(&url)
            .header("Metadata-Flavor", "Google")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SecretsError::NoToken(format!(
                "metadata server returned {}",
                response.status()
            )));
        }

        let parsed: TokenResponse = response.json().await?;
        if parsed.access_token.is_empty() {
            return Err(SecretsError::NoToken(
                "metadata server returned an empty token".to_string(),
            ));
        }

        let lifetime = Duration::from_secs(parsed.expires_in)
            .checked_sub(EXPIRY_MARGIN)
            .unwrap_or(Duration::ZERO);
        Ok(CachedToken {
            value: parsed.access_token,
            expires_at: Instant::now() + lifetime,
        })
    }
}

fn metadata_host() -> String {
    // GCE_METADATA_HOST is the convention every Google SDK honors.
    std::env::var("GCE_METADATA_HOST")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_METADATA_HOST.to_string())
}
