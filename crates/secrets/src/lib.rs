//! # Desk Secrets
//!
//! Credential collaborator for the clientdesk service: a thin Secret Manager
//! REST client plus the metadata-server token source the other Google API
//! clients authenticate with.
//!
//! Absence is not an error here. A secret that is missing, denied, or
//! undecodable reads as `None` and the dependent subsystem degrades to a
//! no-op; only the primary bot token is allowed to be fatal, and that policy
//! lives with the caller.

mod error;
mod store;
mod token;

pub use error::{Result, SecretsError};
pub use store::{GcpSecretStore, SecretStore, ServiceCredentials};
pub use token::TokenProvider;
