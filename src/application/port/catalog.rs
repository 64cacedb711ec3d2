// SPDX-License-Identifier: MPL-2.0
//! Remote catalog port.
//!
//! The catalog owns every asset record. The client lists them, resolves one
//! by share token, and asks for uploads and deletions. Version equality on
//! upload is decided remotely; the client only recognises the returned
//! duplicate-version signal.

use crate::domain::asset::{Asset, AssetId, ShareToken, UserId};
use crate::domain::asset::CategoryToken;
use crate::error::ValidationError;
use async_trait::async_trait;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use std::fmt;
use thiserror::Error;

/// Exact message the catalog returns when an identical version exists.
pub const DUPLICATE_VERSION_MESSAGE: &str = "File already exists with the same version";

/// Errors reported by catalog adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// Transport failure or unexpected HTTP status.
    #[error("network failure: {0}")]
    Network(String),

    /// Token or id did not resolve.
    #[error("not found")]
    NotFound,

    /// Error payload returned by the service, surfaced verbatim.
    #[error("{0}")]
    Service(String),

    /// The response could not be interpreted.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Bearer token issued by the auth collaborator. Opaque to the client.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(<redacted>)")
    }
}

/// Signed-in identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: AuthToken,
    pub user_id: UserId,
    /// Name typed at login, shown in the header.
    pub username: String,
}

/// Login form input.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Both fields must be non-blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.username.trim().is_empty() || self.password.is_empty() {
            Err(ValidationError::EmptyCredentials)
        } else {
            Ok(())
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Signup form input.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl SignupRequest {
    /// All fields must be non-blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.username.trim().is_empty()
            || self.email.trim().is_empty()
            || self.password.is_empty()
        {
            Err(ValidationError::EmptyCredentials)
        } else {
            Ok(())
        }
    }
}

impl fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A file to publish into the catalog.
#[derive(Clone)]
pub struct UploadRequest {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub category: CategoryToken,
    pub is_public: bool,
}

impl fmt::Debug for UploadRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadRequest")
            .field("file_name", &self.file_name)
            .field("bytes", &self.bytes.len())
            .field("category", &self.category)
            .field("is_public", &self.is_public)
            .finish()
    }
}

/// Successful upload results.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    /// A new asset record was created.
    Created(Asset),
    /// The catalog already holds this version. Carries the server message.
    DuplicateVersion(String),
}

impl UploadOutcome {
    /// Interprets the fields of a successful upload response.
    ///
    /// Only the exact duplicate message maps to
    /// [`UploadOutcome::DuplicateVersion`]; any other success must carry the
    /// new asset record.
    pub fn from_response(message: Option<String>, asset: Option<Asset>) -> Result<Self, CatalogError> {
        match (message, asset) {
            (Some(message), _) if message == DUPLICATE_VERSION_MESSAGE => {
                Ok(UploadOutcome::DuplicateVersion(message))
            }
            (_, Some(asset)) => Ok(UploadOutcome::Created(asset)),
            (Some(message), None) => Err(CatalogError::InvalidResponse(format!(
                "upload response without asset: {message}"
            ))),
            (None, None) => Err(CatalogError::InvalidResponse(
                "upload response without asset".to_string(),
            )),
        }
    }
}

/// Chunked response body.
pub type ByteStream = BoxStream<'static, Result<Vec<u8>, CatalogError>>;

/// A download in flight: headers plus the body stream.
pub struct DownloadResponse {
    pub content_disposition: Option<String>,
    pub content_type: Option<String>,
    pub body: ByteStream,
}

impl DownloadResponse {
    /// Drains the body into memory.
    pub async fn into_bytes(self) -> Result<Vec<u8>, CatalogError> {
        let mut body = self.body;
        let mut bytes = Vec::new();
        while let Some(chunk) = body.next().await {
            bytes.extend_from_slice(&chunk?);
        }
        Ok(bytes)
    }
}

impl fmt::Debug for DownloadResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DownloadResponse")
            .field("content_disposition", &self.content_disposition)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

/// Port for the remote catalog and its auth collaborator.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the app shares one instance
/// across all in-flight tasks.
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Lists the caller's visible assets, without payloads.
    async fn list_assets(&self, auth: &AuthToken) -> Result<Vec<Asset>, CatalogError>;

    /// Fetches one asset by share token, with its embedded payload.
    async fn resolve_public_asset(&self, token: &ShareToken) -> Result<Asset, CatalogError>;

    async fn upload_asset(
        &self,
        auth: &AuthToken,
        request: UploadRequest,
    ) -> Result<UploadOutcome, CatalogError>;

    async fn delete_asset(&self, auth: &AuthToken, id: &AssetId) -> Result<(), CatalogError>;

    /// Opens a download of the asset bytes.
    async fn download_asset(
        &self,
        auth: Option<&AuthToken>,
        id: &AssetId,
    ) -> Result<DownloadResponse, CatalogError>;

    async fn login(&self, credentials: &Credentials) -> Result<Session, CatalogError>;

    /// Registers an account. Returns the service confirmation message.
    async fn signup(&self, request: &SignupRequest) -> Result<String, CatalogError>;

    /// Public URL that resolves `token` without authentication.
    fn share_url(&self, token: &ShareToken) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_duplicate_message_is_recognised() {
        let outcome =
            UploadOutcome::from_response(Some(DUPLICATE_VERSION_MESSAGE.to_string()), None)
                .expect("outcome");
        assert_eq!(
            outcome,
            UploadOutcome::DuplicateVersion(DUPLICATE_VERSION_MESSAGE.to_string())
        );
    }

    #[test]
    fn near_duplicate_message_is_not_special_cased() {
        let asset = Asset::new("1", "a.glb", "models");
        let outcome = UploadOutcome::from_response(
            Some("file already exists with the same version".to_string()),
            Some(asset.clone()),
        )
        .expect("outcome");
        assert_eq!(outcome, UploadOutcome::Created(asset));
    }

    #[test]
    fn success_without_asset_is_invalid() {
        let result = UploadOutcome::from_response(Some("Uploaded".to_string()), None);
        assert!(matches!(result, Err(CatalogError::InvalidResponse(_))));
    }

    #[test]
    fn secrets_are_redacted_in_debug_output() {
        let token = AuthToken::new("secret");
        assert!(!format!("{token:?}").contains("secret"));

        let credentials = Credentials {
            username: "ana".into(),
            password: "hunter2".into(),
        };
        assert!(!format!("{credentials:?}").contains("hunter2"));
    }

    #[test]
    fn credentials_require_both_fields() {
        let mut credentials = Credentials::default();
        assert_eq!(credentials.validate(), Err(ValidationError::EmptyCredentials));
        credentials.username = "ana".into();
        credentials.password = "pw".into();
        assert_eq!(credentials.validate(), Ok(()));
    }

    #[tokio::test]
    async fn into_bytes_concatenates_chunks() {
        let chunks: Vec<Result<Vec<u8>, CatalogError>> = vec![Ok(vec![1, 2]), Ok(vec![3])];
        let response = DownloadResponse {
            content_disposition: None,
            content_type: None,
            body: futures_util::stream::iter(chunks).boxed(),
        };
        assert_eq!(response.into_bytes().await.expect("bytes"), vec![1, 2, 3]);
    }
}
