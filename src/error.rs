// SPDX-License-Identifier: MPL-2.0
use crate::application::port::CatalogError;
use crate::scene::DecodeError;
use thiserror::Error;

/// Crate-wide error type.
///
/// Duplicate-version uploads are not an error: they surface as
/// [`UploadOutcome::DuplicateVersion`](crate::application::port::UploadOutcome).
#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("I/O Error: {0}")]
    Io(String),

    #[error("Config Error: {0}")]
    Config(String),

    /// Transport failure or unexpected HTTP status.
    #[error("Network Error: {0}")]
    Network(String),

    /// Token or id did not resolve.
    #[error("Not found")]
    NotFound,

    /// Error payload returned by the catalog service.
    #[error("Service Error: {0}")]
    Service(String),

    /// Malformed or unsupported binary.
    #[error("Decode Error: {0}")]
    Decode(#[from] DecodeError),

    /// Input rejected before any request was issued.
    #[error("Validation Error: {0}")]
    Validation(#[from] ValidationError),
}

/// Client-side input checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("shared-link token is empty")]
    EmptyShareToken,

    #[error("no file selected for upload")]
    MissingFile,

    #[error("credentials are incomplete")]
    EmptyCredentials,
}

impl ValidationError {
    /// Returns the i18n message key for this validation failure.
    #[must_use]
    pub fn i18n_key(self) -> &'static str {
        match self {
            ValidationError::EmptyShareToken => "notification-share-token-empty",
            ValidationError::MissingFile => "notification-upload-no-file",
            ValidationError::EmptyCredentials => "notification-auth-empty-fields",
        }
    }
}

impl Error {
    /// Returns the i18n key of the notification shown for this error.
    #[must_use]
    pub fn notification_key(&self) -> &'static str {
        match self {
            Error::Io(_) => "notification-io-error",
            Error::Config(_) => "notification-config-error",
            Error::Network(_) => "notification-network-error",
            Error::NotFound => "notification-not-found",
            Error::Service(_) => "notification-service-error",
            Error::Decode(_) => "notification-decode-error",
            Error::Validation(v) => v.i18n_key(),
        }
    }

    /// Detail string interpolated into the notification, if any.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Error::Io(msg) | Error::Config(msg) | Error::Network(msg) | Error::Service(msg) => {
                Some(msg)
            }
            Error::NotFound | Error::Decode(_) | Error::Validation(_) => None,
        }
    }
}

impl From<CatalogError> for Error {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Network(msg) => Error::Network(msg),
            CatalogError::NotFound => Error::NotFound,
            CatalogError::Service(msg) => Error::Service(msg),
            CatalogError::InvalidResponse(msg) => Error::Service(msg),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Network(err.to_string())
    }
}

impl From<iced::Error> for Error {
    fn from(err: iced::Error) -> Self {
        Error::Io(format!("window: {err}"))
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_io_error() {
        let err = Error::Io("disk failure".to_string());
        assert_eq!(format!("{}", err), "I/O Error: disk failure");
    }

    #[test]
    fn from_io_error_produces_io_variant() {
        let io_error = std::io::Error::other("boom");
        let err: Error = io_error.into();
        match err {
            Error::Io(message) => assert!(message.contains("boom")),
            _ => panic!("expected Io variant"),
        }
    }

    #[test]
    fn config_error_formats_properly() {
        let err = Error::Config("bad field".into());
        assert_eq!(format!("{}", err), "Config Error: bad field");
    }

    #[test]
    fn catalog_errors_map_onto_taxonomy() {
        assert!(matches!(Error::from(CatalogError::NotFound), Error::NotFound));
        assert!(matches!(
            Error::from(CatalogError::Network("refused".into())),
            Error::Network(_)
        ));
        assert!(matches!(
            Error::from(CatalogError::Service("Asset not found".into())),
            Error::Service(msg) if msg == "Asset not found"
        ));
    }

    #[test]
    fn validation_errors_have_dedicated_keys() {
        let err: Error = ValidationError::EmptyShareToken.into();
        assert_eq!(err.notification_key(), "notification-share-token-empty");
        assert_eq!(
            Error::from(ValidationError::MissingFile).notification_key(),
            "notification-upload-no-file"
        );
    }

    #[test]
    fn detail_is_exposed_for_message_variants() {
        assert_eq!(Error::Service("nope".into()).detail(), Some("nope"));
        assert_eq!(Error::NotFound.detail(), None);
    }
}
