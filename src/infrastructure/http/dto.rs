// SPDX-License-Identifier: MPL-2.0
//! Wire shapes of the catalog service.
//!
//! Field names follow the service's JSON (`_id`, `isPublic`, `privateLink`,
//! ...). Conversion into domain types happens here and nowhere else.

use crate::application::port::{AuthToken, CatalogError, Session};
use crate::domain::asset::{Asset, AssetId, Payload, ShareToken, UserId};
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

fn default_version() -> u32 {
    1
}

/// Asset record as returned by `GET /assets` and `GET /assets/public/{token}`.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(rename = "isPublic", default)]
    pub is_public: bool,
    #[serde(rename = "privateLink", default)]
    pub private_link: Option<String>,
    #[serde(rename = "type", default)]
    pub mime_type: Option<String>,
    #[serde(rename = "uploadDate", default)]
    pub upload_date: Option<String>,
    #[serde(rename = "base64Data", default)]
    pub base64_data: Option<String>,
}

impl AssetDto {
    /// Converts into the domain record, decoding the embedded payload.
    pub fn into_asset(self) -> Result<Asset, CatalogError> {
        let uploaded_at = self.upload_date.as_deref().and_then(parse_timestamp);
        let payload = self
            .base64_data
            .as_deref()
            .filter(|data| !data.is_empty())
            .map(decode_payload)
            .transpose()?;

        Ok(Asset {
            id: AssetId::new(self.id),
            name: self.name,
            category: self.category,
            version: self.version,
            owner: UserId::new(self.owner.unwrap_or_default()),
            is_public: self.is_public,
            share_token: self.private_link.as_deref().and_then(ShareToken::parse),
            mime_type: self.mime_type.unwrap_or_default(),
            uploaded_at,
            payload,
        })
    }
}

fn parse_timestamp(raw: &str) -> Option<SystemTime> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(timestamp) => Some(SystemTime::from(timestamp.with_timezone(&Utc))),
        Err(err) => {
            log::debug!("ignoring unparsable upload date {raw:?}: {err}");
            None
        }
    }
}

/// Accepts bare base64 or a `data:` URI.
fn decode_payload(raw: &str) -> Result<Payload, CatalogError> {
    let encoded = if raw.starts_with("data:") {
        raw.split_once(',').map_or("", |(_, data)| data)
    } else {
        raw
    };
    base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .map(Payload::new)
        .map_err(|err| CatalogError::InvalidResponse(format!("payload is not base64: {err}")))
}

/// `POST /login` body.
#[derive(Debug, Serialize)]
pub struct LoginBody<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// `POST /signup` body.
#[derive(Debug, Serialize)]
pub struct SignupBody<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// `POST /login` response.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(rename = "userid")]
    pub user_id: String,
}

impl LoginResponse {
    #[must_use]
    pub fn into_session(self, username: &str) -> Session {
        Session {
            token: AuthToken::new(self.token),
            user_id: UserId::new(self.user_id),
            username: username.to_string(),
        }
    }
}

/// `POST /upload` response.
#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub asset: Option<AssetDto>,
}

/// Generic `{ "message": ... }` payload, used for confirmations and errors.
#[derive(Debug, Default, Deserialize)]
pub struct MessageBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl MessageBody {
    #[must_use]
    pub fn into_text(self) -> Option<String> {
        self.message.or(self.error).filter(|text| !text.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORD: &str = r#"{
        "_id": "665f",
        "name": "chair.glb",
        "category": "uploads/models",
        "version": 2,
        "owner": "u1",
        "isPublic": false,
        "privateLink": "tok123",
        "type": "model/gltf-binary",
        "uploadDate": "2024-05-01T10:00:00.000Z",
        "base64Data": "AAEC"
    }"#;

    #[test]
    fn full_record_converts() {
        let dto: AssetDto = serde_json::from_str(RECORD).expect("json");
        let asset = dto.into_asset().expect("asset");
        assert_eq!(asset.id.as_str(), "665f");
        assert_eq!(asset.version, 2);
        assert_eq!(asset.canonical_category(), "models");
        assert_eq!(asset.share_token.as_ref().map(ShareToken::as_str), Some("tok123"));
        assert!(asset.uploaded_at.is_some());
        assert_eq!(asset.payload.as_ref().map(Payload::as_bytes), Some(&[0u8, 1, 2][..]));
    }

    #[test]
    fn list_records_may_omit_optional_fields() {
        let dto: AssetDto =
            serde_json::from_str(r#"{"_id": "1", "name": "rock.obj"}"#).expect("json");
        let asset = dto.into_asset().expect("asset");
        assert_eq!(asset.version, 1);
        assert!(asset.payload.is_none());
        assert!(asset.share_token.is_none());
        assert!(!asset.is_public);
    }

    #[test]
    fn data_uri_payload_is_accepted() {
        let payload = decode_payload("data:model/stl;base64,AAEC").expect("payload");
        assert_eq!(payload.as_bytes(), &[0, 1, 2]);
    }

    #[test]
    fn invalid_payload_is_rejected() {
        assert!(matches!(
            decode_payload("@@@"),
            Err(CatalogError::InvalidResponse(_))
        ));
    }

    #[test]
    fn login_response_uses_userid_field() {
        let response: LoginResponse =
            serde_json::from_str(r#"{"token": "t", "userid": "u9"}"#).expect("json");
        let session = response.into_session("ana");
        assert_eq!(session.user_id.as_str(), "u9");
        assert_eq!(session.username, "ana");
    }

    #[test]
    fn message_body_prefers_message_over_error() {
        let body: MessageBody =
            serde_json::from_str(r#"{"message": "m", "error": "e"}"#).expect("json");
        assert_eq!(body.into_text().as_deref(), Some("m"));
        assert_eq!(MessageBody::default().into_text(), None);
    }
}
