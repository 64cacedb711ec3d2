// SPDX-License-Identifier: MPL-2.0
//! Core catalog types.
//!
//! Assets are created and mutated only by the remote catalog. The client
//! holds read-only copies and applies completed create/delete results to its
//! in-memory collection.

use super::category::{classify, CategoryToken};
use crate::domain::format::FormatToken;
use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;

/// Opaque catalog identifier of an asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetId(String);

impl AssetId {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of the user owning an asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Opaque token granting unauthenticated read access to exactly one asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShareToken(String);

/// Path segment that precedes the token in a full share URL.
const PUBLIC_PATH_MARKER: &str = "/assets/public/";

impl ShareToken {
    /// Parses user input into a token.
    ///
    /// Accepts either the bare token or a full share URL, in which case the
    /// segment after `/assets/public/` is kept. Returns `None` when nothing
    /// remains after trimming.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let token = match trimmed.rfind(PUBLIC_PATH_MARKER) {
            Some(pos) => {
                let tail = &trimmed[pos + PUBLIC_PATH_MARKER.len()..];
                let tail = tail.split(['?', '#']).next().unwrap_or(tail);
                tail.trim_end_matches('/')
            }
            None => trimmed,
        };

        if token.is_empty() {
            None
        } else {
            Some(Self(token.to_string()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShareToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw asset bytes embedded in a single-asset response.
///
/// Cloning is cheap: the bytes are shared.
#[derive(Clone, PartialEq, Eq)]
pub struct Payload(Arc<[u8]>);

impl Payload {
    #[must_use]
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(Arc::from(bytes))
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns a shared handle to the bytes, for moving into worker tasks.
    #[must_use]
    pub fn shared(&self) -> Arc<[u8]> {
        Arc::clone(&self.0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Payload({} bytes)", self.0.len())
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

/// A catalog record as seen by the client.
#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    pub id: AssetId,
    /// Display name. Its trailing suffix selects the decoder.
    pub name: String,
    /// Path-like category field; the last segment is the canonical category.
    pub category: String,
    pub version: u32,
    pub owner: UserId,
    pub is_public: bool,
    pub share_token: Option<ShareToken>,
    pub mime_type: String,
    pub uploaded_at: Option<SystemTime>,
    /// Present only on single-asset fetches, never on list fetches.
    pub payload: Option<Payload>,
}

impl Asset {
    /// Creates a private, version 1 asset with no owner, timestamp or payload.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: AssetId::new(id),
            name: name.into(),
            category: category.into(),
            version: 1,
            owner: UserId::new(""),
            is_public: false,
            share_token: None,
            mime_type: String::new(),
            uploaded_at: None,
            payload: None,
        }
    }

    #[must_use]
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = UserId::new(owner);
        self
    }

    #[must_use]
    pub fn with_payload(mut self, bytes: Vec<u8>) -> Self {
        self.payload = Some(Payload::new(bytes));
        self
    }

    /// Returns the last segment of the category field.
    #[must_use]
    pub fn canonical_category(&self) -> &str {
        classify(&self.category)
    }

    /// Returns the category bucket, or `None` when the canonical segment is
    /// outside the known set.
    #[must_use]
    pub fn category_token(&self) -> Option<CategoryToken> {
        CategoryToken::parse(self.canonical_category())
    }

    /// Returns `true` when the asset belongs to the models bucket.
    #[must_use]
    pub fn is_model(&self) -> bool {
        self.category_token() == Some(CategoryToken::Models)
    }

    /// Returns the decoder selection token derived from the display name.
    #[must_use]
    pub fn format_token(&self) -> Option<FormatToken> {
        FormatToken::from_name(&self.name)
    }

    /// Returns `true` when `user` owns this asset.
    #[must_use]
    pub fn is_owned_by(&self, user: Option<&UserId>) -> bool {
        user.is_some_and(|user| !user.as_str().is_empty() && *user == self.owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn share_token_rejects_blank_input() {
        assert!(ShareToken::parse("").is_none());
        assert!(ShareToken::parse("   \t ").is_none());
    }

    #[test]
    fn share_token_trims_surrounding_whitespace() {
        let token = ShareToken::parse("  abc123 \n").expect("token");
        assert_eq!(token.as_str(), "abc123");
    }

    #[test]
    fn share_token_extracts_segment_from_full_url() {
        let token =
            ShareToken::parse("http://localhost:5000/assets/public/f00d/").expect("token");
        assert_eq!(token.as_str(), "f00d");

        let token = ShareToken::parse("https://host/assets/public/t0k?x=1").expect("token");
        assert_eq!(token.as_str(), "t0k");
    }

    #[test]
    fn share_token_url_without_segment_is_rejected() {
        assert!(ShareToken::parse("http://localhost:5000/assets/public/").is_none());
    }

    #[test]
    fn canonical_category_uses_last_segment() {
        let asset = Asset::new("1", "chair.glb", "uploads/models");
        assert_eq!(asset.canonical_category(), "models");
        assert!(asset.is_model());
    }

    #[test]
    fn unknown_category_has_no_token() {
        let asset = Asset::new("1", "x.bin", "uploads\\misc");
        assert_eq!(asset.canonical_category(), "misc");
        assert_eq!(asset.category_token(), None);
    }

    #[test]
    fn ownership_requires_matching_non_empty_user() {
        let asset = Asset::new("1", "a.obj", "models").with_owner("u1");
        assert!(asset.is_owned_by(Some(&UserId::new("u1"))));
        assert!(!asset.is_owned_by(Some(&UserId::new("u2"))));
        assert!(!asset.is_owned_by(None));

        let orphan = Asset::new("2", "b.obj", "models");
        assert!(!orphan.is_owned_by(Some(&UserId::new(""))));
    }

    #[test]
    fn payload_debug_hides_bytes() {
        let payload = Payload::new(vec![1, 2, 3]);
        assert_eq!(format!("{payload:?}"), "Payload(3 bytes)");
        assert_eq!(payload.len(), 3);
    }
}
