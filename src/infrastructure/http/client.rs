// SPDX-License-Identifier: MPL-2.0
//! `reqwest` implementation of [`CatalogService`].

use super::dto::{
    AssetDto, LoginBody, LoginResponse, MessageBody, SignupBody, UploadResponse,
};
use crate::application::port::{
    AuthToken, CatalogError, CatalogService, Credentials, DownloadResponse, Session,
    SignupRequest, UploadOutcome, UploadRequest,
};
use crate::domain::asset::{Asset, AssetId, ShareToken};
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::header::{HeaderName, CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::time::Duration;

const USER_AGENT: &str = concat!("AssetLens/", env!("CARGO_PKG_VERSION"));

/// Catalog adapter speaking the service's JSON/HTTP protocol.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: Client,
    base_url: String,
}

impl HttpCatalog {
    /// Builds a client for `base_url` (trailing slashes ignored).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::Network(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, CatalogError> {
        let response = request.send().await.map_err(|e| {
            log::warn!("catalog request failed: {e}");
            CatalogError::Network(e.to_string())
        })?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let error = error_from_body(status, &body);
        log::warn!("catalog responded {status}: {error}");
        Err(error)
    }

    async fn json<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, CatalogError> {
        response
            .json::<T>()
            .await
            .map_err(|e| CatalogError::InvalidResponse(e.to_string()))
    }
}

/// Maps a non-success response to a catalog error.
///
/// 404 is always [`CatalogError::NotFound`]. Otherwise a `{ "message": ... }`
/// payload is surfaced verbatim; anything else reports the status.
pub(crate) fn error_from_body(status: StatusCode, body: &str) -> CatalogError {
    if status == StatusCode::NOT_FOUND {
        return CatalogError::NotFound;
    }
    match serde_json::from_str::<MessageBody>(body).ok().and_then(MessageBody::into_text) {
        Some(message) => CatalogError::Service(message),
        None => CatalogError::Network(format!("HTTP status: {status}")),
    }
}

#[async_trait]
impl CatalogService for HttpCatalog {
    async fn list_assets(&self, auth: &AuthToken) -> Result<Vec<Asset>, CatalogError> {
        let request = self.client.get(self.url("/assets")).bearer_auth(auth.as_str());
        let records: Vec<AssetDto> = Self::json(self.send(request).await?).await?;
        records.into_iter().map(AssetDto::into_asset).collect()
    }

    async fn resolve_public_asset(&self, token: &ShareToken) -> Result<Asset, CatalogError> {
        let request = self
            .client
            .get(self.url(&format!("/assets/public/{}", token.as_str())));
        let record: AssetDto = Self::json(self.send(request).await?).await?;
        record.into_asset()
    }

    async fn upload_asset(
        &self,
        auth: &AuthToken,
        request: UploadRequest,
    ) -> Result<UploadOutcome, CatalogError> {
        let UploadRequest {
            file_name,
            bytes,
            category,
            is_public,
        } = request;
        let form = Form::new()
            .part("file", Part::bytes(bytes).file_name(file_name))
            .text("isPublic", is_public.to_string())
            .text("category", category.as_str().to_string());
        let request = self
            .client
            .post(self.url("/upload"))
            .bearer_auth(auth.as_str())
            .multipart(form);

        let response: UploadResponse = Self::json(self.send(request).await?).await?;
        let asset = response.asset.map(AssetDto::into_asset).transpose()?;
        UploadOutcome::from_response(response.message, asset)
    }

    async fn delete_asset(&self, auth: &AuthToken, id: &AssetId) -> Result<(), CatalogError> {
        let request = self
            .client
            .delete(self.url(&format!("/assets/{}", id.as_str())))
            .bearer_auth(auth.as_str());
        self.send(request).await?;
        Ok(())
    }

    async fn download_asset(
        &self,
        auth: Option<&AuthToken>,
        id: &AssetId,
    ) -> Result<DownloadResponse, CatalogError> {
        let mut request = self.client.get(self.url(&format!("/download/{}", id.as_str())));
        if let Some(auth) = auth {
            request = request.bearer_auth(auth.as_str());
        }
        let response = self.send(request).await?;

        let header = |name: HeaderName| {
            response
                .headers()
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        };
        let content_disposition = header(CONTENT_DISPOSITION);
        let content_type = header(CONTENT_TYPE);
        let body = response
            .bytes_stream()
            .map(|chunk| {
                chunk
                    .map(|bytes| bytes.to_vec())
                    .map_err(|e| CatalogError::Network(e.to_string()))
            })
            .boxed();

        Ok(DownloadResponse {
            content_disposition,
            content_type,
            body,
        })
    }

    async fn login(&self, credentials: &Credentials) -> Result<Session, CatalogError> {
        let request = self.client.post(self.url("/login")).json(&LoginBody {
            username: &credentials.username,
            password: &credentials.password,
        });
        let response: LoginResponse = Self::json(self.send(request).await?).await?;
        Ok(response.into_session(&credentials.username))
    }

    async fn signup(&self, request: &SignupRequest) -> Result<String, CatalogError> {
        let request = self.client.post(self.url("/signup")).json(&SignupBody {
            username: &request.username,
            email: &request.email,
            password: &request.password,
        });
        let body: MessageBody = Self::json(self.send(request).await?).await?;
        Ok(body.into_text().unwrap_or_default())
    }

    fn share_url(&self, token: &ShareToken) -> String {
        self.url(&format!("/assets/public/{}", token.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> HttpCatalog {
        HttpCatalog::new("http://localhost:5000/", Duration::from_secs(5)).expect("client")
    }

    #[test]
    fn base_url_drops_trailing_slash() {
        assert_eq!(catalog().base_url(), "http://localhost:5000");
    }

    #[test]
    fn share_url_points_at_public_route() {
        let token = ShareToken::parse("abc").expect("token");
        assert_eq!(
            catalog().share_url(&token),
            "http://localhost:5000/assets/public/abc"
        );
    }

    #[test]
    fn not_found_wins_over_payload() {
        let error = error_from_body(StatusCode::NOT_FOUND, r#"{"message": "gone"}"#);
        assert_eq!(error, CatalogError::NotFound);
    }

    #[test]
    fn service_message_is_verbatim() {
        let error = error_from_body(StatusCode::UNAUTHORIZED, r#"{"message": "Invalid token"}"#);
        assert_eq!(error, CatalogError::Service("Invalid token".into()));
    }

    #[test]
    fn unknown_error_body_reports_status() {
        let error = error_from_body(StatusCode::BAD_GATEWAY, "<html>");
        assert!(matches!(error, CatalogError::Network(msg) if msg.contains("502")));
    }
}
