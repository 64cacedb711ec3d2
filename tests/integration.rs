// SPDX-License-Identifier: MPL-2.0
//! End-to-end flows driven through `App::update` against an in-memory
//! catalog. Completion messages are fed directly, the way the runtime would
//! deliver them once a task finishes.

use asset_lens::app::persisted_state::AppState;
use asset_lens::app::{App, Message, Screen};
use asset_lens::application::port::{
    AuthToken, CatalogError, CatalogService, Credentials, DownloadResponse, Session,
    SignupRequest, UploadOutcome, UploadRequest, DUPLICATE_VERSION_MESSAGE,
};
use asset_lens::application::share_link;
use asset_lens::config::{self, Config};
use asset_lens::domain::asset::{Asset, AssetId, CategoryToken, ShareToken, UserId};
use asset_lens::domain::format::DecoderKind;
use asset_lens::domain::preview::PreviewContext;
use asset_lens::error::Error;
use asset_lens::i18n::fluent::I18n;
use asset_lens::scene::DecodeError;
use asset_lens::ui::viewer::{self, Content, Loaded, PayloadSource, Plan};
use asset_lens::ui::{asset_card, header, share_panel, sidebar};
use async_trait::async_trait;
use futures_util::StreamExt;
use std::path::Path;
use std::sync::Arc;
use tempfile::tempdir;

const TRIANGLE_STL: &str = "solid t\n\
    facet normal 0 0 1\nouter loop\n\
    vertex 0 0 0\nvertex 1 0 0\nvertex 0 1 0\n\
    endloop\nendfacet\nendsolid t\n";

#[derive(Default)]
struct FakeCatalog {
    assets: Vec<Asset>,
    shared: Option<Asset>,
}

#[async_trait]
impl CatalogService for FakeCatalog {
    async fn list_assets(&self, _auth: &AuthToken) -> Result<Vec<Asset>, CatalogError> {
        Ok(self.assets.clone())
    }

    async fn resolve_public_asset(&self, token: &ShareToken) -> Result<Asset, CatalogError> {
        match &self.shared {
            Some(asset) if asset.share_token.as_ref() == Some(token) => Ok(asset.clone()),
            _ => Err(CatalogError::NotFound),
        }
    }

    async fn upload_asset(
        &self,
        _auth: &AuthToken,
        request: UploadRequest,
    ) -> Result<UploadOutcome, CatalogError> {
        Ok(UploadOutcome::Created(Asset::new(
            "new",
            request.file_name,
            request.category.as_str(),
        )))
    }

    async fn delete_asset(&self, _auth: &AuthToken, _id: &AssetId) -> Result<(), CatalogError> {
        Ok(())
    }

    async fn download_asset(
        &self,
        _auth: Option<&AuthToken>,
        _id: &AssetId,
    ) -> Result<DownloadResponse, CatalogError> {
        let chunks: Vec<Result<Vec<u8>, CatalogError>> = vec![Ok(TRIANGLE_STL.as_bytes().to_vec())];
        Ok(DownloadResponse {
            content_disposition: Some("attachment; filename=\"tri.stl\"".into()),
            content_type: Some("model/stl".into()),
            body: futures_util::stream::iter(chunks).boxed(),
        })
    }

    async fn login(&self, credentials: &Credentials) -> Result<Session, CatalogError> {
        Ok(session_for(&credentials.username))
    }

    async fn signup(&self, _request: &SignupRequest) -> Result<String, CatalogError> {
        Ok("User registered".into())
    }

    fn share_url(&self, token: &ShareToken) -> String {
        format!("http://catalog.test/assets/public/{}", token.as_str())
    }
}

fn session_for(username: &str) -> Session {
    Session {
        token: token_for(username),
        user_id: UserId::new("u-1"),
        username: username.to_string(),
    }
}

fn token_for(username: &str) -> AuthToken {
    AuthToken::new(format!("jwt-{username}"))
}

fn catalog_assets() -> Vec<Asset> {
    vec![
        Asset::new("m1", "chair.stl", "uploads/models").with_owner("u-1"),
        Asset::new("m2", "table.glb", "uploads/models").with_owner("u-2"),
        Asset::new("t1", "brick.png", "uploads/textures").with_owner("u-1"),
    ]
}

fn shared_model() -> Asset {
    let mut asset = Asset::new("s1", "tri.stl", "uploads/models")
        .with_owner("u-9")
        .with_payload(TRIANGLE_STL.as_bytes().to_vec());
    asset.share_token = ShareToken::parse("tok-1");
    asset
}

fn app_in(dir: &Path) -> App {
    App::with_service(Arc::new(FakeCatalog::default()), Config::default())
        .with_data_dir(dir.to_path_buf())
}

/// Signs in and loads the default catalog.
fn signed_in_app(dir: &Path) -> App {
    let mut app = app_in(dir);
    let _ = app.update(Message::LoginCompleted(Ok(session_for("ana"))));
    let _ = app.update(Message::AssetsLoaded {
        token: token_for("ana"),
        result: Ok(catalog_assets()),
    });
    app
}

fn toggle(app: &mut App, id: &str) {
    let _ = app.update(Message::Card(asset_card::Message::TogglePreview(AssetId::new(
        id,
    ))));
}

fn notification_keys(app: &App) -> Vec<String> {
    app.notifications()
        .visible()
        .map(|n| n.message_key().to_string())
        .collect()
}

#[test]
fn login_enters_catalog_and_persists_session() {
    let dir = tempdir().expect("temp dir");
    let mut app = app_in(dir.path());
    assert_eq!(app.screen(), Screen::Auth);

    let _ = app.update(Message::LoginCompleted(Ok(session_for("ana"))));

    assert_eq!(app.screen(), Screen::Catalog);
    assert_eq!(app.session().map(|s| s.username.as_str()), Some("ana"));
    // The list request started by the login is still in flight
    assert!(app.is_busy());

    let (stored, warning) = AppState::load_from(Some(dir.path().to_path_buf()));
    assert!(warning.is_none());
    assert_eq!(stored.session(), Some(session_for("ana")));
}

#[test]
fn failed_login_stays_on_auth_screen() {
    let dir = tempdir().expect("temp dir");
    let mut app = app_in(dir.path());

    let _ = app.update(Message::LoginCompleted(Err(CatalogError::Service(
        "Invalid credentials".into(),
    ))));

    assert_eq!(app.screen(), Screen::Auth);
    assert!(app.session().is_none());
    assert!(!app.is_busy());
    assert_eq!(notification_keys(&app), vec!["notification-auth-failed"]);
}

#[test]
fn list_completion_fills_grid_and_category_filter_applies() {
    let dir = tempdir().expect("temp dir");
    let mut app = signed_in_app(dir.path());

    assert!(!app.is_busy());
    assert_eq!(app.grid().assets().len(), 3);
    assert_eq!(app.grid().active_category(), CategoryToken::Models);
    assert_eq!(app.grid().visible().count(), 2);

    let _ = app.update(Message::Sidebar(sidebar::Message::Select(
        CategoryToken::Textures,
    )));
    let visible: Vec<_> = app.grid().visible().map(|a| a.id.as_str()).collect();
    assert_eq!(visible, vec!["t1"]);
}

#[test]
fn failed_list_keeps_previous_collection() {
    let dir = tempdir().expect("temp dir");
    let mut app = signed_in_app(dir.path());

    let _ = app.update(Message::Header(header::Message::Refresh));
    let _ = app.update(Message::AssetsLoaded {
        token: token_for("ana"),
        result: Err(CatalogError::Network("offline".into())),
    });

    assert_eq!(app.grid().assets().len(), 3);
    assert!(notification_keys(&app).contains(&"notification-network-error".to_string()));
}

#[test]
fn expanding_another_card_replaces_the_mounted_viewer() {
    let dir = tempdir().expect("temp dir");
    let mut app = signed_in_app(dir.path());

    toggle(&mut app, "m1");
    let first = app.grid_pane().expect("pane mounted");
    assert_eq!(first.asset().as_str(), "m1");
    assert!(first.is_pending());
    let stale_mount = first.mount();

    toggle(&mut app, "m2");
    let second = app.grid_pane().expect("pane mounted");
    assert_eq!(second.asset().as_str(), "m2");
    assert_ne!(second.mount(), stale_mount);

    // A result for the torn-down viewer must not reach the new one
    let _ = app.update(Message::PreviewLoaded {
        context: PreviewContext::Grid,
        mount: stale_mount,
        result: Err(Error::NotFound),
    });
    let second = app.grid_pane().expect("pane mounted");
    assert!(second.is_pending());
    assert!(!second.is_failed());

    toggle(&mut app, "m2");
    assert!(app.grid_pane().is_none());
}

#[test]
fn delete_completion_removes_the_expanded_asset() {
    let dir = tempdir().expect("temp dir");
    let mut app = signed_in_app(dir.path());
    toggle(&mut app, "m1");

    let _ = app.update(Message::DeleteCompleted {
        id: AssetId::new("m1"),
        result: Ok(()),
    });

    assert!(app.grid().get(&AssetId::new("m1")).is_none());
    assert!(app.grid_pane().is_none());
    assert!(notification_keys(&app).contains(&"notification-delete-success".to_string()));
}

#[test]
fn failed_delete_keeps_asset_and_expansion() {
    let dir = tempdir().expect("temp dir");
    let mut app = signed_in_app(dir.path());
    toggle(&mut app, "m1");

    let _ = app.update(Message::DeleteCompleted {
        id: AssetId::new("m1"),
        result: Err(CatalogError::Service("Forbidden".into())),
    });

    assert!(app.grid().get(&AssetId::new("m1")).is_some());
    assert!(app.grid_pane().is_some());
}

#[test]
fn duplicate_upload_appends_nothing() {
    let dir = tempdir().expect("temp dir");
    let mut app = signed_in_app(dir.path());

    let _ = app.update(Message::UploadCompleted {
        token: token_for("ana"),
        result: Ok(UploadOutcome::DuplicateVersion(
            DUPLICATE_VERSION_MESSAGE.to_string(),
        )),
    });
    assert_eq!(app.grid().assets().len(), 3);
    assert!(notification_keys(&app).contains(&"notification-upload-duplicate".to_string()));

    let _ = app.update(Message::UploadCompleted {
        token: token_for("ana"),
        result: Ok(UploadOutcome::Created(Asset::new(
            "m3",
            "lamp.obj",
            "uploads/models",
        ))),
    });
    assert_eq!(app.grid().assets().len(), 4);
}

#[test]
fn blank_share_input_issues_no_request() {
    let dir = tempdir().expect("temp dir");
    let mut app = app_in(dir.path());

    let _ = app.update(Message::Share(share_panel::Message::InputChanged("   ".into())));
    let _ = app.update(Message::Share(share_panel::Message::Resolve));

    assert!(app.share().preview().is_none());
    assert_eq!(notification_keys(&app), vec!["notification-share-token-empty"]);
}

#[test]
fn logout_clears_grid_but_keeps_shared_preview() {
    let dir = tempdir().expect("temp dir");
    let mut app = signed_in_app(dir.path());
    let _ = app.update(Message::SharedAssetResolved(Ok(shared_model())));
    toggle(&mut app, "m1");

    let _ = app.update(Message::Header(header::Message::Logout));

    assert_eq!(app.screen(), Screen::Auth);
    assert!(app.session().is_none());
    assert!(app.grid().assets().is_empty());
    assert!(app.grid_pane().is_none());
    assert_eq!(app.share().preview().map(|a| a.id.as_str()), Some("s1"));

    let (stored, _) = AppState::load_from(Some(dir.path().to_path_buf()));
    assert!(stored.session().is_none());
}

#[test]
fn completions_from_a_previous_session_are_dropped() {
    let dir = tempdir().expect("temp dir");
    let mut app = signed_in_app(dir.path());

    let _ = app.update(Message::Header(header::Message::Refresh));
    let _ = app.update(Message::Header(header::Message::Logout));
    let _ = app.update(Message::AssetsLoaded {
        token: token_for("ana"),
        result: Ok(catalog_assets()),
    });
    let _ = app.update(Message::UploadCompleted {
        token: token_for("ana"),
        result: Ok(UploadOutcome::Created(Asset::new(
            "m3",
            "lamp.obj",
            "uploads/models",
        ))),
    });

    assert_eq!(app.screen(), Screen::Auth);
    assert!(app.grid().assets().is_empty());
    assert!(!app.is_busy());

    // Another user signs in; their own list fails
    let _ = app.update(Message::LoginCompleted(Ok(session_for("bo"))));
    let _ = app.update(Message::AssetsLoaded {
        token: token_for("ana"),
        result: Ok(catalog_assets()),
    });
    let _ = app.update(Message::AssetsLoaded {
        token: token_for("bo"),
        result: Err(CatalogError::Network("offline".into())),
    });

    assert!(app.grid().assets().is_empty());
    assert!(!app.is_busy());
}

#[tokio::test]
async fn grid_failure_does_not_affect_shared_link_viewer() {
    let dir = tempdir().expect("temp dir");
    let mut app = signed_in_app(dir.path());

    let catalog: Arc<dyn CatalogService> = Arc::new(FakeCatalog {
        shared: Some(shared_model()),
        ..FakeCatalog::default()
    });
    let token = ShareToken::parse("http://catalog.test/assets/public/tok-1").expect("token");
    let resolved = share_link::resolve(Arc::clone(&catalog), token).await;
    let _ = app.update(Message::SharedAssetResolved(resolved));
    assert!(app.share().offers_model_view());

    let _ = app.update(Message::Share(share_panel::Message::ToggleModel));
    toggle(&mut app, "m2");

    let grid_mount = app.grid_pane().expect("grid pane").mount();
    let _ = app.update(Message::PreviewLoaded {
        context: PreviewContext::Grid,
        mount: grid_mount,
        result: Err(Error::Decode(DecodeError::Malformed("truncated".into()))),
    });

    let share_mount = app.share_pane().expect("share pane").mount();
    let bytes: Arc<[u8]> = Arc::from(TRIANGLE_STL.as_bytes().to_vec());
    let loaded = viewer::load(
        PayloadSource::Embedded(bytes),
        Plan::Model(DecoderKind::RawGeometry),
    )
    .await;
    let _ = app.update(Message::PreviewLoaded {
        context: PreviewContext::SharedLink,
        mount: share_mount,
        result: loaded,
    });

    let grid = app.grid_pane().expect("grid pane");
    assert!(grid.is_failed());
    assert_eq!(grid.path().as_str(), "grid/preview[m2]/model-viewer");

    let shared = app.share_pane().expect("share pane");
    assert!(!shared.is_failed());
    assert!(matches!(
        shared.content().get(),
        Some(Content::Ready(Loaded::Model(_)))
    ));
}

#[tokio::test]
async fn unknown_share_token_leaves_previous_preview() {
    let dir = tempdir().expect("temp dir");
    let mut app = app_in(dir.path());
    let _ = app.update(Message::SharedAssetResolved(Ok(shared_model())));

    let catalog: Arc<dyn CatalogService> = Arc::new(FakeCatalog::default());
    let token = ShareToken::parse("missing").expect("token");
    let resolved = share_link::resolve(catalog, token).await;
    let _ = app.update(Message::SharedAssetResolved(resolved));

    assert_eq!(app.share().preview().map(|a| a.id.as_str()), Some("s1"));
    assert!(notification_keys(&app).contains(&"notification-not-found".to_string()));
}

#[tokio::test]
async fn remote_payload_is_fetched_when_none_is_embedded() {
    let catalog: Arc<dyn CatalogService> = Arc::new(FakeCatalog::default());
    let asset = Asset::new("m1", "chair.stl", "uploads/models");
    let source = PayloadSource::for_asset(&asset, catalog, Some(AuthToken::new("jwt")))
        .expect("remote source");

    let loaded = viewer::load(source, Plan::for_asset(&asset))
        .await
        .expect("loaded");
    assert!(matches!(loaded, Loaded::Model(_)));
}

#[test]
fn signed_out_shared_model_without_payload_shows_missing_data() {
    let dir = tempdir().expect("temp dir");
    let mut app = app_in(dir.path());
    let mut bare = Asset::new("s2", "tri.stl", "uploads/models");
    bare.share_token = ShareToken::parse("tok-2");

    let _ = app.update(Message::SharedAssetResolved(Ok(bare.clone())));
    let _ = app.update(Message::Share(share_panel::Message::ToggleModel));

    let pane = app.share_pane().expect("share pane");
    assert!(!pane.is_pending());
    assert!(!pane.is_failed());
    assert!(matches!(pane.content().get(), Some(Content::MissingData)));

    let catalog: Arc<dyn CatalogService> = Arc::new(FakeCatalog::default());
    assert!(PayloadSource::for_asset(&bare, catalog, None).is_none());
}

#[test]
fn config_round_trips_through_settings_file() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("settings.toml");

    let mut written = Config::default();
    written.general.language = Some("fr".to_string());
    written.viewer.default_category = CategoryToken::Textures;
    config::save_to_path(&written, &path).expect("save config");

    let loaded = config::load_from_path(&path).expect("load config");
    assert_eq!(loaded.general.language.as_deref(), Some("fr"));
    assert_eq!(loaded.viewer.default_category, CategoryToken::Textures);

    let i18n = I18n::new(None, &loaded);
    assert_eq!(i18n.tr("share-load-model"), "Charger le modèle");
}

#[test]
fn broken_settings_file_falls_back_to_defaults() {
    let dir = tempdir().expect("temp dir");
    std::fs::write(dir.path().join("settings.toml"), "not = [valid").expect("write");

    let (loaded, warning) = config::load_with_override(Some(dir.path().to_path_buf()));
    assert_eq!(loaded.viewer.default_category, CategoryToken::Models);
    assert_eq!(warning.as_deref(), Some("notification-config-load-error"));
}
