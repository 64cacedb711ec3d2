// SPDX-License-Identifier: MPL-2.0
//! Top-level messages and runtime flags for the application.

use crate::application::port::{
    AuthToken, CatalogError, Session, UploadOutcome, UploadRequest,
};
use crate::domain::asset::{Asset, AssetId};
use crate::domain::preview::{MountId, PreviewContext};
use crate::error::Error;
use crate::infrastructure::SaveOutcome;
use crate::ui::asset_card;
use crate::ui::auth;
use crate::ui::header;
use crate::ui::notifications;
use crate::ui::share_panel;
use crate::ui::sidebar;
use crate::ui::upload_panel;
use crate::ui::viewer::Loaded;
use std::path::PathBuf;
use std::time::Instant;

/// Top-level messages consumed by `App::update`. The variants forward
/// lower-level component messages while keeping a single update entrypoint.
#[derive(Debug, Clone)]
pub enum Message {
    Auth(auth::Message),
    Header(header::Message),
    Sidebar(sidebar::Message),
    Upload(upload_panel::Message),
    Card(asset_card::Message),
    Share(share_panel::Message),
    Notification(notifications::NotificationMessage),
    /// Periodic tick for the spinner and notification auto-dismiss.
    Tick(Instant),
    LoginCompleted(Result<Session, CatalogError>),
    SignupCompleted(Result<String, CatalogError>),
    /// List completion, tagged with the token the request was issued under.
    AssetsLoaded {
        token: AuthToken,
        result: Result<Vec<Asset>, CatalogError>,
    },
    /// Result from the upload open dialog.
    UploadFileChosen(Option<PathBuf>),
    /// The chosen file was read into a request, or could not be.
    UploadPrepared {
        token: AuthToken,
        result: Result<UploadRequest, Error>,
    },
    UploadCompleted {
        token: AuthToken,
        result: Result<UploadOutcome, CatalogError>,
    },
    DeleteCompleted {
        id: AssetId,
        result: Result<(), CatalogError>,
    },
    SharedAssetResolved(Result<Asset, CatalogError>),
    /// Decoded content for a mounted viewer, tagged with the mount it was
    /// started for.
    PreviewLoaded {
        context: PreviewContext,
        mount: MountId,
        result: Result<Loaded, Error>,
    },
    DownloadCompleted(Result<SaveOutcome, Error>),
}

/// Runtime flags passed in from the CLI to tweak startup behavior.
#[derive(Debug, Clone, Default)]
pub struct Flags {
    /// Optional locale override in BCP-47 form (e.g. `fr`, `en-US`).
    pub lang: Option<String>,
    /// Optional catalog server URL, overriding config and environment.
    pub server: Option<String>,
    /// Optional data directory override (for the session file).
    /// Takes precedence over `ASSET_LENS_DATA_DIR` environment variable.
    pub data_dir: Option<String>,
    /// Optional config directory override (for settings.toml).
    /// Takes precedence over `ASSET_LENS_CONFIG_DIR` environment variable.
    pub config_dir: Option<String>,
    /// Shared-link token (or URL) to resolve on startup.
    pub share_token: Option<String>,
}
