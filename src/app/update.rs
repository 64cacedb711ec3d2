// SPDX-License-Identifier: MPL-2.0
//! Update logic and message handlers for the application.
//!
//! This module contains the main `update` function and all specialized
//! message handlers. Every catalog request runs as a `Task` and comes back as
//! a completion message; the collection and the preview controllers are only
//! touched when a completion arrives.

use super::persisted_state::AppState;
use super::{Message, Screen};
use crate::application::grid::{CatalogGrid, UploadApplied};
use crate::application::port::{
    AuthToken, CatalogError, CatalogService, Session, UploadOutcome, UploadRequest,
};
use crate::application::share_link::{self, ShareLinkResolver};
use crate::domain::asset::{Asset, AssetId, CategoryToken};
use crate::domain::preview::{Mount, MountId, PreviewContext, Transition};
use crate::error::{Error, Result, ValidationError};
use crate::infrastructure::{save_download, SaveOutcome};
use crate::ui::notifications::{self, Notification};
use crate::ui::viewer::{self, Loaded, Pane, PayloadSource};
use crate::ui::widgets::animated_spinner;
use crate::ui::{asset_card, auth, header, share_panel, sidebar, upload_panel};
use iced::Task;
use std::path::PathBuf;
use std::sync::Arc;

/// Context for update operations containing mutable references to app state.
pub struct UpdateContext<'a> {
    pub screen: &'a mut Screen,
    pub service: &'a Arc<dyn CatalogService>,
    pub session: &'a mut Option<Session>,
    pub persisted: &'a mut AppState,
    pub data_dir: Option<&'a PathBuf>,
    pub grid: &'a mut CatalogGrid,
    pub grid_pane: &'a mut Option<Pane>,
    pub share: &'a mut ShareLinkResolver,
    pub share_pane: &'a mut Option<Pane>,
    pub share_input: &'a mut String,
    pub auth: &'a mut auth::State,
    pub upload: &'a mut upload_panel::State,
    pub pending_delete: &'a mut Option<AssetId>,
    pub in_flight: &'a mut usize,
    pub spinner_rotation: &'a mut f32,
    pub notifications: &'a mut notifications::Manager,
}

impl UpdateContext<'_> {
    fn notify_error(&mut self, error: &Error) {
        self.notifications.push(Notification::from_error(error));
    }

    fn begin_request(&mut self) {
        *self.in_flight += 1;
    }

    fn end_request(&mut self) {
        *self.in_flight = self.in_flight.saturating_sub(1);
    }

    fn auth_token(&self) -> Option<AuthToken> {
        self.session.as_ref().map(|session| session.token.clone())
    }

    /// Returns the session token, or reports that the action needs one.
    fn require_token(&mut self) -> Option<AuthToken> {
        let token = self.auth_token();
        if token.is_none() {
            self.notifications
                .push(Notification::warning("notification-not-signed-in"));
        }
        token
    }

    /// Whether `token` still belongs to the signed-in session.
    fn is_current(&self, token: &AuthToken) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| &session.token == token)
    }

    fn save_state(&mut self) {
        if let Some(key) = self.persisted.save_to(self.data_dir.cloned()) {
            self.notifications.push(Notification::warning(&key));
        }
    }

    fn has_pending_preview(&self) -> bool {
        self.grid_pane.as_ref().is_some_and(Pane::is_pending)
            || self.share_pane.as_ref().is_some_and(Pane::is_pending)
    }
}

/// Routes a top-level message to its handler.
pub fn update(ctx: &mut UpdateContext<'_>, message: Message) -> Task<Message> {
    match message {
        Message::Auth(message) => handle_auth_message(ctx, message),
        Message::Header(message) => handle_header_message(ctx, message),
        Message::Sidebar(message) => handle_sidebar_message(ctx, message),
        Message::Upload(message) => handle_upload_message(ctx, message),
        Message::Card(message) => handle_card_message(ctx, message),
        Message::Share(message) => handle_share_message(ctx, message),
        Message::Notification(message) => {
            ctx.notifications.handle_message(&message);
            Task::none()
        }
        Message::Tick(_) => {
            ctx.notifications.tick();
            if *ctx.in_flight > 0 || ctx.has_pending_preview() {
                *ctx.spinner_rotation = animated_spinner::advance(*ctx.spinner_rotation);
            }
            Task::none()
        }
        Message::LoginCompleted(result) => handle_login_completed(ctx, result),
        Message::SignupCompleted(result) => handle_signup_completed(ctx, result),
        Message::AssetsLoaded { token, result } => handle_assets_loaded(ctx, &token, result),
        Message::UploadFileChosen(path) => handle_upload_file_chosen(ctx, path),
        Message::UploadPrepared { token, result } => handle_upload_prepared(ctx, token, result),
        Message::UploadCompleted { token, result } => {
            handle_upload_completed(ctx, &token, result)
        }
        Message::DeleteCompleted { id, result } => handle_delete_completed(ctx, &id, result),
        Message::SharedAssetResolved(result) => handle_shared_asset_resolved(ctx, result),
        Message::PreviewLoaded {
            context,
            mount,
            result,
        } => handle_preview_loaded(ctx, context, mount, result),
        Message::DownloadCompleted(result) => handle_download_completed(ctx, result),
    }
}

// =============================================================================
// Authentication
// =============================================================================

fn handle_auth_message(ctx: &mut UpdateContext<'_>, message: auth::Message) -> Task<Message> {
    match auth::update(message, ctx.auth) {
        auth::Event::None => Task::none(),
        auth::Event::Invalid(err) => {
            ctx.notify_error(&Error::Validation(err));
            Task::none()
        }
        auth::Event::Login(credentials) => {
            ctx.begin_request();
            let service = Arc::clone(ctx.service);
            Task::perform(
                async move { service.login(&credentials).await },
                Message::LoginCompleted,
            )
        }
        auth::Event::Signup(request) => {
            ctx.begin_request();
            let service = Arc::clone(ctx.service);
            Task::perform(
                async move { service.signup(&request).await },
                Message::SignupCompleted,
            )
        }
    }
}

fn handle_login_completed(
    ctx: &mut UpdateContext<'_>,
    result: std::result::Result<Session, CatalogError>,
) -> Task<Message> {
    ctx.end_request();
    match result {
        Ok(session) => {
            log::info!("signed in as {}", session.username);
            ctx.auth.clear_password();
            ctx.persisted.set_session(&session);
            ctx.save_state();
            *ctx.session = Some(session);
            *ctx.screen = Screen::Catalog;
            // Earlier failures no longer apply
            ctx.notifications.dismiss_with_prefix("notification-auth");
            ctx.notifications
                .push(Notification::success("notification-login-success"));
            refresh_assets(ctx)
        }
        Err(err) => {
            report_auth_failure(ctx, &err);
            Task::none()
        }
    }
}

fn handle_signup_completed(
    ctx: &mut UpdateContext<'_>,
    result: std::result::Result<String, CatalogError>,
) -> Task<Message> {
    ctx.end_request();
    match result {
        Ok(message) => {
            ctx.auth.signup_completed();
            ctx.notifications.dismiss_with_prefix("notification-auth");
            ctx.notifications.push(
                Notification::success("notification-signup-success").with_arg("detail", message),
            );
        }
        Err(err) => report_auth_failure(ctx, &err),
    }
    Task::none()
}

fn report_auth_failure(ctx: &mut UpdateContext<'_>, err: &CatalogError) {
    log::warn!("authentication failed: {err}");
    ctx.notifications
        .push(Notification::error("notification-auth-failed").with_arg("detail", err.to_string()));
}

fn handle_header_message(ctx: &mut UpdateContext<'_>, message: header::Message) -> Task<Message> {
    match header::update(message) {
        header::Event::Refresh => refresh_assets(ctx),
        header::Event::Logout => {
            log::info!("signing out");
            ctx.persisted.clear_session();
            ctx.save_state();
            *ctx.session = None;
            let transition = ctx.grid.clear();
            unmount(PreviewContext::Grid, ctx.grid_pane, &transition);
            *ctx.pending_delete = None;
            ctx.upload.reset();
            *ctx.screen = Screen::Auth;
            ctx.notifications
                .push(Notification::info("notification-logged-out"));
            Task::none()
        }
    }
}

// =============================================================================
// Catalog grid
// =============================================================================

fn refresh_assets(ctx: &mut UpdateContext<'_>) -> Task<Message> {
    let Some(token) = ctx.require_token() else {
        return Task::none();
    };
    ctx.begin_request();
    let service = Arc::clone(ctx.service);
    let issued = token.clone();
    Task::perform(
        async move { service.list_assets(&issued).await },
        move |result| Message::AssetsLoaded { token, result },
    )
}

fn handle_assets_loaded(
    ctx: &mut UpdateContext<'_>,
    token: &AuthToken,
    result: std::result::Result<Vec<Asset>, CatalogError>,
) -> Task<Message> {
    ctx.end_request();
    if !ctx.is_current(token) {
        log::debug!("dropping asset list issued under a previous session");
        return Task::none();
    }
    match ctx.grid.apply_list(result) {
        Ok(transition) => {
            // Confirmation targets may be gone from the new collection
            *ctx.pending_delete = None;
            apply_grid_transition(ctx, &transition)
        }
        Err(err) => {
            ctx.notify_error(&err);
            Task::none()
        }
    }
}

fn handle_sidebar_message(ctx: &mut UpdateContext<'_>, message: sidebar::Message) -> Task<Message> {
    if let sidebar::Event::CategorySelected(category) =
        sidebar::update(message, ctx.grid.active_category())
    {
        log::debug!("category filter: {category}");
        ctx.grid.select_category(category);
    }
    Task::none()
}

fn handle_card_message(ctx: &mut UpdateContext<'_>, message: asset_card::Message) -> Task<Message> {
    match message {
        asset_card::Message::TogglePreview(id) => {
            let transition = ctx.grid.toggle(id);
            apply_grid_transition(ctx, &transition)
        }
        asset_card::Message::Download(id) => {
            let auth = ctx.auth_token();
            start_download(ctx, auth, id)
        }
        asset_card::Message::CopyShareLink(id) => {
            let url = ctx.grid.get(&id).and_then(|asset| {
                asset
                    .share_token
                    .as_ref()
                    .map(|token| ctx.service.share_url(token))
            });
            copy_link(ctx, url)
        }
        asset_card::Message::RequestDelete(id) => {
            *ctx.pending_delete = Some(id);
            Task::none()
        }
        asset_card::Message::CancelDelete => {
            *ctx.pending_delete = None;
            Task::none()
        }
        asset_card::Message::ConfirmDelete(id) => {
            *ctx.pending_delete = None;
            let user = ctx.session.as_ref().map(|session| session.user_id.clone());
            let owned = ctx
                .grid
                .get(&id)
                .is_some_and(|asset| asset.is_owned_by(user.as_ref()));
            if !owned {
                log::warn!("refusing to delete asset {id} not owned by the current user");
                return Task::none();
            }
            let Some(token) = ctx.require_token() else {
                return Task::none();
            };
            let service = Arc::clone(ctx.service);
            let request_id = id.clone();
            Task::perform(
                async move { service.delete_asset(&token, &request_id).await },
                move |result| Message::DeleteCompleted {
                    id: id.clone(),
                    result,
                },
            )
        }
    }
}

fn handle_delete_completed(
    ctx: &mut UpdateContext<'_>,
    id: &AssetId,
    result: std::result::Result<(), CatalogError>,
) -> Task<Message> {
    match ctx.grid.apply_delete(id, result) {
        Ok(transition) => {
            ctx.notifications
                .push(Notification::success("notification-delete-success"));
            apply_grid_transition(ctx, &transition)
        }
        Err(err) => {
            ctx.notify_error(&err);
            Task::none()
        }
    }
}

// =============================================================================
// Upload
// =============================================================================

fn handle_upload_message(
    ctx: &mut UpdateContext<'_>,
    message: upload_panel::Message,
) -> Task<Message> {
    match upload_panel::update(message, ctx.upload) {
        upload_panel::Event::None => Task::none(),
        upload_panel::Event::Invalid(err) => {
            ctx.notify_error(&Error::Validation(err));
            Task::none()
        }
        upload_panel::Event::ChooseFile => {
            handle_open_file_dialog(ctx.persisted.last_open_directory.clone())
        }
        upload_panel::Event::Upload { path, is_public } => {
            let Some(token) = ctx.require_token() else {
                return Task::none();
            };
            ctx.begin_request();
            let category = ctx.grid.active_category();
            Task::perform(read_upload(path, category, is_public), move |result| {
                Message::UploadPrepared { token, result }
            })
        }
    }
}

/// Opens the native file dialog for the upload panel.
pub fn handle_open_file_dialog(last_directory: Option<PathBuf>) -> Task<Message> {
    Task::perform(
        async move {
            let mut dialog = rfd::AsyncFileDialog::new();

            if let Some(dir) = last_directory {
                if dir.exists() {
                    dialog = dialog.set_directory(&dir);
                }
            }

            dialog.pick_file().await.map(|h| h.path().to_path_buf())
        },
        Message::UploadFileChosen,
    )
}

fn handle_upload_file_chosen(ctx: &mut UpdateContext<'_>, path: Option<PathBuf>) -> Task<Message> {
    let Some(path) = path else {
        // User cancelled the dialog
        return Task::none();
    };
    ctx.persisted.set_last_open_directory_from_file(&path);
    ctx.save_state();
    ctx.upload.set_file(path);
    Task::none()
}

/// Reads the chosen file into a request.
async fn read_upload(path: PathBuf, category: CategoryToken, is_public: bool) -> Result<UploadRequest> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or(Error::Validation(ValidationError::MissingFile))?;
    let bytes = tokio::fs::read(&path).await?;
    log::debug!("read {} bytes from {}", bytes.len(), path.display());
    Ok(UploadRequest {
        file_name,
        bytes,
        category,
        is_public,
    })
}

fn handle_upload_prepared(
    ctx: &mut UpdateContext<'_>,
    token: AuthToken,
    result: Result<UploadRequest>,
) -> Task<Message> {
    // Signed out while the file was being read
    if !ctx.is_current(&token) {
        ctx.end_request();
        log::debug!("dropping upload prepared under a previous session");
        return Task::none();
    }
    let request = match result {
        Ok(request) => request,
        Err(err) => {
            ctx.end_request();
            ctx.notify_error(&err);
            return Task::none();
        }
    };
    let service = Arc::clone(ctx.service);
    let issued = token.clone();
    Task::perform(
        async move { service.upload_asset(&issued, request).await },
        move |result| Message::UploadCompleted { token, result },
    )
}

fn handle_upload_completed(
    ctx: &mut UpdateContext<'_>,
    token: &AuthToken,
    result: std::result::Result<UploadOutcome, CatalogError>,
) -> Task<Message> {
    ctx.end_request();
    if !ctx.is_current(token) {
        log::debug!("dropping upload completed under a previous session");
        return Task::none();
    }
    match ctx.grid.apply_upload(result) {
        Ok(UploadApplied::Appended(id)) => {
            log::info!("uploaded asset {id}");
            ctx.upload.reset();
            ctx.notifications
                .push(Notification::success("notification-upload-success"));
        }
        Ok(UploadApplied::Duplicate(message)) => {
            ctx.notifications.push(
                Notification::info("notification-upload-duplicate").with_arg("detail", message),
            );
        }
        Err(err) => ctx.notify_error(&err),
    }
    Task::none()
}

// =============================================================================
// Shared link
// =============================================================================

fn handle_share_message(ctx: &mut UpdateContext<'_>, message: share_panel::Message) -> Task<Message> {
    match share_panel::update(message, ctx.share_input) {
        share_panel::Event::None => Task::none(),
        share_panel::Event::Invalid(err) => {
            ctx.notify_error(&Error::Validation(err));
            Task::none()
        }
        share_panel::Event::Resolve(token) => Task::perform(
            share_link::resolve(Arc::clone(ctx.service), token),
            Message::SharedAssetResolved,
        ),
        share_panel::Event::ToggleModel => {
            let transition = ctx.share.toggle_model();
            apply_share_transition(ctx, &transition)
        }
        share_panel::Event::CopyLink => {
            let token = ctx
                .share
                .preview()
                .and_then(|asset| asset.share_token.clone())
                .or_else(|| ShareLinkResolver::validate(ctx.share_input).ok());
            let url = token.map(|token| ctx.service.share_url(&token));
            copy_link(ctx, url)
        }
        share_panel::Event::Download => {
            let Some(id) = ctx.share.preview().map(|asset| asset.id.clone()) else {
                return Task::none();
            };
            let auth = ctx.auth_token();
            start_download(ctx, auth, id)
        }
    }
}

fn handle_shared_asset_resolved(
    ctx: &mut UpdateContext<'_>,
    result: std::result::Result<Asset, CatalogError>,
) -> Task<Message> {
    match ctx.share.apply(result) {
        Ok(transition) => apply_share_transition(ctx, &transition),
        Err(err) => {
            ctx.notify_error(&err);
            Task::none()
        }
    }
}

fn copy_link(ctx: &mut UpdateContext<'_>, url: Option<String>) -> Task<Message> {
    let Some(url) = url else {
        return Task::none();
    };
    ctx.notifications
        .push(Notification::success("notification-link-copied"));
    iced::clipboard::write(url)
}

// =============================================================================
// Previews
// =============================================================================

/// Tears down the pane named by `transition.unmounted`, if it is the one
/// currently held.
fn unmount(context: PreviewContext, pane: &mut Option<Pane>, transition: &Transition) {
    let Some(unmounted) = &transition.unmounted else {
        return;
    };
    if pane.as_ref().is_some_and(|p| p.mount() == unmounted.mount) {
        log::debug!("{context}: unmounted viewer for {}", unmounted.asset);
        *pane = None;
    }
}

/// Creates the pane for a fresh mount and starts its load when needed.
fn mount(
    context: PreviewContext,
    mount: &Mount,
    asset: &Asset,
    service: &Arc<dyn CatalogService>,
    auth: Option<AuthToken>,
) -> (Pane, Task<Message>) {
    let mut pane = Pane::from_mount(context, mount, asset);
    let plan = pane.plan().clone();
    if !plan.needs_load() {
        return (pane, Task::none());
    }
    let Some(source) = PayloadSource::for_asset(asset, Arc::clone(service), auth) else {
        pane.mark_payload_missing();
        return (pane, Task::none());
    };
    let mount_id = mount.mount;
    let task = Task::perform(viewer::load(source, plan), move |result| {
        Message::PreviewLoaded {
            context,
            mount: mount_id,
            result,
        }
    });
    (pane, task)
}

fn apply_grid_transition(ctx: &mut UpdateContext<'_>, transition: &Transition) -> Task<Message> {
    unmount(PreviewContext::Grid, ctx.grid_pane, transition);
    let Some(mounted) = &transition.mounted else {
        return Task::none();
    };
    let Some(asset) = ctx.grid.get(&mounted.asset) else {
        return Task::none();
    };
    let auth = ctx.session.as_ref().map(|session| session.token.clone());
    let (pane, task) = mount(PreviewContext::Grid, mounted, asset, ctx.service, auth);
    *ctx.grid_pane = Some(pane);
    task
}

fn apply_share_transition(ctx: &mut UpdateContext<'_>, transition: &Transition) -> Task<Message> {
    unmount(PreviewContext::SharedLink, ctx.share_pane, transition);
    let Some(mounted) = &transition.mounted else {
        return Task::none();
    };
    let Some(asset) = ctx.share.preview().filter(|asset| asset.id == mounted.asset) else {
        return Task::none();
    };
    let auth = ctx.session.as_ref().map(|session| session.token.clone());
    let (pane, task) = mount(PreviewContext::SharedLink, mounted, asset, ctx.service, auth);
    *ctx.share_pane = Some(pane);
    task
}

fn handle_preview_loaded(
    ctx: &mut UpdateContext<'_>,
    context: PreviewContext,
    mount: MountId,
    result: Result<Loaded>,
) -> Task<Message> {
    let (accepts, pane) = match context {
        PreviewContext::Grid => (ctx.grid.preview().accepts(mount), &mut *ctx.grid_pane),
        PreviewContext::SharedLink => (ctx.share.controller().accepts(mount), &mut *ctx.share_pane),
    };
    if !accepts {
        log::debug!("{context}: dropping result for unmounted viewer {mount}");
        return Task::none();
    }
    if let Some(pane) = pane.as_mut() {
        pane.apply(mount, result);
    }
    Task::none()
}

// =============================================================================
// Download
// =============================================================================

fn start_download(
    ctx: &mut UpdateContext<'_>,
    auth: Option<AuthToken>,
    id: AssetId,
) -> Task<Message> {
    let service = Arc::clone(ctx.service);
    let last_dir = ctx.persisted.last_save_directory.clone();
    Task::perform(
        download_to_disk(service, auth, id, last_dir),
        Message::DownloadCompleted,
    )
}

/// Streams the asset through a staging file and the native save dialog.
async fn download_to_disk(
    service: Arc<dyn CatalogService>,
    auth: Option<AuthToken>,
    id: AssetId,
    last_dir: Option<PathBuf>,
) -> Result<SaveOutcome> {
    let response = service.download_asset(auth.as_ref(), &id).await?;
    save_download(response, move |file_name| async move {
        let mut dialog = rfd::AsyncFileDialog::new().set_file_name(file_name);
        if let Some(dir) = last_dir {
            if dir.exists() {
                dialog = dialog.set_directory(&dir);
            }
        }
        dialog.save_file().await.map(|h| h.path().to_path_buf())
    })
    .await
}

fn handle_download_completed(
    ctx: &mut UpdateContext<'_>,
    result: Result<SaveOutcome>,
) -> Task<Message> {
    match result {
        Ok(SaveOutcome::Saved(path)) => {
            ctx.persisted.set_last_save_directory_from_file(&path);
            ctx.save_state();
            ctx.notifications.push(
                Notification::success("notification-download-saved")
                    .with_arg("path", path.display().to_string()),
            );
        }
        Ok(SaveOutcome::Cancelled) => log::debug!("download cancelled"),
        Err(err) => ctx.notify_error(&err),
    }
    Task::none()
}
