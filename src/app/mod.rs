// SPDX-License-Identifier: MPL-2.0
//! Application root state and orchestration between authentication, the
//! catalog grid, and the shared-link preview.
//!
//! The `App` struct wires together the application-layer state (grid and
//! shared-link resolver), one mounted viewer per preview context, and the
//! catalog port. It translates messages into side effects like catalog
//! requests, decoding tasks, session persistence, and file dialogs.

pub mod config;
mod message;
pub mod paths;
pub mod persisted_state;
mod screen;
mod subscription;
mod update;
mod view;

pub use message::{Flags, Message};
pub use screen::Screen;

use crate::application::grid::CatalogGrid;
use crate::application::port::{CatalogService, Session};
use crate::application::share_link::ShareLinkResolver;
use crate::domain::asset::AssetId;
use crate::error::Result;
use crate::i18n::fluent::I18n;
use crate::infrastructure::HttpCatalog;
use crate::ui::notifications;
use crate::ui::viewer::Pane;
use crate::ui::{auth, upload_panel};
use config::Config;
use iced::{window, Element, Subscription, Task, Theme};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Root Iced application state.
pub struct App {
    pub i18n: I18n,
    screen: Screen,
    config: Config,
    service: Arc<dyn CatalogService>,
    session: Option<Session>,
    /// Persisted application state (session, dialog directories).
    app_state: persisted_state::AppState,
    /// Data directory override for the session file; `None` uses the
    /// resolved default.
    data_dir: Option<PathBuf>,
    grid: CatalogGrid,
    /// Viewer mounted by the grid's expansion, if any.
    grid_pane: Option<Pane>,
    share: ShareLinkResolver,
    /// Viewer mounted by the shared-link "Load Model" control, if any.
    share_pane: Option<Pane>,
    share_input: String,
    auth: auth::State,
    upload: upload_panel::State,
    /// Asset awaiting delete confirmation.
    pending_delete: Option<AssetId>,
    /// List, upload, login and signup requests in flight.
    in_flight: usize,
    spinner_rotation: f32,
    /// Toast notification manager for user feedback.
    notifications: notifications::Manager,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("screen", &self.screen)
            .field("signed_in", &self.session.is_some())
            .field("assets", &self.grid.assets().len())
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

pub const WINDOW_DEFAULT_HEIGHT: u32 = 760;
pub const WINDOW_DEFAULT_WIDTH: u32 = 1200;
pub const MIN_WINDOW_HEIGHT: u32 = 560;
pub const MIN_WINDOW_WIDTH: u32 = 900;

/// Builds the window settings.
pub fn window_settings() -> window::Settings {
    window::Settings {
        size: iced::Size::new(WINDOW_DEFAULT_WIDTH as f32, WINDOW_DEFAULT_HEIGHT as f32),
        min_size: Some(iced::Size::new(
            MIN_WINDOW_WIDTH as f32,
            MIN_WINDOW_HEIGHT as f32,
        )),
        ..window::Settings::default()
    }
}

/// Everything the boot function needs, prepared before the event loop starts.
#[derive(Clone)]
struct Startup {
    flags: Flags,
    config: Config,
    config_warning: Option<String>,
    service: Arc<dyn CatalogService>,
}

/// Entry point used by `main.rs` to launch the Iced application loop.
///
/// Fails only when the HTTP client cannot be built or the window cannot be
/// created.
pub fn run(flags: Flags) -> Result<()> {
    let (config, config_warning) = config::load();
    let server_url = paths::resolve_server_url(flags.server.as_deref(), &config.server.base_url);
    let service = HttpCatalog::new(&server_url, config.server.request_timeout())?;
    log::info!("catalog server: {}", service.base_url());

    let startup = Startup {
        flags,
        config,
        config_warning,
        service: Arc::new(service),
    };
    let boot = move || App::new(startup.clone());

    iced::application(boot, App::update, App::view)
        .title(App::title)
        .theme(App::theme)
        .window(window_settings())
        .subscription(App::subscription)
        .run()?;
    Ok(())
}

impl App {
    /// Builds an app around `service` with default preferences. The UI
    /// starts on the authentication screen.
    pub fn with_service(service: Arc<dyn CatalogService>, config: Config) -> Self {
        let i18n = I18n::new(None, &config);
        Self {
            i18n,
            screen: Screen::Auth,
            grid: CatalogGrid::with_category(config.viewer.default_category),
            config,
            service,
            session: None,
            app_state: persisted_state::AppState::default(),
            data_dir: None,
            grid_pane: None,
            share: ShareLinkResolver::new(),
            share_pane: None,
            share_input: String::new(),
            auth: auth::State::default(),
            upload: upload_panel::State::default(),
            pending_delete: None,
            in_flight: 0,
            spinner_rotation: 0.0,
            notifications: notifications::Manager::new(),
        }
    }

    /// Stores the session file under `dir` instead of the default data
    /// directory.
    #[must_use]
    pub fn with_data_dir(mut self, dir: PathBuf) -> Self {
        self.data_dir = Some(dir);
        self
    }

    /// Initializes application state, restores the session, and kicks off
    /// the initial catalog and shared-link requests.
    fn new(startup: Startup) -> (Self, Task<Message>) {
        let Startup {
            flags,
            config,
            config_warning,
            service,
        } = startup;

        let mut app = Self::with_service(service, config);
        app.i18n = I18n::new(flags.lang.clone(), &app.config);

        let (app_state, state_warning) = persisted_state::AppState::load();
        app.session = app_state.session();
        app.app_state = app_state;

        // Show warnings for config/state loading issues
        if let Some(key) = config_warning {
            app.notifications
                .push(notifications::Notification::warning(&key));
        }
        if let Some(key) = state_warning {
            app.notifications
                .push(notifications::Notification::warning(&key));
        }

        let mut tasks = Vec::new();
        if app.session.is_some() {
            app.screen = Screen::Catalog;
            tasks.push(app.update(Message::Header(crate::ui::header::Message::Refresh)));
        }

        if let Some(raw) = flags.share_token {
            app.share_input = raw;
            tasks.push(app.update(Message::Share(crate::ui::share_panel::Message::Resolve)));
        }

        (app, Task::batch(tasks))
    }

    fn title(&self) -> String {
        let app_name = self.i18n.tr("window-title");
        match &self.session {
            Some(session) if !session.username.is_empty() => {
                format!("{} - {app_name}", session.username)
            }
            _ => app_name,
        }
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }

    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    #[must_use]
    pub fn grid(&self) -> &CatalogGrid {
        &self.grid
    }

    #[must_use]
    pub fn share(&self) -> &ShareLinkResolver {
        &self.share
    }

    #[must_use]
    pub fn grid_pane(&self) -> Option<&Pane> {
        self.grid_pane.as_ref()
    }

    #[must_use]
    pub fn share_pane(&self) -> Option<&Pane> {
        self.share_pane.as_ref()
    }

    #[must_use]
    pub fn notifications(&self) -> &notifications::Manager {
        &self.notifications
    }

    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }

    fn has_pending_preview(&self) -> bool {
        self.grid_pane.as_ref().is_some_and(Pane::is_pending)
            || self.share_pane.as_ref().is_some_and(Pane::is_pending)
    }

    fn subscription(&self) -> Subscription<Message> {
        subscription::create_tick_subscription(
            self.is_busy() || self.has_pending_preview(),
            self.notifications.has_notifications(),
        )
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        let mut ctx = update::UpdateContext {
            screen: &mut self.screen,
            service: &self.service,
            session: &mut self.session,
            persisted: &mut self.app_state,
            data_dir: self.data_dir.as_ref(),
            grid: &mut self.grid,
            grid_pane: &mut self.grid_pane,
            share: &mut self.share,
            share_pane: &mut self.share_pane,
            share_input: &mut self.share_input,
            auth: &mut self.auth,
            upload: &mut self.upload,
            pending_delete: &mut self.pending_delete,
            in_flight: &mut self.in_flight,
            spinner_rotation: &mut self.spinner_rotation,
            notifications: &mut self.notifications,
        };
        update::update(&mut ctx, message)
    }

    pub fn view(&self) -> Element<'_, Message> {
        view::view(view::ViewContext {
            i18n: &self.i18n,
            screen: self.screen,
            config: &self.config,
            session: self.session.as_ref(),
            grid: &self.grid,
            grid_pane: self.grid_pane.as_ref(),
            share: &self.share,
            share_pane: self.share_pane.as_ref(),
            share_input: &self.share_input,
            auth: &self.auth,
            upload: &self.upload,
            pending_delete: self.pending_delete.as_ref(),
            busy: self.is_busy(),
            spinner_rotation: self.spinner_rotation,
            notifications: &self.notifications,
        })
    }
}
