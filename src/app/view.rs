// SPDX-License-Identifier: MPL-2.0
//! View rendering for the application.
//!
//! This module handles the `view()` function that renders the current screen
//! based on application state. The shared-link panel is shown on both
//! screens; the toasts are layered above everything.

use super::config::Config;
use super::{Message, Screen};
use crate::application::grid::CatalogGrid;
use crate::application::port::Session;
use crate::application::share_link::ShareLinkResolver;
use crate::domain::asset::{count_by_category, AssetId};
use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{palette, spacing, typography};
use crate::ui::notifications::{self, Toast};
use crate::ui::viewer::Pane;
use crate::ui::{asset_card, auth, header, share_panel, sidebar, upload_panel};
use iced::{
    widget::{scrollable, Column, Container, Row, Stack, Text},
    Element, Length,
};

/// Context required to render the application view.
pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub screen: Screen,
    pub config: &'a Config,
    pub session: Option<&'a Session>,
    pub grid: &'a CatalogGrid,
    pub grid_pane: Option<&'a Pane>,
    pub share: &'a ShareLinkResolver,
    pub share_pane: Option<&'a Pane>,
    pub share_input: &'a str,
    pub auth: &'a auth::State,
    pub upload: &'a upload_panel::State,
    pub pending_delete: Option<&'a AssetId>,
    pub busy: bool,
    pub spinner_rotation: f32,
    pub notifications: &'a notifications::Manager,
}

/// Renders the current application view based on the active screen.
pub fn view(ctx: ViewContext<'_>) -> Element<'_, Message> {
    let current_view: Element<'_, Message> = match ctx.screen {
        Screen::Auth => view_auth(&ctx),
        Screen::Catalog => view_catalog(&ctx),
    };

    let base = Container::new(current_view)
        .width(Length::Fill)
        .height(Length::Fill);

    let toasts = Toast::view_overlay(ctx.notifications, ctx.i18n).map(Message::Notification);

    Stack::new().push(base).push(toasts).into()
}

fn view_auth<'a>(ctx: &ViewContext<'a>) -> Element<'a, Message> {
    let form = auth::view(auth::ViewContext {
        i18n: ctx.i18n,
        state: ctx.auth,
        busy: ctx.busy,
    })
    .map(Message::Auth);

    Row::new()
        .spacing(spacing::MD)
        .padding(spacing::MD)
        .push(form)
        .push(view_share_panel(ctx))
        .into()
}

fn view_catalog<'a>(ctx: &ViewContext<'a>) -> Element<'a, Message> {
    let username = ctx.session.map_or("", |session| session.username.as_str());
    let header = header::view(header::ViewContext {
        i18n: ctx.i18n,
        username,
        busy: ctx.busy.then_some(ctx.spinner_rotation),
    })
    .map(Message::Header);

    let sidebar = sidebar::view(sidebar::ViewContext {
        i18n: ctx.i18n,
        active: ctx.grid.active_category(),
        counts: count_by_category(ctx.grid.assets()),
    })
    .map(Message::Sidebar);

    let upload = upload_panel::view(upload_panel::ViewContext {
        i18n: ctx.i18n,
        state: ctx.upload,
        category: ctx.grid.active_category(),
        busy: ctx.busy,
    })
    .map(Message::Upload);

    let center = Column::new()
        .spacing(spacing::MD)
        .width(Length::Fill)
        .push(upload)
        .push(view_cards(ctx));

    let body = Row::new()
        .spacing(spacing::MD)
        .padding(spacing::MD)
        .height(Length::Fill)
        .push(sidebar)
        .push(center)
        .push(view_share_panel(ctx));

    Column::new().push(header).push(body).into()
}

fn view_cards<'a>(ctx: &ViewContext<'a>) -> Element<'a, Message> {
    let user = ctx.session.map(|session| &session.user_id);
    let expanded = ctx.grid.preview().expanded();
    let viewer_height = ctx.config.viewer.viewer_height();

    let cards: Vec<Element<'a, Message>> = ctx
        .grid
        .visible()
        .map(|asset| {
            // Only the expanded card carries the mounted viewer
            let pane = ctx
                .grid_pane
                .filter(|pane| expanded == Some(&asset.id) && pane.asset() == &asset.id);
            asset_card::view(asset_card::ViewContext {
                i18n: ctx.i18n,
                asset,
                is_owner: asset.is_owned_by(user),
                confirming_delete: ctx.pending_delete == Some(&asset.id),
                pane,
                viewer_height,
                spinner_rotation: ctx.spinner_rotation,
            })
            .map(Message::Card)
        })
        .collect();

    if cards.is_empty() {
        return Container::new(
            Text::new(ctx.i18n.tr("grid-empty"))
                .size(typography::BODY)
                .color(palette::GRAY_400),
        )
        .width(Length::Fill)
        .padding(spacing::LG)
        .center_x(Length::Fill)
        .into();
    }

    scrollable(Column::with_children(cards).spacing(spacing::SM))
        .height(Length::Fill)
        .into()
}

fn view_share_panel<'a>(ctx: &ViewContext<'a>) -> Element<'a, Message> {
    share_panel::view(share_panel::ViewContext {
        i18n: ctx.i18n,
        input: ctx.share_input,
        preview: ctx.share.preview(),
        offers_model_view: ctx.share.offers_model_view(),
        pane: ctx.share_pane,
        viewer_height: ctx.config.viewer.viewer_height(),
        spinner_rotation: ctx.spinner_rotation,
    })
    .map(Message::Share)
}
