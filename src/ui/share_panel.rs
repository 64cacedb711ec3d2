// SPDX-License-Identifier: MPL-2.0
//! Shared-link panel: resolve a token and preview the asset it names.

use crate::application::share_link::ShareLinkResolver;
use crate::domain::asset::{Asset, ShareToken};
use crate::error::ValidationError;
use crate::i18n::fluent::I18n;
use crate::ui::asset_card::format_timestamp;
use crate::ui::design_tokens::{palette, sizing, spacing, typography};
use crate::ui::styles;
use crate::ui::viewer::{self, Pane};
use iced::{
    alignment::Vertical,
    widget::{button, text_input, Column, Container, Row, Text},
    Element, Length,
};

pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub input: &'a str,
    pub preview: Option<&'a Asset>,
    pub offers_model_view: bool,
    pub pane: Option<&'a Pane>,
    pub viewer_height: f32,
    pub spinner_rotation: f32,
}

#[derive(Debug, Clone)]
pub enum Message {
    InputChanged(String),
    Resolve,
    ToggleModel,
    CopyLink,
    Download,
}

#[derive(Debug, Clone)]
pub enum Event {
    None,
    Resolve(ShareToken),
    Invalid(ValidationError),
    ToggleModel,
    CopyLink,
    Download,
}

pub fn update(message: Message, input: &mut String) -> Event {
    match message {
        Message::InputChanged(value) => {
            *input = value;
            Event::None
        }
        Message::Resolve => match ShareLinkResolver::validate(input) {
            Ok(token) => Event::Resolve(token),
            Err(err) => Event::Invalid(err),
        },
        Message::ToggleModel => Event::ToggleModel,
        Message::CopyLink => Event::CopyLink,
        Message::Download => Event::Download,
    }
}

pub fn view<'a>(ctx: ViewContext<'a>) -> Element<'a, Message> {
    let placeholder = ctx.i18n.tr("share-token-placeholder");
    let input = text_input(&placeholder, ctx.input)
        .on_input(Message::InputChanged)
        .on_submit(Message::Resolve)
        .padding(spacing::XS)
        .size(typography::BODY)
        .width(Length::Fill);

    let resolve = button(Text::new(ctx.i18n.tr("share-preview-button")).size(typography::BODY_SM))
        .style(styles::button::primary)
        .on_press(Message::Resolve);

    let mut content = Column::new()
        .spacing(spacing::SM)
        .push(Text::new(ctx.i18n.tr("share-title")).size(typography::TITLE_SM))
        .push(
            Row::new()
                .spacing(spacing::XS)
                .align_y(Vertical::Center)
                .push(input)
                .push(resolve),
        );

    if let Some(asset) = ctx.preview {
        content = content.push(preview_card(&ctx, asset));
    }

    Container::new(content)
        .width(Length::Fixed(sizing::SHARE_PANEL_WIDTH))
        .height(Length::Fill)
        .padding(spacing::SM)
        .style(styles::container::panel)
        .into()
}

fn preview_card<'a>(ctx: &ViewContext<'a>, asset: &'a Asset) -> Element<'a, Message> {
    let version = asset.version.to_string();
    let mut body = Column::new()
        .spacing(spacing::XS)
        .push(Text::new(asset.name.as_str()).size(typography::TITLE_SM))
        .push(
            Text::new(
                ctx.i18n
                    .tr_with_args("asset-version", &[("version", version.as_str())]),
            )
            .size(typography::CAPTION)
            .color(palette::GRAY_400),
        )
        .push(
            Text::new(asset.canonical_category().to_uppercase())
                .size(typography::CAPTION)
                .color(palette::PRIMARY_400),
        );

    let timestamp = format_timestamp(asset.uploaded_at);
    if !timestamp.is_empty() {
        body = body.push(
            Text::new(
                ctx.i18n
                    .tr_with_args("asset-uploaded-at", &[("date", timestamp.as_str())]),
            )
            .size(typography::CAPTION)
            .color(palette::GRAY_400),
        );
    }

    let mut actions = Row::new().spacing(spacing::XS);
    if ctx.offers_model_view {
        let key = if ctx.pane.is_some() {
            "share-hide-model"
        } else {
            "share-load-model"
        };
        actions = actions.push(
            button(Text::new(ctx.i18n.tr(key)).size(typography::BODY_SM))
                .style(styles::button::primary)
                .on_press(Message::ToggleModel),
        );
    }
    actions = actions
        .push(
            button(Text::new(ctx.i18n.tr("share-copy-link")).size(typography::BODY_SM))
                .style(styles::button::unselected)
                .on_press(Message::CopyLink),
        )
        .push(
            button(Text::new(ctx.i18n.tr("asset-download")).size(typography::BODY_SM))
                .style(styles::button::unselected)
                .on_press(Message::Download),
        );
    body = body.push(actions);

    if let Some(pane) = ctx.pane {
        body = body.push(pane.view(viewer::ViewContext {
            i18n: ctx.i18n,
            height: ctx.viewer_height,
            spinner_rotation: ctx.spinner_rotation,
        }));
    }

    Container::new(body)
        .width(Length::Fill)
        .padding(spacing::SM)
        .style(styles::container::card)
        .into()
}
