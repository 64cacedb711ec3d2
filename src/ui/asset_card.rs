// SPDX-License-Identifier: MPL-2.0
//! One catalog entry: metadata, actions, and the inline preview when
//! expanded.

use crate::domain::asset::{Asset, AssetId};
use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{palette, spacing, typography};
use crate::ui::styles;
use crate::ui::viewer::{self, Pane};
use chrono::{DateTime, Local};
use iced::{
    alignment::Vertical,
    widget::{button, Column, Container, Row, Space, Text},
    Element, Length,
};
use std::time::SystemTime;

pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub asset: &'a Asset,
    pub is_owner: bool,
    pub confirming_delete: bool,
    /// Mounted viewer when this card is the expanded one.
    pub pane: Option<&'a Pane>,
    pub viewer_height: f32,
    pub spinner_rotation: f32,
}

#[derive(Debug, Clone)]
pub enum Message {
    TogglePreview(AssetId),
    Download(AssetId),
    CopyShareLink(AssetId),
    RequestDelete(AssetId),
    ConfirmDelete(AssetId),
    CancelDelete,
}

/// Upload time in the local zone, or an empty string when unknown.
#[must_use]
pub fn format_timestamp(uploaded_at: Option<SystemTime>) -> String {
    uploaded_at
        .map(|time| {
            DateTime::<Local>::from(time)
                .format("%Y-%m-%d %H:%M")
                .to_string()
        })
        .unwrap_or_default()
}

pub fn view<'a>(ctx: ViewContext<'a>) -> Element<'a, Message> {
    let asset = ctx.asset;
    let version = asset.version.to_string();

    let title = Row::new()
        .spacing(spacing::XS)
        .align_y(Vertical::Center)
        .push(Text::new(asset.name.as_str()).size(typography::TITLE_SM))
        .push(
            Text::new(format!(
                "({})",
                ctx.i18n
                    .tr_with_args("asset-version", &[("version", version.as_str())])
            ))
            .size(typography::BODY_SM)
            .color(palette::GRAY_400),
        );

    let mut meta = Row::new().spacing(spacing::SM).push(
        Text::new(asset.canonical_category().to_uppercase())
            .size(typography::CAPTION)
            .color(palette::PRIMARY_400),
    );
    let timestamp = format_timestamp(asset.uploaded_at);
    if !timestamp.is_empty() {
        let label = ctx
            .i18n
            .tr_with_args("asset-uploaded-at", &[("date", timestamp.as_str())]);
        meta = meta.push(
            Text::new(label)
                .size(typography::CAPTION)
                .color(palette::GRAY_400),
        );
    }
    if asset.is_public {
        meta = meta.push(
            Text::new(ctx.i18n.tr("asset-public"))
                .size(typography::CAPTION)
                .color(palette::SUCCESS_500),
        );
    }

    let preview_key = if ctx.pane.is_some() {
        "asset-hide-preview"
    } else {
        "asset-show-preview"
    };

    let mut actions = Row::new()
        .spacing(spacing::XS)
        .align_y(Vertical::Center)
        .push(action(ctx.i18n.tr(preview_key), Message::TogglePreview(asset.id.clone())))
        .push(action(ctx.i18n.tr("asset-download"), Message::Download(asset.id.clone())));

    if !asset.is_public && asset.share_token.is_some() {
        actions = actions.push(action(
            ctx.i18n.tr("asset-share-link"),
            Message::CopyShareLink(asset.id.clone()),
        ));
    }

    actions = actions.push(Space::new().width(Length::Fill));

    if ctx.is_owner {
        actions = actions.push(delete_controls(&ctx));
    }

    let mut body = Column::new()
        .spacing(spacing::XS)
        .push(title)
        .push(meta)
        .push(actions);

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

fn action<'a>(label: String, message: Message) -> Element<'a, Message> {
    button(Text::new(label).size(typography::BODY_SM))
        .style(styles::button::unselected)
        .on_press(message)
        .into()
}

fn delete_controls<'a>(ctx: &ViewContext<'a>) -> Element<'a, Message> {
    let id = ctx.asset.id.clone();
    if !ctx.confirming_delete {
        return button(Text::new(ctx.i18n.tr("asset-delete")).size(typography::BODY_SM))
            .style(styles::button::danger)
            .on_press(Message::RequestDelete(id))
            .into();
    }

    let prompt = Text::new(ctx.i18n.tr("asset-delete-confirm"))
        .size(typography::BODY_SM)
        .color(palette::WARNING_500);
    let confirm = button(Text::new(ctx.i18n.tr("asset-delete-yes")).size(typography::BODY_SM))
        .style(styles::button::danger)
        .on_press(Message::ConfirmDelete(id));
    let cancel = button(Text::new(ctx.i18n.tr("asset-delete-no")).size(typography::BODY_SM))
        .style(styles::button::ghost)
        .on_press(Message::CancelDelete);

    Container::new(
        Row::new()
            .spacing(spacing::XS)
            .align_y(Vertical::Center)
            .push(prompt)
            .push(confirm)
            .push(cancel),
    )
    .padding(spacing::XXS)
    .style(styles::container::confirm)
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn missing_timestamp_formats_empty() {
        assert!(format_timestamp(None).is_empty());
    }

    #[test]
    fn timestamp_has_date_and_minutes() {
        let time = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let formatted = format_timestamp(Some(time));
        assert_eq!(formatted.len(), "2023-11-14 22:13".len());
        assert!(formatted.starts_with("2023-11-1"));
    }
}
