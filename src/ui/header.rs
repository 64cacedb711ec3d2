// SPDX-License-Identifier: MPL-2.0
//! Top bar of the catalog screen: app title, signed-in user, logout, and the
//! busy indicator.

use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{palette, sizing, spacing, typography};
use crate::ui::styles;
use crate::ui::widgets::AnimatedSpinner;
use iced::{
    alignment::Vertical,
    widget::{button, Container, Row, Space, Text},
    Element, Length,
};

pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub username: &'a str,
    /// Spinner angle while requests are in flight.
    pub busy: Option<f32>,
}

#[derive(Debug, Clone)]
pub enum Message {
    Refresh,
    Logout,
}

#[derive(Debug, Clone)]
pub enum Event {
    Refresh,
    Logout,
}

pub fn update(message: Message) -> Event {
    match message {
        Message::Refresh => Event::Refresh,
        Message::Logout => Event::Logout,
    }
}

pub fn view<'a>(ctx: ViewContext<'a>) -> Element<'a, Message> {
    let title = Text::new(ctx.i18n.tr("window-title")).size(typography::TITLE_MD);

    let greeting = Text::new(
        ctx.i18n
            .tr_with_args("header-signed-in-as", &[("username", ctx.username)]),
    )
    .size(typography::BODY_SM)
    .color(palette::GRAY_200);

    let refresh = button(Text::new(ctx.i18n.tr("header-refresh")).size(typography::BODY_SM))
        .style(styles::button::unselected)
        .on_press_maybe(ctx.busy.is_none().then_some(Message::Refresh));

    let logout = button(Text::new(ctx.i18n.tr("header-logout")).size(typography::BODY_SM))
        .style(styles::button::unselected)
        .on_press(Message::Logout);

    let mut row = Row::new()
        .spacing(spacing::SM)
        .padding(spacing::SM)
        .align_y(Vertical::Center)
        .push(title);

    if let Some(rotation) = ctx.busy {
        row = row.push(
            AnimatedSpinner::new(palette::PRIMARY_400, rotation)
                .size(sizing::ICON_SM)
                .into_element(),
        );
    }

    row = row
        .push(Space::new().width(Length::Fill))
        .push(greeting)
        .push(refresh)
        .push(logout);

    Container::new(row)
        .width(Length::Fill)
        .style(styles::container::header)
        .into()
}
