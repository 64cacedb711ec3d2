// SPDX-License-Identifier: MPL-2.0
//! Category sidebar.

use crate::domain::asset::CategoryToken;
use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{palette, sizing, spacing, typography};
use crate::ui::styles;
use iced::{
    widget::{button, scrollable, Column, Container, Row, Space, Text},
    Element, Length,
};

pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub active: CategoryToken,
    /// Asset count per bucket, in [`CategoryToken::ALL`] order.
    pub counts: [(CategoryToken, usize); 4],
}

#[derive(Debug, Clone)]
pub enum Message {
    Select(CategoryToken),
}

#[derive(Debug, Clone)]
pub enum Event {
    None,
    CategorySelected(CategoryToken),
}

pub fn update(message: Message, active: CategoryToken) -> Event {
    match message {
        Message::Select(category) if category == active => Event::None,
        Message::Select(category) => Event::CategorySelected(category),
    }
}

pub fn view<'a>(ctx: ViewContext<'a>) -> Element<'a, Message> {
    let mut list = Column::new().spacing(spacing::XS).push(
        Text::new(ctx.i18n.tr("sidebar-title"))
            .size(typography::TITLE_SM)
            .color(palette::GRAY_200),
    );

    for (category, count) in ctx.counts {
        list = list.push(entry(&ctx, category, count));
    }

    Container::new(scrollable(list))
        .width(Length::Fixed(sizing::SIDEBAR_WIDTH))
        .height(Length::Fill)
        .padding(spacing::SM)
        .style(styles::container::panel)
        .into()
}

fn entry<'a>(ctx: &ViewContext<'a>, category: CategoryToken, count: usize) -> Element<'a, Message> {
    let label = Row::new()
        .push(Text::new(ctx.i18n.tr(category.label_key())).size(typography::BODY))
        .push(Space::new().width(Length::Fill))
        .push(Text::new(count.to_string()).size(typography::CAPTION));

    let description = Text::new(ctx.i18n.tr(category.description_key()))
        .size(typography::CAPTION)
        .color(palette::GRAY_400);

    let style = if category == ctx.active {
        styles::button::selected
    } else {
        styles::button::unselected
    };

    button(Column::new().spacing(spacing::XXS).push(label).push(description))
        .width(Length::Fill)
        .padding(spacing::XS)
        .style(style)
        .on_press(Message::Select(category))
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selecting_the_active_category_is_a_no_op() {
        assert!(matches!(
            update(Message::Select(CategoryToken::Models), CategoryToken::Models),
            Event::None
        ));
        assert!(matches!(
            update(Message::Select(CategoryToken::Sounds), CategoryToken::Models),
            Event::CategorySelected(CategoryToken::Sounds)
        ));
    }
}
