// SPDX-License-Identifier: MPL-2.0
//! Button styles.

use crate::ui::design_tokens::{
    opacity,
    palette::{self, WHITE},
    radius, shadow,
};
use iced::widget::button;
use iced::{Background, Border, Color, Theme};

fn filled(background: Color, hover: Color, edge: Color, status: button::Status) -> button::Style {
    let (background, shadow) = match status {
        button::Status::Hovered => (hover, shadow::MD),
        button::Status::Disabled => (
            Color {
                a: opacity::OVERLAY_MEDIUM,
                ..background
            },
            shadow::NONE,
        ),
        button::Status::Active | button::Status::Pressed => (background, shadow::SM),
    };
    button::Style {
        background: Some(Background::Color(background)),
        text_color: WHITE,
        border: Border {
            color: edge,
            width: 1.0,
            radius: radius::SM.into(),
        },
        shadow,
        snap: true,
    }
}

/// Main action of a form or panel (Login, Upload, Preview).
pub fn primary(_theme: &Theme, status: button::Status) -> button::Style {
    filled(
        palette::PRIMARY_500,
        palette::PRIMARY_400,
        palette::PRIMARY_600,
        status,
    )
}

/// Destructive action (Delete, Confirm delete).
pub fn danger(_theme: &Theme, status: button::Status) -> button::Style {
    filled(
        palette::ERROR_500,
        palette::ERROR_600,
        palette::ERROR_600,
        status,
    )
}

/// Active entry of a toggle group, such as the current category.
pub fn selected(theme: &Theme, status: button::Status) -> button::Style {
    primary(theme, status)
}

/// Inactive entry of a toggle group.
pub fn unselected(theme: &Theme, status: button::Status) -> button::Style {
    let is_light = matches!(theme, Theme::Light);

    let (bg_color, text_color) = if is_light {
        (palette::GRAY_100, palette::GRAY_900)
    } else {
        (palette::GRAY_700, WHITE)
    };
    let hover_bg = if is_light {
        palette::GRAY_200
    } else {
        Color::from_rgb(0.35, 0.35, 0.35)
    };

    let (background, border_color) = match status {
        button::Status::Hovered => (hover_bg, palette::PRIMARY_500),
        _ => (bg_color, palette::GRAY_400),
    };

    button::Style {
        background: Some(Background::Color(background)),
        text_color: if matches!(status, button::Status::Disabled) {
            palette::GRAY_400
        } else {
            text_color
        },
        border: Border {
            color: border_color,
            width: 1.0,
            radius: radius::SM.into(),
        },
        shadow: shadow::NONE,
        snap: true,
    }
}

/// Borderless text button (toast dismiss, auth mode switch).
pub fn ghost(theme: &Theme, status: button::Status) -> button::Style {
    let base = theme.extended_palette().background.base;
    let background = match status {
        button::Status::Hovered => Some(Background::Color(Color {
            a: opacity::OVERLAY_SUBTLE,
            ..palette::GRAY_400
        })),
        button::Status::Pressed => Some(Background::Color(Color {
            a: opacity::OVERLAY_MEDIUM,
            ..palette::GRAY_400
        })),
        button::Status::Active | button::Status::Disabled => None,
    };
    button::Style {
        background,
        text_color: base.text,
        border: Border {
            radius: radius::SM.into(),
            ..Default::default()
        },
        shadow: shadow::NONE,
        snap: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_button_uses_brand_colors() {
        let style = primary(&Theme::Dark, button::Status::Active);
        assert_eq!(
            style.background,
            Some(Background::Color(palette::PRIMARY_500))
        );
    }

    #[test]
    fn danger_button_darkens_on_hover() {
        let active = danger(&Theme::Dark, button::Status::Active);
        let hovered = danger(&Theme::Dark, button::Status::Hovered);
        assert_ne!(active.background, hovered.background);
    }

    #[test]
    fn ghost_button_is_transparent_at_rest() {
        assert!(ghost(&Theme::Light, button::Status::Active)
            .background
            .is_none());
    }
}
