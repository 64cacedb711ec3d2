// SPDX-License-Identifier: MPL-2.0
//! Design tokens shared by every view.
//!
//! Colors, spacing and sizes live here so the auth screen, the catalog and
//! the viewers stay visually consistent. Scales keep fixed ratios
//! (`MD == XS * 2`), which the compile-time block at the bottom enforces.
//!
//! ```
//! use asset_lens::ui::design_tokens::{palette, opacity, spacing};
//! use iced::Color;
//!
//! let scrim = Color { a: opacity::OVERLAY_MEDIUM, ..palette::BLACK };
//! let gap = spacing::MD;
//! # let _ = (scrim, gap);
//! ```

use iced::Color;

pub mod palette {
    use super::Color;

    pub const BLACK: Color = Color::BLACK;
    pub const WHITE: Color = Color::WHITE;
    pub const GRAY_900: Color = Color::from_rgb(0.1, 0.1, 0.1);
    pub const GRAY_700: Color = Color::from_rgb(0.3, 0.3, 0.3);
    pub const GRAY_400: Color = Color::from_rgb(0.4, 0.4, 0.4);
    pub const GRAY_200: Color = Color::from_rgb(0.75, 0.75, 0.75);
    pub const GRAY_100: Color = Color::from_rgb(0.85, 0.85, 0.85);

    pub const PRIMARY_400: Color = Color::from_rgb(0.4, 0.7, 1.0);
    pub const PRIMARY_500: Color = Color::from_rgb(0.3, 0.6, 0.9);
    pub const PRIMARY_600: Color = Color::from_rgb(0.2, 0.5, 0.8);

    pub const ERROR_500: Color = Color::from_rgb(0.898, 0.224, 0.208);
    pub const ERROR_600: Color = Color::from_rgb(0.78, 0.16, 0.15);
    pub const WARNING_500: Color = Color::from_rgb(0.945, 0.651, 0.125);
    pub const SUCCESS_500: Color = Color::from_rgb(0.263, 0.702, 0.404);
    pub const INFO_500: Color = Color::from_rgb(0.392, 0.588, 1.0);

    /// Backdrop of the 3D viewport.
    pub const VIEWPORT: Color = Color::from_rgb(0.133, 0.133, 0.133);
}

pub mod opacity {
    pub const TRANSPARENT: f32 = 0.0;
    pub const OVERLAY_SUBTLE: f32 = 0.2;
    pub const OVERLAY_MEDIUM: f32 = 0.5;
    pub const OPAQUE: f32 = 1.0;

    /// Semi-transparent panels.
    pub const SURFACE: f32 = 0.95;
}

/// 8px baseline grid.
pub mod spacing {
    pub const XXS: f32 = 4.0;
    pub const XS: f32 = 8.0;
    pub const SM: f32 = 12.0;
    pub const MD: f32 = 16.0;
    pub const LG: f32 = 24.0;
    pub const XL: f32 = 32.0;
}

pub mod sizing {
    pub const ICON_SM: f32 = 16.0;
    pub const ICON_XL: f32 = 48.0;

    pub const SIDEBAR_WIDTH: f32 = 240.0;
    pub const TOAST_WIDTH: f32 = 320.0;
    pub const AUTH_FORM_WIDTH: f32 = 360.0;
    pub const SHARE_PANEL_WIDTH: f32 = 340.0;
    pub const TEXTURE_PREVIEW_HEIGHT: f32 = 240.0;
}

pub mod typography {
    /// Auth screen heading.
    pub const TITLE_LG: f32 = 30.0;
    /// App name in the header.
    pub const TITLE_MD: f32 = 20.0;
    /// Panel and card headings.
    pub const TITLE_SM: f32 = 18.0;
    pub const BODY: f32 = 14.0;
    /// Category descriptions, hints.
    pub const BODY_SM: f32 = 13.0;
    /// Badges, timestamps.
    pub const CAPTION: f32 = 12.0;
}

pub mod border {
    pub const WIDTH_SM: f32 = 1.0;
    /// Toast accents.
    pub const WIDTH_MD: f32 = 2.0;
}

pub mod radius {
    pub const SM: f32 = 4.0;
    pub const MD: f32 = 8.0;
    pub const LG: f32 = 12.0;
}

pub mod shadow {
    use super::palette;
    use iced::{Shadow, Vector};

    pub const NONE: Shadow = Shadow {
        color: palette::BLACK,
        offset: Vector::ZERO,
        blur_radius: 0.0,
    };

    pub const SM: Shadow = Shadow {
        color: palette::BLACK,
        offset: Vector { x: 0.0, y: 2.0 },
        blur_radius: 4.0,
    };

    pub const MD: Shadow = Shadow {
        color: palette::BLACK,
        offset: Vector { x: 0.0, y: 4.0 },
        blur_radius: 8.0,
    };
}

const _: () = {
    assert!(spacing::XS > 0.0);
    assert!(spacing::SM > spacing::XS);
    assert!(spacing::MD > spacing::SM);
    assert!(spacing::LG > spacing::MD);

    assert!(opacity::TRANSPARENT == 0.0);
    assert!(opacity::OPAQUE == 1.0);
    assert!(opacity::SURFACE > 0.0 && opacity::SURFACE < 1.0);

    assert!(typography::TITLE_LG > typography::TITLE_MD);
    assert!(typography::TITLE_MD > typography::TITLE_SM);
    assert!(typography::BODY > typography::BODY_SM);
    assert!(typography::BODY_SM > typography::CAPTION);

    assert!(border::WIDTH_MD > border::WIDTH_SM);
    assert!(sizing::TOAST_WIDTH < sizing::SHARE_PANEL_WIDTH + sizing::SIDEBAR_WIDTH);
};
