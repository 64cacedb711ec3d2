// SPDX-License-Identifier: MPL-2.0
//! Texture previews.

use crate::scene::DecodeError;
use iced::widget::image::{Handle, Image};
use iced::widget::Container;
use iced::{ContentFit, Element, Length};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Decoded RGBA image ready for display.
#[derive(Debug, Clone)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    handle: Handle,
}

impl TextureImage {
    #[must_use]
    pub fn handle(&self) -> &Handle {
        &self.handle
    }
}

/// Decodes any raster format `image` understands.
pub fn decode_texture(bytes: &[u8]) -> Result<TextureImage, DecodeError> {
    let decoded = panic::catch_unwind(AssertUnwindSafe(|| image_rs::load_from_memory(bytes)))
        .map_err(|_| DecodeError::Panicked("image decoder panicked".into()))?
        .map_err(|err| match err {
            image_rs::ImageError::Unsupported(inner) => {
                DecodeError::UnsupportedVariant(inner.to_string())
            }
            other => DecodeError::Malformed(other.to_string()),
        })?;

    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(DecodeError::Empty);
    }
    Ok(TextureImage {
        width,
        height,
        handle: Handle::from_rgba(width, height, rgba.into_raw()),
    })
}

/// Runs [`decode_texture`] on the blocking pool.
pub async fn decode_texture_async(bytes: Arc<[u8]>) -> Result<TextureImage, DecodeError> {
    tokio::task::spawn_blocking(move || decode_texture(&bytes))
        .await
        .map_err(|err| DecodeError::Panicked(err.to_string()))?
}

pub fn view<'a, Message: 'a>(texture: &TextureImage, height: f32) -> Element<'a, Message> {
    Container::new(
        Image::new(texture.handle.clone())
            .content_fit(ContentFit::Contain)
            .width(Length::Fill)
            .height(Length::Fixed(height)),
    )
    .width(Length::Fill)
    .into()
}
