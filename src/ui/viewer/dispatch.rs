// SPDX-License-Identifier: MPL-2.0
//! Picks and drives the viewer for one expanded asset.
//!
//! A [`Pane`] exists exactly while its preview context holds a mount. Its
//! content starts [`Content::Pending`] when bytes must be fetched and
//! decoded; the result comes back tagged with the mount it was started for,
//! and results for any other mount are dropped.

use super::boundary::{ComponentPath, Failure, Supervised};
use super::model_canvas::{ModelCanvas, PreparedModel};
use super::texture::{self, TextureImage};
use crate::application::port::{AuthToken, CatalogService};
use crate::domain::asset::{Asset, AssetId, CategoryToken};
use crate::domain::format::{self, DecoderKind, FormatToken, Resolution};
use crate::domain::preview::{Mount, MountId, PreviewContext};
use crate::error::Error;
use crate::i18n::fluent::I18n;
use crate::scene::{self, DecodeError};
use crate::ui::design_tokens::{palette, spacing, typography};
use crate::ui::styles;
use crate::ui::widgets::AnimatedSpinner;
use iced::widget::{text, Column, Container};
use iced::{alignment, Element, Length};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// What an expanded asset shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    Model(DecoderKind),
    Texture,
    /// A model whose suffix has no decoder. Nothing is fetched.
    Unsupported(FormatToken),
    /// Categories without a visual preview.
    NoPreview,
}

impl Plan {
    #[must_use]
    pub fn for_asset(asset: &Asset) -> Self {
        match asset.category_token() {
            Some(CategoryToken::Models) => match format::resolve_name(&asset.name) {
                Resolution::Decoder(kind) => Plan::Model(kind),
                Resolution::Unsupported(token) => Plan::Unsupported(token),
            },
            Some(CategoryToken::Textures) => Plan::Texture,
            _ => Plan::NoPreview,
        }
    }

    /// Whether bytes must be fetched and decoded.
    #[must_use]
    pub fn needs_load(&self) -> bool {
        matches!(self, Plan::Model(_) | Plan::Texture)
    }

    fn component(&self) -> &'static str {
        match self {
            Plan::Model(_) | Plan::Unsupported(_) => "model-viewer",
            Plan::Texture => "texture-viewer",
            Plan::NoPreview => "details",
        }
    }
}

/// Decoded, displayable content.
#[derive(Debug, Clone)]
pub enum Loaded {
    Model(Arc<PreparedModel>),
    Texture(TextureImage),
}

#[derive(Debug, Clone)]
pub enum Content {
    Pending,
    Ready(Loaded),
    Unsupported(FormatToken),
    NoPreview,
    /// No embedded payload and no session to download one with.
    MissingData,
}

/// Where the bytes of an asset come from.
#[derive(Clone)]
pub enum PayloadSource {
    /// Bytes shipped with the asset record (shared-link fetches).
    Embedded(Arc<[u8]>),
    /// Bytes fetched through the download endpoint.
    Remote {
        service: Arc<dyn CatalogService>,
        auth: AuthToken,
        id: AssetId,
    },
}

impl PayloadSource {
    /// Prefers the embedded payload and falls back to a download. The
    /// download route needs a session, so `None` means there is nothing to
    /// fetch the bytes from.
    #[must_use]
    pub fn for_asset(
        asset: &Asset,
        service: Arc<dyn CatalogService>,
        auth: Option<AuthToken>,
    ) -> Option<Self> {
        match (&asset.payload, auth) {
            (Some(payload), _) if !payload.is_empty() => {
                Some(PayloadSource::Embedded(payload.shared()))
            }
            (_, Some(auth)) => Some(PayloadSource::Remote {
                service,
                auth,
                id: asset.id.clone(),
            }),
            (_, None) => None,
        }
    }

    async fn fetch(self) -> Result<Arc<[u8]>, Error> {
        match self {
            PayloadSource::Embedded(bytes) => Ok(bytes),
            PayloadSource::Remote { service, auth, id } => {
                let response = service.download_asset(Some(&auth), &id).await?;
                let bytes = response.into_bytes().await?;
                Ok(Arc::from(bytes))
            }
        }
    }
}

/// Fetches and decodes the content for `plan`.
pub async fn load(source: PayloadSource, plan: Plan) -> Result<Loaded, Error> {
    match plan {
        Plan::Model(kind) => {
            let bytes = source.fetch().await?;
            let model = tokio::task::spawn_blocking(move || prepare_model(kind, &bytes))
                .await
                .map_err(|err| DecodeError::Panicked(err.to_string()))??;
            Ok(Loaded::Model(Arc::new(model)))
        }
        Plan::Texture => {
            let bytes = source.fetch().await?;
            Ok(Loaded::Texture(texture::decode_texture_async(bytes).await?))
        }
        Plan::Unsupported(_) | Plan::NoPreview => {
            Err(Error::Decode(DecodeError::UnsupportedVariant(
                "nothing to load".into(),
            )))
        }
    }
}

/// Decodes and prepares a model in one panic-guarded step.
pub fn prepare_model(kind: DecoderKind, bytes: &[u8]) -> Result<PreparedModel, DecodeError> {
    let scene = scene::decode_guarded(kind, bytes)?;
    panic::catch_unwind(AssertUnwindSafe(|| PreparedModel::prepare(&scene)))
        .unwrap_or_else(|_| Err(DecodeError::Panicked("scene preparation panicked".into())))
}

/// One mounted viewer behind its failure boundary.
#[derive(Debug, Clone)]
pub struct Pane {
    asset: AssetId,
    mount: MountId,
    plan: Plan,
    path: ComponentPath,
    content: Supervised<Content>,
}

impl Pane {
    #[must_use]
    pub fn new(context: PreviewContext, asset: &Asset, mount: MountId) -> Self {
        let plan = Plan::for_asset(asset);
        let path = ComponentPath::new(context, &asset.id, plan.component());
        let content = match &plan {
            Plan::Model(_) | Plan::Texture => Content::Pending,
            Plan::Unsupported(token) => Content::Unsupported(token.clone()),
            Plan::NoPreview => Content::NoPreview,
        };
        log::debug!("{path}: mounted as {mount}");
        Self {
            asset: asset.id.clone(),
            mount,
            plan,
            path,
            content: Supervised::healthy(content),
        }
    }

    /// Builds the pane for a freshly mounted preview.
    #[must_use]
    pub fn from_mount(context: PreviewContext, mount: &Mount, asset: &Asset) -> Self {
        Self::new(context, asset, mount.mount)
    }

    #[must_use]
    pub fn asset(&self) -> &AssetId {
        &self.asset
    }

    #[must_use]
    pub fn mount(&self) -> MountId {
        self.mount
    }

    #[must_use]
    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    #[must_use]
    pub fn path(&self) -> &ComponentPath {
        &self.path
    }

    #[must_use]
    pub fn content(&self) -> &Supervised<Content> {
        &self.content
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self.content.get(), Some(Content::Pending))
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.content.is_failed()
    }

    /// Settles a pending pane whose bytes cannot be obtained.
    pub fn mark_payload_missing(&mut self) {
        log::debug!("{}: no payload to load", self.path);
        self.content.update(&self.path, |content| {
            if matches!(content, Content::Pending) {
                *content = Content::MissingData;
            }
            Ok(())
        });
    }

    /// Applies a load result. Returns `false` when it belongs to another mount.
    pub fn apply(&mut self, mount: MountId, result: Result<Loaded, Error>) -> bool {
        if mount != self.mount {
            log::debug!("{}: dropping result for stale mount {mount}", self.path);
            return false;
        }
        match result {
            Ok(loaded) => self.content.update(&self.path, |content| {
                if matches!(content, Content::Pending) {
                    *content = Content::Ready(loaded);
                }
                Ok(())
            }),
            Err(error) => self.content.fail(&self.path, error),
        }
        true
    }

    pub fn view<'a, Message: 'a>(&'a self, ctx: ViewContext<'a>) -> Element<'a, Message> {
        let body = self.content.view(
            |content| match content {
                Content::Pending => pending(ctx),
                Content::Ready(Loaded::Model(model)) => {
                    ModelCanvas::new(Arc::clone(model), self.mount).view(ctx.height)
                }
                Content::Ready(Loaded::Texture(image)) => texture::view(image, ctx.height),
                Content::Unsupported(token) => {
                    let format = if token.as_str().is_empty() {
                        ctx.i18n.tr("viewer-format-none")
                    } else {
                        token.as_str().to_string()
                    };
                    notice(
                        ctx,
                        ctx.i18n
                            .tr_with_args("viewer-unsupported-format", &[("format", format.as_str())]),
                    )
                }
                Content::NoPreview => notice(ctx, ctx.i18n.tr("viewer-no-preview")),
                Content::MissingData => notice(ctx, ctx.i18n.tr("viewer-missing-data")),
            },
            |failure| fallback(ctx, failure),
        );

        Container::new(body)
            .width(Length::Fill)
            .style(styles::container::viewport)
            .into()
    }
}

/// Rendering inputs shared by every pane.
#[derive(Clone, Copy)]
pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub height: f32,
    pub spinner_rotation: f32,
}

fn pending<'a, Message: 'a>(ctx: ViewContext<'a>) -> Element<'a, Message> {
    let spinner = AnimatedSpinner::new(palette::PRIMARY_400, ctx.spinner_rotation).into_element();
    let label = text(ctx.i18n.tr("viewer-loading"))
        .size(typography::BODY_SM)
        .color(palette::GRAY_200);
    centered(
        ctx,
        Column::new()
            .spacing(spacing::SM)
            .align_x(alignment::Horizontal::Center)
            .push(spinner)
            .push(label)
            .into(),
    )
}

fn notice<'a, Message: 'a>(ctx: ViewContext<'a>, message: String) -> Element<'a, Message> {
    centered(
        ctx,
        text(message)
            .size(typography::BODY)
            .color(palette::GRAY_200)
            .into(),
    )
}

fn fallback<'a, Message: 'a>(ctx: ViewContext<'a>, failure: &'a Failure) -> Element<'a, Message> {
    let title = text(ctx.i18n.tr("viewer-failed"))
        .size(typography::BODY)
        .color(palette::ERROR_500);
    let detail = text(failure.error.to_string())
        .size(typography::CAPTION)
        .color(palette::GRAY_400);
    centered(
        ctx,
        Column::new()
            .spacing(spacing::XS)
            .align_x(alignment::Horizontal::Center)
            .push(title)
            .push(detail)
            .into(),
    )
}

fn centered<'a, Message: 'a>(
    ctx: ViewContext<'a>,
    content: Element<'a, Message>,
) -> Element<'a, Message> {
    Container::new(content)
        .width(Length::Fill)
        .height(Length::Fixed(ctx.height))
        .center_x(Length::Fill)
        .center_y(Length::Fixed(ctx.height))
        .into()
}
