// SPDX-License-Identifier: MPL-2.0
//! Shared-link preview pipeline.
//!
//! Runs beside the authenticated grid with its own single-asset collection
//! and its own expansion controller. Successful resolutions replace the
//! preview and collapse it. Failures leave the previous preview in place.
//! Resolutions are never cancelled: whichever completes last wins.

use super::port::{CatalogError, CatalogService};
use crate::domain::asset::{Asset, ShareToken};
use crate::domain::preview::{PreviewController, Transition};
use crate::error::{Error, Result, ValidationError};
use std::sync::Arc;

/// Shared-link preview state.
#[derive(Debug, Clone, Default)]
pub struct ShareLinkResolver {
    preview: Option<Asset>,
    controller: PreviewController,
}

impl ShareLinkResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates user input before any request is issued.
    pub fn validate(raw: &str) -> std::result::Result<ShareToken, ValidationError> {
        ShareToken::parse(raw).ok_or(ValidationError::EmptyShareToken)
    }

    /// Applies a resolution result.
    pub fn apply(&mut self, result: std::result::Result<Asset, CatalogError>) -> Result<Transition> {
        let asset = result.map_err(Error::from)?;
        log::debug!("shared-link preview replaced with asset {}", asset.id);
        self.preview = Some(asset);
        Ok(self.controller.reset())
    }

    #[must_use]
    pub fn preview(&self) -> Option<&Asset> {
        self.preview.as_ref()
    }

    #[must_use]
    pub fn controller(&self) -> &PreviewController {
        &self.controller
    }

    /// Whether the "Load Model" control applies to the current preview.
    #[must_use]
    pub fn offers_model_view(&self) -> bool {
        self.preview.as_ref().is_some_and(Asset::is_model)
    }

    /// Toggles the model view of the current preview. No-op when the
    /// preview is not a model.
    pub fn toggle_model(&mut self) -> Transition {
        match &self.preview {
            Some(asset) if asset.is_model() => self.controller.toggle(asset.id.clone()),
            _ => Transition::default(),
        }
    }
}

/// Issues the single fetch for `token`.
pub async fn resolve(
    service: Arc<dyn CatalogService>,
    token: ShareToken,
) -> std::result::Result<Asset, CatalogError> {
    log::debug!("resolving shared link");
    service.resolve_public_asset(&token).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(id: &str) -> Asset {
        Asset::new(id, format!("{id}.glb"), "uploads/models").with_payload(vec![0; 4])
    }

    #[test]
    fn blank_token_is_rejected() {
        assert_eq!(
            ShareLinkResolver::validate("  "),
            Err(ValidationError::EmptyShareToken)
        );
        assert!(ShareLinkResolver::validate("abc").is_ok());
    }

    #[test]
    fn success_replaces_preview_and_collapses() {
        let mut resolver = ShareLinkResolver::new();
        resolver.apply(Ok(model("a"))).expect("applied");
        resolver.toggle_model();
        assert!(resolver.controller().expanded().is_some());

        let transition = resolver.apply(Ok(model("b"))).expect("applied");
        assert!(transition.unmounted.is_some());
        assert!(resolver.controller().expanded().is_none());
        assert_eq!(resolver.preview().map(|a| a.id.as_str()), Some("b"));
    }

    #[test]
    fn failure_keeps_prior_preview() {
        let mut resolver = ShareLinkResolver::new();
        resolver.apply(Ok(model("a"))).expect("applied");
        resolver.toggle_model();

        let result = resolver.apply(Err(CatalogError::NotFound));
        assert!(matches!(result, Err(Error::NotFound)));
        assert_eq!(resolver.preview().map(|a| a.id.as_str()), Some("a"));
        assert!(resolver.controller().expanded().is_some());
    }

    #[test]
    fn last_completion_wins() {
        let mut resolver = ShareLinkResolver::new();
        resolver.apply(Ok(model("second"))).expect("applied");
        resolver.apply(Ok(model("first"))).expect("applied");
        assert_eq!(resolver.preview().map(|a| a.id.as_str()), Some("first"));
    }

    #[test]
    fn model_view_only_for_models() {
        let mut resolver = ShareLinkResolver::new();
        resolver
            .apply(Ok(Asset::new("t", "wood.png", "uploads/textures")))
            .expect("applied");
        assert!(!resolver.offers_model_view());
        assert!(resolver.toggle_model().is_noop());

        resolver.apply(Ok(model("m"))).expect("applied");
        assert!(resolver.offers_model_view());
        assert!(resolver.toggle_model().mounted.is_some());
    }
}
