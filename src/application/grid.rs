// SPDX-License-Identifier: MPL-2.0
//! Authenticated catalog view.
//!
//! [`CatalogGrid`] owns the in-memory asset collection together with the
//! active category and the grid's expansion controller. The collection is
//! mutated by exactly three completions (list, upload, delete), each applied
//! in one step and only after the request finished. A failed request leaves
//! everything untouched.

use super::port::{CatalogError, UploadOutcome};
use crate::domain::asset::{filter_by_category, Asset, AssetId, CategoryToken};
use crate::domain::preview::{PreviewController, Transition};
use crate::error::{Error, Result};

/// Effect of a completed upload on the collection.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadApplied {
    /// The new asset was appended.
    Appended(AssetId),
    /// Nothing was appended; the server already holds this version.
    Duplicate(String),
}

/// Collection, filter and expansion of the authenticated grid.
#[derive(Debug, Clone, Default)]
pub struct CatalogGrid {
    assets: Vec<Asset>,
    active_category: CategoryToken,
    preview: PreviewController,
}

impl CatalogGrid {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_category(category: CategoryToken) -> Self {
        Self {
            active_category: category,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    #[must_use]
    pub fn get(&self, id: &AssetId) -> Option<&Asset> {
        self.assets.iter().find(|asset| &asset.id == id)
    }

    #[must_use]
    pub fn active_category(&self) -> CategoryToken {
        self.active_category
    }

    /// Switches the filter. The expansion is kept; it is simply not shown
    /// while its asset is filtered out.
    pub fn select_category(&mut self, category: CategoryToken) {
        self.active_category = category;
    }

    /// Assets of the active category, in collection order.
    pub fn visible(&self) -> impl Iterator<Item = &Asset> + '_ {
        filter_by_category(&self.assets, self.active_category)
    }

    #[must_use]
    pub fn preview(&self) -> &PreviewController {
        &self.preview
    }

    /// Toggles the expansion of `id`.
    pub fn toggle(&mut self, id: AssetId) -> Transition {
        self.preview.toggle(id)
    }

    /// Applies a list completion: replaces the collection wholesale and
    /// collapses the grid.
    pub fn apply_list(&mut self, result: std::result::Result<Vec<Asset>, CatalogError>) -> Result<Transition> {
        let assets = result.map_err(Error::from)?;
        log::debug!("catalog list replaced with {} assets", assets.len());
        self.assets = assets;
        Ok(self.preview.reset())
    }

    /// Applies an upload completion.
    pub fn apply_upload(
        &mut self,
        result: std::result::Result<UploadOutcome, CatalogError>,
    ) -> Result<UploadApplied> {
        match result.map_err(Error::from)? {
            UploadOutcome::Created(asset) => {
                let id = asset.id.clone();
                self.assets.push(asset);
                Ok(UploadApplied::Appended(id))
            }
            UploadOutcome::DuplicateVersion(message) => Ok(UploadApplied::Duplicate(message)),
        }
    }

    /// Applies a delete completion. Collapses the grid only when the deleted
    /// asset was the expanded one.
    pub fn apply_delete(
        &mut self,
        id: &AssetId,
        result: std::result::Result<(), CatalogError>,
    ) -> Result<Transition> {
        result.map_err(Error::from)?;
        self.assets.retain(|asset| &asset.id != id);
        Ok(self.preview.on_removed(id))
    }

    /// Drops every record on sign-out.
    pub fn clear(&mut self) -> Transition {
        self.assets.clear();
        self.preview.reset()
    }
}
