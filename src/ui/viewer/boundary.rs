// SPDX-License-Identifier: MPL-2.0
//! Failure containment for mounted viewers.
//!
//! A [`Supervised`] value wraps the state of exactly one viewer mount. The
//! first failure observed for that mount, including a panic caught while the
//! content was prepared, permanently replaces the state with a [`Failure`]. Nothing
//! retries; a fresh mount starts healthy again.

use crate::domain::asset::AssetId;
use crate::domain::preview::PreviewContext;
use crate::error::Error;
use iced::Element;
use std::fmt;

/// Where a viewer sits in the UI, e.g. `grid/preview[64f0]/model-viewer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentPath(String);

impl ComponentPath {
    #[must_use]
    pub fn new(context: PreviewContext, asset: &AssetId, component: &str) -> Self {
        Self(format!("{context}/preview[{asset}]/{component}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A contained failure.
#[derive(Debug, Clone)]
pub struct Failure {
    pub path: ComponentPath,
    pub error: Error,
}

/// Viewer state behind a failure boundary.
#[derive(Debug, Clone)]
pub enum Supervised<T> {
    Healthy(T),
    Failed(Failure),
}

impl<T> Supervised<T> {
    #[must_use]
    pub fn healthy(value: T) -> Self {
        Supervised::Healthy(value)
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Supervised::Failed(_))
    }

    #[must_use]
    pub fn get(&self) -> Option<&T> {
        match self {
            Supervised::Healthy(value) => Some(value),
            Supervised::Failed(_) => None,
        }
    }

    #[must_use]
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Supervised::Healthy(_) => None,
            Supervised::Failed(failure) => Some(failure),
        }
    }

    /// Trips the boundary. Only the first failure is kept and logged.
    pub fn fail(&mut self, path: &ComponentPath, error: Error) {
        if self.is_failed() {
            log::debug!("{path}: ignoring further failure: {error}");
            return;
        }
        *self = Supervised::Failed(Self::report(path, error));
    }

    /// Applies a fallible change to the healthy state. An error trips the
    /// boundary; a failed boundary ignores the change.
    pub fn update<F>(&mut self, path: &ComponentPath, change: F)
    where
        F: FnOnce(&mut T) -> Result<(), Error>,
    {
        let Supervised::Healthy(value) = self else {
            return;
        };
        if let Err(error) = change(value) {
            self.fail(path, error);
        }
    }

    /// Renders the healthy state, or the static fallback.
    pub fn view<'a, Message>(
        &'a self,
        healthy: impl FnOnce(&'a T) -> Element<'a, Message>,
        fallback: impl FnOnce(&'a Failure) -> Element<'a, Message>,
    ) -> Element<'a, Message> {
        match self {
            Supervised::Healthy(value) => healthy(value),
            Supervised::Failed(failure) => fallback(failure),
        }
    }

    fn report(path: &ComponentPath, error: Error) -> Failure {
        log::error!("{path}: viewer failed: {error}");
        Failure {
            path: path.clone(),
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::DecodeError;

    fn path() -> ComponentPath {
        ComponentPath::new(PreviewContext::Grid, &AssetId::new("a1"), "model-viewer")
    }

    #[test]
    fn path_names_context_asset_and_component() {
        assert_eq!(path().as_str(), "grid/preview[a1]/model-viewer");
        let shared =
            ComponentPath::new(PreviewContext::SharedLink, &AssetId::new("z"), "texture-viewer");
        assert_eq!(shared.as_str(), "shared-link/preview[z]/texture-viewer");
    }

    #[test]
    fn first_failure_wins() {
        let mut state = Supervised::healthy(0_u32);
        state.fail(&path(), Error::NotFound);
        state.fail(&path(), Error::Network("later".into()));
        let failure = state.failure().expect("failed");
        assert!(matches!(failure.error, Error::NotFound));
    }

    #[test]
    fn failed_state_ignores_updates() {
        let mut state = Supervised::healthy(1_u32);
        state.fail(&path(), Error::NotFound);
        let mut called = false;
        state.update(&path(), |_| {
            called = true;
            Ok(())
        });
        assert!(!called);
        assert!(state.get().is_none());
    }

    #[test]
    fn update_error_trips_boundary() {
        let mut state = Supervised::healthy(1_u32);
        state.update(&path(), |value| {
            *value += 1;
            Ok(())
        });
        assert_eq!(state.get(), Some(&2));
        state.update(&path(), |_| Err(Error::Decode(DecodeError::Empty)));
        assert!(state.is_failed());
    }
}
