// SPDX-License-Identifier: MPL-2.0
//! Preview expansion state machine.
//!
//! Each rendering context (the authenticated grid and the shared-link
//! preview) owns one [`PreviewController`]. At most one asset is expanded per
//! context. Entering `Expanded` is the only thing that mounts a viewer, and
//! every mount gets a fresh [`MountId`] so results addressed to an earlier
//! mount can be recognised and dropped.

use super::asset::AssetId;
use std::fmt;

/// Rendering contexts holding an independent expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreviewContext {
    Grid,
    SharedLink,
}

impl PreviewContext {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PreviewContext::Grid => "grid",
            PreviewContext::SharedLink => "shared-link",
        }
    }
}

impl fmt::Display for PreviewContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of one viewer mount. Unique for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MountId(u64);

impl MountId {
    fn next() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for MountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Expansion state of one context.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PreviewState {
    #[default]
    NoneExpanded,
    Expanded { asset: AssetId, mount: MountId },
}

/// A viewer pair addressed by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mount {
    pub asset: AssetId,
    pub mount: MountId,
}

/// What a state change requires from the view layer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Transition {
    /// Viewer to tear down, discarding any partial decode state.
    pub unmounted: Option<Mount>,
    /// Viewer to create.
    pub mounted: Option<Mount>,
}

impl Transition {
    /// Returns `true` when nothing changed.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.unmounted.is_none() && self.mounted.is_none()
    }
}

/// Per-context toggle controller.
#[derive(Debug, Clone, Default)]
pub struct PreviewController {
    state: PreviewState,
}

impl PreviewController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> &PreviewState {
        &self.state
    }

    /// Currently expanded asset, if any.
    #[must_use]
    pub fn expanded(&self) -> Option<&AssetId> {
        match &self.state {
            PreviewState::NoneExpanded => None,
            PreviewState::Expanded { asset, .. } => Some(asset),
        }
    }

    #[must_use]
    pub fn is_expanded(&self, id: &AssetId) -> bool {
        self.expanded() == Some(id)
    }

    /// Mount id of the live viewer, if any.
    #[must_use]
    pub fn current_mount(&self) -> Option<MountId> {
        match &self.state {
            PreviewState::NoneExpanded => None,
            PreviewState::Expanded { mount, .. } => Some(*mount),
        }
    }

    /// Returns `true` if `mount` is the live viewer of this context.
    #[must_use]
    pub fn accepts(&self, mount: MountId) -> bool {
        self.current_mount() == Some(mount)
    }

    /// Toggles `id`: collapses it if expanded, otherwise expands it and
    /// implicitly collapses whatever was open.
    pub fn toggle(&mut self, id: AssetId) -> Transition {
        let unmounted = self.take_mount();
        match unmounted {
            Some(previous) if previous.asset == id => Transition {
                unmounted: Some(previous),
                mounted: None,
            },
            previous => {
                let mount = MountId::next();
                self.state = PreviewState::Expanded {
                    asset: id.clone(),
                    mount,
                };
                Transition {
                    unmounted: previous,
                    mounted: Some(Mount { asset: id, mount }),
                }
            }
        }
    }

    /// Collapses the context. Used when its collection is replaced wholesale.
    pub fn reset(&mut self) -> Transition {
        Transition {
            unmounted: self.take_mount(),
            mounted: None,
        }
    }

    /// Collapses the context only if `id` is the expanded asset.
    pub fn on_removed(&mut self, id: &AssetId) -> Transition {
        if self.is_expanded(id) {
            self.reset()
        } else {
            Transition::default()
        }
    }

    fn take_mount(&mut self) -> Option<Mount> {
        match std::mem::take(&mut self.state) {
            PreviewState::NoneExpanded => None,
            PreviewState::Expanded { asset, mount } => Some(Mount { asset, mount }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn id(raw: &str) -> AssetId {
        AssetId::new(raw)
    }

    #[test]
    fn starts_collapsed() {
        let controller = PreviewController::new();
        assert_eq!(controller.state(), &PreviewState::NoneExpanded);
        assert!(controller.current_mount().is_none());
    }

    #[test]
    fn toggling_twice_collapses() {
        let mut controller = PreviewController::new();
        let first = controller.toggle(id("a"));
        assert!(first.unmounted.is_none());
        let mounted = first.mounted.expect("mounted");

        let second = controller.toggle(id("a"));
        assert_eq!(second.unmounted, Some(mounted));
        assert!(second.mounted.is_none());
        assert_eq!(controller.state(), &PreviewState::NoneExpanded);
    }

    #[test]
    fn expanding_other_replaces_open_one() {
        let mut controller = PreviewController::new();
        let a = controller.toggle(id("a")).mounted.expect("a mounted");

        let transition = controller.toggle(id("b"));
        assert_eq!(transition.unmounted, Some(a.clone()));
        let b = transition.mounted.expect("b mounted");
        assert_eq!(b.asset, id("b"));
        assert_ne!(b.mount, a.mount);
        assert!(controller.is_expanded(&id("b")));
        assert!(!controller.is_expanded(&id("a")));
    }

    #[test]
    fn reopening_gets_a_fresh_mount() {
        let mut controller = PreviewController::new();
        let first = controller.toggle(id("a")).mounted.expect("mounted");
        controller.toggle(id("a"));
        let second = controller.toggle(id("a")).mounted.expect("mounted");
        assert_ne!(first.mount, second.mount);
        assert!(!controller.accepts(first.mount));
        assert!(controller.accepts(second.mount));
    }

    #[test]
    fn removing_expanded_asset_collapses() {
        let mut controller = PreviewController::new();
        controller.toggle(id("a"));
        let transition = controller.on_removed(&id("a"));
        assert!(transition.unmounted.is_some());
        assert!(controller.expanded().is_none());
    }

    #[test]
    fn removing_other_asset_keeps_expansion() {
        let mut controller = PreviewController::new();
        controller.toggle(id("a"));
        let transition = controller.on_removed(&id("b"));
        assert!(transition.is_noop());
        assert!(controller.is_expanded(&id("a")));
    }

    #[test]
    fn reset_when_collapsed_is_noop() {
        let mut controller = PreviewController::new();
        assert!(controller.reset().is_noop());
    }

    proptest! {
        #[test]
        fn at_most_one_expansion(ops in proptest::collection::vec(0u8..4, 0..40)) {
            let mut controller = PreviewController::new();
            let mut live: Option<Mount> = None;
            for op in ops {
                let transition = if op == 3 {
                    controller.reset()
                } else {
                    controller.toggle(id(&op.to_string()))
                };
                if let Some(mount) = &transition.unmounted {
                    prop_assert_eq!(Some(mount), live.as_ref());
                    live = None;
                }
                if let Some(mount) = transition.mounted {
                    prop_assert!(live.is_none());
                    live = Some(mount);
                }
                prop_assert_eq!(controller.current_mount(), live.as_ref().map(|m| m.mount));
            }
        }
    }
}
