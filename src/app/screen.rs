// SPDX-License-Identifier: MPL-2.0
//! Screen enumeration for application navigation.

/// Screens the user can navigate between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Login and signup forms. Shown whenever no session is held.
    Auth,
    /// Category sidebar, upload panel, asset grid and shared-link panel.
    Catalog,
}
