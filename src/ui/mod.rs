// SPDX-License-Identifier: MPL-2.0
//! User interface components.
//!
//! Components follow the Elm-style "state down, messages up" pattern: each
//! exposes a `ViewContext`, a `Message`, and where it has behavior an
//! `update` returning an `Event` for the app to act on.
//!
//! # Screens
//!
//! - [`auth`] - Login and signup forms
//! - [`header`], [`sidebar`], [`upload_panel`], [`asset_card`],
//!   [`share_panel`] - Pieces of the catalog screen
//!
//! # Shared Infrastructure
//!
//! - [`viewer`] - Format dispatch, model and texture viewers, failure boundary
//! - [`widgets`] - Custom Iced widgets (spinner)
//! - [`styles`] - Centralized styling (buttons, containers)
//! - [`design_tokens`] - Design system constants (colors, spacing, sizing)
//! - [`notifications`] - Toast notification system for user feedback

pub mod asset_card;
pub mod auth;
pub mod design_tokens;
pub mod header;
pub mod notifications;
pub mod share_panel;
pub mod sidebar;
pub mod styles;
pub mod upload_panel;
pub mod viewer;
pub mod widgets;
