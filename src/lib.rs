// SPDX-License-Identifier: MPL-2.0
//! `asset_lens` is a desktop client for an AR/VR asset catalog, built with the
//! Iced GUI framework.
//!
//! Users sign in, browse their assets by category, upload and delete files,
//! preview 3D models and textures inline, and resolve public share links.
//! Every preview runs behind a failure boundary so a malformed file only
//! takes down its own viewer.

pub mod app;
pub mod application;
pub mod domain;
pub mod error;
pub mod i18n;
pub mod infrastructure;
pub mod scene;
pub mod ui;

pub use app::config;
