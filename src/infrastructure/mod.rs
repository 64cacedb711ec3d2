// SPDX-License-Identifier: MPL-2.0
//! Infrastructure layer adapters.
//!
//! Concrete implementations of the ports defined in `application::port`,
//! wrapping external dependencies such as `reqwest` and the file system.
//!
//! # Available Adapters
//!
//! - [`http`]: Remote catalog over HTTP (implements [`CatalogService`])
//! - [`download`]: Staged, dialog-driven download persistence
//!
//! [`CatalogService`]: crate::application::port::CatalogService

pub mod download;
pub mod http;

pub use download::{save_download, SaveOutcome};
pub use http::HttpCatalog;
