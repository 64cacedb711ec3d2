// SPDX-License-Identifier: MPL-2.0
//! Port definitions (traits) for dependency inversion.
//!
//! This module defines abstract interfaces that infrastructure adapters implement.
//! These traits use only domain types, ensuring the application layer remains
//! independent of concrete implementations.
//!
//! # Available Ports
//!
//! - [`catalog`]: Remote asset catalog (list, resolve, upload, delete,
//!   download) and the authentication collaborator
//!
//! # Design Notes
//!
//! - All traits use domain types only (no Iced handles, no `reqwest` types)
//! - Traits are `Send + Sync` so they can be shared with async tasks
//! - Methods return `Result` with [`CatalogError`]
//! - The auth token is an explicit argument, never ambient state

pub mod catalog;

pub use catalog::{
    AuthToken, ByteStream, CatalogError, CatalogService, Credentials, DownloadResponse, Session,
    SignupRequest, UploadOutcome, UploadRequest, DUPLICATE_VERSION_MESSAGE,
};
