// SPDX-License-Identifier: MPL-2.0
//! Domain layer - Core catalog rules with ZERO external dependencies.
//!
//! This module contains pure domain types, value objects, and business rules.
//! It has no dependencies on external crates (except `std`) to ensure
//! testability and architectural purity.
//!
//! # Modules
//!
//! - [`asset`]: Catalog records ([`Asset`](asset::Asset)) and category
//!   canonicalization ([`CategoryToken`](asset::CategoryToken), [`classify`](asset::classify))
//! - [`format`]: Suffix-based decoder selection ([`FormatToken`](format::FormatToken),
//!   [`DecoderKind`](format::DecoderKind))
//! - [`preview`]: Per-context expansion state machine
//!   ([`PreviewController`](preview::PreviewController))
//! - [`download`]: Filename inference for retrieved binaries
//!   ([`DownloadName`](download::DownloadName))

pub mod asset;
pub mod download;
pub mod format;
pub mod preview;
