// SPDX-License-Identifier: MPL-2.0
//! HTTP adapter for the remote catalog.

mod client;
pub mod dto;

pub use client::HttpCatalog;
