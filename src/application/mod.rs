// SPDX-License-Identifier: MPL-2.0
//! Application layer - Use cases and orchestration.
//!
//! This module contains the application layer of the Clean Architecture:
//!
//! - [`port`]: Trait definitions (interfaces) for dependency inversion
//! - [`grid`]: The authenticated catalog view (collection, active category,
//!   grid expansion)
//! - [`share_link`]: The shared-link preview pipeline
//!
//! # Dependency Rule
//!
//! - Application layer depends on domain layer (uses domain types)
//! - Infrastructure layer implements application layer ports
//! - Presentation layer uses application layer services
//!
//! # Example
//!
//! ```ignore
//! use asset_lens::application::grid::CatalogGrid;
//! use asset_lens::application::port::CatalogService;
//!
//! let mut grid = CatalogGrid::new();
//! let assets = service.list_assets(&token).await;
//! grid.apply_list(assets)?;
//! ```

pub mod grid;
pub mod port;
pub mod share_link;
