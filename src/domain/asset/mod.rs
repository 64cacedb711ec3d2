// SPDX-License-Identifier: MPL-2.0
//! Catalog asset records and category canonicalization.

mod category;
mod types;

pub use category::{classify, count_by_category, filter_by_category, CategoryToken};
pub use types::{Asset, AssetId, Payload, ShareToken, UserId};
