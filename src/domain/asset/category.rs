// SPDX-License-Identifier: MPL-2.0
//! Category canonicalization and filtering.
//!
//! The catalog stores categories as path-like strings (`uploads/models`,
//! `assets\textures`). Only the last segment matters, and only four buckets
//! exist. Anything else is excluded from every filtered view.

use super::types::Asset;
use std::fmt;

/// The fixed set of category buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CategoryToken {
    #[default]
    Models,
    Textures,
    Animations,
    Sounds,
}

impl CategoryToken {
    /// All buckets in sidebar order.
    pub const ALL: [CategoryToken; 4] = [
        CategoryToken::Models,
        CategoryToken::Textures,
        CategoryToken::Animations,
        CategoryToken::Sounds,
    ];

    /// Wire name of the bucket, as sent with uploads.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CategoryToken::Models => "models",
            CategoryToken::Textures => "textures",
            CategoryToken::Animations => "animations",
            CategoryToken::Sounds => "sounds",
        }
    }

    /// Parses an already canonical segment. Matching is exact.
    #[must_use]
    pub fn parse(segment: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|token| token.as_str() == segment)
    }

    /// Static English description, used when no translation is available.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            CategoryToken::Models => "3D models for AR/VR experiences",
            CategoryToken::Textures => "Texture images for surface details",
            CategoryToken::Animations => "Animation files for 3D models",
            CategoryToken::Sounds => "Sound effects and audio tracks",
        }
    }

    /// i18n key of the bucket label.
    #[must_use]
    pub fn label_key(self) -> &'static str {
        match self {
            CategoryToken::Models => "category-models",
            CategoryToken::Textures => "category-textures",
            CategoryToken::Animations => "category-animations",
            CategoryToken::Sounds => "category-sounds",
        }
    }

    /// i18n key of the bucket description.
    #[must_use]
    pub fn description_key(self) -> &'static str {
        match self {
            CategoryToken::Models => "category-models-description",
            CategoryToken::Textures => "category-textures-description",
            CategoryToken::Animations => "category-animations-description",
            CategoryToken::Sounds => "category-sounds-description",
        }
    }
}

impl fmt::Display for CategoryToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the last segment of a forward- or back-slash separated path.
///
/// The result contains no separator, so `classify(classify(x)) == classify(x)`.
#[must_use]
pub fn classify(raw: &str) -> &str {
    raw.rsplit(['/', '\\']).next().unwrap_or(raw)
}

/// Stable filter over the collection: keeps the assets whose canonical
/// category equals `token`, in their original order.
pub fn filter_by_category(
    assets: &[Asset],
    token: CategoryToken,
) -> impl Iterator<Item = &Asset> + '_ {
    assets
        .iter()
        .filter(move |asset| asset.category_token() == Some(token))
}

/// Number of assets per bucket, in [`CategoryToken::ALL`] order.
/// Assets outside the known buckets are not counted anywhere.
#[must_use]
pub fn count_by_category(assets: &[Asset]) -> [(CategoryToken, usize); 4] {
    CategoryToken::ALL.map(|token| (token, filter_by_category(assets, token).count()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn asset(id: &str, category: &str) -> Asset {
        Asset::new(id, format!("{id}.glb"), category)
    }

    #[test]
    fn classify_handles_both_separators() {
        assert_eq!(classify("uploads/models"), "models");
        assert_eq!(classify("C:\\assets\\textures"), "textures");
        assert_eq!(classify("mixed/path\\sounds"), "sounds");
        assert_eq!(classify("animations"), "animations");
    }

    #[test]
    fn classify_trailing_separator_yields_empty_segment() {
        assert_eq!(classify("uploads/models/"), "");
        assert_eq!(CategoryToken::parse(classify("uploads/models/")), None);
    }

    #[test]
    fn parse_is_exact() {
        assert_eq!(CategoryToken::parse("models"), Some(CategoryToken::Models));
        assert_eq!(CategoryToken::parse("Models"), None);
        assert_eq!(CategoryToken::parse("model"), None);
    }

    #[test]
    fn filter_preserves_order_and_excludes_unknown() {
        let assets = vec![
            asset("a", "uploads/models"),
            asset("b", "uploads/misc"),
            asset("c", "uploads/textures"),
            asset("d", "other\\models"),
            asset("e", "models/extra"),
        ];

        let ids: Vec<&str> = filter_by_category(&assets, CategoryToken::Models)
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "d"]);

        for token in CategoryToken::ALL {
            assert!(filter_by_category(&assets, token).all(|a| a.id.as_str() != "b"));
            assert!(filter_by_category(&assets, token).all(|a| a.id.as_str() != "e"));
        }
    }

    #[test]
    fn counts_skip_unknown_buckets() {
        let assets = vec![
            asset("a", "models"),
            asset("b", "models"),
            asset("c", "sounds"),
            asset("d", "videos"),
        ];
        let counts = count_by_category(&assets);
        assert_eq!(counts[0], (CategoryToken::Models, 2));
        assert_eq!(counts[1], (CategoryToken::Textures, 0));
        assert_eq!(counts[3], (CategoryToken::Sounds, 1));
        assert_eq!(counts.iter().map(|(_, n)| n).sum::<usize>(), 3);
    }

    #[test]
    fn descriptions_match_catalog_copy() {
        assert_eq!(
            CategoryToken::Models.description(),
            "3D models for AR/VR experiences"
        );
        assert_eq!(
            CategoryToken::Sounds.description(),
            "Sound effects and audio tracks"
        );
    }

    proptest! {
        #[test]
        fn classify_is_idempotent(raw in "[a-z/\\\\. ]{0,24}") {
            let once = classify(&raw);
            prop_assert_eq!(classify(once), once);
        }

        #[test]
        fn unknown_segments_never_appear_in_any_view(segment in "[a-z]{1,12}") {
            prop_assume!(CategoryToken::parse(&segment).is_none());
            let assets = vec![asset("x", &format!("uploads/{segment}"))];
            for token in CategoryToken::ALL {
                prop_assert_eq!(filter_by_category(&assets, token).count(), 0);
            }
        }
    }
}
