// SPDX-License-Identifier: MPL-2.0
//! Decoder selection from a display-name suffix.
//!
//! The mapping is closed: a token either names one of the known decoders or
//! resolves to [`Resolution::Unsupported`]. MIME types are never consulted.
//! Supporting a new format means adding a token here and a decoder behind
//! the matching [`DecoderKind`].

use std::fmt;

/// Lowercase trailing suffix of an asset's display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FormatToken(String);

impl FormatToken {
    /// Creates a token from a raw suffix (without the dot).
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self(raw.to_ascii_lowercase())
    }

    /// Extracts the token from a display name.
    ///
    /// Returns `None` when the name has no dot or ends with one.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let (_, suffix) = name.rsplit_once('.')?;
        if suffix.is_empty() {
            None
        } else {
            Some(Self::new(suffix))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FormatToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Scene-graph container formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneGraphFormat {
    /// glTF 2.0, JSON (`.gltf`) or binary (`.glb`).
    Gltf,
    /// Autodesk FBX binary.
    Fbx,
    /// COLLADA XML.
    Collada,
}

/// Decoder families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecoderKind {
    /// Node hierarchy with transforms and materials.
    SceneGraph(SceneGraphFormat),
    /// Geometry only (Wavefront OBJ).
    MeshOnly,
    /// Bare triangles without material (STL).
    RawGeometry,
}

/// Uniform scale applied to scene-graph and mesh-only decoders.
pub const MODEL_SCALE: f32 = 1.5;

impl DecoderKind {
    /// Uniform scale the viewer applies to decoded output.
    /// Raw geometry renders at native scale.
    #[must_use]
    pub fn scale(self) -> f32 {
        match self {
            DecoderKind::SceneGraph(_) | DecoderKind::MeshOnly => MODEL_SCALE,
            DecoderKind::RawGeometry => 1.0,
        }
    }

    /// Whether the decoded output must be paired with the neutral material.
    #[must_use]
    pub fn needs_default_material(self) -> bool {
        matches!(self, DecoderKind::RawGeometry)
    }
}

/// Outcome of resolving a format token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Decoder(DecoderKind),
    Unsupported(FormatToken),
}

/// Maps a token to its decoder.
#[must_use]
pub fn resolve(token: &FormatToken) -> Resolution {
    let kind = match token.as_str() {
        "gltf" | "glb" => DecoderKind::SceneGraph(SceneGraphFormat::Gltf),
        "obj" => DecoderKind::MeshOnly,
        "stl" => DecoderKind::RawGeometry,
        "fbx" => DecoderKind::SceneGraph(SceneGraphFormat::Fbx),
        "dae" => DecoderKind::SceneGraph(SceneGraphFormat::Collada),
        _ => return Resolution::Unsupported(token.clone()),
    };
    Resolution::Decoder(kind)
}

/// Resolves straight from a display name. Names without a suffix are
/// unsupported, carrying an empty token.
#[must_use]
pub fn resolve_name(name: &str) -> Resolution {
    match FormatToken::from_name(name) {
        Some(token) => resolve(&token),
        None => Resolution::Unsupported(FormatToken::new("")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glb_selects_scene_graph_decoder() {
        assert_eq!(
            resolve(&FormatToken::new("glb")),
            Resolution::Decoder(DecoderKind::SceneGraph(SceneGraphFormat::Gltf))
        );
    }

    #[test]
    fn unknown_token_is_unsupported() {
        assert_eq!(
            resolve(&FormatToken::new("xyz")),
            Resolution::Unsupported(FormatToken::new("xyz"))
        );
    }

    #[test]
    fn closed_table_is_complete() {
        let expected = [
            ("gltf", DecoderKind::SceneGraph(SceneGraphFormat::Gltf)),
            ("glb", DecoderKind::SceneGraph(SceneGraphFormat::Gltf)),
            ("obj", DecoderKind::MeshOnly),
            ("stl", DecoderKind::RawGeometry),
            ("fbx", DecoderKind::SceneGraph(SceneGraphFormat::Fbx)),
            ("dae", DecoderKind::SceneGraph(SceneGraphFormat::Collada)),
        ];
        for (raw, kind) in expected {
            assert_eq!(resolve(&FormatToken::new(raw)), Resolution::Decoder(kind));
        }
    }

    #[test]
    fn token_comes_from_trailing_suffix_lowercased() {
        assert_eq!(
            FormatToken::from_name("Robot.Final.GLB"),
            Some(FormatToken::new("glb"))
        );
        assert_eq!(FormatToken::from_name("noextension"), None);
        assert_eq!(FormatToken::from_name("trailing."), None);
    }

    #[test]
    fn name_without_suffix_is_unsupported() {
        assert!(matches!(resolve_name("README"), Resolution::Unsupported(_)));
        assert!(matches!(resolve_name("chair.dae"), Resolution::Decoder(_)));
    }

    #[test]
    fn stl_renders_at_native_scale_with_material() {
        assert_eq!(DecoderKind::RawGeometry.scale(), 1.0);
        assert!(DecoderKind::RawGeometry.needs_default_material());
        assert_eq!(DecoderKind::MeshOnly.scale(), MODEL_SCALE);
        assert!(!DecoderKind::SceneGraph(SceneGraphFormat::Fbx).needs_default_material());
    }
}
