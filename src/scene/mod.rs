// SPDX-License-Identifier: MPL-2.0
//! Renderable geometry produced by the format decoders.
//!
//! Every decoder turns raw bytes into a [`Scene`]: a flat list of triangle
//! meshes in model space, each with a base color. Node hierarchies are
//! flattened by baking world transforms into the vertex positions.
//!
//! Decoding is CPU-bound; callers run [`decode_guarded`] on the blocking
//! pool. Panics raised inside third-party decoders are caught and reported
//! as [`DecodeError::Panicked`].

pub mod decoders;

use crate::domain::format::DecoderKind;
use glam::Vec3;
use std::panic::{self, AssertUnwindSafe};
use thiserror::Error;

pub use decoders::decode;

/// Decoder failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Bytes do not form a valid file of the expected format.
    #[error("malformed data: {0}")]
    Malformed(String),

    /// Valid file of a variant this client does not read.
    #[error("unsupported variant: {0}")]
    UnsupportedVariant(String),

    /// The file decoded but contains no triangles.
    #[error("no renderable geometry")]
    Empty,

    /// The decoder panicked.
    #[error("decoder panicked: {0}")]
    Panicked(String),
}

/// Surface color of a mesh, linear RGBA in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub base_color: [f32; 4],
}

impl Material {
    /// Neutral gray paired with formats that carry no material.
    pub const NEUTRAL: Material = Material {
        base_color: [0.5, 0.5, 0.5, 1.0],
    };

    /// Used when a format supports materials but the file defines none.
    pub const DEFAULT: Material = Material {
        base_color: [0.8, 0.8, 0.8, 1.0],
    };

    #[must_use]
    pub fn new(base_color: [f32; 4]) -> Self {
        Self { base_color }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Indexed triangle mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub triangles: Vec<[u32; 3]>,
    pub material: Material,
}

impl Mesh {
    #[must_use]
    pub fn new(positions: Vec<Vec3>, triangles: Vec<[u32; 3]>, material: Material) -> Self {
        Self {
            positions,
            triangles,
            material,
        }
    }

    /// Checks that every index addresses an existing vertex.
    fn validate(&self) -> Result<(), DecodeError> {
        let count = self.positions.len();
        let out_of_range = self
            .triangles
            .iter()
            .flatten()
            .any(|&index| index as usize >= count);
        if out_of_range {
            return Err(DecodeError::Malformed(format!(
                "triangle index out of range for {count} vertices"
            )));
        }
        if self.positions.iter().any(|p| !p.is_finite()) {
            return Err(DecodeError::Malformed("non-finite vertex position".into()));
        }
        Ok(())
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// Decoded, validated geometry plus the viewer scale for its decoder.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub meshes: Vec<Mesh>,
    /// Uniform scale the viewer applies.
    pub scale: f32,
}

impl Scene {
    #[must_use]
    pub fn new(meshes: Vec<Mesh>) -> Self {
        Self { meshes, scale: 1.0 }
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(|mesh| mesh.triangles.len()).sum()
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(|mesh| mesh.positions.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triangle_count() == 0
    }

    /// Bounds of all vertices, before scaling.
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        let mut positions = self.meshes.iter().flat_map(|mesh| mesh.positions.iter());
        let first = *positions.next()?;
        let (min, max) = positions.fold((first, first), |(min, max), p| (min.min(*p), max.max(*p)));
        Some(Bounds { min, max })
    }

    /// Replaces every mesh material.
    pub fn apply_material(&mut self, material: Material) {
        for mesh in &mut self.meshes {
            mesh.material = material;
        }
    }

    fn validate(&self) -> Result<(), DecodeError> {
        if self.is_empty() {
            return Err(DecodeError::Empty);
        }
        self.meshes.iter().try_for_each(Mesh::validate)
    }
}

/// Runs [`decode`] and converts a panic into [`DecodeError::Panicked`].
pub fn decode_guarded(kind: DecoderKind, bytes: &[u8]) -> Result<Scene, DecodeError> {
    panic::catch_unwind(AssertUnwindSafe(|| decode(kind, bytes)))
        .unwrap_or_else(|payload| Err(DecodeError::Panicked(panic_message(payload.as_ref()))))
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Mesh {
        Mesh::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            vec![[0, 1, 2]],
            Material::DEFAULT,
        )
    }

    #[test]
    fn bounds_cover_all_meshes() {
        let mut other = triangle();
        other.positions = vec![Vec3::splat(-2.0), Vec3::Z, Vec3::Z];
        let scene = Scene::new(vec![triangle(), other]);
        let bounds = scene.bounds().expect("bounds");
        assert_eq!(bounds.min, Vec3::splat(-2.0));
        assert_eq!(bounds.max, Vec3::ONE);
    }

    #[test]
    fn empty_scene_fails_validation() {
        assert_eq!(Scene::new(vec![]).validate(), Err(DecodeError::Empty));
    }

    #[test]
    fn out_of_range_index_fails_validation() {
        let mut mesh = triangle();
        mesh.triangles.push([0, 1, 7]);
        let result = Scene::new(vec![mesh]).validate();
        assert!(matches!(result, Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn apply_material_overrides_every_mesh() {
        let mut scene = Scene::new(vec![triangle(), triangle()]);
        scene.apply_material(Material::NEUTRAL);
        assert!(scene.meshes.iter().all(|m| m.material == Material::NEUTRAL));
    }

    #[test]
    fn panic_payloads_are_stringified() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");
    }

    #[test]
    fn guarded_decode_reports_malformed_input() {
        let result = decode_guarded(DecoderKind::RawGeometry, b"not a model");
        assert!(result.is_err());
    }
}
