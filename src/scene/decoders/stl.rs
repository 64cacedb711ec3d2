// SPDX-License-Identifier: MPL-2.0
//! STL, ASCII or binary. Carries no material.

use crate::scene::{DecodeError, Material, Mesh, Scene};
use glam::Vec3;
use std::io::Cursor;

pub(super) fn decode(bytes: &[u8]) -> Result<Scene, DecodeError> {
    let mut cursor = Cursor::new(bytes);
    let indexed =
        stl_io::read_stl(&mut cursor).map_err(|err| DecodeError::Malformed(err.to_string()))?;

    let positions = indexed
        .vertices
        .iter()
        .map(|v| Vec3::new(v[0], v[1], v[2]))
        .collect();
    let triangles = indexed
        .faces
        .iter()
        .map(|face| {
            [
                face.vertices[0] as u32,
                face.vertices[1] as u32,
                face.vertices[2] as u32,
            ]
        })
        .collect();

    Ok(Scene::new(vec![Mesh::new(positions, triangles, Material::NEUTRAL)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::decoders::fixtures::{triangle_stl_binary, TRIANGLE_STL};

    #[test]
    fn ascii_triangle() {
        let scene = decode(TRIANGLE_STL.as_bytes()).expect("scene");
        assert_eq!(scene.triangle_count(), 1);
        assert_eq!(scene.vertex_count(), 3);
    }

    #[test]
    fn binary_triangle() {
        let scene = decode(&triangle_stl_binary()).expect("scene");
        let bounds = scene.bounds().expect("bounds");
        assert_eq!(bounds.max, Vec3::new(2.0, 2.0, 0.0));
    }

    #[test]
    fn truncated_binary_is_malformed() {
        let bytes = triangle_stl_binary();
        assert!(decode(&bytes[..90]).is_err());
    }
}
