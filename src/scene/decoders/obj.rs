// SPDX-License-Identifier: MPL-2.0
//! Wavefront OBJ. Material libraries are not followed.

use crate::scene::{DecodeError, Material, Mesh, Scene};
use glam::Vec3;
use std::io::{BufReader, Cursor};

pub(super) fn decode(bytes: &[u8]) -> Result<Scene, DecodeError> {
    let mut reader = BufReader::new(Cursor::new(bytes));
    let options = tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    };
    let (models, _materials) =
        tobj::load_obj_buf(&mut reader, &options, |_| Err(tobj::LoadError::OpenFileFailed))
            .map_err(|err| DecodeError::Malformed(err.to_string()))?;

    let meshes = models
        .into_iter()
        .filter(|model| !model.mesh.indices.is_empty())
        .map(|model| {
            let positions = model
                .mesh
                .positions
                .chunks_exact(3)
                .map(|p| Vec3::new(p[0], p[1], p[2]))
                .collect();
            let triangles = model
                .mesh
                .indices
                .chunks_exact(3)
                .map(|t| [t[0], t[1], t[2]])
                .collect();
            Mesh::new(positions, triangles, Material::DEFAULT)
        })
        .collect();

    Ok(Scene::new(meshes))
}
