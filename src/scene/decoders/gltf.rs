// SPDX-License-Identifier: MPL-2.0
//! glTF 2.0 (`.gltf` with embedded buffers, `.glb`).

use crate::scene::{DecodeError, Material, Mesh, Scene};
use glam::{Mat4, Vec3};

pub(super) fn decode(bytes: &[u8]) -> Result<Scene, DecodeError> {
    let (document, buffers, _images) = ::gltf::import_slice(bytes)
        .map_err(|err| DecodeError::Malformed(err.to_string()))?;

    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or(DecodeError::Empty)?;

    let mut meshes = Vec::new();
    for node in scene.nodes() {
        visit(&node, Mat4::IDENTITY, &buffers, &mut meshes)?;
    }
    Ok(Scene::new(meshes))
}

fn visit(
    node: &::gltf::Node<'_>,
    parent: Mat4,
    buffers: &[::gltf::buffer::Data],
    out: &mut Vec<Mesh>,
) -> Result<(), DecodeError> {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        for primitive in mesh.primitives() {
            if primitive.mode() != ::gltf::mesh::Mode::Triangles {
                log::debug!("skipping glTF primitive with mode {:?}", primitive.mode());
                continue;
            }
            let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|d| d.0.as_slice()));
            let Some(positions) = reader.read_positions() else {
                continue;
            };
            let positions: Vec<Vec3> = positions
                .map(|p| world.transform_point3(Vec3::from(p)))
                .collect();

            let indices: Vec<u32> = match reader.read_indices() {
                Some(indices) => indices.into_u32().collect(),
                None => (0..positions.len() as u32).collect(),
            };
            if indices.len() % 3 != 0 {
                return Err(DecodeError::Malformed(format!(
                    "glTF index count {} is not a multiple of 3",
                    indices.len()
                )));
            }
            let triangles = indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]]).collect();

            let color = primitive
                .material()
                .pbr_metallic_roughness()
                .base_color_factor();
            out.push(Mesh::new(positions, triangles, Material::new(color)));
        }
    }

    for child in node.children() {
        visit(&child, world, buffers, out)?;
    }
    Ok(())
}
