// SPDX-License-Identifier: MPL-2.0
//! Format decoders, one per [`DecoderKind`].

mod collada;
mod fbx;
mod gltf;
mod obj;
mod stl;

use super::{DecodeError, Material, Scene};
use crate::domain::format::{DecoderKind, SceneGraphFormat};

/// Decodes `bytes` with the decoder for `kind`.
///
/// The returned scene is validated (non-empty, indices in range) and carries
/// the viewer scale of its decoder. Raw geometry gets the neutral material.
pub fn decode(kind: DecoderKind, bytes: &[u8]) -> Result<Scene, DecodeError> {
    let mut scene = match kind {
        DecoderKind::SceneGraph(SceneGraphFormat::Gltf) => self::gltf::decode(bytes)?,
        DecoderKind::SceneGraph(SceneGraphFormat::Fbx) => fbx::decode(bytes)?,
        DecoderKind::SceneGraph(SceneGraphFormat::Collada) => collada::decode(bytes)?,
        DecoderKind::MeshOnly => obj::decode(bytes)?,
        DecoderKind::RawGeometry => stl::decode(bytes)?,
    };

    scene.validate()?;
    if kind.needs_default_material() {
        scene.apply_material(Material::NEUTRAL);
    }
    scene.scale = kind.scale();
    Ok(scene)
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Small hand-built files shared by the decoder tests.

    /// Unit square as two triangles, Wavefront OBJ.
    pub const SQUARE_OBJ: &str = "\
# square
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f 1 2 3 4
";

    /// Single triangle, ASCII STL.
    pub const TRIANGLE_STL: &str = "\
solid tri
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 1 0 0
      vertex 0 1 0
    endloop
  endfacet
endsolid tri
";

    /// Single triangle, binary STL.
    pub fn triangle_stl_binary() -> Vec<u8> {
        let mut bytes = vec![0u8; 80];
        bytes.extend_from_slice(&1u32.to_le_bytes());
        let floats: [f32; 12] = [
            0.0, 0.0, 1.0, // normal
            0.0, 0.0, 0.0, // v0
            2.0, 0.0, 0.0, // v1
            0.0, 2.0, 0.0, // v2
        ];
        for value in floats {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        bytes.extend_from_slice(&0u16.to_le_bytes());
        bytes
    }

    /// Single triangle glTF with an embedded base64 buffer.
    pub fn triangle_gltf() -> String {
        use base64::Engine;

        let mut buffer = Vec::new();
        for value in [0.0f32, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0] {
            buffer.extend_from_slice(&value.to_le_bytes());
        }
        let encoded = base64::engine::general_purpose::STANDARD.encode(&buffer);

        format!(
            r#"{{
  "asset": {{ "version": "2.0" }},
  "scene": 0,
  "scenes": [{{ "nodes": [0] }}],
  "nodes": [{{ "mesh": 0, "translation": [0.0, 0.0, 2.0] }}],
  "meshes": [{{ "primitives": [{{ "attributes": {{ "POSITION": 0 }}, "material": 0 }}] }}],
  "materials": [{{ "pbrMetallicRoughness": {{ "baseColorFactor": [1.0, 0.0, 0.0, 1.0] }} }}],
  "accessors": [{{
    "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
    "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0]
  }}],
  "bufferViews": [{{ "buffer": 0, "byteOffset": 0, "byteLength": 36 }}],
  "buffers": [{{ "byteLength": 36, "uri": "data:application/octet-stream;base64,{encoded}" }}]
}}"#
        )
    }

    /// Quad polylist, COLLADA 1.4, Z up, with a translated node.
    pub const QUAD_DAE: &str = r##"<?xml version="1.0" encoding="utf-8"?>
<COLLADA xmlns="http://www.collada.org/2005/11/COLLADASchema" version="1.4.1">
  <asset><up_axis>Z_UP</up_axis></asset>
  <library_geometries>
    <geometry id="quad-mesh" name="quad">
      <mesh>
        <source id="quad-positions">
          <float_array id="quad-positions-array" count="12">0 0 0 1 0 0 1 1 0 0 1 0</float_array>
          <technique_common>
            <accessor source="#quad-positions-array" count="4" stride="3">
              <param name="X" type="float"/><param name="Y" type="float"/><param name="Z" type="float"/>
            </accessor>
          </technique_common>
        </source>
        <source id="quad-normals">
          <float_array id="quad-normals-array" count="3">0 0 1</float_array>
        </source>
        <vertices id="quad-vertices">
          <input semantic="POSITION" source="#quad-positions"/>
        </vertices>
        <polylist count="1">
          <input semantic="VERTEX" source="#quad-vertices" offset="0"/>
          <input semantic="NORMAL" source="#quad-normals" offset="1"/>
          <vcount>4</vcount>
          <p>0 0 1 0 2 0 3 0</p>
        </polylist>
      </mesh>
    </geometry>
  </library_geometries>
  <library_visual_scenes>
    <visual_scene id="Scene">
      <node id="quad-node">
        <translate>0 0 5</translate>
        <instance_geometry url="#quad-mesh"/>
      </node>
    </visual_scene>
  </library_visual_scenes>
</COLLADA>
"##;
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::domain::format::MODEL_SCALE;

    #[test]
    fn stl_gets_neutral_material_and_native_scale() {
        let scene = decode(DecoderKind::RawGeometry, TRIANGLE_STL.as_bytes()).expect("scene");
        assert_eq!(scene.scale, 1.0);
        assert!(scene.meshes.iter().all(|m| m.material == Material::NEUTRAL));
    }

    #[test]
    fn mesh_decoders_get_model_scale() {
        let scene = decode(DecoderKind::MeshOnly, SQUARE_OBJ.as_bytes()).expect("scene");
        assert_eq!(scene.scale, MODEL_SCALE);
    }

    #[test]
    fn garbage_is_rejected_by_every_decoder() {
        let garbage = b"\x00\x01definitely not a model\xff";
        for kind in [
            DecoderKind::SceneGraph(SceneGraphFormat::Gltf),
            DecoderKind::SceneGraph(SceneGraphFormat::Fbx),
            DecoderKind::SceneGraph(SceneGraphFormat::Collada),
            DecoderKind::MeshOnly,
            DecoderKind::RawGeometry,
        ] {
            assert!(decode(kind, garbage).is_err(), "{kind:?} accepted garbage");
        }
    }
}
