// SPDX-License-Identifier: MPL-2.0
//! COLLADA 1.4/1.5 (`.dae`).
//!
//! The document is read into a small element tree, then geometry primitives
//! (`triangles`, `polylist`, `polygons`) are resolved through their
//! `vertices` indirection and placed by the first visual scene. Files whose
//! scene instantiates nothing fall back to every geometry at the origin.

use crate::scene::{DecodeError, Material, Mesh, Scene};
use glam::{Mat4, Vec3};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::f32::consts::FRAC_PI_2;

pub(super) fn decode(bytes: &[u8]) -> Result<Scene, DecodeError> {
    let root = parse_tree(bytes)?;
    if root.name != "COLLADA" {
        return Err(DecodeError::Malformed(format!(
            "expected COLLADA root, found `{}`",
            root.name
        )));
    }

    let up_fix = match root.child("asset").and_then(|a| a.child("up_axis")).map(|u| u.text.trim()) {
        Some("Z_UP") => Mat4::from_rotation_x(-FRAC_PI_2),
        Some("X_UP") => Mat4::from_rotation_z(FRAC_PI_2),
        _ => Mat4::IDENTITY,
    };

    let mut geometries: HashMap<String, Vec<Mesh>> = HashMap::new();
    let mut order = Vec::new();
    for geometry in root
        .children_named("library_geometries")
        .flat_map(|lib| lib.children_named("geometry"))
    {
        let Some(mesh) = geometry.child("mesh") else {
            continue;
        };
        let id = geometry.attr("id").unwrap_or_default().to_string();
        order.push(id.clone());
        geometries.insert(id, read_mesh(mesh)?);
    }

    let mut meshes = Vec::new();
    if let Some(scene) = root
        .children_named("library_visual_scenes")
        .flat_map(|lib| lib.children_named("visual_scene"))
        .next()
    {
        for node in scene.children_named("node") {
            place_node(node, up_fix, &geometries, &mut meshes)?;
        }
    }

    if meshes.is_empty() {
        log::debug!("COLLADA scene instantiates no geometry, emitting library");
        for id in &order {
            if let Some(list) = geometries.get(id) {
                meshes.extend(list.iter().map(|mesh| transformed(mesh, up_fix)));
            }
        }
    }

    Ok(Scene::new(meshes))
}

#[derive(Debug, Default)]
struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn from_start(start: &BytesStart<'_>) -> Result<Self, DecodeError> {
        let mut element = Element {
            name: String::from_utf8_lossy(start.local_name().as_ref()).to_string(),
            ..Element::default()
        };
        for attribute in start.attributes() {
            let attribute = attribute.map_err(|err| DecodeError::Malformed(err.to_string()))?;
            let key = String::from_utf8_lossy(attribute.key.local_name().as_ref()).to_string();
            let value = attribute
                .unescape_value()
                .map_err(|err| DecodeError::Malformed(err.to_string()))?
                .into_owned();
            element.attributes.push((key, value));
        }
        Ok(element)
    }

    fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }
}

fn parse_tree(bytes: &[u8]) -> Result<Element, DecodeError> {
    let mut reader = Reader::from_reader(bytes);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut stack: Vec<Element> = Vec::new();
    let mut root = None;

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|err| DecodeError::Malformed(format!("XML: {err}")))?;
        match event {
            Event::Start(ref e) => stack.push(Element::from_start(e)?),
            Event::Empty(ref e) => {
                let element = Element::from_start(e)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => root = Some(element),
                }
            }
            Event::Text(ref e) => {
                let text = e
                    .unescape()
                    .map_err(|err| DecodeError::Malformed(format!("XML text: {err}")))?;
                match stack.last_mut() {
                    Some(current) => current.text.push_str(&text),
                    None if !text.trim().is_empty() => {
                        return Err(DecodeError::Malformed("text outside the root element".into()))
                    }
                    None => {}
                }
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| DecodeError::Malformed("unbalanced XML".into()))?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => root = Some(element),
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(DecodeError::Malformed("unterminated XML element".into()));
    }
    root.ok_or_else(|| DecodeError::Malformed("document has no root element".into()))
}

fn parse_floats(text: &str) -> Result<Vec<f32>, DecodeError> {
    text.split_whitespace()
        .map(|value| {
            value
                .parse::<f32>()
                .map_err(|_| DecodeError::Malformed(format!("invalid number `{value}`")))
        })
        .collect()
}

fn parse_indices(text: &str) -> Result<Vec<u32>, DecodeError> {
    text.split_whitespace()
        .map(|value| {
            value
                .parse::<u32>()
                .map_err(|_| DecodeError::Malformed(format!("invalid index `{value}`")))
        })
        .collect()
}

fn strip_hash(url: &str) -> &str {
    url.strip_prefix('#').unwrap_or(url)
}

/// Reads every triangle-producing primitive of a `<mesh>`.
fn read_mesh(mesh: &Element) -> Result<Vec<Mesh>, DecodeError> {
    let mut sources: HashMap<&str, Vec<Vec3>> = HashMap::new();
    for source in mesh.children_named("source") {
        let (Some(id), Some(array)) = (source.attr("id"), source.child("float_array")) else {
            continue;
        };
        let stride = source
            .child("technique_common")
            .and_then(|t| t.child("accessor"))
            .and_then(|a| a.attr("stride"))
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(3);
        if stride < 3 {
            continue;
        }
        let floats = parse_floats(&array.text)?;
        let points = floats
            .chunks_exact(stride)
            .map(|c| Vec3::new(c[0], c[1], c[2]))
            .collect();
        sources.insert(id, points);
    }

    let vertices: HashMap<&str, &str> = mesh
        .children_named("vertices")
        .filter_map(|v| {
            let position = v
                .children_named("input")
                .find(|input| input.attr("semantic") == Some("POSITION"))?;
            Some((v.attr("id")?, strip_hash(position.attr("source")?)))
        })
        .collect();

    let mut meshes = Vec::new();
    for primitive in &mesh.children {
        let polygons = match primitive.name.as_str() {
            "triangles" | "polylist" | "polygons" => read_polygons(primitive)?,
            _ => continue,
        };

        let mut position_source = None;
        let mut position_offset = 0;
        let mut stride = 1;
        for input in primitive.children_named("input") {
            let offset = input
                .attr("offset")
                .and_then(|o| o.parse::<usize>().ok())
                .unwrap_or(0);
            stride = stride.max(offset + 1);
            let source = input.attr("source").map(strip_hash);
            match input.attr("semantic") {
                Some("VERTEX") => {
                    position_source = source.and_then(|s| vertices.get(s).copied());
                    position_offset = offset;
                }
                Some("POSITION") => {
                    position_source = source;
                    position_offset = offset;
                }
                _ => {}
            }
        }
        let Some(positions) = position_source.and_then(|id| sources.get(id)) else {
            return Err(DecodeError::Malformed(format!(
                "`{}` primitive has no resolvable positions",
                primitive.name
            )));
        };

        let mut triangles = Vec::new();
        for polygon in polygons {
            if polygon.len() % stride != 0 {
                return Err(DecodeError::Malformed("primitive index count does not match its inputs".into()));
            }
            let corners: Vec<u32> = polygon
                .chunks_exact(stride)
                .map(|corner| corner[position_offset])
                .collect();
            for i in 1..corners.len().saturating_sub(1) {
                triangles.push([corners[0], corners[i], corners[i + 1]]);
            }
        }
        meshes.push(Mesh::new(positions.clone(), triangles, Material::DEFAULT));
    }
    Ok(meshes)
}

/// Splits a primitive into per-polygon index runs, inputs interleaved.
fn read_polygons(primitive: &Element) -> Result<Vec<Vec<u32>>, DecodeError> {
    let stride = primitive
        .children_named("input")
        .filter_map(|input| input.attr("offset")?.parse::<usize>().ok())
        .max()
        .map_or(1, |max| max + 1);

    match primitive.name.as_str() {
        "polygons" => primitive
            .children_named("p")
            .map(|p| parse_indices(&p.text))
            .collect(),
        "polylist" => {
            let counts = primitive
                .child("vcount")
                .map(|v| parse_indices(&v.text))
                .transpose()?
                .unwrap_or_default();
            let indices = primitive
                .child("p")
                .map(|p| parse_indices(&p.text))
                .transpose()?
                .unwrap_or_default();
            let mut polygons = Vec::with_capacity(counts.len());
            let mut cursor = 0usize;
            for count in counts {
                let len = count as usize * stride;
                let polygon = indices
                    .get(cursor..cursor + len)
                    .ok_or_else(|| DecodeError::Malformed("polylist shorter than its vcount".into()))?;
                polygons.push(polygon.to_vec());
                cursor += len;
            }
            Ok(polygons)
        }
        _ => {
            let indices = primitive
                .child("p")
                .map(|p| parse_indices(&p.text))
                .transpose()?
                .unwrap_or_default();
            Ok(indices.chunks(3 * stride).map(<[u32]>::to_vec).collect())
        }
    }
}

/// Local transform from the node's transform children, in document order.
fn node_transform(node: &Element) -> Result<Mat4, DecodeError> {
    let mut local = Mat4::IDENTITY;
    for child in &node.children {
        let step = match child.name.as_str() {
            "matrix" => {
                let values = parse_floats(&child.text)?;
                let values: [f32; 16] = values
                    .try_into()
                    .map_err(|_| DecodeError::Malformed("matrix needs 16 values".into()))?;
                // Stored row-major.
                Mat4::from_cols_array(&values).transpose()
            }
            "translate" => match parse_floats(&child.text)?.as_slice() {
                [x, y, z] => Mat4::from_translation(Vec3::new(*x, *y, *z)),
                _ => return Err(DecodeError::Malformed("translate needs 3 values".into())),
            },
            "rotate" => match parse_floats(&child.text)?.as_slice() {
                [x, y, z, angle] => {
                    let axis = Vec3::new(*x, *y, *z);
                    if axis.length_squared() == 0.0 {
                        continue;
                    }
                    Mat4::from_axis_angle(axis.normalize(), angle.to_radians())
                }
                _ => return Err(DecodeError::Malformed("rotate needs 4 values".into())),
            },
            "scale" => match parse_floats(&child.text)?.as_slice() {
                [x, y, z] => Mat4::from_scale(Vec3::new(*x, *y, *z)),
                _ => return Err(DecodeError::Malformed("scale needs 3 values".into())),
            },
            _ => continue,
        };
        local *= step;
    }
    Ok(local)
}

fn place_node(
    node: &Element,
    parent: Mat4,
    geometries: &HashMap<String, Vec<Mesh>>,
    out: &mut Vec<Mesh>,
) -> Result<(), DecodeError> {
    let world = parent * node_transform(node)?;

    for instance in node.children_named("instance_geometry") {
        let Some(url) = instance.attr("url") else {
            continue;
        };
        match geometries.get(strip_hash(url)) {
            Some(meshes) => out.extend(meshes.iter().map(|mesh| transformed(mesh, world))),
            None => log::warn!("COLLADA node references unknown geometry {url}"),
        }
    }
    for child in node.children_named("node") {
        place_node(child, world, geometries, out)?;
    }
    Ok(())
}

fn transformed(mesh: &Mesh, transform: Mat4) -> Mesh {
    Mesh::new(
        mesh.positions.iter().map(|p| transform.transform_point3(*p)).collect(),
        mesh.triangles.clone(),
        mesh.material,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::decoders::fixtures::QUAD_DAE;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-5
    }

    #[test]
    fn polylist_quad_becomes_two_triangles() {
        let scene = decode(QUAD_DAE.as_bytes()).expect("scene");
        assert_eq!(scene.triangle_count(), 2);
        assert_eq!(scene.meshes[0].triangles, vec![[0, 1, 2], [0, 2, 3]]);
    }

    #[test]
    fn node_translation_and_z_up_are_applied() {
        let scene = decode(QUAD_DAE.as_bytes()).expect("scene");
        let bounds = scene.bounds().expect("bounds");
        assert!(approx(bounds.min, Vec3::new(0.0, 5.0, -1.0)), "{bounds:?}");
        assert!(approx(bounds.max, Vec3::new(1.0, 5.0, 0.0)), "{bounds:?}");
    }

    #[test]
    fn geometry_without_scene_is_emitted_at_origin() {
        let xml = r##"<COLLADA>
  <library_geometries>
    <geometry id="g">
      <mesh>
        <source id="p"><float_array>0 0 0 1 0 0 0 1 0</float_array></source>
        <vertices id="v"><input semantic="POSITION" source="#p"/></vertices>
        <triangles count="1">
          <input semantic="VERTEX" source="#v" offset="0"/>
          <p>0 1 2</p>
        </triangles>
      </mesh>
    </geometry>
  </library_geometries>
</COLLADA>"##;
        let scene = decode(xml.as_bytes()).expect("scene");
        assert_eq!(scene.triangle_count(), 1);
        assert_eq!(scene.meshes[0].positions[1], Vec3::X);
    }

    #[test]
    fn matrix_is_read_row_major() {
        let node = parse_tree(
            br#"<node><matrix>1 0 0 4  0 1 0 5  0 0 1 6  0 0 0 1</matrix></node>"#,
        )
        .expect("tree");
        let transform = node_transform(&node).expect("transform");
        assert!(approx(transform.transform_point3(Vec3::ZERO), Vec3::new(4.0, 5.0, 6.0)));
    }

    #[test]
    fn character_references_in_text_are_resolved() {
        let node = parse_tree(
            br#"<node><matrix>1&#32;0 0 4&#10;0 1 0 5  0 0 1 6  0 0 0 1</matrix></node>"#,
        )
        .expect("tree");
        let transform = node_transform(&node).expect("transform");
        assert!(approx(transform.transform_point3(Vec3::ZERO), Vec3::new(4.0, 5.0, 6.0)));
    }

    #[test]
    fn unknown_entity_in_text_is_malformed() {
        let result = parse_tree(b"<node><matrix>1 &bogus; 0</matrix></node>");
        assert!(matches!(result, Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn other_root_is_malformed() {
        let result = decode(b"<svg><rect/></svg>");
        assert!(matches!(result, Err(DecodeError::Malformed(_))));
    }
}
