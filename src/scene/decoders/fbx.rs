// SPDX-License-Identifier: MPL-2.0
//! Binary FBX 7.x.
//!
//! The node tree is read in full, then three sections are consulted:
//! `Objects/Geometry` for vertices and polygons, `Objects/Model` for local
//! transforms, and `Connections` for the geometry to model to parent chain.
//! Materials contribute their `DiffuseColor`. ASCII FBX files are reported as
//! an unsupported variant.

use crate::scene::{DecodeError, Material, Mesh, Scene};
use flate2::read::ZlibDecoder;
use glam::{EulerRot, Mat4, Quat, Vec3};
use std::collections::HashMap;
use std::io::Read;

const MAGIC: &[u8] = b"Kaydara FBX Binary  \0";
const HEADER_LEN: usize = 27;
const MIN_VERSION: u32 = 7000;
/// From this version on, record offsets are 64-bit.
const WIDE_OFFSETS_VERSION: u32 = 7500;
/// Bound on parent-chain walks, guards against connection cycles.
const MAX_DEPTH: usize = 64;

pub(super) fn decode(bytes: &[u8]) -> Result<Scene, DecodeError> {
    if !bytes.starts_with(MAGIC) {
        return Err(if looks_like_ascii_fbx(bytes) {
            DecodeError::UnsupportedVariant("ASCII FBX".into())
        } else {
            DecodeError::Malformed("missing FBX binary header".into())
        });
    }
    if bytes.len() < HEADER_LEN {
        return Err(truncated());
    }
    let version = u32::from_le_bytes([bytes[23], bytes[24], bytes[25], bytes[26]]);
    if version < MIN_VERSION {
        return Err(DecodeError::UnsupportedVariant(format!("FBX version {version}")));
    }

    let mut reader = Reader {
        bytes,
        pos: HEADER_LEN,
        wide: version >= WIDE_OFFSETS_VERSION,
    };
    let mut roots = Vec::new();
    while reader.remaining() >= reader.null_record_len() {
        match reader.node()? {
            Some(node) => roots.push(node),
            None => break,
        }
    }
    log::debug!("FBX {version}: {} top-level records", roots.len());

    build_scene(&roots)
}

fn looks_like_ascii_fbx(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(1024)];
    std::str::from_utf8(head).is_ok_and(|text| text.contains("FBXHeaderExtension") || text.starts_with("; FBX"))
}

fn truncated() -> DecodeError {
    DecodeError::Malformed("unexpected end of FBX data".into())
}

#[derive(Debug, Clone, PartialEq)]
enum Property {
    Int(i64),
    Float(f64),
    Text(String),
    Raw,
    IntArray(Vec<i64>),
    FloatArray(Vec<f64>),
}

impl Property {
    fn as_i64(&self) -> Option<i64> {
        match self {
            Property::Int(value) => Some(*value),
            _ => None,
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            Property::Float(value) => Some(*value),
            Property::Int(value) => Some(*value as f64),
            _ => None,
        }
    }

    fn as_str(&self) -> Option<&str> {
        match self {
            Property::Text(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Node {
    name: String,
    properties: Vec<Property>,
    children: Vec<Node>,
}

impl Node {
    fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|child| child.name == name)
    }

    fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    fn id(&self) -> Option<i64> {
        self.properties.first().and_then(Property::as_i64)
    }

    /// Reads a `Properties70` vector entry such as `Lcl Translation`.
    fn property70_vec3(&self, key: &str) -> Option<Vec3> {
        let entry = self
            .child("Properties70")?
            .children_named("P")
            .find(|p| p.properties.first().and_then(Property::as_str) == Some(key))?;
        let x = entry.properties.get(4)?.as_f64()?;
        let y = entry.properties.get(5)?.as_f64()?;
        let z = entry.properties.get(6)?.as_f64()?;
        Some(Vec3::new(x as f32, y as f32, z as f32))
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
    wide: bool,
}

impl<'a> Reader<'a> {
    fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.pos)
    }

    fn null_record_len(&self) -> usize {
        if self.wide {
            25
        } else {
            13
        }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.bytes.len())
            .ok_or_else(truncated)?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.array::<1>()?[0])
    }

    fn u32(&mut self) -> Result<u32, DecodeError> {
        self.array().map(u32::from_le_bytes)
    }

    fn offset(&mut self) -> Result<u64, DecodeError> {
        if self.wide {
            self.array().map(u64::from_le_bytes)
        } else {
            self.u32().map(u64::from)
        }
    }

    /// Reads one record. `None` marks the null record closing a list.
    fn node(&mut self) -> Result<Option<Node>, DecodeError> {
        let end = self.offset()?;
        let property_count = self.offset()?;
        let _property_list_len = self.offset()?;
        let name_len = self.u8()?;
        if end == 0 {
            return Ok(None);
        }
        let end = usize::try_from(end)
            .ok()
            .filter(|&end| end > self.pos && end <= self.bytes.len())
            .ok_or_else(|| DecodeError::Malformed(format!("FBX record end {end} out of range")))?;

        let name = String::from_utf8_lossy(self.take(usize::from(name_len))?).into_owned();
        let mut properties = Vec::new();
        for _ in 0..property_count {
            properties.push(self.property()?);
        }

        let mut children = Vec::new();
        while self.pos < end {
            match self.node()? {
                Some(child) => children.push(child),
                None => break,
            }
        }
        if self.pos > end {
            return Err(DecodeError::Malformed(format!("FBX record `{name}` overruns its end")));
        }
        self.pos = end;

        Ok(Some(Node {
            name,
            properties,
            children,
        }))
    }

    fn property(&mut self) -> Result<Property, DecodeError> {
        let code = self.u8()?;
        let property = match code {
            b'Y' => Property::Int(i64::from(i16::from_le_bytes(self.array()?))),
            b'C' => Property::Int(i64::from(self.u8()?)),
            b'I' => Property::Int(i64::from(i32::from_le_bytes(self.array()?))),
            b'L' => Property::Int(i64::from_le_bytes(self.array()?)),
            b'F' => Property::Float(f64::from(f32::from_le_bytes(self.array()?))),
            b'D' => Property::Float(f64::from_le_bytes(self.array()?)),
            b'S' => {
                let len = self.u32()? as usize;
                Property::Text(String::from_utf8_lossy(self.take(len)?).into_owned())
            }
            b'R' => {
                let len = self.u32()? as usize;
                self.take(len)?;
                Property::Raw
            }
            b'f' => Property::FloatArray(
                self.array_data(4)?
                    .chunks_exact(4)
                    .map(|c| f64::from(f32::from_le_bytes([c[0], c[1], c[2], c[3]])))
                    .collect(),
            ),
            b'd' => Property::FloatArray(
                self.array_data(8)?
                    .chunks_exact(8)
                    .map(|c| f64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
                    .collect(),
            ),
            b'i' => Property::IntArray(
                self.array_data(4)?
                    .chunks_exact(4)
                    .map(|c| i64::from(i32::from_le_bytes([c[0], c[1], c[2], c[3]])))
                    .collect(),
            ),
            b'l' => Property::IntArray(
                self.array_data(8)?
                    .chunks_exact(8)
                    .map(|c| i64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
                    .collect(),
            ),
            b'b' => {
                self.array_data(1)?;
                Property::Raw
            }
            other => {
                return Err(DecodeError::Malformed(format!(
                    "unknown FBX property type 0x{other:02x}"
                )))
            }
        };
        Ok(property)
    }

    /// Reads an array payload, inflating it when zlib-encoded.
    fn array_data(&mut self, element_size: usize) -> Result<Vec<u8>, DecodeError> {
        let count = self.u32()? as usize;
        let encoding = self.u32()?;
        let stored_len = self.u32()? as usize;
        let expected = count
            .checked_mul(element_size)
            .ok_or_else(|| DecodeError::Malformed("FBX array too large".into()))?;
        let stored = self.take(stored_len)?;

        let data = match encoding {
            0 => stored.to_vec(),
            1 => {
                let mut inflated = Vec::new();
                ZlibDecoder::new(stored)
                    .take(expected as u64)
                    .read_to_end(&mut inflated)
                    .map_err(|err| DecodeError::Malformed(format!("FBX array inflate: {err}")))?;
                inflated
            }
            other => {
                return Err(DecodeError::Malformed(format!(
                    "unknown FBX array encoding {other}"
                )))
            }
        };
        if data.len() != expected {
            return Err(DecodeError::Malformed(format!(
                "FBX array holds {} bytes, expected {expected}",
                data.len()
            )));
        }
        Ok(data)
    }
}

/// Object links gathered from `Connections`.
#[derive(Default)]
struct Links {
    /// Child object id to parent object ids.
    parents: HashMap<i64, Vec<i64>>,
}

impl Links {
    fn from_roots(roots: &[Node]) -> Self {
        let mut links = Links::default();
        let Some(connections) = roots.iter().find(|node| node.name == "Connections") else {
            return links;
        };
        for connection in connections.children_named("C") {
            let mut props = connection.properties.iter();
            if props.next().and_then(Property::as_str) != Some("OO") {
                continue;
            }
            let child = props.next().and_then(Property::as_i64);
            let parent = props.next().and_then(Property::as_i64);
            if let (Some(child), Some(parent)) = (child, parent) {
                links.parents.entry(child).or_default().push(parent);
            }
        }
        links
    }

    fn parents_of(&self, id: i64) -> &[i64] {
        self.parents.get(&id).map(Vec::as_slice).unwrap_or_default()
    }
}

fn build_scene(roots: &[Node]) -> Result<Scene, DecodeError> {
    let objects = roots
        .iter()
        .find(|node| node.name == "Objects")
        .ok_or_else(|| DecodeError::Malformed("FBX file has no Objects section".into()))?;
    let links = Links::from_roots(roots);

    let models: HashMap<i64, &Node> = objects
        .children_named("Model")
        .filter_map(|model| Some((model.id()?, model)))
        .collect();
    let materials: HashMap<i64, Material> = objects
        .children_named("Material")
        .filter_map(|material| {
            let color = material.property70_vec3("DiffuseColor")?;
            Some((material.id()?, Material::new([color.x, color.y, color.z, 1.0])))
        })
        .collect();
    // Materials connect to models, not to geometry.
    let mut model_materials: HashMap<i64, Material> = HashMap::new();
    for (&material_id, &material) in &materials {
        for &model_id in links.parents_of(material_id) {
            model_materials.entry(model_id).or_insert(material);
        }
    }

    let mut meshes = Vec::new();
    for geometry in objects.children_named("Geometry") {
        let Some((positions, triangles)) = read_geometry(geometry)? else {
            continue;
        };
        let model = geometry
            .id()
            .and_then(|id| links.parents_of(id).iter().copied().find(|p| models.contains_key(p)));
        let world = model.map_or(Mat4::IDENTITY, |id| world_transform(id, &models, &links));
        let material = model
            .and_then(|id| model_materials.get(&id).copied())
            .unwrap_or(Material::DEFAULT);

        let positions = positions.into_iter().map(|p| world.transform_point3(p)).collect();
        meshes.push(Mesh::new(positions, triangles, material));
    }

    Ok(Scene::new(meshes))
}

type Geometry = (Vec<Vec3>, Vec<[u32; 3]>);

fn read_geometry(geometry: &Node) -> Result<Option<Geometry>, DecodeError> {
    let vertices = geometry
        .child("Vertices")
        .and_then(|node| node.properties.first());
    let indices = geometry
        .child("PolygonVertexIndex")
        .and_then(|node| node.properties.first());
    let (Some(Property::FloatArray(vertices)), Some(Property::IntArray(indices))) = (vertices, indices) else {
        return Ok(None);
    };
    if vertices.len() % 3 != 0 {
        return Err(DecodeError::Malformed(format!(
            "FBX vertex array length {} is not a multiple of 3",
            vertices.len()
        )));
    }

    let positions = vertices
        .chunks_exact(3)
        .map(|v| Vec3::new(v[0] as f32, v[1] as f32, v[2] as f32))
        .collect();

    let mut triangles = Vec::new();
    let mut polygon: Vec<u32> = Vec::new();
    for &raw in indices {
        // A negative index closes the polygon and stores the bitwise complement.
        let last = raw < 0;
        let index = if last { !raw } else { raw };
        let index = u32::try_from(index)
            .map_err(|_| DecodeError::Malformed(format!("FBX polygon index {raw} out of range")))?;
        polygon.push(index);
        if last {
            for i in 1..polygon.len().saturating_sub(1) {
                triangles.push([polygon[0], polygon[i], polygon[i + 1]]);
            }
            polygon.clear();
        }
    }

    Ok(Some((positions, triangles)))
}

fn local_transform(model: &Node) -> Mat4 {
    let translation = model.property70_vec3("Lcl Translation").unwrap_or(Vec3::ZERO);
    let rotation = model.property70_vec3("Lcl Rotation").unwrap_or(Vec3::ZERO);
    let scaling = model.property70_vec3("Lcl Scaling").unwrap_or(Vec3::ONE);
    // FBX applies X, then Y, then Z.
    let rotation = Quat::from_euler(
        EulerRot::ZYX,
        rotation.z.to_radians(),
        rotation.y.to_radians(),
        rotation.x.to_radians(),
    );
    Mat4::from_scale_rotation_translation(scaling, rotation, translation)
}

fn world_transform(model_id: i64, models: &HashMap<i64, &Node>, links: &Links) -> Mat4 {
    let mut world = Mat4::IDENTITY;
    let mut current = Some(model_id);
    for _ in 0..MAX_DEPTH {
        let Some(id) = current else {
            break;
        };
        let Some(model) = models.get(&id) else {
            break;
        };
        world = local_transform(model) * world;
        current = links
            .parents_of(id)
            .iter()
            .copied()
            .find(|parent| models.contains_key(parent));
    }
    world
}
