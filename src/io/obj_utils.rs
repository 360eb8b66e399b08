use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::geometry::{GeometryBuffer, MeshShape, Vertex};
use crate::math::constants::Vector3f;

use thiserror::Error;
use wavefront_obj::{mtl, obj, ParseError};

#[derive(Error, Debug)]
pub enum ObjLoadError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(ParseError),

    #[error("material library {0}: {1}")]
    Mtl(String, ParseError),

    #[error("object '{object}': vertex {index} out of range")]
    VertexIndex { object: String, index: usize },
}

impl From<ParseError> for ObjLoadError {
    fn from(err: ParseError) -> Self {
        ObjLoadError::Parse(err)
    }
}

#[derive(Debug, Clone, Copy)]
struct SurfaceMaterial {
    ambient: Vector3f,
    diffuse: Vector3f,
    emissive: Vector3f,
}

impl SurfaceMaterial {
    fn from_mtl(material: &mtl::Material) -> Self {
        let color = |c: &mtl::Color| Vector3f::new(c.r as f32, c.g as f32, c.b as f32);
        Self {
            ambient: color(&material.color_ambient),
            diffuse: color(&material.color_diffuse),
            emissive: material.color_emissive.as_ref().map(color).unwrap_or_else(Vector3f::zeros),
        }
    }
}

pub fn load_obj_from_str<S: AsRef<str>>(input: S) -> Result<obj::ObjSet, ParseError> {
    let triangulated = triangulate_faces(input.as_ref());
    obj::parse(triangulated)
}

pub fn load_obj_from_file<P: AsRef<Path>>(path: P) -> Result<obj::ObjSet, ObjLoadError> {
    let data = fs::read_to_string(path)?;
    let obj_set = load_obj_from_str(data)?;
    Ok(obj_set)
}

/// Builds a geometry buffer from OBJ text, one shape per OBJ object.
/// `materials` holds the contents of the referenced MTL files, if any.
pub fn load_geometry_from_str(input: &str, materials: &[String]) -> Result<GeometryBuffer, ObjLoadError> {
    let mut library = HashMap::new();
    for (i, source) in materials.iter().enumerate() {
        let set = mtl::parse(source.clone()).map_err(|e| ObjLoadError::Mtl(format!("#{}", i), e))?;
        for material in &set.materials {
            library.insert(material.name.clone(), SurfaceMaterial::from_mtl(material));
        }
    }

    let obj_set = load_obj_from_str(input)?;
    geometry_from_obj_set(obj_set, &library)
}

/// Loads an OBJ file and the `mtllib` files it names, resolved next to it.
/// A missing material library only costs the default material.
pub fn load_geometry_from_file<P: AsRef<Path>>(path: P) -> Result<GeometryBuffer, ObjLoadError> {
    let path = path.as_ref();
    log::info!("Loading OBJ model from: {}.", path.display());
    let data = fs::read_to_string(path)?;

    let base = path.parent().map(Path::to_path_buf).unwrap_or_else(PathBuf::new);
    let mut materials = Vec::new();
    for name in material_libraries(&data) {
        let mtl_path = base.join(name);
        match fs::read_to_string(&mtl_path) {
            Ok(source) => materials.push(source),
            Err(e) => log::warn!("Material library {} not loaded: {}.", mtl_path.display(), e),
        }
    }

    let geometry = load_geometry_from_str(&data, &materials)?;
    log::info!("OBJ loaded, {} shapes, {} triangles.", geometry.shapes().len(), geometry.triangle_count());
    Ok(geometry)
}

fn geometry_from_obj_set(obj_set: obj::ObjSet,
                         library: &HashMap<String, SurfaceMaterial>) -> Result<GeometryBuffer, ObjLoadError> {
    let mut geometry = GeometryBuffer::default();

    for object in obj_set.objects {
        let positions: Vec<Vector3f> = object.vertices.iter()
            .map(|v| Vector3f::new(v.x as f32, v.y as f32, v.z as f32))
            .collect();
        let normals: Vec<Vector3f> = object.normals.iter()
            .map(|n| Vector3f::new(n.x as f32, n.y as f32, n.z as f32))
            .collect();

        let mut vertices = Vec::new();
        for geom in &object.geometry {
            let material = geom.material_name.as_ref().and_then(|name| library.get(name));
            for shape in &geom.shapes {
                if let obj::Primitive::Triangle(a, b, c) = &shape.primitive {
                    let mut corners = [Vector3f::zeros(); 3];
                    for (corner, idx) in corners.iter_mut().zip([a.0, b.0, c.0].iter()) {
                        *corner = *positions.get(*idx).ok_or_else(|| ObjLoadError::VertexIndex {
                            object: object.name.clone(),
                            index: *idx,
                        })?;
                    }
                    let face_normal = (corners[1] - corners[0]).cross(&(corners[2] - corners[0]));
                    let face_normal = face_normal.try_normalize(0.0).unwrap_or_else(|| Vector3f::new(0.0, 0.0, 1.0));

                    for (position, vtn) in corners.iter().zip([a, b, c].iter()) {
                        let normal = vtn.2.and_then(|i| normals.get(i)).cloned().unwrap_or(face_normal);
                        let mut vertex = Vertex::new(*position, normal);
                        if let Some(m) = material {
                            vertex = vertex.with_material(m.ambient, m.diffuse, m.emissive);
                        }
                        vertices.push(vertex);
                    }
                }
            }
        }

        let indices = (0..vertices.len() as u32).collect();
        geometry.add_shape(MeshShape::new(vertices, indices).with_name(object.name.clone()));
    }

    Ok(geometry)
}

fn material_libraries(input: &str) -> Vec<&str> {
    input.lines()
        .filter_map(|line| line.trim_start().strip_prefix("mtllib"))
        .flat_map(|rest| rest.split_whitespace())
        .collect()
}

fn triangulate_faces(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + input.len() / 4);
    for line in input.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("f ") || trimmed.starts_with("f\t") {
            let parts: Vec<&str> = trimmed.split_whitespace().collect();
            if parts.len() > 4 {
                // Fan around the first corner.
                for i in 2..(parts.len() - 1) {
                    out.push_str(&format!("f {} {} {}\n", parts[1], parts[i], parts[i + 1]));
                }
                continue;
            }
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}
