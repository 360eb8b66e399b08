// Copyright @yucwang 2026

use crate::math::constants::Vector3f;
use std::path::PathBuf;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Vertex {
    pub position: Vector3f,
    pub normal: Vector3f,
    pub ambient: Vector3f,
    pub diffuse: Vector3f,
    pub emissive: Vector3f,
}

impl Default for Vertex {
    fn default() -> Self {
        Self {
            position: Vector3f::zeros(),
            normal: Vector3f::new(0.0, 0.0, 1.0),
            ambient: Vector3f::zeros(),
            diffuse: Vector3f::new(0.8, 0.8, 0.8),
            emissive: Vector3f::zeros(),
        }
    }
}

impl Vertex {
    pub fn new(position: Vector3f, normal: Vector3f) -> Self {
        Self { position, normal, ..Self::default() }
    }

    pub fn with_material(mut self, ambient: Vector3f, diffuse: Vector3f, emissive: Vector3f) -> Self {
        self.ambient = ambient;
        self.diffuse = diffuse;
        self.emissive = emissive;
        self
    }
}

/// One shape of the model: a vertex list and three indices per triangle.
#[derive(Debug, Clone, Default)]
pub struct MeshShape {
    pub name: Option<String>,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub texture: Option<PathBuf>,
}

impl MeshShape {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { name: None, vertices, indices, texture: None }
    }

    pub fn with_name(mut self, name: String) -> Self {
        self.name = Some(name);
        self
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

#[derive(Debug, Clone, Default)]
pub struct GeometryBuffer {
    shapes: Vec<MeshShape>,
}

impl GeometryBuffer {
    pub fn new(shapes: Vec<MeshShape>) -> Self {
        Self { shapes }
    }

    pub fn add_shape(&mut self, shape: MeshShape) {
        self.shapes.push(shape);
    }

    pub fn shapes(&self) -> &[MeshShape] {
        &self.shapes
    }

    pub fn triangle_count(&self) -> usize {
        self.shapes.iter().map(|s| s.triangle_count()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.triangle_count() == 0
    }
}
