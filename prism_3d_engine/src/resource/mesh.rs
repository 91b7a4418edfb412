//! CPU-side mesh builder.
//!
//! A `Mesh` holds vertex positions and colors plus three independent index
//! lists: points, edges and faces. It is uploaded to the graphics device as a
//! [`GpuMesh`](super::GpuMesh); the CPU copy can be dropped afterwards.

use glam::{Vec3, Vec4};
use crate::error::Result;
use crate::math::{self, point};

const CUBE_VERTICES: [Vec4; 8] = [
    Vec4::new(1.0, 1.0, 1.0, 1.0),
    Vec4::new(1.0, 1.0, -1.0, 1.0),
    Vec4::new(1.0, -1.0, 1.0, 1.0),
    Vec4::new(1.0, -1.0, -1.0, 1.0),
    Vec4::new(-1.0, 1.0, 1.0, 1.0),
    Vec4::new(-1.0, 1.0, -1.0, 1.0),
    Vec4::new(-1.0, -1.0, 1.0, 1.0),
    Vec4::new(-1.0, -1.0, -1.0, 1.0),
];

const CUBE_COLORS: [Vec3; 8] = [
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(0.0, 1.0, 0.0),
    Vec3::new(0.0, 0.0, 1.0),
    Vec3::new(1.0, 1.0, 0.0),
    Vec3::new(1.0, 1.0, 1.0),
    Vec3::new(1.0, 0.0, 1.0),
    Vec3::new(0.0, 1.0, 1.0),
    Vec3::new(1.0, 1.0, 1.0),
];

const CUBE_EDGES: [[u32; 2]; 12] = [
    [0, 1], [1, 3], [2, 3], [0, 2],
    [0, 4], [2, 6], [3, 7], [1, 5],
    [4, 5], [5, 7], [6, 7], [4, 6],
];

// Counter-clockwise seen from outside
const CUBE_FACES: [[u32; 3]; 12] = [
    [0, 3, 1], [0, 2, 3],
    [0, 5, 4], [0, 1, 5],
    [3, 7, 5], [1, 3, 5],
    [2, 6, 7], [2, 7, 3],
    [0, 6, 2], [0, 4, 6],
    [4, 7, 6], [4, 5, 7],
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    name: String,
    positions: Vec<Vec4>,
    colors: Vec<Vec3>,
    normals: Option<Vec<Vec4>>,
    points: Vec<u32>,
    edges: Vec<[u32; 2]>,
    faces: Vec<[u32; 3]>,
}

impl Mesh {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Cube spanning [-1, 1] on every axis (8 vertices, 12 edges, 12 faces)
    pub fn cube() -> Self {
        Self {
            name: "Cube".to_string(),
            positions: CUBE_VERTICES.to_vec(),
            colors: CUBE_COLORS.to_vec(),
            normals: None,
            points: (0..CUBE_VERTICES.len() as u32).collect(),
            edges: CUBE_EDGES.to_vec(),
            faces: CUBE_FACES.to_vec(),
        }
    }

    /// Red/green/blue unit segments along +X/+Y/+Z
    pub fn orientation_axes() -> Self {
        let center = point(0.0, 0.0, 0.0);
        let (red, green, blue) = (Vec3::X, Vec3::Y, Vec3::Z);
        Self {
            name: "Orientation".to_string(),
            positions: vec![center, center, center, point(1.0, 0.0, 0.0), point(0.0, 1.0, 0.0), point(0.0, 0.0, 1.0)],
            colors: vec![red, green, blue, red, green, blue],
            normals: None,
            points: Vec::new(),
            edges: vec![[0, 3], [1, 4], [2, 5]],
            faces: Vec::new(),
        }
    }

    /// Same mesh under another name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Append a vertex and return its index
    pub fn add_vertex(&mut self, position: Vec4, color: Vec3) -> u32 {
        self.positions.push(position);
        self.colors.push(color);
        if let Some(normals) = self.normals.as_mut() {
            normals.push(Vec4::ZERO);
        }
        (self.positions.len() - 1) as u32
    }

    pub fn add_point(&mut self, v: u32) -> Result<()> {
        self.check_indices(&[v])?;
        self.points.push(v);
        Ok(())
    }

    pub fn add_edge(&mut self, v1: u32, v2: u32) -> Result<()> {
        self.check_indices(&[v1, v2])?;
        self.edges.push([v1, v2]);
        Ok(())
    }

    pub fn add_face(&mut self, v1: u32, v2: u32, v3: u32) -> Result<()> {
        self.check_indices(&[v1, v2, v3])?;
        self.faces.push([v1, v2, v3]);
        Ok(())
    }

    fn check_indices(&self, indices: &[u32]) -> Result<()> {
        let count = self.positions.len();
        if let Some(bad) = indices.iter().find(|&&i| i as usize >= count) {
            crate::engine_bail!("prism3d::Mesh", InvalidArgument,
                "Mesh '{}': vertex index {} out of range ({} vertices)", self.name, bad, count);
        }
        Ok(())
    }

    /// Flat-shaded copy: every face gets its own three vertices, all carrying the face normal.
    ///
    /// Points and edges are dropped since the shared vertices they index no longer exist.
    /// Degenerate faces get a zero normal.
    pub fn with_flat_normals(&self) -> Self {
        let mut flat = Self {
            name: self.name.clone(),
            positions: Vec::with_capacity(self.faces.len() * 3),
            colors: Vec::with_capacity(self.faces.len() * 3),
            normals: Some(Vec::with_capacity(self.faces.len() * 3)),
            points: Vec::new(),
            edges: Vec::new(),
            faces: Vec::with_capacity(self.faces.len()),
        };

        for &face in &self.faces {
            let [a, b, c] = face.map(|i| self.positions[i as usize]);
            let normal = math::cross(b - a, c - a).truncate().normalize_or_zero().extend(0.0);

            let base = flat.positions.len() as u32;
            for i in face {
                flat.positions.push(self.positions[i as usize]);
                flat.colors.push(self.colors[i as usize]);
                if let Some(normals) = flat.normals.as_mut() {
                    normals.push(normal);
                }
            }
            flat.faces.push([base, base + 1, base + 2]);
        }
        flat
    }

    // ===== GETTERS =====

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn positions(&self) -> &[Vec4] {
        &self.positions
    }

    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }

    pub fn normals(&self) -> Option<&[Vec4]> {
        self.normals.as_deref()
    }

    pub fn has_normals(&self) -> bool {
        self.normals.is_some()
    }

    pub fn points(&self) -> &[u32] {
        &self.points
    }

    pub fn edges(&self) -> &[[u32; 2]] {
        &self.edges
    }

    pub fn faces(&self) -> &[[u32; 3]] {
        &self.faces
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }
}

#[cfg(test)]
#[path = "mesh_tests.rs"]
mod tests;
