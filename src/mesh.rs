//! Triangle mesh geometry.
//!
//! A [`Mesh`] is immutable after construction: vertex positions, triangle
//! indices and vertex normals are fixed once [`Mesh::new`] validates them.
//! World placement happens at scene-build time through [`Mesh::translated`],
//! which keeps normals valid (translation never changes them).
//!
//! # Winding
//!
//! Triangles are authored counter-clockwise as seen from outside the
//! surface. The rasterizer's backface culling and the normal computation
//! both rely on this convention.

use thiserror::Error;

use crate::math::vec3::{Vec3, NORMALIZE_EPSILON};

/// Construction-time mesh integrity failures.
///
/// Bad indices or mismatched color lists are data errors, caught when the
/// mesh is built rather than in the middle of a frame.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("triangle {triangle} references vertex {index} but mesh has {vertex_count} vertices")]
    IndexOutOfBounds {
        triangle: usize,
        index: usize,
        vertex_count: usize,
    },
    #[error("per-triangle color list has {actual} entries for {expected} triangles")]
    ColorCount { expected: usize, actual: usize },
}

/// Mesh base color: one color for the whole mesh, or one per triangle.
///
/// The per-triangle variant's length is validated against the triangle
/// count at construction, so `color_of` never has to range-check.
#[derive(Debug, Clone)]
pub enum MeshColor {
    Uniform(u32),
    PerTriangle(Vec<u32>),
}

impl MeshColor {
    #[inline]
    pub fn color_of(&self, triangle: usize) -> u32 {
        match self {
            MeshColor::Uniform(color) => *color,
            MeshColor::PerTriangle(colors) => colors[triangle],
        }
    }
}

#[derive(Debug, Clone)]
pub struct Mesh {
    vertices: Vec<Vec3>,
    triangles: Vec<[usize; 3]>,
    normals: Vec<Vec3>,
    color: MeshColor,
}

impl Mesh {
    /// Builds a mesh from vertex positions and triangle index triples.
    ///
    /// Validates every index against the vertex count and, for
    /// per-triangle colors, the color list length against the triangle
    /// count. Vertex normals are computed here, once.
    pub fn new(
        vertices: Vec<Vec3>,
        triangles: Vec<[usize; 3]>,
        color: MeshColor,
    ) -> Result<Self, MeshError> {
        for (t, tri) in triangles.iter().enumerate() {
            for &index in tri {
                if index >= vertices.len() {
                    return Err(MeshError::IndexOutOfBounds {
                        triangle: t,
                        index,
                        vertex_count: vertices.len(),
                    });
                }
            }
        }

        if let MeshColor::PerTriangle(colors) = &color {
            if colors.len() != triangles.len() {
                return Err(MeshError::ColorCount {
                    expected: triangles.len(),
                    actual: colors.len(),
                });
            }
        }

        let normals = compute_normals(&vertices, &triangles);

        Ok(Self {
            vertices,
            triangles,
            normals,
            color,
        })
    }

    /// An axis-aligned cube of the given edge length centered at `center`.
    pub fn cube(center: Vec3, size: f32, color: MeshColor) -> Result<Self, MeshError> {
        let h = size / 2.0;
        let vertices = vec![
            // Vertices 0-3 on the +z face, 4-7 on the -z face
            Vec3::new(center.x - h, center.y - h, center.z + h),
            Vec3::new(center.x + h, center.y - h, center.z + h),
            Vec3::new(center.x + h, center.y + h, center.z + h),
            Vec3::new(center.x - h, center.y + h, center.z + h),
            Vec3::new(center.x - h, center.y - h, center.z - h),
            Vec3::new(center.x + h, center.y - h, center.z - h),
            Vec3::new(center.x + h, center.y + h, center.z - h),
            Vec3::new(center.x - h, center.y + h, center.z - h),
        ];
        // CCW as seen from outside each face.
        let triangles = vec![
            [0, 1, 2],
            [0, 2, 3], // +z
            [5, 4, 7],
            [5, 7, 6], // -z
            [4, 0, 3],
            [4, 3, 7], // -x
            [1, 5, 6],
            [1, 6, 2], // +x
            [3, 2, 6],
            [3, 6, 7], // +y
            [4, 5, 1],
            [4, 1, 0], // -y
        ];
        Self::new(vertices, triangles, color)
    }

    /// Returns a copy of this mesh shifted by `offset` in world space.
    ///
    /// This is the only supported world transform; normals carry over
    /// unchanged.
    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            vertices: self.vertices.iter().map(|&v| v + offset).collect(),
            triangles: self.triangles.clone(),
            normals: self.normals.clone(),
            color: self.color.clone(),
        }
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn color(&self) -> &MeshColor {
        &self.color
    }
}

/// Per-vertex normals as the normalized sum of adjacent face normals.
///
/// Each face contributes its unnormalized cross-product normal, which
/// weights the sum by face area. Degenerate faces contribute nothing, and
/// vertices whose accumulated normal stays below the normalize threshold
/// keep a zero normal.
fn compute_normals(vertices: &[Vec3], triangles: &[[usize; 3]]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; vertices.len()];

    for tri in triangles {
        let [a, b, c] = *tri;
        let edge1 = vertices[b] - vertices[a];
        let edge2 = vertices[c] - vertices[a];
        let face_normal = edge1.cross(edge2);
        if face_normal.length() < NORMALIZE_EPSILON {
            continue;
        }
        normals[a] = normals[a] + face_normal;
        normals[b] = normals[b] + face_normal;
        normals[c] = normals[c] + face_normal;
    }

    for normal in &mut normals {
        *normal = normal.normalize();
    }

    normals
}
