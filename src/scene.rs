//! Scene container.

use crate::mesh::Mesh;
use crate::primitive::Intersect;

/// An ordered collection of renderable objects.
///
/// The rasterization pipeline reads `meshes`, the ray-casting pipeline
/// reads `primitives`; a frame only ever consumes one of the two lists.
/// Insertion order is preserved but has no visual effect beyond
/// tie-breaking exactly equal depths.
#[derive(Default)]
pub struct Scene {
    meshes: Vec<Mesh>,
    primitives: Vec<Box<dyn Intersect>>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_mesh(&mut self, mesh: Mesh) {
        self.meshes.push(mesh);
    }

    pub fn add_primitive(&mut self, primitive: Box<dyn Intersect>) {
        self.primitives.push(primitive);
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn primitives(&self) -> &[Box<dyn Intersect>] {
        &self.primitives
    }
}
