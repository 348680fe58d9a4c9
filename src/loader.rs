//! OBJ import.
//!
//! This is the asset-loading collaborator, not part of the rendering
//! core: it turns OBJ files into validated [`Mesh`] values. Fan
//! triangulation of polygons and rebasing of 1-based OBJ indices are
//! delegated to `tobj`'s triangulate mode.

use thiserror::Error;

use crate::math::vec3::Vec3;
use crate::mesh::{Mesh, MeshColor, MeshError};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to load OBJ: {0}")]
    Obj(#[from] tobj::LoadError),
    #[error(transparent)]
    Mesh(#[from] MeshError),
}

/// Loads every model in an OBJ file as a mesh with the given uniform color.
pub fn load_obj(path: &str, color: u32) -> Result<Vec<Mesh>, LoadError> {
    let (models, _materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )?;

    let meshes = meshes_from_models(models, color)?;
    log::info!("loaded {} mesh(es) from {path}", meshes.len());
    Ok(meshes)
}

fn meshes_from_models(models: Vec<tobj::Model>, color: u32) -> Result<Vec<Mesh>, LoadError> {
    models
        .into_iter()
        .map(|model| {
            let vertices: Vec<Vec3> = model
                .mesh
                .positions
                .chunks_exact(3)
                .map(|p| Vec3::new(p[0], p[1], p[2]))
                .collect();
            let triangles: Vec<[usize; 3]> = model
                .mesh
                .indices
                .chunks_exact(3)
                .map(|i| [i[0] as usize, i[1] as usize, i[2] as usize])
                .collect();
            Mesh::new(vertices, triangles, MeshColor::Uniform(color)).map_err(LoadError::from)
        })
        .collect()
}
