use anyhow::{Context, Result};
use glam::{Mat4, Vec3};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::path::Path;

use crate::traits::{DrawCommand, ModelHandle, ModelLoader, Primitive, Shading};

/// Summary of an imported glTF scene
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedModel {
    pub name: String,
    pub mesh_count: usize,
    pub vertex_count: usize,
    pub bounds_min: Vec3,
    pub bounds_max: Vec3,
}

impl LoadedModel {
    pub fn size(&self) -> Vec3 {
        self.bounds_max - self.bounds_min
    }
}

/// `ModelLoader` backed by the `gltf` crate
#[derive(Debug, Default)]
pub struct GltfModelLoader {
    models: HashMap<ModelHandle, LoadedModel>,
    next_id: u32,
}

impl GltfModelLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, handle: ModelHandle) -> Option<&LoadedModel> {
        self.models.get(&handle)
    }

    pub fn loaded_count(&self) -> usize {
        self.models.len()
    }

    /// Register an already-summarised model (used by tests and procedural assets)
    pub fn insert(&mut self, model: LoadedModel) -> ModelHandle {
        let handle = ModelHandle(self.next_id);
        self.next_id += 1;
        self.models.insert(handle, model);
        handle
    }
}

impl ModelLoader for GltfModelLoader {
    fn load(&mut self, path: &Path) -> Result<ModelHandle> {
        let model = load_gltf_model(path)?;
        info!(
            "loaded model {:?}: {} meshes, {} vertices",
            model.name, model.mesh_count, model.vertex_count
        );
        Ok(self.insert(model))
    }

    fn draw(&self, handle: ModelHandle, transform: Mat4) -> Option<DrawCommand> {
        self.models
            .contains_key(&handle)
            .then(|| DrawCommand::new(Primitive::Model(handle), transform, Shading::Model))
    }

    fn unload(&mut self, handle: ModelHandle) {
        if self.models.remove(&handle).is_none() {
            warn!("unload of unknown model {:?}", handle);
        }
    }
}

/// Import a glTF file and summarise its geometry
pub fn load_gltf_model(path: impl AsRef<Path>) -> Result<LoadedModel> {
    let path = path.as_ref();
    debug!("loading glTF file: {:?}", path);

    let (gltf, buffers, _images) = gltf::import(path)
        .with_context(|| format!("Failed to load glTF file: {:?}", path))?;

    let mut vertices = Vec::new();
    let mut mesh_count = 0;

    for scene in gltf.scenes() {
        for node in scene.nodes() {
            process_node(&node, &buffers, &Mat4::IDENTITY, &mut vertices, &mut mesh_count)?;
        }
    }

    if vertices.is_empty() {
        warn!("no geometry found in {:?}", path);
    }

    let (bounds_min, bounds_max) = compute_mesh_bounds(&vertices);
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unnamed".to_string());

    Ok(LoadedModel {
        name,
        mesh_count,
        vertex_count: vertices.len(),
        bounds_min,
        bounds_max,
    })
}

/// Recursively collects world-space vertices below a node
fn process_node(
    node: &gltf::Node,
    buffers: &[gltf::buffer::Data],
    parent_transform: &Mat4,
    vertices: &mut Vec<Vec3>,
    mesh_count: &mut usize,
) -> Result<()> {
    let local_transform = Mat4::from_cols_array_2d(&node.transform().matrix());
    let global_transform = *parent_transform * local_transform;

    if let Some(mesh) = node.mesh() {
        *mesh_count += 1;
        for primitive in mesh.primitives() {
            let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));
            let positions = reader
                .read_positions()
                .context("Mesh primitive has no positions")?;
            vertices.extend(positions.map(|p| global_transform.transform_point3(Vec3::from_array(p))));
        }
    }

    for child in node.children() {
        process_node(&child, buffers, &global_transform, vertices, mesh_count)?;
    }

    Ok(())
}

/// Axis-aligned bounds of a vertex cloud; zero for an empty cloud
pub fn compute_mesh_bounds(vertices: &[Vec3]) -> (Vec3, Vec3) {
    match vertices.split_first() {
        None => (Vec3::ZERO, Vec3::ZERO),
        Some((first, rest)) => rest
            .iter()
            .fold((*first, *first), |(min, max), &v| (min.min(v), max.max(v))),
    }
}
