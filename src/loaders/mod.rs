pub mod gltf;
pub mod texture;

pub use self::gltf::{compute_mesh_bounds, load_gltf_model, GltfModelLoader, LoadedModel};
pub use self::texture::{load_scene_textures, load_texture, TextureData};
