use glam::Mat4;
use std::path::Path;

use super::renderer::{DrawCommand, ModelHandle};

/// Model loader collaborator - owns external 3D assets
pub trait ModelLoader {
    /// Load an asset and hand back an opaque handle
    fn load(&mut self, path: &Path) -> anyhow::Result<ModelHandle>;

    /// Draw command for a loaded model, or None if the handle is unknown
    fn draw(&self, handle: ModelHandle, transform: Mat4) -> Option<DrawCommand>;

    /// Release an asset; unknown handles are ignored
    fn unload(&mut self, handle: ModelHandle);
}
