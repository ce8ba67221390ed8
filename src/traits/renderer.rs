use glam::Mat4;

use crate::loaders::TextureData;
use crate::math::ClearColor;
use crate::terrain::TerrainMesh;

/// Handle to a model owned by a `ModelLoader`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelHandle(pub u32);

/// What a draw command draws
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    /// The registered terrain mesh
    Terrain,
    Cube,
    Sphere,
    Quad,
    Model(ModelHandle),
}

/// Shader parameters attached to a draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shading {
    /// Single RGBA color
    Flat([f32; 4]),
    /// Terrain gradient lookup
    Terrain,
    /// Animated sun surface driven by the day cycle
    Sun { cycle: f32 },
    /// Whatever materials the model carries
    Model,
}

/// Texture slots the scene binds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    Clouds,
    TerrainGradient,
    Plasma,
    SunGradient,
}

/// One draw: primitive, model transform, shading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    pub primitive: Primitive,
    pub transform: Mat4,
    pub shading: Shading,
}

impl DrawCommand {
    pub fn new(primitive: Primitive, transform: Mat4, shading: Shading) -> Self {
        Self { primitive, transform, shading }
    }
}

/// Display switches flipped from the keyboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderToggles {
    pub wireframe: bool,
    pub fog: bool,
    pub mipmap: bool,
    pub anisotropic: bool,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone)]
pub struct FramePlan {
    pub clear_color: ClearColor,
    pub view: Mat4,
    pub projection: Mat4,
    pub toggles: RenderToggles,
    pub commands: Vec<DrawCommand>,
}

impl FramePlan {
    /// Number of commands drawing the given primitive
    pub fn count(&self, primitive: Primitive) -> usize {
        self.commands.iter().filter(|c| c.primitive == primitive).count()
    }
}

/// Renderer collaborator - receives prepared frames, never builds them
pub trait Renderer {
    /// Take ownership of a GPU-side copy of the terrain mesh
    fn register_terrain(&mut self, mesh: &TerrainMesh) -> anyhow::Result<()>;

    /// Bind a texture to a slot
    fn register_texture(&mut self, slot: TextureSlot, texture: &TextureData) -> anyhow::Result<()>;

    /// Draw a frame
    fn render(&mut self, plan: &FramePlan) -> anyhow::Result<()>;

    /// Window size changed
    fn resize(&mut self, _width: u32, _height: u32) {}
}
