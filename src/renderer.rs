use log::trace;
use std::collections::HashMap;

use crate::loaders::TextureData;
use crate::terrain::TerrainMesh;
use crate::traits::{FramePlan, Primitive, Renderer, TextureSlot};

/// Per-frame draw statistics
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    pub commands: usize,
    pub spheres: usize,
    pub cubes: usize,
    pub quads: usize,
    pub models: usize,
    pub terrain: usize,
}

impl FrameStats {
    pub fn from_plan(plan: &FramePlan) -> Self {
        let mut stats = Self {
            commands: plan.commands.len(),
            ..Default::default()
        };
        for cmd in &plan.commands {
            match cmd.primitive {
                Primitive::Sphere => stats.spheres += 1,
                Primitive::Cube => stats.cubes += 1,
                Primitive::Quad => stats.quads += 1,
                Primitive::Model(_) => stats.models += 1,
                Primitive::Terrain => stats.terrain += 1,
            }
        }
        stats
    }
}

/// Renderer that keeps what it is given instead of drawing it.
/// Backs headless runs and tests.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    terrain_triangles: Option<usize>,
    textures: HashMap<TextureSlot, (u32, u32)>,
    last_plan: Option<FramePlan>,
    last_stats: FrameStats,
    frames: u64,
    size: (u32, u32),
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_plan(&self) -> Option<&FramePlan> {
        self.last_plan.as_ref()
    }

    pub fn last_stats(&self) -> FrameStats {
        self.last_stats
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn terrain_triangles(&self) -> Option<usize> {
        self.terrain_triangles
    }

    pub fn texture_size(&self, slot: TextureSlot) -> Option<(u32, u32)> {
        self.textures.get(&slot).copied()
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }
}

impl Renderer for RecordingRenderer {
    fn register_terrain(&mut self, mesh: &TerrainMesh) -> anyhow::Result<()> {
        self.terrain_triangles = Some(mesh.triangle_count());
        Ok(())
    }

    fn register_texture(&mut self, slot: TextureSlot, texture: &TextureData) -> anyhow::Result<()> {
        self.textures.insert(slot, (texture.width, texture.height));
        Ok(())
    }

    fn render(&mut self, plan: &FramePlan) -> anyhow::Result<()> {
        self.last_stats = FrameStats::from_plan(plan);
        self.frames += 1;
        trace!("frame {}: {:?}", self.frames, self.last_stats);
        self.last_plan = Some(plan.clone());
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::ClearColor;
    use crate::traits::{DrawCommand, RenderToggles, Shading};
    use glam::Mat4;

    #[test]
    fn stats_count_primitives() {
        let plan = FramePlan {
            clear_color: ClearColor::new(0.0, 0.0, 0.0, 0.0),
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            toggles: RenderToggles::default(),
            commands: vec![
                DrawCommand::new(Primitive::Terrain, Mat4::IDENTITY, Shading::Terrain),
                DrawCommand::new(Primitive::Sphere, Mat4::IDENTITY, Shading::Flat([1.0; 4])),
                DrawCommand::new(Primitive::Sphere, Mat4::IDENTITY, Shading::Flat([1.0; 4])),
            ],
        };

        let mut renderer = RecordingRenderer::new();
        renderer.render(&plan).unwrap();

        let stats = renderer.last_stats();
        assert_eq!(stats.commands, 3);
        assert_eq!(stats.spheres, 2);
        assert_eq!(stats.terrain, 1);
        assert_eq!(renderer.frames(), 1);
    }

    #[test]
    fn textures_are_remembered_by_slot() {
        let mut renderer = RecordingRenderer::new();
        renderer
            .register_texture(TextureSlot::Clouds, &TextureData::placeholder())
            .unwrap();
        assert_eq!(renderer.texture_size(TextureSlot::Clouds), Some((1, 1)));
        assert_eq!(renderer.texture_size(TextureSlot::Plasma), None);
    }
}
