use glam::Mat4;
use std::path::Path;

use snowfield::frame::FrameIterator;
use snowfield::loaders::{load_scene_textures, GltfModelLoader};
use snowfield::math::ClearColor;
use snowfield::renderer::RecordingRenderer;
use snowfield::traits::{
    DrawCommand, ModelHandle, ModelLoader, Primitive, Renderer, Shading, TextureSlot,
};
use snowfield::{HeightField, InputState, SceneConfig, SceneError, SceneState, Viewport};

/// Model loader that hands out handles without touching the disk
#[derive(Default)]
struct StubModels {
    live: Vec<ModelHandle>,
    next: u32,
}

impl ModelLoader for StubModels {
    fn load(&mut self, _path: &Path) -> anyhow::Result<ModelHandle> {
        let handle = ModelHandle(self.next);
        self.next += 1;
        self.live.push(handle);
        Ok(handle)
    }

    fn draw(&self, handle: ModelHandle, transform: Mat4) -> Option<DrawCommand> {
        self.live
            .contains(&handle)
            .then(|| DrawCommand::new(Primitive::Model(handle), transform, Shading::Model))
    }

    fn unload(&mut self, handle: ModelHandle) {
        self.live.retain(|&h| h != handle);
    }
}

fn small_config() -> SceneConfig {
    let mut config = SceneConfig::default();
    config.terrain.width = 65;
    config.terrain.height = 65;
    config.snow.count = 50;
    config
}

fn flat_scene(models: &mut dyn ModelLoader) -> SceneState {
    let terrain = HeightField::from_samples(33, 33, vec![0.5; 33 * 33])
        .unwrap()
        .with_scale(100.0, 10.0);
    SceneState::with_terrain(&small_config(), terrain, models)
}

#[cfg(test)]
mod lifecycle_tests {
    use super::*;

    #[test]
    fn test_init_rejects_bad_terrain() {
        let mut config = small_config();
        config.terrain.width = 100;
        let result = SceneState::init(&config, &mut StubModels::default());
        assert!(matches!(result, Err(SceneError::InvalidDimension { width: 100, .. })));

        let mut config = small_config();
        config.terrain.roughness = 1.5;
        let result = SceneState::init(&config, &mut StubModels::default());
        assert!(matches!(result, Err(SceneError::InvalidRoughness(_))));
    }

    #[test]
    fn test_init_is_seeded() {
        let a = SceneState::init(&small_config(), &mut StubModels::default()).unwrap();
        let b = SceneState::init(&small_config(), &mut StubModels::default()).unwrap();
        assert_eq!(a.terrain().samples(), b.terrain().samples());
        assert_eq!(a.snow().positions(), b.snow().positions());
    }

    #[test]
    fn test_missing_gltf_is_not_fatal() {
        let mut config = small_config();
        config.assets.model = Some("/no/such/fish.gltf".into());
        let mut models = GltfModelLoader::new();

        let scene = SceneState::init(&config, &mut models).unwrap();
        assert_eq!(scene.model(), None);
        assert_eq!(models.loaded_count(), 0);
    }

    #[test]
    fn test_renderer_receives_terrain_and_textures() {
        let mut models = StubModels::default();
        let scene = flat_scene(&mut models);
        let config = small_config();

        let mut renderer = RecordingRenderer::new();
        renderer.register_terrain(&scene.terrain_mesh()).unwrap();
        for (slot, texture) in load_scene_textures(&config.assets) {
            renderer.register_texture(slot, &texture).unwrap();
        }

        assert_eq!(renderer.terrain_triangles(), Some(32 * 32 * 2));
        assert!(renderer.texture_size(TextureSlot::SunGradient).is_some());
    }
}

#[cfg(test)]
mod frame_loop_tests {
    use super::*;

    #[test]
    fn test_walk_and_render() {
        let mut models = StubModels::default();
        let mut scene = flat_scene(&mut models);
        let mut renderer = RecordingRenderer::new();
        let viewport = Viewport::new(800, 600);
        let input = InputState { forward: true, ..Default::default() };

        for frame in FrameIterator::fixed(0.1).take(10) {
            scene.tick(frame.delta, input);
            renderer.render(&scene.draw(&viewport, &models)).unwrap();
        }

        assert_eq!(renderer.frames(), 10);
        assert!((scene.camera().z + 15.0).abs() < 1e-4);

        let plan = renderer.last_plan().unwrap();
        assert_eq!(plan.commands[0].primitive, Primitive::Terrain);
        assert_eq!(renderer.last_stats().models, 1);
        assert_eq!(renderer.last_stats().quads, 1);
    }

    #[test]
    fn test_standing_still_keeps_daylight() {
        let mut models = StubModels::default();
        let mut scene = flat_scene(&mut models);

        for frame in FrameIterator::fixed(0.016).take(500) {
            let report = scene.tick(frame.delta, InputState::default());
            assert_eq!(report.clear_color, None);
        }
        assert_eq!(scene.day_cycle().lap_count(), 0);
        assert_eq!(
            scene.draw(&Viewport::new(800, 600), &models).clear_color,
            ClearColor::new(0.0, 0.4, 0.9, 0.0)
        );
    }

    #[test]
    fn test_long_walk_darkens_sky() {
        let mut models = StubModels::default();
        let mut scene = flat_scene(&mut models);
        // Pace back and forth so no prop or lake gets in the way
        let pace = InputState { forward: true, backward: true, ..Default::default() };

        let mut first_change = None;
        for frame in FrameIterator::fixed(0.016).take(200) {
            let report = scene.tick(frame.delta, pace);
            if first_change.is_none() {
                first_change = report.clear_color;
            }
        }

        assert_eq!(first_change, Some(ClearColor::new(0.0, 0.38, 0.48, 0.0)));
        assert!(scene.day_cycle().day_channel() < 0.4);
        assert!(scene.snow().is_active());
    }

    #[test]
    fn test_model_flies_circle() {
        let mut models = StubModels::default();
        let mut scene = flat_scene(&mut models);
        let before = scene.flight().position();

        for frame in FrameIterator::fixed(0.1).take(5) {
            scene.tick(frame.delta, InputState::default());
        }

        let after = scene.flight().position();
        assert_ne!(before, after);
        // Radius 10 around (10, 2.5, -10)
        let centre = glam::Vec3::new(10.0, 2.5, -10.0);
        assert!(((after - centre).length() - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_shutdown_unloads_model() {
        let mut models = StubModels::default();
        let scene = flat_scene(&mut models);
        assert_eq!(models.live.len(), 1);
        scene.shutdown(&mut models);
        assert!(models.live.is_empty());
    }
}
