use glam::{Mat4, Vec3};
use log::{debug, info, warn};

use super::decorations::{Decoration, LANDMARKS};
use super::flight::FlightPath;
use super::registry::ObjectRegistry;
use super::snow::SnowParticles;
use crate::camera::{Camera, CameraController, InputState};
use crate::config::SceneConfig;
use crate::core::timer::DayCycleTimer;
use crate::error::SceneError;
use crate::math::{palette, ClearColor};
use crate::terrain::{HeightField, TerrainMesh};
use crate::traits::{
    Button, DrawCommand, FramePlan, ModelHandle, ModelLoader, Primitive, RenderToggles, Shading,
};

const SNOWFLAKE_SCALE: f32 = 0.25;
const WATER_SCALE: f32 = 2000.0;
const WATER_X: f32 = 40.0;
const SUN_POSITION: Vec3 = Vec3::new(-700.0, 150.0, -700.0);
const SUN_SCALE: f32 = 15.0;
const NEAR: f32 = 1.0;
const FAR: f32 = 1000.0;

/// Window size plus cursor height, used to build the camera matrices
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub cursor_y: Option<f32>,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, cursor_y: None }
    }

    /// Frustum with a unit-wide near plane at distance 1
    pub fn projection(&self) -> Mat4 {
        let w = self.width.max(1) as f32;
        let h = self.height.max(1) as f32;
        let fov_y = 2.0 * (0.5 * h / w / NEAR).atan();
        Mat4::perspective_rh_gl(fov_y, w / h, NEAR, FAR)
    }

    /// Look-down offset from the cursor: zero at mid-height
    pub fn pitch(&self) -> f32 {
        let h = self.height.max(1) as f32;
        self.cursor_y.map_or(0.0, |y| (y - h / 2.0) / h)
    }
}

/// Result of one simulation tick
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub steps: u32,
    pub blocked: u32,
    /// New clear color if the day cycle changed it
    pub clear_color: Option<ClearColor>,
}

/// Everything the simulation owns, from init to shutdown
pub struct SceneState {
    terrain: HeightField,
    registry: ObjectRegistry,
    controller: CameraController,
    day_cycle: DayCycleTimer,
    snow: SnowParticles,
    flight: FlightPath,
    landmarks: Vec<Decoration>,
    grass: Vec<Decoration>,
    model: Option<ModelHandle>,
    toggles: RenderToggles,
    eye_height: f32,
    water_drop: f32,
}

impl SceneState {
    /// Generate terrain, plant props, scatter snow and load the model.
    /// Bad terrain settings are fatal; a missing model is not.
    pub fn init(config: &SceneConfig, models: &mut dyn ModelLoader) -> Result<Self, SceneError> {
        let t = &config.terrain;
        let terrain = HeightField::from_seed(t.width, t.height, t.roughness, t.seed)?
            .with_scale(t.scale_xz, t.scale_y);
        info!(
            "terrain {}x{} generated (seed {}, origin altitude {:.2})",
            t.width,
            t.height,
            t.seed,
            terrain.altitude(0.0, 0.0)
        );
        Ok(Self::with_terrain(config, terrain, models))
    }

    /// Build a scene on an existing height field
    pub fn with_terrain(config: &SceneConfig, terrain: HeightField, models: &mut dyn ModelLoader) -> Self {
        let mut registry = ObjectRegistry::new(config.registry.capacity);
        let landmarks = LANDMARKS.to_vec();
        for deco in landmarks.iter().filter(|d| d.is_solid()) {
            let (x, z) = deco.footprint();
            if !registry.try_register(x, z) {
                debug!("registry full, ({}, {}) has no collision box", x, z);
            }
        }

        let snow = SnowParticles::new(&config.snow);
        let grass = snow
            .positions()
            .iter()
            .map(|p| Decoration::Grass { x: p.x, z: p.z })
            .collect();

        let model = config.assets.model.as_deref().and_then(|path| match models.load(path) {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!("model {:?} unavailable, flying nothing: {:#}", path, e);
                None
            }
        });

        Self {
            terrain,
            registry,
            controller: CameraController::new(&config.camera, config.registry.half_width),
            day_cycle: DayCycleTimer::new(config.day_cycle.clone()),
            snow,
            flight: FlightPath::new(&config.flight),
            landmarks,
            grass,
            model,
            toggles: RenderToggles::default(),
            eye_height: config.camera.eye_height,
            water_drop: config.camera.water_drop,
        }
    }

    /// Advance one frame: camera, day cycle, snow, flight
    pub fn tick(&mut self, dt: f32, input: InputState) -> TickReport {
        let outcome = self.controller.tick(dt, input, &self.terrain, &self.registry);
        let clear_color = self.day_cycle.tick(dt, outcome.steps);

        if self.day_cycle.snow_enabled() && !self.snow.is_active() {
            info!("snow begins after {} laps", self.day_cycle.lap_count());
            self.snow.enable();
        }
        self.snow.tick();
        self.flight.tick(dt);

        TickReport {
            steps: outcome.steps,
            blocked: outcome.blocked,
            clear_color,
        }
    }

    /// Lay out this frame's draws
    pub fn draw(&self, viewport: &Viewport, models: &dyn ModelLoader) -> FramePlan {
        let cam = self.controller.camera();
        let eye_y = self.terrain.altitude(cam.x, cam.z) + self.eye_height;
        let mut commands = Vec::with_capacity(64 + self.snow.len() + self.grass.len());

        commands.push(DrawCommand::new(
            Primitive::Terrain,
            Mat4::from_scale(Vec3::new(
                self.terrain.scale_xz(),
                self.terrain.scale_y(),
                self.terrain.scale_xz(),
            )),
            Shading::Terrain,
        ));

        for deco in &self.landmarks {
            deco.push_draws(&self.terrain, &mut commands);
        }

        commands.push(DrawCommand::new(
            Primitive::Quad,
            Mat4::from_translation(Vec3::new(WATER_X, self.water_level(), 0.0))
                * Mat4::from_rotation_x(-std::f32::consts::FRAC_PI_2)
                * Mat4::from_scale(Vec3::splat(WATER_SCALE)),
            Shading::Flat(palette::WATER),
        ));

        // Flakes follow the camera so it is always snowing around the viewer
        if self.snow.is_active() {
            for p in self.snow.visible() {
                commands.push(DrawCommand::new(
                    Primitive::Sphere,
                    Mat4::from_translation(Vec3::new(p.x + cam.x, p.y, p.z + cam.z))
                        * Mat4::from_scale(Vec3::splat(SNOWFLAKE_SCALE)),
                    Shading::Flat(palette::WHITE),
                ));
            }
        }

        for blade in &self.grass {
            blade.push_draws(&self.terrain, &mut commands);
        }

        commands.push(DrawCommand::new(
            Primitive::Sphere,
            Mat4::from_translation(SUN_POSITION) * Mat4::from_scale(Vec3::splat(SUN_SCALE)),
            Shading::Sun { cycle: self.day_cycle.cycle() },
        ));

        if let Some(cmd) = self.model.and_then(|h| models.draw(h, self.flight.transform())) {
            commands.push(cmd);
        }

        FramePlan {
            clear_color: self.day_cycle.clear_color(),
            view: cam.view_matrix(eye_y, viewport.pitch()),
            projection: viewport.projection(),
            toggles: self.toggles,
            commands,
        }
    }

    /// Flip a display toggle; false if the button is not a toggle key
    pub fn toggle(&mut self, button: Button) -> bool {
        let flag = match button {
            Button::KeyW => &mut self.toggles.wireframe,
            Button::KeyF => &mut self.toggles.fog,
            Button::KeyM => &mut self.toggles.mipmap,
            Button::KeyA => &mut self.toggles.anisotropic,
            _ => return false,
        };
        *flag = !*flag;
        debug!("toggles now {:?}", self.toggles);
        true
    }

    /// Release the model; the height field and props drop with `self`
    pub fn shutdown(self, models: &mut dyn ModelLoader) {
        if let Some(handle) = self.model {
            models.unload(handle);
        }
        info!("scene shut down");
    }

    /// Altitude below which the camera refuses to walk
    pub fn water_level(&self) -> f32 {
        self.terrain.altitude(0.0, 0.0) - self.water_drop
    }

    pub fn terrain_mesh(&self) -> TerrainMesh {
        TerrainMesh::from_height_field(&self.terrain)
    }

    pub fn terrain(&self) -> &HeightField {
        &self.terrain
    }

    pub fn registry(&self) -> &ObjectRegistry {
        &self.registry
    }

    pub fn camera(&self) -> &Camera {
        self.controller.camera()
    }

    pub fn set_camera(&mut self, camera: Camera) {
        self.controller.set_camera(camera);
    }

    pub fn day_cycle(&self) -> &DayCycleTimer {
        &self.day_cycle
    }

    pub fn snow(&self) -> &SnowParticles {
        &self.snow
    }

    pub fn flight(&self) -> &FlightPath {
        &self.flight
    }

    pub fn model(&self) -> Option<ModelHandle> {
        self.model
    }

    pub fn toggles(&self) -> RenderToggles {
        self.toggles
    }
}
