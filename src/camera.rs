use glam::{Mat4, Vec3};
use log::trace;

use crate::config::CameraConfig;
use crate::scene::ObjectRegistry;
use crate::terrain::AltitudeSource;
use crate::traits::{Button, Controller};

/// The four movement keys, sampled once per tick
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct InputState {
    pub turn_left: bool,
    pub turn_right: bool,
    pub forward: bool,
    pub backward: bool,
}

impl InputState {
    pub fn from_controller(controller: &dyn Controller) -> Self {
        Self {
            turn_left: controller.is_down(Button::ArrowLeft),
            turn_right: controller.is_down(Button::ArrowRight),
            forward: controller.is_down(Button::ArrowUp),
            backward: controller.is_down(Button::ArrowDown),
        }
    }

    const fn to_direction(positive: bool, negative: bool) -> f32 {
        match (positive, negative) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        }
    }

    const fn rotation_velocity(&self) -> f32 {
        Self::to_direction(self.turn_left, self.turn_right)
    }
}

/// Walking camera: ground position and yaw. Height is derived from the
/// terrain at draw time.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Camera {
    pub x: f32,
    pub z: f32,
    pub theta: f32,
}

impl Camera {
    /// Unit step direction for walking forward
    pub fn heading(&self) -> (f32, f32) {
        (-self.theta.sin(), -self.theta.cos())
    }

    /// View matrix for an eye at `eye_y`, tilted by `pitch` (positive looks down)
    pub fn view_matrix(&self, eye_y: f32, pitch: f32) -> Mat4 {
        let (hx, hz) = self.heading();
        let eye = Vec3::new(self.x, eye_y, self.z);
        let target = Vec3::new(self.x + hx, eye_y - pitch, self.z + hz);
        Mat4::look_at_rh(eye, target, Vec3::Y)
    }
}

/// What one controller tick did
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    /// Forward/backward keys acted on this tick (0..=2)
    pub steps: u32,
    /// Steps refused by water or an object
    pub blocked: u32,
}

/// Moves the camera over the terrain, refusing steps into water or objects
#[derive(Debug, Clone)]
pub struct CameraController {
    camera: Camera,
    turn_rate: f32,
    step_speed: f32,
    water_drop: f32,
    half_width: f32,
}

impl CameraController {
    pub fn new(config: &CameraConfig, half_width: f32) -> Self {
        Self {
            camera: Camera::default(),
            turn_rate: config.turn_rate,
            step_speed: config.step_speed,
            water_drop: config.water_drop,
            half_width,
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
    }

    pub fn tick<A: AltitudeSource + ?Sized>(
        &mut self,
        dt: f32,
        input: InputState,
        terrain: &A,
        registry: &ObjectRegistry,
    ) -> StepOutcome {
        self.camera.theta += input.rotation_velocity() * dt * self.turn_rate;

        let mut outcome = StepOutcome::default();
        let water_line = terrain.altitude(0.0, 0.0) - self.water_drop;

        for (pressed, sign) in [(input.forward, 1.0), (input.backward, -1.0)] {
            if !pressed {
                continue;
            }
            outcome.steps += 1;

            let (hx, hz) = self.camera.heading();
            let distance = sign * dt * self.step_speed;
            let nx = self.camera.x + hx * distance;
            let nz = self.camera.z + hz * distance;

            let in_water = terrain.altitude(nx, nz) < water_line;
            if in_water || registry.is_near(nx, nz, self.half_width) {
                trace!("step to ({:.2}, {:.2}) blocked (water: {})", nx, nz, in_water);
                outcome.blocked += 1;
            } else {
                self.camera.x = nx;
                self.camera.z = nz;
            }
        }

        outcome
    }
}
