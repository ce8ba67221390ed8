use glam::{Mat4, Vec3};

use crate::config::FlightConfig;

/// Circular fly-around for the loaded model
#[derive(Debug, Clone)]
pub struct FlightPath {
    center: Vec3,
    radius: f32,
    angular_speed: f32,
    alpha: f32,
}

impl FlightPath {
    pub fn new(config: &FlightConfig) -> Self {
        Self {
            center: Vec3::from_array(config.center),
            radius: config.radius,
            angular_speed: config.angular_speed,
            alpha: 0.0,
        }
    }

    pub fn tick(&mut self, dt: f32) {
        self.alpha -= self.angular_speed * dt;
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(
            self.center.x + self.radius * self.alpha.cos(),
            self.center.y,
            self.center.z - self.radius * self.alpha.sin(),
        )
    }

    /// Model transform: placed on the circle, nose along the direction of travel
    pub fn transform(&self) -> Mat4 {
        Mat4::from_translation(self.position()) * Mat4::from_rotation_y(self.alpha)
    }
}
