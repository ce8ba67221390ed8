use glam::{Mat4, Vec3};
use std::f32::consts::PI;

use crate::math::palette;
use crate::terrain::AltitudeSource;
use crate::traits::{DrawCommand, Primitive, Shading};

/// A planted prop, standing on the terrain at (x, z)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decoration {
    Tree { x: f32, z: f32 },
    Snowman { x: f32, z: f32 },
    Grass { x: f32, z: f32 },
}

/// Trees and snowmen placed around the start point
pub const LANDMARKS: [Decoration; 9] = [
    Decoration::Tree { x: 3.0, z: 8.0 },
    Decoration::Tree { x: 1.0, z: 30.0 },
    Decoration::Tree { x: 31.0, z: 10.0 },
    Decoration::Tree { x: -3.0, z: -8.0 },
    Decoration::Tree { x: 1.0, z: -30.0 },
    Decoration::Tree { x: -31.0, z: 10.0 },
    Decoration::Snowman { x: 35.0, z: 5.0 },
    Decoration::Snowman { x: 5.0, z: 40.0 },
    Decoration::Snowman { x: 0.0, z: 5.0 },
];

fn placed(translation: Vec3, scale: Vec3) -> Mat4 {
    Mat4::from_scale_rotation_translation(scale, glam::Quat::IDENTITY, translation)
}

impl Decoration {
    pub fn footprint(&self) -> (f32, f32) {
        match *self {
            Decoration::Tree { x, z } | Decoration::Snowman { x, z } | Decoration::Grass { x, z } => (x, z),
        }
    }

    /// Grass is walk-through; everything else blocks the camera
    pub fn is_solid(&self) -> bool {
        !matches!(self, Decoration::Grass { .. })
    }

    /// Append the primitive draws making up this prop
    pub fn push_draws<A: AltitudeSource + ?Sized>(&self, terrain: &A, out: &mut Vec<DrawCommand>) {
        let (x, z) = self.footprint();
        let ground = terrain.altitude(x, z);

        match self {
            Decoration::Tree { .. } => {
                out.push(DrawCommand::new(
                    Primitive::Cube,
                    placed(Vec3::new(x, ground, z), Vec3::new(1.0, 7.0, 1.0)),
                    Shading::Flat(palette::BROWN),
                ));
                out.push(DrawCommand::new(
                    Primitive::Sphere,
                    placed(Vec3::new(x, ground + 7.0, z), Vec3::splat(4.0)),
                    Shading::Flat(palette::GREEN),
                ));
                // Snow cap sits a unit above the foliage
                out.push(DrawCommand::new(
                    Primitive::Sphere,
                    placed(Vec3::new(x, ground + 8.0, z), Vec3::splat(4.0)),
                    Shading::Flat(palette::WHITE),
                ));
            }
            Decoration::Snowman { .. } => {
                out.push(DrawCommand::new(
                    Primitive::Sphere,
                    placed(Vec3::new(x, ground + 0.7, z), Vec3::ONE),
                    Shading::Flat(palette::WHITE),
                ));
                out.push(DrawCommand::new(
                    Primitive::Sphere,
                    placed(Vec3::new(x, ground + 2.2, z), Vec3::splat(0.6)),
                    Shading::Flat(palette::WHITE),
                ));
                let nose_x = x + 0.5;
                let nose = Mat4::from_translation(Vec3::new(nose_x, terrain.altitude(nose_x, z) + 2.2, z))
                    * Mat4::from_axis_angle(Vec3::new(-1.0, -1.0, 0.0).normalize(), -PI)
                    * Mat4::from_scale(Vec3::new(0.1, 0.6, 0.1));
                out.push(DrawCommand::new(Primitive::Sphere, nose, Shading::Flat(palette::RED)));
            }
            Decoration::Grass { .. } => {
                out.push(DrawCommand::new(
                    Primitive::Cube,
                    placed(Vec3::new(x, ground, z), Vec3::new(0.01, 0.5, 0.01)),
                    Shading::Flat(palette::GREEN),
                ));
            }
        }
    }
}
