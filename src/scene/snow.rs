use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::SnowConfig;

/// Falling snow: a fixed pool of flakes recycled from a floor back to the
/// respawn height. Flakes only move once snow has been enabled.
#[derive(Debug, Clone)]
pub struct SnowParticles {
    positions: Vec<Vec3>,
    active: bool,
    floor: f32,
    respawn_height: f32,
}

impl SnowParticles {
    /// Scatter `config.count` flakes on integer coordinates,
    /// x and z in `[-half_extent, half_extent)`, y in `[0, max_start_height)`
    pub fn new(config: &SnowConfig) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let extent = config.half_extent.max(1);
        let top = config.max_start_height.max(1);

        let positions = (0..config.count)
            .map(|_| {
                Vec3::new(
                    rng.gen_range(-extent..extent) as f32,
                    rng.gen_range(0..top) as f32,
                    rng.gen_range(-extent..extent) as f32,
                )
            })
            .collect();

        Self::from_positions(positions, config.floor, config.respawn_height)
    }

    pub fn from_positions(positions: Vec<Vec3>, floor: f32, respawn_height: f32) -> Self {
        Self {
            positions,
            active: false,
            floor,
            respawn_height,
        }
    }

    /// One step of fall: each flake drops one unit, or respawns if it is
    /// already at or below the floor
    pub fn tick(&mut self) {
        if !self.active {
            return;
        }
        for p in &mut self.positions {
            if p.y > self.floor {
                p.y -= 1.0;
            } else {
                p.y = self.respawn_height;
            }
        }
    }

    pub fn enable(&mut self) {
        self.active = true;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Flakes above the floor, i.e. the ones worth drawing
    pub fn visible(&self) -> impl Iterator<Item = &Vec3> + '_ {
        self.positions.iter().filter(move |p| p.y > self.floor)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn particles(ys: &[f32]) -> SnowParticles {
        let positions = ys.iter().map(|&y| Vec3::new(0.0, y, 0.0)).collect();
        let mut snow = SnowParticles::from_positions(positions, -20.0, 80.0);
        snow.enable();
        snow
    }

    #[test]
    fn flake_falls_one_unit() {
        let mut snow = particles(&[50.0]);
        snow.tick();
        assert_eq!(snow.positions()[0].y, 49.0);
    }

    #[test]
    fn flake_at_floor_respawns() {
        let mut snow = particles(&[-20.0, -19.0]);
        snow.tick();
        assert_eq!(snow.positions()[0].y, 80.0);
        assert_eq!(snow.positions()[1].y, -20.0);
    }

    #[test]
    fn inactive_snow_stays_put() {
        let mut snow = SnowParticles::from_positions(vec![Vec3::new(0.0, 10.0, 0.0)], -20.0, 80.0);
        snow.tick();
        assert_eq!(snow.positions()[0].y, 10.0);
    }

    #[test]
    fn scatter_respects_bounds() {
        let snow = SnowParticles::new(&SnowConfig::default());
        assert_eq!(snow.len(), 1000);
        for p in snow.positions() {
            assert!(p.x >= -100.0 && p.x < 100.0);
            assert!(p.z >= -100.0 && p.z < 100.0);
            assert!(p.y >= 0.0 && p.y < 100.0);
            assert_eq!(p.x, p.x.trunc());
        }
    }

    #[test]
    fn visible_skips_floor() {
        let snow = particles(&[-20.0, 0.0, 5.0]);
        assert_eq!(snow.visible().count(), 2);
    }
}
