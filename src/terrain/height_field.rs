use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::SceneError;
use crate::math::world_to_cell;

/// Anything that can answer "how high is the ground here?"
pub trait AltitudeSource {
    fn altitude(&self, x: f32, z: f32) -> f32;
}

/// Fractal terrain: a `width * height` grid of elevations in [0, 1]
#[derive(Debug, Clone)]
pub struct HeightField {
    width: usize,
    height: usize,
    samples: Vec<f32>,
    scale_xz: f32,
    scale_y: f32,
}

/// True for 3, 5, 9, 17, ... (2^k + 1 with k >= 1)
pub fn is_valid_dimension(n: usize) -> bool {
    n >= 3 && (n - 1).is_power_of_two()
}

impl HeightField {
    /// Generate a height field by diamond-square midpoint displacement.
    ///
    /// Both sides must be 2^k + 1. Non-square fields are generated on the
    /// enclosing square and cropped. `roughness` scales the displacement
    /// amplitude at each subdivision level, so larger values give
    /// jaggier terrain.
    pub fn generate<R: Rng + ?Sized>(
        width: usize,
        height: usize,
        roughness: f32,
        rng: &mut R,
    ) -> Result<Self, SceneError> {
        if !is_valid_dimension(width) || !is_valid_dimension(height) {
            return Err(SceneError::InvalidDimension { width, height });
        }
        if !(roughness > 0.0 && roughness < 1.0) {
            return Err(SceneError::InvalidRoughness(roughness));
        }

        let n = width.max(height);
        let square = diamond_square(n, roughness, rng);

        let mut samples = Vec::with_capacity(width * height);
        for z in 0..height {
            samples.extend_from_slice(&square[z * n..z * n + width]);
        }
        normalize(&mut samples);

        debug!("generated {}x{} height field (roughness {})", width, height, roughness);

        Ok(Self {
            width,
            height,
            samples,
            scale_xz: 1.0,
            scale_y: 1.0,
        })
    }

    /// Deterministic generation from a seed
    pub fn from_seed(width: usize, height: usize, roughness: f32, seed: u64) -> Result<Self, SceneError> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Self::generate(width, height, roughness, &mut rng)
    }

    /// Wrap existing samples (row-major, row 0 first)
    pub fn from_samples(width: usize, height: usize, samples: Vec<f32>) -> Result<Self, SceneError> {
        if !is_valid_dimension(width) || !is_valid_dimension(height) || samples.len() != width * height {
            return Err(SceneError::InvalidDimension { width, height });
        }
        // Negated range check so NaN is rejected too
        if let Some((index, &value)) = samples.iter().enumerate().find(|(_, v)| !(0.0..=1.0).contains(*v)) {
            return Err(SceneError::InvalidSample { index, value });
        }
        Ok(Self {
            width,
            height,
            samples,
            scale_xz: 1.0,
            scale_y: 1.0,
        })
    }

    /// Set the world-space extent: the grid spans `[-scale_xz, scale_xz]`
    /// horizontally and `[-scale_y, scale_y]` vertically.
    pub fn with_scale(mut self, scale_xz: f32, scale_y: f32) -> Self {
        self.scale_xz = scale_xz;
        self.scale_y = scale_y;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn scale_xz(&self) -> f32 {
        self.scale_xz
    }

    pub fn scale_y(&self) -> f32 {
        self.scale_y
    }

    /// Raw sample at grid column `x`, row `z`
    pub fn sample(&self, x: usize, z: usize) -> Option<f32> {
        if x < self.width && z < self.height {
            Some(self.samples[x + z * self.width])
        } else {
            None
        }
    }

    /// Terrain height at a world position.
    ///
    /// Nearest-sample lookup, no interpolation. Outside the generated
    /// extent the ground is flat at 0.
    pub fn altitude(&self, x: f32, z: f32) -> f32 {
        match world_to_cell(x, z, self.scale_xz, self.width, self.height) {
            Some((gx, gz)) => (2.0 * self.samples[gx + gz * self.width] - 1.0) * self.scale_y,
            None => 0.0,
        }
    }
}

impl AltitudeSource for HeightField {
    fn altitude(&self, x: f32, z: f32) -> f32 {
        HeightField::altitude(self, x, z)
    }
}

fn diamond_square<R: Rng + ?Sized>(n: usize, roughness: f32, rng: &mut R) -> Vec<f32> {
    let mut grid = vec![0.0f32; n * n];
    let last = n - 1;

    for (x, z) in [(0, 0), (last, 0), (0, last), (last, last)] {
        grid[x + z * n] = rng.gen_range(0.0..1.0);
    }

    let mut amplitude = 1.0f32;
    let mut step = last;

    while step > 1 {
        let half = step / 2;

        // Diamond: centre of each square gets the corner average
        for z in (half..n).step_by(step) {
            for x in (half..n).step_by(step) {
                let avg = (grid[(x - half) + (z - half) * n]
                    + grid[(x + half) + (z - half) * n]
                    + grid[(x - half) + (z + half) * n]
                    + grid[(x + half) + (z + half) * n])
                    * 0.25;
                grid[x + z * n] = avg + jitter(rng, amplitude);
            }
        }

        // Square: edge midpoints average their in-bounds neighbours
        for z in (0..n).step_by(half) {
            let start = if (z / half) % 2 == 0 { half } else { 0 };
            for x in (start..n).step_by(step) {
                let mut sum = 0.0;
                let mut count = 0.0;
                if x >= half {
                    sum += grid[(x - half) + z * n];
                    count += 1.0;
                }
                if x + half < n {
                    sum += grid[(x + half) + z * n];
                    count += 1.0;
                }
                if z >= half {
                    sum += grid[x + (z - half) * n];
                    count += 1.0;
                }
                if z + half < n {
                    sum += grid[x + (z + half) * n];
                    count += 1.0;
                }
                grid[x + z * n] = sum / count + jitter(rng, amplitude);
            }
        }

        amplitude *= roughness;
        step = half;
    }

    grid
}

fn jitter<R: Rng + ?Sized>(rng: &mut R, amplitude: f32) -> f32 {
    // amplitude underflows to zero for tiny roughness on deep grids
    if amplitude > 0.0 {
        rng.gen_range(-amplitude..amplitude) * 0.5
    } else {
        0.0
    }
}

fn normalize(samples: &mut [f32]) {
    let (min, max) = samples
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let range = max - min;

    if range > f32::EPSILON {
        for v in samples.iter_mut() {
            *v = ((*v - min) / range).clamp(0.0, 1.0);
        }
    } else {
        samples.fill(0.5);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_dimensions() {
        for n in [3, 5, 9, 17, 33, 65, 129, 257, 513, 1025] {
            assert!(is_valid_dimension(n), "{} should be valid", n);
        }
        for n in [0, 1, 2, 4, 10, 1024, 1026] {
            assert!(!is_valid_dimension(n), "{} should be invalid", n);
        }
    }

    #[test]
    fn test_generate_rejects_bad_dimension() {
        let err = HeightField::from_seed(1024, 1025, 0.6, 1).unwrap_err();
        assert!(matches!(err, SceneError::InvalidDimension { width: 1024, height: 1025 }));
    }

    #[test]
    fn test_generate_rejects_bad_roughness() {
        assert!(matches!(
            HeightField::from_seed(9, 9, 0.0, 1),
            Err(SceneError::InvalidRoughness(_))
        ));
        assert!(matches!(
            HeightField::from_seed(9, 9, 1.0, 1),
            Err(SceneError::InvalidRoughness(_))
        ));
    }

    #[test]
    fn test_samples_normalized() {
        let field = HeightField::from_seed(65, 65, 0.6, 3).unwrap();
        let min = field.samples().iter().cloned().fold(f32::INFINITY, f32::min);
        let max = field.samples().iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        assert_eq!(min, 0.0);
        assert_eq!(max, 1.0);
    }

    #[test]
    fn test_non_square_crop() {
        let field = HeightField::from_seed(17, 5, 0.5, 9).unwrap();
        assert_eq!(field.samples().len(), 17 * 5);
        assert!(field.sample(16, 4).is_some());
        assert!(field.sample(17, 0).is_none());
    }

    #[test]
    fn test_same_seed_same_field() {
        let a = HeightField::from_seed(33, 33, 0.6, 11).unwrap();
        let b = HeightField::from_seed(33, 33, 0.6, 11).unwrap();
        assert_eq!(a.samples(), b.samples());
    }

    #[test]
    fn test_altitude_maps_sample_to_scale() {
        // 3x3 with a single raised centre
        let mut samples = vec![0.5; 9];
        samples[4] = 1.0;
        let field = HeightField::from_samples(3, 3, samples).unwrap().with_scale(100.0, 10.0);

        assert_eq!(field.altitude(0.0, 0.0), 10.0);
        assert_eq!(field.altitude(-60.0, 60.0), 0.0);
        assert_eq!(field.altitude(500.0, 0.0), 0.0);
    }

    #[test]
    fn test_from_samples_checks_length() {
        assert!(HeightField::from_samples(3, 3, vec![0.0; 8]).is_err());
    }

    #[test]
    fn test_from_samples_rejects_out_of_range() {
        let mut samples = vec![0.5; 9];
        samples[4] = 1.5;
        assert!(matches!(
            HeightField::from_samples(3, 3, samples),
            Err(SceneError::InvalidSample { index: 4, .. })
        ));

        let mut samples = vec![0.5; 9];
        samples[8] = -0.25;
        assert!(matches!(
            HeightField::from_samples(3, 3, samples),
            Err(SceneError::InvalidSample { index: 8, .. })
        ));
    }

    #[test]
    fn test_from_samples_rejects_nan() {
        let mut samples = vec![0.0; 9];
        samples[2] = f32::NAN;
        match HeightField::from_samples(3, 3, samples) {
            Err(SceneError::InvalidSample { index, value }) => {
                assert_eq!(index, 2);
                assert!(value.is_nan());
            }
            other => panic!("expected InvalidSample, got {:?}", other.map(|f| f.width())),
        }
    }

    #[test]
    fn test_from_samples_accepts_bounds() {
        let samples = vec![0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0];
        assert!(HeightField::from_samples(3, 3, samples).is_ok());
    }
}
