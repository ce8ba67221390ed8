/// RGBA clear color, components in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl ClearColor {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn from_array(c: [f32; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Flat RGBA colors used by the scene props
pub mod palette {
    pub const GREEN: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
    pub const BROWN: [f32; 4] = [0.47, 0.2, 0.07, 1.0];
    pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    pub const WATER: [f32; 4] = [0.0, 0.0, 1.0, 100.0];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_round_trip() {
        let c = ClearColor::from_array([0.0, 0.4, 0.9, 0.0]);
        assert_eq!(c.g, 0.4);
        assert_eq!(c.to_array(), [0.0, 0.4, 0.9, 0.0]);
    }
}
