/// Default half-width of the collision box around each placed object
pub const COLLISION_HALF_WIDTH: f32 = 2.5;

/// Fixed-capacity list of object footprints used for walk collision
#[derive(Debug, Clone)]
pub struct ObjectRegistry {
    entries: Vec<(f32, f32)>,
    capacity: usize,
}

impl ObjectRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a footprint. Returns false (and changes nothing) once full.
    pub fn try_register(&mut self, x: f32, z: f32) -> bool {
        if self.entries.len() >= self.capacity {
            return false;
        }
        self.entries.push((x, z));
        true
    }

    /// Axis-aligned box test on truncated coordinates.
    ///
    /// Per-axis strict comparison, not a radial distance: a point counts as
    /// near when both `|qx - ex|` and `|qz - ez|` are under `half_width`.
    pub fn is_near(&self, x: f32, z: f32, half_width: f32) -> bool {
        let (qx, qz) = (x.trunc(), z.trunc());
        self.entries.iter().any(|&(ex, ez)| {
            let dx = qx - ex.trunc();
            let dz = qz - ez.trunc();
            dx > -half_width && dx < half_width && dz > -half_width && dz < half_width
        })
    }

    pub fn entries(&self) -> &[(f32, f32)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
