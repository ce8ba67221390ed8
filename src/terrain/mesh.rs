use glam::Vec3;

use super::height_field::HeightField;

/// Terrain vertex as uploaded to the GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TerrainVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    /// u = raw sample, indexes the 1D terrain gradient
    pub texcoord: [f32; 2],
}

/// Indexed triangle grid built from a height field.
///
/// Positions live in the unit cube `[-1, 1]^3`; the renderer scales the
/// mesh by `(scale_xz, scale_y, scale_xz)` so vertex heights line up with
/// `HeightField::altitude`.
#[derive(Debug, Clone)]
pub struct TerrainMesh {
    pub vertices: Vec<TerrainVertex>,
    pub indices: Vec<u32>,
}

impl TerrainMesh {
    pub fn from_height_field(field: &HeightField) -> Self {
        let w = field.width();
        let h = field.height();
        let samples = field.samples();

        let at = |x: usize, z: usize| -> f32 { 2.0 * samples[x + z * w] - 1.0 };
        let dx = 2.0 / (w - 1) as f32;
        let dz = 2.0 / (h - 1) as f32;

        let mut vertices = Vec::with_capacity(w * h);
        for z in 0..h {
            for x in 0..w {
                let y = at(x, z);

                // Central differences, clamped at the borders
                let (x0, x1) = (x.saturating_sub(1), (x + 1).min(w - 1));
                let (z0, z1) = (z.saturating_sub(1), (z + 1).min(h - 1));
                let slope_x = (at(x1, z) - at(x0, z)) / ((x1 - x0) as f32 * dx);
                // Row index grows toward -z in world space
                let slope_z = -(at(x, z1) - at(x, z0)) / ((z1 - z0) as f32 * dz);
                let normal = Vec3::new(-slope_x, 1.0, -slope_z).normalize();

                vertices.push(TerrainVertex {
                    position: [-1.0 + x as f32 * dx, y, 1.0 - z as f32 * dz],
                    normal: normal.to_array(),
                    texcoord: [samples[x + z * w], 0.0],
                });
            }
        }

        let mut indices = Vec::with_capacity((w - 1) * (h - 1) * 6);
        for z in 0..h - 1 {
            for x in 0..w - 1 {
                let i = (x + z * w) as u32;
                let right = i + 1;
                let below = i + w as u32;
                let diag = below + 1;
                indices.extend_from_slice(&[i, below, right, right, below, diag]);
            }
        }

        Self { vertices, indices }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(n: usize) -> HeightField {
        HeightField::from_samples(n, n, vec![0.5; n * n]).unwrap()
    }

    #[test]
    fn test_mesh_counts() {
        let mesh = TerrainMesh::from_height_field(&flat(5));
        assert_eq!(mesh.vertices.len(), 25);
        assert_eq!(mesh.triangle_count(), 4 * 4 * 2);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
    }

    #[test]
    fn test_mesh_corners_span_unit_square() {
        let mesh = TerrainMesh::from_height_field(&flat(3));
        assert_eq!(mesh.vertices[0].position, [-1.0, 0.0, 1.0]);
        assert_eq!(mesh.vertices[8].position, [1.0, 0.0, -1.0]);
    }

    #[test]
    fn test_flat_mesh_normals_point_up() {
        let mesh = TerrainMesh::from_height_field(&flat(5));
        for v in &mesh.vertices {
            assert_eq!(v.normal, [0.0, 1.0, 0.0]);
        }
    }

    #[test]
    fn test_vertex_heights_match_altitude() {
        let samples = (0..9).map(|i| i as f32 / 8.0).collect();
        let field = HeightField::from_samples(3, 3, samples).unwrap().with_scale(10.0, 4.0);
        let mesh = TerrainMesh::from_height_field(&field);

        // Centre vertex sits at the world origin after scaling
        let centre = mesh.vertices[4];
        assert_eq!(centre.position[1] * field.scale_y(), field.altitude(0.0, 0.0));
    }

    #[test]
    fn test_byte_views() {
        let mesh = TerrainMesh::from_height_field(&flat(3));
        assert_eq!(mesh.vertex_bytes().len(), 9 * std::mem::size_of::<TerrainVertex>());
        assert_eq!(mesh.index_bytes().len(), mesh.indices.len() * 4);
    }
}
