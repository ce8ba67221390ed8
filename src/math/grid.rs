/// Map a world-space (x, z) onto a height-map cell.
///
/// The grid is centred on the world origin and spans `[-scale, scale]` on
/// both axes; world +z runs toward row 0. Returns `None` when the point
/// falls outside the grid.
pub fn world_to_cell(x: f32, z: f32, scale: f32, width: usize, height: usize) -> Option<(usize, usize)> {
    let gx = (width >> 1) as f32 + (x / scale) * (width as f32 / 2.0);
    let gz = (height >> 1) as f32 - (z / scale) * (height as f32 / 2.0);

    // NaN fails both comparisons and lands outside
    if gx >= 0.0 && gx < width as f32 && gz >= 0.0 && gz < height as f32 {
        Some((gx as usize, gz as usize))
    } else {
        None
    }
}
