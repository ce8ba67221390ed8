mod color;
mod grid;

pub use color::{palette, ClearColor};
pub use grid::world_to_cell;
