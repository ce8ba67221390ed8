mod height_field;
mod mesh;

pub use height_field::{is_valid_dimension, AltitudeSource, HeightField};
pub use mesh::{TerrainMesh, TerrainVertex};
