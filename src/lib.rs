pub mod camera;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod frame;
pub mod loaders;
pub mod math;
pub mod renderer;
pub mod scene;
pub mod terrain;
pub mod traits;

pub use camera::{Camera, CameraController, InputState};
pub use config::SceneConfig;
pub use error::SceneError;
pub use scene::{SceneState, TickReport, Viewport};
pub use terrain::{AltitudeSource, HeightField, TerrainMesh};
