mod decorations;
mod flight;
mod registry;
mod snow;
mod state;

pub use decorations::{Decoration, LANDMARKS};
pub use flight::FlightPath;
pub use registry::{ObjectRegistry, COLLISION_HALF_WIDTH};
pub use snow::SnowParticles;
pub use state::{SceneState, TickReport, Viewport};
