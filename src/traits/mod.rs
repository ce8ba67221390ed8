pub mod controller;
pub mod model;
pub mod renderer;

pub use controller::*;
pub use model::*;
pub use renderer::*;
