pub mod gpu_context;
pub mod input_adapter;
pub mod surface_renderer;
pub mod timer;

pub use gpu_context::GpuContext;
pub use input_adapter::WinitController;
pub use surface_renderer::SkyRenderer;
pub use timer::{DayCycleTimer, DayPhase};
