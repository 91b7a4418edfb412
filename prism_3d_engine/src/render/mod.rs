//! Render module - queued draw requests and the per-frame flush.

mod render_request;
mod render_system;

pub use render_request::{Material, RenderRequest};
pub use render_system::{FrameStats, LightingStage, RenderSystem};
