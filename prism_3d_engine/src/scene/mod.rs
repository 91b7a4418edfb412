//! Scene module
//!
//! Render objects (a mesh key plus transform and material) and the manager
//! that owns them and queues them on the render system every frame.

mod render_object;
mod object_manager;

pub use render_object::RenderObject;
pub use object_manager::{ObjectKey, ObjectManager};
