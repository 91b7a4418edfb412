/// Resource module - CPU meshes, uploaded meshes and the libraries owning them

pub mod mesh;
pub mod gpu_mesh;
pub mod mesh_library;

pub use mesh::*;
pub use gpu_mesh::*;
pub use mesh_library::*;
