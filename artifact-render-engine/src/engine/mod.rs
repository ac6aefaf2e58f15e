pub mod camera;
pub mod core;
pub mod discovery;
pub mod mesh;
pub mod scene;
pub mod shapes;
pub mod store;
pub mod viewer;
