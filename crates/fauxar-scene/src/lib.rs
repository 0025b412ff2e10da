pub mod bounds;
pub mod camera;
pub mod orbit;
pub mod projector;
pub mod scene;
