pub mod stage;
pub mod net;
pub mod engine;
pub mod render;
