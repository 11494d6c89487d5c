pub mod clip;
pub mod engine;
pub mod errors;
pub mod handle;
pub mod sample_loader;
