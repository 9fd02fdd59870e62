pub mod error;
pub mod executor;
pub mod loader;
pub mod transform;
