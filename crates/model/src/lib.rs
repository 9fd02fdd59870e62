pub mod checkpoint;
pub mod core;
pub mod error;
pub mod records;
