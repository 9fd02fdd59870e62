pub mod filter;
pub mod mapping;
pub mod pipeline;
