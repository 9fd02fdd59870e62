pub mod env;
pub mod error;
pub mod invocation;
pub mod job;
