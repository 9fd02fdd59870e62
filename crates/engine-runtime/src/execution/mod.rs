pub mod executor;
pub mod factory;
pub mod job;
pub mod orchestrator;
pub mod report;
pub mod state;
