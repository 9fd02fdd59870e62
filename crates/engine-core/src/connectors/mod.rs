pub mod postgres;
pub mod sink;
pub mod source;
