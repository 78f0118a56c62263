pub mod error;
pub mod solution;
pub mod types;
