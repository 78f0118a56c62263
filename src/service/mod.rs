pub mod api_types;
pub mod runner;
pub mod solve;
