pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod publish;
pub mod shutdown;
pub mod store;
pub mod telemetry;
pub mod upstream;
