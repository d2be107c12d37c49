pub mod api;
pub mod config;
pub mod currents;
pub mod directory;
pub mod fetch;
pub mod infra;
pub mod logging;
pub mod output;
pub mod services;
pub mod stations;
pub mod tax;
