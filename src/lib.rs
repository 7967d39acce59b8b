pub mod attendance;
pub mod config;
pub mod error;
pub mod fetch;
pub mod infra;
pub mod loader;
pub mod output;
pub mod schedule;
pub mod services;
pub mod session;
pub mod views;
