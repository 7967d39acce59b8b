pub mod client;

pub use client::CampusClient;
