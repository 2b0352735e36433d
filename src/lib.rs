pub mod bootstrap;
pub mod config;
pub mod error;
pub mod products;
pub mod server;
pub mod themes;
