pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod services;

pub use bootstrap::init_foundation;
