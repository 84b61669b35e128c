pub mod catalog;
pub mod config;
pub mod delegate;
pub mod errors;
pub mod server;
pub mod utils;
