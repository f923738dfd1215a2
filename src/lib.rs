pub mod cli;
pub mod client;
pub mod config;
pub mod console;
pub mod error;
pub mod models;
pub mod server;

#[cfg(test)]
pub mod testing;
