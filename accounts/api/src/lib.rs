pub mod api;
pub mod config;
pub mod error;
pub mod global;
pub mod logic;
pub mod models;
pub mod store;

#[cfg(test)]
mod tests;
