pub mod bindings;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod relocate;
pub mod resolver;
pub mod sync;

pub use error::ShioriError;
