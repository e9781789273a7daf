pub mod auth;
pub mod client;
pub mod error;
pub mod types;

pub use client::KitsuClient;
pub use error::KitsuError;
