pub mod config;
pub mod error;

// Recipe corpus and image resolution
pub mod corpus;

// Similarity ranking
pub mod indexer;

// Filters, specials and the application context
pub mod recommend;

// HTTP surface
pub mod api;

// Command-line interface
pub mod cli;

// Utilities
pub mod utils;

// Re-exports
pub use config::Settings;
pub use error::{Error, Result};
