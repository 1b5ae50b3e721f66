pub mod config;
pub mod data;
pub mod data_source;
pub mod error;
pub mod format;
