//! Dataset the widgets query, attached read-only as schema `be_exponential`

pub mod executor;
pub mod export;
pub mod metadata;
pub mod pool;
pub mod query_guard;
pub mod seed;

pub use pool::{get_data_source, DataSource};
