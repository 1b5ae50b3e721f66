pub mod api_utils;
pub mod export;
pub mod format;
pub mod request_generation;
pub mod rpc;
