pub mod api;
pub mod bell;
pub mod service;
