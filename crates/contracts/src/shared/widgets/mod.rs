pub mod config;
pub mod grid_layout;
pub mod identifier;
pub mod query_builder;
pub mod result_shape;
pub mod widget;

pub use config::*;
pub use grid_layout::*;
pub use identifier::*;
pub use query_builder::*;
pub use result_shape::*;
pub use widget::*;
