pub mod dialog;
pub mod editors;
pub mod metadata;
pub mod renderers;
pub mod state;
