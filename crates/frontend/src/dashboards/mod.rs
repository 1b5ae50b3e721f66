pub mod api;
pub mod ui;

pub use ui::{DashboardPage, DashboardsList};
