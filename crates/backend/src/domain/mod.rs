pub mod dashboards;
pub mod notifications;
pub mod widgets;
