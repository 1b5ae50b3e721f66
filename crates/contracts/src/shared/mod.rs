pub mod dashboards;
pub mod data_source;
pub mod widgets;
