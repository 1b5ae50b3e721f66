pub mod dashboards;
pub mod notifications;
pub mod rpc;
pub mod widgets;
