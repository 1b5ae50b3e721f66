pub mod list;
pub mod page;
pub mod widget_card;

pub use list::DashboardsList;
pub use page::DashboardPage;
