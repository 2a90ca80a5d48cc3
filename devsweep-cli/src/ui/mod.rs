mod meter;
mod deleting_view;
mod direct_view;
mod footer;
mod header;
mod items_view;
mod layout;
mod menu_view;
mod progress;
mod status_bar;
mod summary_view;
mod theme;

pub use deleting_view::DeletingView;
pub use direct_view::DirectCleanupView;
pub use footer::Footer;
pub use header::Header;
pub use items_view::ItemsView;
pub use layout::AppLayout;
pub use menu_view::MenuView;
pub use progress::ProgressView;
pub use status_bar::StatusBar;
pub use summary_view::SummaryView;
pub use theme::Theme;
