pub mod config_panel;
pub mod header;
pub mod notifications;
pub mod preview_area;
pub mod results;
pub mod upload_section;
pub mod utils;
