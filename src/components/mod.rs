pub mod app;
pub mod builder_view;
pub mod deity_overlay;
pub mod scale_menu;
pub mod temple_preview;

pub use app::{App, AppProps};
