pub mod app;
pub mod theme;
pub mod ui;

pub use app::StarterApp;
pub use theme::Theme;
