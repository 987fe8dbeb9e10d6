mod app;
mod theme;
mod views;
mod week_editor;

pub use app::SchedulerApp;
pub use theme::{setup_fonts, setup_theme};
