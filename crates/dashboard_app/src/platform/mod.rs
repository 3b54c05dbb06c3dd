mod app;
mod commands;
mod config;
mod effects;
mod render;

pub use app::{run_browse, run_serve, ApiSource};
pub use config::{install_logger, AppConfig};
