mod app;
pub mod cli;
mod commands;
mod effects;
mod render;

pub use app::run_app;
