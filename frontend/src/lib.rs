pub mod analytics;
pub mod api;
pub mod app;
pub mod charts;
pub mod classifier;
pub mod components;
pub mod config;
pub mod error;
pub mod export;
pub mod format;
pub mod logging;
pub mod models;
pub mod pages;
pub mod state;

pub use app::App;
