pub mod api;
pub mod app;
pub mod config;
pub mod desktop;
pub mod editor;
pub mod events;
pub mod export;
pub mod extract;
pub mod generation;
pub mod logging;
pub mod models;
pub mod progress;
pub mod provider;
pub mod server;
pub mod toast;
pub mod ui;
