use minijinja::Environment;

pub mod browser;
pub mod config;
pub mod domain;
pub mod errors;
pub mod giphy;
pub mod handlers;
pub mod models;
pub mod regions;
pub mod routes;
pub mod templates;

/// AppState holds shared resources for the web server.
pub struct AppState {
    pub browser: browser::GifBrowser,
    pub templates: Environment<'static>,
}
