pub mod config;
pub mod content;
pub mod database;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;
pub mod telemetry;
pub mod templatetags;

use std::sync::Arc;

pub use config::Config;

use services::{AuthService, FavoriteService};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub auth_service: AuthService,
    pub favorite_service: FavoriteService,
}

impl AppState {
    pub fn new(config: Config, favorite_service: FavoriteService) -> Self {
        let auth_service = AuthService::new(&config);
        Self {
            config: Arc::new(config),
            auth_service,
            favorite_service,
        }
    }
}
