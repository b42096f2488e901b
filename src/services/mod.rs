mod auth;
mod favorite;

pub use auth::{AuthService, Claims};
pub use favorite::FavoriteService;
