mod favorites;
mod health;

pub use favorites::{
    FavoriteStatusResponse, ajax_add_favorite, ajax_remove_favorite, create_favorite,
    delete_favorite, delete_favorite_confirm, favorite_index, favorite_list, favorite_status,
};
pub use health::health_check;
