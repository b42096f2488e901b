mod favorite;
mod memory;

pub use favorite::FavoriteRepository;
pub use memory::MemoryFavoriteStore;

use async_trait::async_trait;

use crate::models::{ContentRef, CreateOutcome, Favorite, FavoriteQuery, PageWindow};

/// Persistence for favorites.
///
/// Every lookup is scoped to one user. At most one row exists per
/// `(user, content type, object id)`; `insert_if_absent` must keep that true
/// under concurrent callers.
#[async_trait]
pub trait FavoriteStore: Send + Sync + 'static {
    async fn insert_if_absent(
        &self,
        user_id: i32,
        content: &ContentRef,
    ) -> Result<CreateOutcome, sqlx::Error>;

    async fn find_for_object(
        &self,
        user_id: i32,
        content: &ContentRef,
    ) -> Result<Vec<Favorite>, sqlx::Error>;

    async fn find_owned(&self, id: i64, user_id: i32) -> Result<Option<Favorite>, sqlx::Error>;

    async fn count(&self, user_id: i32, query: &FavoriteQuery) -> Result<i64, sqlx::Error>;

    /// Ordered by `query.order`, ties broken by id.
    async fn list(
        &self,
        user_id: i32,
        query: &FavoriteQuery,
        window: PageWindow,
    ) -> Result<Vec<Favorite>, sqlx::Error>;

    async fn delete(&self, id: i64, user_id: i32) -> Result<bool, sqlx::Error>;

    async fn delete_for_object(
        &self,
        user_id: i32,
        content: &ContentRef,
    ) -> Result<bool, sqlx::Error>;

    async fn ping(&self) -> Result<(), sqlx::Error>;
}
