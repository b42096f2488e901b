//! In-memory favorite store for tests and demos.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use super::FavoriteStore;
use crate::models::{ContentRef, CreateOutcome, Favorite, FavoriteQuery, PageWindow};

#[derive(Clone, Default)]
pub struct MemoryFavoriteStore {
    favorites: Arc<RwLock<Vec<Favorite>>>,
    next_id: Arc<AtomicI64>,
}

impl MemoryFavoriteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.favorites.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn count_for_user(&self, user_id: i32) -> usize {
        self.favorites
            .read()
            .await
            .iter()
            .filter(|f| f.user_id == user_id)
            .count()
    }

    fn matches(favorite: &Favorite, user_id: i32, content: &ContentRef) -> bool {
        favorite.user_id == user_id
            && favorite.content_type == content.content_type
            && favorite.object_id == content.object_id
    }

    fn in_scope(favorite: &Favorite, user_id: i32, query: &FavoriteQuery) -> bool {
        favorite.user_id == user_id && query.matches(favorite)
    }
}

#[async_trait]
impl FavoriteStore for MemoryFavoriteStore {
    async fn insert_if_absent(
        &self,
        user_id: i32,
        content: &ContentRef,
    ) -> Result<CreateOutcome, sqlx::Error> {
        let mut favorites = self.favorites.write().await;

        if let Some(existing) = favorites
            .iter()
            .find(|f| Self::matches(f, user_id, content))
        {
            return Ok(CreateOutcome::Existing(existing.clone()));
        }

        let favorite = Favorite {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            user_id,
            content_type: content.content_type.clone(),
            object_id: content.object_id,
            created_at: OffsetDateTime::now_utc(),
        };
        favorites.push(favorite.clone());

        Ok(CreateOutcome::Created(favorite))
    }

    async fn find_for_object(
        &self,
        user_id: i32,
        content: &ContentRef,
    ) -> Result<Vec<Favorite>, sqlx::Error> {
        Ok(self
            .favorites
            .read()
            .await
            .iter()
            .filter(|f| Self::matches(f, user_id, content))
            .cloned()
            .collect())
    }

    async fn find_owned(&self, id: i64, user_id: i32) -> Result<Option<Favorite>, sqlx::Error> {
        Ok(self
            .favorites
            .read()
            .await
            .iter()
            .find(|f| f.id == id && f.user_id == user_id)
            .cloned())
    }

    async fn count(&self, user_id: i32, query: &FavoriteQuery) -> Result<i64, sqlx::Error> {
        Ok(self
            .favorites
            .read()
            .await
            .iter()
            .filter(|f| Self::in_scope(f, user_id, query))
            .count() as i64)
    }

    async fn list(
        &self,
        user_id: i32,
        query: &FavoriteQuery,
        window: PageWindow,
    ) -> Result<Vec<Favorite>, sqlx::Error> {
        let mut matching: Vec<Favorite> = self
            .favorites
            .read()
            .await
            .iter()
            .filter(|f| Self::in_scope(f, user_id, query))
            .cloned()
            .collect();

        query.order.sort(&mut matching);

        let skipped = matching.into_iter().skip(window.offset.max(0) as usize);
        Ok(match window.limit {
            Some(limit) => skipped.take(limit.max(0) as usize).collect(),
            None => skipped.collect(),
        })
    }

    async fn delete(&self, id: i64, user_id: i32) -> Result<bool, sqlx::Error> {
        let mut favorites = self.favorites.write().await;
        let before = favorites.len();
        favorites.retain(|f| !(f.id == id && f.user_id == user_id));
        Ok(favorites.len() < before)
    }

    async fn delete_for_object(
        &self,
        user_id: i32,
        content: &ContentRef,
    ) -> Result<bool, sqlx::Error> {
        let mut favorites = self.favorites.write().await;
        let before = favorites.len();
        favorites.retain(|f| !Self::matches(f, user_id, content));
        Ok(favorites.len() < before)
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        Ok(())
    }
}
