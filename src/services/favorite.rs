use std::sync::Arc;

use tracing::instrument;

use crate::{
    content::ContentRegistry,
    error::{AppError, AppResult},
    models::{
        ContentObject, ContentRef, ContentType, CreateOutcome, Favorite, FavoriteQuery, Page,
        PageSelector, Paginator,
    },
    repository::FavoriteStore,
    telemetry::{FAVORITES_ADDED, FAVORITES_DUPLICATE_BLOCKED, FAVORITES_REMOVED},
};

/// Favorite manager: the queries and writes every view goes through.
#[derive(Clone)]
pub struct FavoriteService {
    store: Arc<dyn FavoriteStore>,
    registry: ContentRegistry,
}

impl FavoriteService {
    pub fn new(store: Arc<dyn FavoriteStore>, registry: ContentRegistry) -> Self {
        Self { store, registry }
    }

    pub fn registry(&self) -> &ContentRegistry {
        &self.registry
    }

    #[instrument(name = "favorite.resolve", skip(self))]
    pub async fn resolve(&self, content: &ContentRef) -> AppResult<ContentObject> {
        self.registry.resolve(content).await
    }

    /// Links `object` to `user_id` unless that exact favorite exists already.
    #[instrument(name = "favorite.create", skip(self, object), fields(content = ?object.content_ref))]
    pub async fn create_favorite(
        &self,
        object: &ContentObject,
        user_id: i32,
    ) -> AppResult<CreateOutcome> {
        let outcome = self
            .store
            .insert_if_absent(user_id, &object.content_ref)
            .await?;

        if outcome.was_created() {
            FAVORITES_ADDED.add(1, &[]);
            tracing::info!(
                favorite_id = outcome.favorite().id,
                user_id,
                "Favorite created"
            );
        } else {
            FAVORITES_DUPLICATE_BLOCKED.add(1, &[]);
            tracing::debug!(
                favorite_id = outcome.favorite().id,
                user_id,
                "Favorite already exists"
            );
        }

        Ok(outcome)
    }

    /// Resolves the object first; a missing object is not-found.
    #[instrument(name = "favorite.add", skip(self))]
    pub async fn add(&self, content: &ContentRef, user_id: i32) -> AppResult<CreateOutcome> {
        let object = self.resolve(content).await?;
        self.create_favorite(&object, user_id).await
    }

    #[instrument(name = "favorite.for_object", skip(self))]
    pub async fn favorites_for_object(
        &self,
        content: &ContentRef,
        user_id: i32,
    ) -> AppResult<Vec<Favorite>> {
        Ok(self.store.find_for_object(user_id, content).await?)
    }

    #[instrument(name = "favorite.for_model", skip(self))]
    pub async fn favorites_for_model(
        &self,
        content_type: &ContentType,
        user_id: i32,
        selector: PageSelector,
        per_page: usize,
    ) -> AppResult<Page<Favorite>> {
        self.favorites_matching(
            &FavoriteQuery::for_model(content_type.clone()),
            user_id,
            selector,
            per_page,
        )
        .await
    }

    #[instrument(name = "favorite.for_user", skip(self))]
    pub async fn favorites_for_user(
        &self,
        user_id: i32,
        selector: PageSelector,
        per_page: usize,
    ) -> AppResult<Page<Favorite>> {
        self.favorites_matching(&FavoriteQuery::all(), user_id, selector, per_page)
            .await
    }

    /// One page of the user's favorites selected by `query`.
    #[instrument(name = "favorite.matching", skip(self))]
    pub async fn favorites_matching(
        &self,
        query: &FavoriteQuery,
        user_id: i32,
        selector: PageSelector,
        per_page: usize,
    ) -> AppResult<Page<Favorite>> {
        let count = self.store.count(user_id, query).await?;
        let paginator = Paginator::new(count, per_page);
        let window = paginator
            .window(selector)
            .map_err(|e| AppError::NotFound(e.to_string()))?;

        let favorites = self.store.list(user_id, query, window).await?;

        Ok(Page::new(favorites, paginator, window.number))
    }

    /// Favorites are only visible to their owner; anyone else gets not-found.
    #[instrument(name = "favorite.get_owned", skip(self))]
    pub async fn get_owned(&self, id: i64, user_id: i32) -> AppResult<Favorite> {
        self.store
            .find_owned(id, user_id)
            .await?
            .ok_or(AppError::NotFound("Favorite not found".to_string()))
    }

    #[instrument(name = "favorite.delete", skip(self, favorite), fields(favorite_id = favorite.id))]
    pub async fn delete(&self, favorite: &Favorite) -> AppResult<()> {
        if !self.store.delete(favorite.id, favorite.user_id).await? {
            return Err(AppError::NotFound("Favorite not found".to_string()));
        }

        FAVORITES_REMOVED.add(1, &[]);
        tracing::info!(favorite_id = favorite.id, user_id = favorite.user_id, "Favorite deleted");

        Ok(())
    }

    /// Only the content type has to be registered; the object itself may be
    /// gone already.
    #[instrument(name = "favorite.remove_for_object", skip(self))]
    pub async fn remove_for_object(&self, content: &ContentRef, user_id: i32) -> AppResult<bool> {
        if !self.registry.is_registered(&content.content_type) {
            return Err(AppError::NotFound("Unknown content type".to_string()));
        }

        let removed = self.store.delete_for_object(user_id, content).await?;
        if removed {
            FAVORITES_REMOVED.add(1, &[]);
            tracing::info!(user_id, "Favorite removed");
        }

        Ok(removed)
    }

    pub async fn ping(&self) -> AppResult<()> {
        Ok(self.store.ping().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{content::MemoryContentSource, repository::MemoryFavoriteStore};

    fn article_type() -> ContentType {
        ContentType::new("blog.article").unwrap()
    }

    fn service_with_articles(ids: &[i64]) -> (FavoriteService, MemoryFavoriteStore) {
        let (service, store, _) = service_with_source(ids);
        (service, store)
    }

    fn service_with_source(
        ids: &[i64],
    ) -> (FavoriteService, MemoryFavoriteStore, MemoryContentSource) {
        let store = MemoryFavoriteStore::new();
        let source = MemoryContentSource::with_objects(ids.iter().map(|id| (*id, format!("#{id}"))));
        let registry = ContentRegistry::new().register(article_type(), source.clone());
        (FavoriteService::new(Arc::new(store.clone()), registry), store, source)
    }

    #[tokio::test]
    async fn test_add_twice_creates_one_favorite() {
        let (service, store) = service_with_articles(&[7]);
        let content = ContentRef::new(article_type(), 7);

        assert!(service.add(&content, 1).await.unwrap().was_created());
        assert!(!service.add(&content, 1).await.unwrap().was_created());
        assert_eq!(store.count_for_user(1).await, 1);
    }

    #[tokio::test]
    async fn test_add_missing_object_is_not_found() {
        let (service, store) = service_with_articles(&[]);
        let result = service.add(&ContentRef::new(article_type(), 7), 1).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_favorites_for_object_is_scoped_to_user() {
        let (service, _) = service_with_articles(&[7]);
        let content = ContentRef::new(article_type(), 7);

        service.add(&content, 1).await.unwrap();

        assert_eq!(service.favorites_for_object(&content, 1).await.unwrap().len(), 1);
        assert!(service.favorites_for_object(&content, 2).await.unwrap().is_empty());
        assert!(service.add(&content, 2).await.unwrap().was_created());
    }

    #[tokio::test]
    async fn test_get_owned_hides_other_users_favorites() {
        let (service, _) = service_with_articles(&[7]);
        let favorite = service
            .add(&ContentRef::new(article_type(), 7), 1)
            .await
            .unwrap()
            .into_favorite();

        assert!(service.get_owned(favorite.id, 1).await.is_ok());
        assert!(matches!(
            service.get_owned(favorite.id, 2).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_favorites_for_model_paginates() {
        let (service, _) = service_with_articles(&[1, 2, 3]);
        for id in 1..=3 {
            service.add(&ContentRef::new(article_type(), id), 1).await.unwrap();
        }

        let page = service
            .favorites_for_model(&article_type(), 1, PageSelector::Last, 2)
            .await
            .unwrap();
        assert_eq!(page.page_obj.number, 2);
        assert_eq!(page.object_list.len(), 1);
        assert_eq!(page.paginator.count, 3);

        let out_of_range = service
            .favorites_for_model(&article_type(), 1, PageSelector::Number(3), 2)
            .await;
        assert!(matches!(out_of_range, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_remove_for_object() {
        let (service, store) = service_with_articles(&[7]);
        let content = ContentRef::new(article_type(), 7);

        service.add(&content, 1).await.unwrap();
        assert!(!service.remove_for_object(&content, 2).await.unwrap());
        assert!(service.remove_for_object(&content, 1).await.unwrap());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_remove_after_object_was_deleted() {
        let (service, store, source) = service_with_source(&[7]);
        let content = ContentRef::new(article_type(), 7);

        service.add(&content, 1).await.unwrap();
        source.remove(7).await;

        assert!(service.remove_for_object(&content, 1).await.unwrap());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_remove_unknown_type_is_not_found() {
        let (service, _) = service_with_articles(&[7]);
        let comment = ContentRef::new(ContentType::new("blog.comment").unwrap(), 7);

        assert!(matches!(
            service.remove_for_object(&comment, 1).await,
            Err(AppError::NotFound(_))
        ));
    }
}
