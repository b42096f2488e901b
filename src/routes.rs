use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    Extension, Router,
    routing::{get, post},
};
use serde_json::{Map, Value};

use crate::{
    AppState, handlers,
    models::{ContentType, FavoriteQuery},
};

pub const DEFAULT_LIST_TEMPLATE: &str = "favorites/favorite_list.html";
pub const DEFAULT_DELETE_TEMPLATE: &str = "favorites/favorite_confirm_delete.html";

const RESERVED_PREFIXES: [&str; 3] = ["add", "remove", "delete"];

/// Mounts the create, list and status views for one content type under
/// `/favorites/{prefix}`.
#[derive(Debug, Clone)]
pub struct FavoriteMount {
    pub prefix: String,
    pub content_type: ContentType,
    pub redirect_to: Option<String>,
    pub paginate_by: Option<usize>,
    pub template_name: Option<String>,
    pub extra_context: Map<String, Value>,
    /// Replaces the default "this type, newest first" listing.
    pub queryset: Option<FavoriteQuery>,
}

impl FavoriteMount {
    /// Uses the model name as prefix, so `blog.article` lands on `/favorites/article`.
    pub fn new(content_type: ContentType) -> Self {
        Self {
            prefix: content_type.model().to_string(),
            content_type,
            redirect_to: None,
            paginate_by: None,
            template_name: None,
            extra_context: Map::new(),
            queryset: None,
        }
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn redirect_to(mut self, target: impl Into<String>) -> Self {
        self.redirect_to = Some(target.into());
        self
    }

    pub fn paginate_by(mut self, per_page: usize) -> Self {
        self.paginate_by = Some(per_page);
        self
    }

    pub fn with_template(mut self, template_name: impl Into<String>) -> Self {
        self.template_name = Some(template_name.into());
        self
    }

    pub fn extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra_context.insert(key.into(), value.into());
        self
    }

    pub fn queryset(mut self, query: FavoriteQuery) -> Self {
        self.queryset = Some(query);
        self
    }

    pub fn template_name(&self) -> String {
        self.template_name
            .clone()
            .unwrap_or_else(|| DEFAULT_LIST_TEMPLATE.to_string())
    }

    /// The listing the list view runs.
    pub fn query(&self) -> FavoriteQuery {
        self.queryset
            .clone()
            .unwrap_or_else(|| FavoriteQuery::for_model(self.content_type.clone()))
    }
}

/// Options of the delete view, shared by every content type.
#[derive(Debug, Clone, Default)]
pub struct DeleteFavoriteOptions {
    pub redirect_to: Option<String>,
    pub template_name: Option<String>,
    pub extra_context: Map<String, Value>,
    pub require_confirmation: bool,
}

impl DeleteFavoriteOptions {
    pub fn template_name(&self) -> String {
        self.template_name
            .clone()
            .unwrap_or_else(|| DEFAULT_DELETE_TEMPLATE.to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MountError {
    #[error("prefix '{0}' is reserved")]
    ReservedPrefix(String),

    #[error("prefix '{0}' must be lowercase letters, digits, '-' or '_'")]
    InvalidPrefix(String),

    #[error("prefix '{0}' is mounted twice")]
    DuplicatePrefix(String),

    #[error("content type '{0}' is not registered")]
    UnregisteredContentType(ContentType),
}

fn validate_mount(
    mount: &FavoriteMount,
    state: &AppState,
    seen: &mut HashSet<String>,
) -> Result<(), MountError> {
    let prefix = mount.prefix.as_str();

    if RESERVED_PREFIXES.contains(&prefix) {
        return Err(MountError::ReservedPrefix(prefix.to_string()));
    }
    if prefix.is_empty()
        || !prefix
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
    {
        return Err(MountError::InvalidPrefix(prefix.to_string()));
    }
    if !seen.insert(prefix.to_string()) {
        return Err(MountError::DuplicatePrefix(prefix.to_string()));
    }
    let registry = state.favorite_service.registry();
    let listed = mount.queryset.iter().flat_map(|q| q.content_types.iter());
    if let Some(content_type) = std::iter::once(&mount.content_type)
        .chain(listed)
        .find(|ct| !registry.is_registered(ct))
    {
        return Err(MountError::UnregisteredContentType(content_type.clone()));
    }

    Ok(())
}

pub fn create_router(
    state: AppState,
    mounts: Vec<FavoriteMount>,
    delete_options: DeleteFavoriteOptions,
) -> Result<Router, MountError> {
    let delete_routes = Router::<AppState>::new()
        .route(
            "/favorites/delete/{favorite_id}",
            get(handlers::delete_favorite_confirm).post(handlers::delete_favorite),
        )
        .layer(Extension(Arc::new(delete_options)));

    let mut router = Router::<AppState>::new()
        .route("/api/health", get(handlers::health_check))
        .route("/favorites", get(handlers::favorite_index))
        .route("/favorites/add", post(handlers::ajax_add_favorite))
        .route("/favorites/remove", post(handlers::ajax_remove_favorite))
        .merge(delete_routes);

    let mut seen = HashSet::new();
    for mount in mounts {
        validate_mount(&mount, &state, &mut seen)?;

        let base = format!("/favorites/{}", mount.prefix);
        tracing::info!(content_type = %mount.content_type, path = %base, "Mounting favorites");

        let mount_routes = Router::<AppState>::new()
            .route(&base, get(handlers::favorite_list))
            .route(
                &format!("{base}/add/{{object_id}}"),
                post(handlers::create_favorite),
            )
            .route(
                &format!("{base}/status/{{object_id}}"),
                get(handlers::favorite_status),
            )
            .layer(Extension(Arc::new(mount)));

        router = router.merge(mount_routes);
    }

    Ok(router.with_state(state))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mount_defaults_to_model_prefix() {
        let mount = FavoriteMount::new(ContentType::new("blog.article").unwrap());
        assert_eq!(mount.prefix, "article");
        assert_eq!(mount.template_name(), DEFAULT_LIST_TEMPLATE);
        assert_eq!(
            mount.query(),
            FavoriteQuery::for_model(ContentType::new("blog.article").unwrap())
        );
    }

    #[test]
    fn test_mount_queryset_override() {
        let mount = FavoriteMount::new(ContentType::new("blog.article").unwrap())
            .queryset(FavoriteQuery::all().oldest_first());

        assert_eq!(mount.query(), FavoriteQuery::all().oldest_first());
    }

    #[test]
    fn test_mount_builder() {
        let mount = FavoriteMount::new(ContentType::new("shop.product").unwrap())
            .prefix("products")
            .redirect_to("/shop")
            .paginate_by(10)
            .with_template("favorites/product_list.html")
            .extra("title", "Saved products");

        assert_eq!(mount.prefix, "products");
        assert_eq!(mount.redirect_to.as_deref(), Some("/shop"));
        assert_eq!(mount.paginate_by, Some(10));
        assert_eq!(mount.template_name(), "favorites/product_list.html");
        assert_eq!(mount.extra_context["title"], "Saved products");
    }

    #[test]
    fn test_delete_options_default_template() {
        assert_eq!(
            DeleteFavoriteOptions::default().template_name(),
            DEFAULT_DELETE_TEMPLATE
        );
    }
}
