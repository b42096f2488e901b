//! Helpers for presentation code that needs to show favorite state.

use tracing::instrument;

use crate::{
    error::AppResult,
    models::{AddRemoveContext, ContentObject, ContentRef},
    services::FavoriteService,
};

/// True if `user_id` has favorited `content`. Always false for anonymous users.
#[instrument(name = "templatetags.is_favorite", skip(service))]
pub async fn is_favorite(
    service: &FavoriteService,
    content: &ContentRef,
    user_id: Option<i32>,
) -> AppResult<bool> {
    let Some(user_id) = user_id else {
        return Ok(false);
    };

    Ok(!service
        .favorites_for_object(content, user_id)
        .await?
        .is_empty())
}

/// Context for the add/remove control: which one to show and, for "remove",
/// the favorite it acts on.
#[instrument(name = "templatetags.add_remove_favorite", skip(service, object))]
pub async fn add_remove_favorite(
    service: &FavoriteService,
    object: &ContentObject,
    user_id: Option<i32>,
) -> AppResult<AddRemoveContext> {
    let favorite = match user_id {
        Some(user_id) => service
            .favorites_for_object(&object.content_ref, user_id)
            .await?
            .into_iter()
            .next(),
        None => None,
    };

    Ok(AddRemoveContext {
        object: object.clone(),
        content_type: object.content_ref.content_type.clone(),
        user_id,
        favorite,
    })
}
