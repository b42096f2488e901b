use std::sync::Arc;

use axum::{
    Extension, Form, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Serialize;
use serde_json::Map;

use crate::{
    AppState,
    error::{AppError, AppResult},
    forms::{DeleteFavoriteForm, DeleteSubmission},
    middleware::{ApiUser, AuthUser, OptionalAuthUser},
    models::{
        AddRemoveContext, ContentRef, DeleteConfirmationContext, FavoriteListContext,
        FavoriteToggleInput, FavoriteToggleResponse, ListFavoritesQuery, PageSelector,
        TemplateResponse,
    },
    routes::{DEFAULT_LIST_TEMPLATE, DeleteFavoriteOptions, FavoriteMount},
    templatetags,
};

fn parse_page(query: &ListFavoritesQuery) -> AppResult<PageSelector> {
    PageSelector::parse(query.page.as_deref())
        .ok_or_else(|| AppError::NotFound("Invalid page".to_string()))
}

/// Adds the mount's content object to the caller's favorites, then redirects.
/// Repeating the request for the same object leaves the store unchanged.
pub async fn create_favorite(
    State(state): State<AppState>,
    Extension(mount): Extension<Arc<FavoriteMount>>,
    AuthUser(user_id): AuthUser,
    Path(object_id): Path<i64>,
) -> AppResult<Redirect> {
    let content = ContentRef::new(mount.content_type.clone(), object_id);
    state.favorite_service.add(&content, user_id).await?;

    let target = mount
        .redirect_to
        .as_deref()
        .unwrap_or(&state.config.favorites_url);

    Ok(Redirect::to(target))
}

pub async fn favorite_list(
    State(state): State<AppState>,
    Extension(mount): Extension<Arc<FavoriteMount>>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<ListFavoritesQuery>,
) -> AppResult<Json<TemplateResponse<FavoriteListContext>>> {
    let selector = parse_page(&query)?;
    let per_page = mount.paginate_by.unwrap_or(state.config.paginate_by);

    let page = state
        .favorite_service
        .favorites_matching(&mount.query(), user_id, selector, per_page)
        .await?;

    Ok(Json(TemplateResponse {
        template_name: mount.template_name(),
        context: FavoriteListContext {
            page,
            content_type: Some(mount.content_type.clone()),
        },
        extra_context: mount.extra_context.clone(),
    }))
}

/// Every favorite of the caller, across content types.
pub async fn favorite_index(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<ListFavoritesQuery>,
) -> AppResult<Json<TemplateResponse<FavoriteListContext>>> {
    let selector = parse_page(&query)?;

    let page = state
        .favorite_service
        .favorites_for_user(user_id, selector, state.config.paginate_by)
        .await?;

    Ok(Json(TemplateResponse {
        template_name: DEFAULT_LIST_TEMPLATE.to_string(),
        context: FavoriteListContext {
            page,
            content_type: None,
        },
        extra_context: Map::new(),
    }))
}

#[derive(Debug, Serialize)]
pub struct FavoriteStatusResponse {
    pub is_favorite: bool,
    #[serde(flatten)]
    pub fragment: AddRemoveContext,
}

pub async fn favorite_status(
    State(state): State<AppState>,
    Extension(mount): Extension<Arc<FavoriteMount>>,
    OptionalAuthUser(user_id): OptionalAuthUser,
    Path(object_id): Path<i64>,
) -> AppResult<Json<FavoriteStatusResponse>> {
    let service = &state.favorite_service;
    let content = ContentRef::new(mount.content_type.clone(), object_id);
    let object = service.resolve(&content).await?;

    let is_favorite = templatetags::is_favorite(service, &content, user_id).await?;
    let fragment = templatetags::add_remove_favorite(service, &object, user_id).await?;

    Ok(Json(FavoriteStatusResponse {
        is_favorite,
        fragment,
    }))
}

fn confirmation_page(
    options: &DeleteFavoriteOptions,
    form: &DeleteFavoriteForm,
) -> TemplateResponse<DeleteConfirmationContext> {
    TemplateResponse {
        template_name: options.template_name(),
        context: DeleteConfirmationContext {
            object: form.instance().clone(),
            form: form.state(),
        },
        extra_context: options.extra_context.clone(),
    }
}

/// Shows the confirmation for deleting one of the caller's favorites.
/// Never writes.
pub async fn delete_favorite_confirm(
    State(state): State<AppState>,
    Extension(options): Extension<Arc<DeleteFavoriteOptions>>,
    AuthUser(user_id): AuthUser,
    Path(favorite_id): Path<i64>,
) -> AppResult<Json<TemplateResponse<DeleteConfirmationContext>>> {
    let favorite = state.favorite_service.get_owned(favorite_id, user_id).await?;
    let form = DeleteFavoriteForm::unbound(favorite, options.require_confirmation);

    Ok(Json(confirmation_page(&options, &form)))
}

/// Deletes the favorite on a valid submission and redirects; an invalid one
/// gets the confirmation back with the form errors.
pub async fn delete_favorite(
    State(state): State<AppState>,
    Extension(options): Extension<Arc<DeleteFavoriteOptions>>,
    AuthUser(user_id): AuthUser,
    Path(favorite_id): Path<i64>,
    Form(submission): Form<DeleteSubmission>,
) -> AppResult<Response> {
    let favorite = state.favorite_service.get_owned(favorite_id, user_id).await?;
    let form = DeleteFavoriteForm::bind(favorite, &submission, options.require_confirmation);

    if !form.is_valid() {
        tracing::debug!(favorite_id, errors = ?form.errors(), "Delete confirmation rejected");
        let page = confirmation_page(&options, &form);
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(page)).into_response());
    }

    form.save(&state.favorite_service, true).await?;

    let target = options
        .redirect_to
        .as_deref()
        .unwrap_or(&state.config.favorites_url);

    Ok(Redirect::to(target).into_response())
}

pub async fn ajax_add_favorite(
    State(state): State<AppState>,
    ApiUser(user_id): ApiUser,
    Json(input): Json<FavoriteToggleInput>,
) -> AppResult<(StatusCode, Json<FavoriteToggleResponse>)> {
    let content: ContentRef = input.into();
    let outcome = state.favorite_service.add(&content, user_id).await?;

    let status = if outcome.was_created() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((
        status,
        Json(FavoriteToggleResponse {
            favorited: true,
            favorite: Some(outcome.into_favorite()),
            removed: None,
        }),
    ))
}

pub async fn ajax_remove_favorite(
    State(state): State<AppState>,
    ApiUser(user_id): ApiUser,
    Json(input): Json<FavoriteToggleInput>,
) -> AppResult<Json<FavoriteToggleResponse>> {
    let content: ContentRef = input.into();
    let removed = state
        .favorite_service
        .remove_for_object(&content, user_id)
        .await?;

    Ok(Json(FavoriteToggleResponse {
        favorited: false,
        favorite: None,
        removed: Some(removed),
    }))
}
