//! Shared test utilities for router-level tests.
//!
//! Builds the full favorites router over in-memory storage with two
//! registered content types:
//! - `blog.article` mounted at `/favorites/article` (objects 7 and 8)
//! - `shop.product` mounted at `/favorites/products`, redirecting to `/shop`
//! - `/favorites/reading`, listing articles and products oldest first

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, header},
};
use favorites_service::{
    AppState, Config,
    content::{ContentRegistry, MemoryContentSource},
    models::{ContentType, FavoriteQuery},
    repository::MemoryFavoriteStore,
    routes::{self, DeleteFavoriteOptions, FavoriteMount},
    services::{AuthService, FavoriteService},
};
use serde_json::Value;
use time::Duration;
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-key-for-local-development";

pub const USER_A: i32 = 1;
pub const USER_B: i32 = 2;

pub struct TestApp {
    pub router: Router,
    pub store: MemoryFavoriteStore,
    pub articles: MemoryContentSource,
    auth: AuthService,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_delete_options(DeleteFavoriteOptions::default())
    }

    pub fn with_delete_options(delete_options: DeleteFavoriteOptions) -> Self {
        Self::build(Config::for_testing(TEST_JWT_SECRET), delete_options)
    }

    pub fn with_login_url(login_url: &str) -> Self {
        let mut config = Config::for_testing(TEST_JWT_SECRET);
        config.login_url = login_url.to_string();
        Self::build(config, DeleteFavoriteOptions::default())
    }

    fn build(config: Config, delete_options: DeleteFavoriteOptions) -> Self {
        let article = ContentType::new("blog.article").expect("valid content type");
        let product = ContentType::new("shop.product").expect("valid content type");

        let articles = MemoryContentSource::with_objects([(7, "Seven"), (8, "Eight")]);
        let registry = ContentRegistry::new()
            .register(article.clone(), articles.clone())
            .register(product.clone(), MemoryContentSource::with_objects([(1, "Mug")]));

        let store = MemoryFavoriteStore::new();
        let favorite_service = FavoriteService::new(Arc::new(store.clone()), registry);
        let auth = AuthService::new(&config);
        let state = AppState::new(config, favorite_service);

        let reading = FavoriteQuery::for_types([article.clone(), product.clone()]).oldest_first();
        let mounts = vec![
            FavoriteMount::new(article.clone()).paginate_by(2),
            FavoriteMount::new(article).prefix("reading").queryset(reading),
            FavoriteMount::new(product)
                .prefix("products")
                .redirect_to("/shop")
                .with_template("favorites/product_list.html")
                .extra("title", "Saved products"),
        ];

        let router =
            routes::create_router(state, mounts, delete_options).expect("mounts should be valid");

        Self {
            router,
            store,
            articles,
            auth,
        }
    }

    pub fn token(&self, user_id: i32) -> String {
        self.auth
            .issue_token(user_id, Duration::hours(1))
            .expect("token should encode")
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    pub async fn get(&self, uri: &str, user: Option<i32>) -> Response<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(user_id) = user {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", self.token(user_id)));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post_form(&self, uri: &str, user: Option<i32>, form: &str) -> Response<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(user_id) = user {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", self.token(user_id)));
        }
        self.send(builder.body(Body::from(form.to_string())).unwrap())
            .await
    }

    pub async fn post_json(&self, uri: &str, user: Option<i32>, body: Value) -> Response<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(user_id) = user {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", self.token(user_id)));
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .expect("response should redirect")
}
