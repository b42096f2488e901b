use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use opentelemetry::trace::TraceContextExt;
use serde_json::json;
use thiserror::Error;
use tracing::Span;
use tracing_opentelemetry::OpenTelemetrySpanExt;
use url::{Position, Url};

/// Relative login URLs are resolved against this origin, which is then
/// stripped again from the redirect.
const RELATIVE_BASE: &str = "http://localhost/";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Login required")]
    LoginRequired { login_url: String, next: String },

    #[error("Authentication required")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

fn get_trace_id() -> Option<String> {
    let span = Span::current();
    let context = span.context();
    let span_ref = context.span();
    let span_context = span_ref.span_context();

    if span_context.is_valid() {
        Some(span_context.trace_id().to_string())
    } else {
        None
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::LoginRequired { login_url, next } => match login_location(login_url, next) {
                Ok(location) => return Redirect::to(&location).into_response(),
                Err(e) => {
                    return AppError::Internal(format!("invalid login url '{login_url}': {e}"))
                        .into_response();
                }
            },
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Database(e) => {
                tracing::error!(error = %e, "Database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::Jwt(e) => {
                tracing::warn!(error = %e, "JWT error");
                (StatusCode::UNAUTHORIZED, "Invalid token".to_string())
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let mut body = json!({
            "error": error_message,
            "status": status.as_u16(),
        });

        if let Some(trace_id) = get_trace_id() {
            body["trace_id"] = json!(trace_id);
        }

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Appends `next` to the login URL, keeping any query it already has.
/// Absolute URLs stay absolute; paths stay paths.
fn login_location(login_url: &str, next: &str) -> Result<String, url::ParseError> {
    let (mut url, relative) = match Url::parse(login_url) {
        Ok(url) => (url, false),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            (Url::parse(RELATIVE_BASE)?.join(login_url)?, true)
        }
        Err(e) => return Err(e),
    };

    url.query_pairs_mut().append_pair("next", next);

    if relative {
        Ok(url[Position::BeforePath..].to_string())
    } else {
        Ok(url.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::LOCATION;

    #[test]
    fn test_not_found_maps_to_404() {
        let response = AppError::NotFound("Favorite not found".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_internal_error_maps_to_500() {
        let response = AppError::Internal("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_login_required_redirects_with_next() {
        let response = AppError::LoginRequired {
            login_url: "/accounts/login".to_string(),
            next: "/favorites/article/add/7".to_string(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(LOCATION).unwrap(),
            "/accounts/login?next=%2Ffavorites%2Farticle%2Fadd%2F7"
        );
    }

    #[test]
    fn test_login_location_keeps_existing_query() {
        assert_eq!(
            login_location("/accounts/login?source=fav", "/favorites/article/add/7").unwrap(),
            "/accounts/login?source=fav&next=%2Ffavorites%2Farticle%2Fadd%2F7"
        );
    }

    #[test]
    fn test_login_location_escapes_next_query() {
        assert_eq!(
            login_location("/accounts/login", "/favorites/article?page=2&x=y").unwrap(),
            "/accounts/login?next=%2Ffavorites%2Farticle%3Fpage%3D2%26x%3Dy"
        );
    }

    #[test]
    fn test_unparseable_login_url_is_internal_error() {
        let response = AppError::LoginRequired {
            login_url: "http://[::1".to_string(),
            next: "/favorites".to_string(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_login_location_absolute_url() {
        assert_eq!(
            login_location("https://sso.example.com/login?app=fav", "/favorites").unwrap(),
            "https://sso.example.com/login?app=fav&next=%2Ffavorites"
        );
    }
}
