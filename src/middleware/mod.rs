mod auth;

pub use auth::{ApiUser, AuthUser, OptionalAuthUser};
