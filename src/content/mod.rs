//! Content-type registry.
//!
//! Favorites point at arbitrary application objects through a
//! [`ContentRef`](crate::models::ContentRef). Each content type the
//! application wants to be favoritable is registered here together with a
//! [`ContentSource`] that can tell whether an object of that type exists.

mod registry;
mod sources;

pub use registry::ContentRegistry;
pub use sources::{ContentSource, InvalidIdentifier, MemoryContentSource, PgTableSource};
