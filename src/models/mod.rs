mod content;
mod favorite;
mod pagination;
mod query;

pub use content::{ContentObject, ContentRef, ContentType, InvalidContentType};
pub use favorite::{
    AddRemoveContext, CreateOutcome, DeleteConfirmationContext, DeleteFormState, Favorite,
    FavoriteListContext, FavoriteToggleInput, FavoriteToggleResponse, TemplateResponse,
};
pub use pagination::{
    InvalidPage, ListFavoritesQuery, Page, PageInfo, PageSelector, PageWindow, Paginator,
};
pub use query::{FavoriteOrder, FavoriteQuery};
