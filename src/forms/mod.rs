mod delete;

pub use delete::{DeleteFavoriteForm, DeleteSubmission};
