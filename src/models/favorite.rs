use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;
use time::OffsetDateTime;

use super::{ContentObject, ContentRef, ContentType, Page};

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Favorite {
    pub id: i64,
    pub user_id: i32,
    #[sqlx(try_from = "String")]
    pub content_type: ContentType,
    pub object_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Result of an insert-if-absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    Created(Favorite),
    Existing(Favorite),
}

impl CreateOutcome {
    pub fn favorite(&self) -> &Favorite {
        match self {
            CreateOutcome::Created(favorite) | CreateOutcome::Existing(favorite) => favorite,
        }
    }

    pub fn into_favorite(self) -> Favorite {
        match self {
            CreateOutcome::Created(favorite) | CreateOutcome::Existing(favorite) => favorite,
        }
    }

    pub fn was_created(&self) -> bool {
        matches!(self, CreateOutcome::Created(_))
    }
}

/// Body of the ajax add/remove endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct FavoriteToggleInput {
    pub content_type: ContentType,
    pub object_id: i64,
}

impl From<FavoriteToggleInput> for ContentRef {
    fn from(input: FavoriteToggleInput) -> Self {
        ContentRef::new(input.content_type, input.object_id)
    }
}

#[derive(Debug, Serialize)]
pub struct FavoriteToggleResponse {
    pub favorited: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite: Option<Favorite>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed: Option<bool>,
}

/// Context handed to the add/remove control fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddRemoveContext {
    pub object: ContentObject,
    pub content_type: ContentType,
    pub user_id: Option<i32>,
    pub favorite: Option<Favorite>,
}

/// A "rendered template": the view context plus caller-supplied extras.
#[derive(Debug, Serialize)]
pub struct TemplateResponse<C: Serialize> {
    pub template_name: String,
    #[serde(flatten)]
    pub context: C,
    #[serde(flatten)]
    pub extra_context: Map<String, Value>,
}

#[derive(Debug, Serialize)]
pub struct FavoriteListContext {
    #[serde(flatten)]
    pub page: Page<Favorite>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<ContentType>,
}

#[derive(Debug, Serialize)]
pub struct DeleteConfirmationContext {
    pub object: Favorite,
    pub form: DeleteFormState,
}

#[derive(Debug, Default, Serialize)]
pub struct DeleteFormState {
    pub fields: Vec<&'static str>,
    pub is_bound: bool,
    pub errors: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn create_test_favorite() -> Favorite {
        Favorite {
            id: 3,
            user_id: 1,
            content_type: ContentType::new("blog.article").unwrap(),
            object_id: 7,
            created_at: datetime!(2024-01-15 10:30:00 UTC),
        }
    }

    #[test]
    fn test_favorite_serialization() {
        let favorite = create_test_favorite();
        let json = serde_json::to_string(&favorite).expect("serialization should succeed");

        assert!(json.contains("\"content_type\":\"blog.article\""));
        assert!(json.contains("\"object_id\":7"));
        assert!(json.contains("\"created_at\":\"2024-01-15T10:30:00Z\""));
    }

    #[test]
    fn test_create_outcome_accessors() {
        let created = CreateOutcome::Created(create_test_favorite());
        let existing = CreateOutcome::Existing(create_test_favorite());

        assert!(created.was_created());
        assert!(!existing.was_created());
        assert_eq!(existing.favorite().id, 3);
        assert_eq!(created.into_favorite().object_id, 7);
    }

    #[test]
    fn test_toggle_input_deserialization() {
        let json = r#"{"content_type": "blog.article", "object_id": 7}"#;
        let input: FavoriteToggleInput =
            serde_json::from_str(json).expect("deserialization should succeed");
        let content_ref: ContentRef = input.into();

        assert_eq!(content_ref.content_type.as_str(), "blog.article");
        assert_eq!(content_ref.object_id, 7);
    }

    #[test]
    fn test_template_response_merges_extra_context() {
        let mut extra = Map::new();
        extra.insert("title".to_string(), Value::from("My articles"));

        let response = TemplateResponse {
            template_name: "favorites/favorite_list.html".to_string(),
            context: DeleteFormState::default(),
            extra_context: extra,
        };

        let json = serde_json::to_value(&response).expect("serialization should succeed");
        assert_eq!(json["template_name"], "favorites/favorite_list.html");
        assert_eq!(json["title"], "My articles");
        assert_eq!(json["is_bound"], false);
    }
}
