use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tokio::sync::RwLock;
use tracing::instrument;

use crate::models::{ContentObject, ContentRef, ContentType};

/// Looks up objects of one content type by id.
#[async_trait]
pub trait ContentSource: Send + Sync + 'static {
    async fn fetch(
        &self,
        content_type: &ContentType,
        object_id: i64,
    ) -> Result<Option<ContentObject>, sqlx::Error>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid SQL identifier '{0}'")]
pub struct InvalidIdentifier(pub String);

fn validate_identifier(raw: &str) -> Result<(), InvalidIdentifier> {
    let valid_part = |part: &str| {
        let mut chars = part.chars();
        matches!(chars.next(), Some(c) if c.is_ascii_lowercase() || c == '_')
            && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    };

    let parts: Vec<&str> = raw.split('.').collect();
    if parts.len() <= 2 && parts.iter().all(|&p| valid_part(p)) {
        Ok(())
    } else {
        Err(InvalidIdentifier(raw.to_string()))
    }
}

/// Resolves ids against a Postgres table with an integer `id` column.
#[derive(Clone)]
pub struct PgTableSource {
    pool: PgPool,
    query: String,
}

impl PgTableSource {
    pub fn new(
        pool: PgPool,
        table: &str,
        label_column: Option<&str>,
    ) -> Result<Self, InvalidIdentifier> {
        validate_identifier(table)?;
        let label = match label_column {
            Some(column) => {
                validate_identifier(column)?;
                format!("{column}::text")
            }
            None => "NULL::text".to_string(),
        };

        Ok(Self {
            pool,
            query: format!("SELECT {label} AS label FROM {table} WHERE id = $1"),
        })
    }
}

#[async_trait]
impl ContentSource for PgTableSource {
    #[instrument(name = "db.content.fetch", skip(self))]
    async fn fetch(
        &self,
        content_type: &ContentType,
        object_id: i64,
    ) -> Result<Option<ContentObject>, sqlx::Error> {
        let row = sqlx::query(&self.query)
            .bind(object_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| ContentObject {
            content_ref: ContentRef::new(content_type.clone(), object_id),
            label: row.get::<Option<String>, _>("label"),
        }))
    }
}

/// Content source backed by a map of id to label.
#[derive(Clone, Default)]
pub struct MemoryContentSource {
    objects: Arc<RwLock<HashMap<i64, Option<String>>>>,
}

impl MemoryContentSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_objects<I, S>(objects: I) -> Self
    where
        I: IntoIterator<Item = (i64, S)>,
        S: Into<String>,
    {
        let objects = objects
            .into_iter()
            .map(|(id, label)| (id, Some(label.into())))
            .collect();

        Self {
            objects: Arc::new(RwLock::new(objects)),
        }
    }

    pub async fn insert(&self, object_id: i64, label: Option<String>) {
        self.objects.write().await.insert(object_id, label);
    }

    pub async fn remove(&self, object_id: i64) -> bool {
        self.objects.write().await.remove(&object_id).is_some()
    }
}

#[async_trait]
impl ContentSource for MemoryContentSource {
    async fn fetch(
        &self,
        content_type: &ContentType,
        object_id: i64,
    ) -> Result<Option<ContentObject>, sqlx::Error> {
        Ok(self
            .objects
            .read()
            .await
            .get(&object_id)
            .map(|label| ContentObject {
                content_ref: ContentRef::new(content_type.clone(), object_id),
                label: label.clone(),
            }))
    }
}
