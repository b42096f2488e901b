use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::instrument;

use super::ContentSource;
use crate::error::{AppError, AppResult};
use crate::models::{ContentObject, ContentRef, ContentType};

#[derive(Clone, Default)]
pub struct ContentRegistry {
    sources: BTreeMap<ContentType, Arc<dyn ContentSource>>,
}

impl ContentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `source` for `content_type`, replacing any earlier one.
    pub fn register<S: ContentSource>(mut self, content_type: ContentType, source: S) -> Self {
        tracing::debug!(content_type = %content_type, "Content type registered");
        self.sources.insert(content_type, Arc::new(source));
        self
    }

    pub fn get(&self, content_type: &ContentType) -> Option<&Arc<dyn ContentSource>> {
        self.sources.get(content_type)
    }

    pub fn is_registered(&self, content_type: &ContentType) -> bool {
        self.sources.contains_key(content_type)
    }

    pub fn content_types(&self) -> impl Iterator<Item = &ContentType> {
        self.sources.keys()
    }

    /// Unregistered types and missing objects are both not-found.
    #[instrument(name = "content.resolve", skip(self))]
    pub async fn resolve(&self, content: &ContentRef) -> AppResult<ContentObject> {
        let source = self
            .get(&content.content_type)
            .ok_or_else(|| AppError::NotFound("Unknown content type".to_string()))?;

        source
            .fetch(&content.content_type, content.object_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Object not found".to_string()))
    }
}
