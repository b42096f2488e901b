use super::{ContentType, Favorite};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FavoriteOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

impl FavoriteOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            FavoriteOrder::NewestFirst => "created_at DESC, id DESC",
            FavoriteOrder::OldestFirst => "created_at ASC, id ASC",
        }
    }

    pub fn sort(self, favorites: &mut [Favorite]) {
        favorites.sort_by(|a, b| {
            let newest_first = b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id));
            match self {
                FavoriteOrder::NewestFirst => newest_first,
                FavoriteOrder::OldestFirst => newest_first.reverse(),
            }
        });
    }
}

/// Which of a user's favorites a listing covers, and in what order.
///
/// Always applied on top of the owner filter; an empty `content_types`
/// matches every type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FavoriteQuery {
    pub content_types: Vec<ContentType>,
    pub order: FavoriteOrder,
}

impl FavoriteQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_model(content_type: ContentType) -> Self {
        Self::for_types([content_type])
    }

    pub fn for_types(content_types: impl IntoIterator<Item = ContentType>) -> Self {
        Self {
            content_types: content_types.into_iter().collect(),
            order: FavoriteOrder::default(),
        }
    }

    pub fn oldest_first(mut self) -> Self {
        self.order = FavoriteOrder::OldestFirst;
        self
    }

    pub fn matches(&self, favorite: &Favorite) -> bool {
        self.content_types.is_empty() || self.content_types.contains(&favorite.content_type)
    }

    pub(crate) fn content_type_names(&self) -> Vec<String> {
        self.content_types
            .iter()
            .map(|ct| ct.as_str().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn favorite(id: i64, content_type: &str) -> Favorite {
        Favorite {
            id,
            user_id: 1,
            content_type: ContentType::new(content_type).unwrap(),
            object_id: id,
            created_at: datetime!(2024-01-15 10:30:00 UTC),
        }
    }

    #[test]
    fn test_query_matches_types() {
        let article = favorite(1, "blog.article");
        let product = favorite(2, "shop.product");

        assert!(FavoriteQuery::all().matches(&article));
        assert!(FavoriteQuery::all().matches(&product));

        let articles = FavoriteQuery::for_model(ContentType::new("blog.article").unwrap());
        assert!(articles.matches(&article));
        assert!(!articles.matches(&product));
    }

    #[test]
    fn test_order_breaks_ties_by_id() {
        let mut favorites = vec![
            favorite(2, "blog.article"),
            favorite(3, "blog.article"),
            favorite(1, "blog.article"),
        ];

        FavoriteOrder::NewestFirst.sort(&mut favorites);
        assert_eq!(favorites.iter().map(|f| f.id).collect::<Vec<_>>(), vec![3, 2, 1]);

        FavoriteOrder::OldestFirst.sort(&mut favorites);
        assert_eq!(favorites.iter().map(|f| f.id).collect::<Vec<_>>(), vec![1, 2, 3]);
    }
}
