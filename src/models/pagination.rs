use serde::{Deserialize, Serialize};

/// `?page=` value of a list request: a 1-based number or `last`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSelector {
    #[default]
    First,
    Number(i64),
    Last,
}

impl PageSelector {
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        match raw.map(str::trim) {
            None | Some("") => Some(PageSelector::First),
            Some("last") => Some(PageSelector::Last),
            Some(n) => n.parse().ok().map(PageSelector::Number),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListFavoritesQuery {
    pub page: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Paginator {
    pub count: i64,
    pub num_pages: i64,
    pub per_page: i64,
}

/// Slice of the result set a page covers. `limit` is `None` when unpaginated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub number: i64,
    pub offset: i64,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid page")]
pub struct InvalidPage;

impl Paginator {
    /// `per_page == 0` disables pagination. An empty result still has one page.
    pub fn new(count: i64, per_page: usize) -> Self {
        let per_page = i64::try_from(per_page).unwrap_or(i64::MAX);
        let num_pages = if per_page == 0 || count <= 0 {
            1
        } else {
            (count - 1) / per_page + 1
        };

        Self {
            count,
            num_pages,
            per_page,
        }
    }

    pub fn window(&self, selector: PageSelector) -> Result<PageWindow, InvalidPage> {
        let number = match selector {
            PageSelector::First => 1,
            PageSelector::Last => self.num_pages,
            PageSelector::Number(n) => n,
        };

        if number < 1 || number > self.num_pages {
            return Err(InvalidPage);
        }

        if self.per_page == 0 {
            return Ok(PageWindow {
                number,
                offset: 0,
                limit: None,
            });
        }

        Ok(PageWindow {
            number,
            offset: (number - 1) * self.per_page,
            limit: Some(self.per_page),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub number: i64,
    pub has_next: bool,
    pub has_previous: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub object_list: Vec<T>,
    pub paginator: Paginator,
    pub page_obj: PageInfo,
    pub is_paginated: bool,
}

impl<T> Page<T> {
    pub fn new(object_list: Vec<T>, paginator: Paginator, number: i64) -> Self {
        Self {
            object_list,
            page_obj: PageInfo {
                number,
                has_next: number < paginator.num_pages,
                has_previous: number > 1,
            },
            is_paginated: paginator.per_page > 0 && paginator.num_pages > 1,
            paginator,
        }
    }
}
