//! Query state for the list screen.
//!
//! The tuple of pagination/search/filter values fully determines the next
//! list request. It is mutated only by explicit user actions; any filter
//! change invalidates the pagination position and snaps back to page 1.

/// Rows per page, fixed per screen.
pub const PAGE_SIZE: u32 = 10;

/// Fixed descending-recency ordering for every list request.
pub const ORDERING: &str = "-last_updated_at";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    pub page: u32,
    pub page_size: u32,
    /// Free-text search; empty means unfiltered.
    pub search: String,
    /// Status filter wire value; empty means all statuses.
    pub status: String,
    /// Category id filter; empty means all categories.
    pub category: String,
}

/// Partial filter update. `None` fields are left unchanged; `Some("")`
/// clears that filter.
#[derive(Debug, Clone, Default)]
pub struct FilterPatch {
    pub search: Option<String>,
    pub status: Option<String>,
    pub category: Option<String>,
}

impl QueryState {
    pub fn new() -> Self {
        Self {
            page: 1,
            page_size: PAGE_SIZE,
            search: String::new(),
            status: String::new(),
            category: String::new(),
        }
    }

    /// Merge a filter change and reset to the first page.
    pub fn set_filter(&mut self, patch: FilterPatch) {
        if let Some(search) = patch.search {
            self.search = search.trim().to_string();
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        self.page = 1;
    }

    /// Jump to a page without touching the filters. Page numbers are
    /// 1-based; zero is floored.
    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    pub fn prev_page(&mut self) {
        if self.page > 1 {
            self.page -= 1;
        }
    }

    pub fn next_page(&mut self) {
        self.page += 1;
    }

    /// Serialize into request parameters, deterministically ordered.
    /// Empty filters are omitted; page, page size, and ordering are always
    /// present.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(6);
        if !self.search.is_empty() {
            params.push(("search", self.search.clone()));
        }
        if !self.status.is_empty() {
            params.push(("status", self.status.clone()));
        }
        if !self.category.is_empty() {
            params.push(("category", self.category.clone()));
        }
        params.push(("page", self.page.to_string()));
        params.push(("page_size", self.page_size.to_string()));
        params.push(("ordering", ORDERING.to_string()));
        params
    }
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_change_resets_page() {
        let mut query = QueryState::new();
        query.set_page(5);
        query.set_filter(FilterPatch {
            status: Some("active".into()),
            ..Default::default()
        });
        assert_eq!(query.page, 1);
        assert_eq!(query.status, "active");
    }

    #[test]
    fn test_page_change_preserves_filters() {
        let mut query = QueryState::new();
        query.set_filter(FilterPatch {
            search: Some("kệ".into()),
            category: Some("3".into()),
            ..Default::default()
        });
        query.set_page(4);
        assert_eq!(query.page, 4);
        assert_eq!(query.search, "kệ");
        assert_eq!(query.category, "3");
    }

    #[test]
    fn test_patch_leaves_unnamed_fields_alone() {
        let mut query = QueryState::new();
        query.set_filter(FilterPatch {
            search: Some("trà".into()),
            ..Default::default()
        });
        query.set_filter(FilterPatch {
            status: Some("inactive".into()),
            ..Default::default()
        });
        assert_eq!(query.search, "trà");
        assert_eq!(query.status, "inactive");
    }

    #[test]
    fn test_empty_patch_value_clears_filter() {
        let mut query = QueryState::new();
        query.set_filter(FilterPatch {
            status: Some("active".into()),
            ..Default::default()
        });
        query.set_filter(FilterPatch {
            status: Some(String::new()),
            ..Default::default()
        });
        assert_eq!(query.status, "");
    }

    #[test]
    fn test_search_is_trimmed() {
        let mut query = QueryState::new();
        query.set_filter(FilterPatch {
            search: Some("  chai nước  ".into()),
            ..Default::default()
        });
        assert_eq!(query.search, "chai nước");
    }

    #[test]
    fn test_params_omit_empty_filters() {
        let query = QueryState::new();
        let params = query.to_params();
        assert_eq!(
            params,
            vec![
                ("page", "1".to_string()),
                ("page_size", "10".to_string()),
                ("ordering", "-last_updated_at".to_string()),
            ]
        );
    }

    #[test]
    fn test_params_deterministic_order() {
        let mut query = QueryState::new();
        query.set_filter(FilterPatch {
            search: Some("a".into()),
            status: Some("active".into()),
            category: Some("7".into()),
        });
        query.set_page(2);
        let keys: Vec<&str> = query.to_params().iter().map(|(k, _)| *k).collect();
        assert_eq!(
            keys,
            vec!["search", "status", "category", "page", "page_size", "ordering"]
        );
    }

    #[test]
    fn test_prev_page_floors_at_one() {
        let mut query = QueryState::new();
        query.prev_page();
        assert_eq!(query.page, 1);
        query.next_page();
        query.next_page();
        query.prev_page();
        assert_eq!(query.page, 2);
    }

    #[test]
    fn test_set_page_floors_zero() {
        let mut query = QueryState::new();
        query.set_page(0);
        assert_eq!(query.page, 1);
    }
}
