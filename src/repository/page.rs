//! A single page of typed query results

/// One page of results plus the cursor for the next page
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Items in service order
    pub items: Vec<T>,

    /// Continuation token; `None` on the last page
    pub continuation_token: Option<String>,
}

impl<T> Page<T> {
    /// Whether more pages follow
    pub fn has_more(&self) -> bool {
        self.continuation_token.is_some()
    }

    /// Number of items in this page
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether this page holds no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            continuation_token: None,
        }
    }
}
