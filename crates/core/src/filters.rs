use crate::models::SortOrder;
use std::sync::Arc;
use tokio::sync::watch;

/// Search, filter and sort selections. Tag and collection are never both set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    pub search_query: String,
    pub selected_tag_id: Option<String>,
    pub selected_collection_id: Option<String>,
    pub sort: SortOrder,
}

impl FilterState {
    pub fn is_searching(&self) -> bool {
        !self.search_query.trim().is_empty()
    }
}

/// Shared owner of the session's [`FilterState`].
///
/// Every setter publishes one whole new state, so subscribers never observe
/// a tag and a collection selected together.
#[derive(Debug, Clone)]
pub struct FilterStore {
    state: Arc<watch::Sender<FilterState>>,
}

impl Default for FilterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(FilterState::default());
        Self {
            state: Arc::new(state),
        }
    }

    pub fn snapshot(&self) -> FilterState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FilterState> {
        self.state.subscribe()
    }

    pub fn set_search_query(&self, query: impl Into<String>) {
        let query = query.into();
        self.state.send_modify(|state| state.search_query = query);
    }

    pub fn set_selected_tag_id(&self, tag_id: Option<String>) {
        self.state.send_modify(|state| {
            state.selected_tag_id = tag_id;
            state.selected_collection_id = None;
        });
    }

    pub fn set_selected_collection_id(&self, collection_id: Option<String>) {
        self.state.send_modify(|state| {
            state.selected_collection_id = collection_id;
            state.selected_tag_id = None;
        });
    }

    pub fn set_sort(&self, sort: SortOrder) {
        self.state.send_modify(|state| state.sort = sort);
    }

    /// Resets query, tag and collection. Sort is a display preference and stays.
    pub fn clear_filters(&self) {
        self.state.send_modify(|state| {
            state.search_query.clear();
            state.selected_tag_id = None;
            state.selected_collection_id = None;
        });
    }
}
