pub mod config;
pub mod drag;
pub mod drop_zone;
pub mod error;
pub mod extractor;
pub mod filters;
pub mod grid;
pub mod ingest;
pub mod models;
pub mod query;
pub mod stores;
pub mod traits;

#[cfg(test)]
mod testing;

pub use config::ClientConfig;
pub use drag::{DragEvent, DragOutcome, DragSession, DragTracker};
pub use drop_zone::DropZone;
pub use error::{ClientError, Result};
pub use extractor::{extract_url, DropPayload};
pub use filters::{FilterState, FilterStore};
pub use grid::{compose_grid, GridView};
pub use ingest::{IngestCoordinator, IngestHandle, PendingSet};
pub use models::{
    Artifact, Collection, GridItem, ListParams, PlaceholderId, SortOrder, Tag, TagRef,
};
pub use query::{Artifacts, BrowseKey, CacheInvalidator, QueryMode, QueryRouter, RetrievalIntent};
pub use stores::RestBackend;
pub use traits::ArtifactBackend;
