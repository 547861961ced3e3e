use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub const DEFAULT_PAGE_SIZE: u32 = 50;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TagRef {
    pub id: String,
    pub name: String,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Artifact {
    pub id: String,
    pub plugin_type: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub thumbnail_path: Option<String>,
    pub captured_at: DateTime<Utc>,
    pub source_url: Option<String>,
    pub source_domain: Option<String>,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub importance: i64,
    #[serde(default)]
    pub tags: Vec<TagRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub color: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub artifact_count: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Collection {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub artifact_count: Option<u64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    CapturedAtDesc,
    CapturedAtAsc,
    TitleAsc,
    ImportanceDesc,
}

impl SortOrder {
    pub const ALL: [SortOrder; 4] = [
        SortOrder::CapturedAtDesc,
        SortOrder::CapturedAtAsc,
        SortOrder::TitleAsc,
        SortOrder::ImportanceDesc,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::CapturedAtDesc => "captured_at_desc",
            SortOrder::CapturedAtAsc => "captured_at_asc",
            SortOrder::TitleAsc => "title_asc",
            SortOrder::ImportanceDesc => "importance_desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        SortOrder::ALL
            .into_iter()
            .find(|order| order.as_str() == value)
            .ok_or_else(|| format!("unknown sort order: {value}"))
    }
}

/// Parameters of `GET /api/artifacts`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListParams {
    pub sort: SortOrder,
    pub tag_id: Option<String>,
    pub collection_id: Option<String>,
    pub is_archived: bool,
    pub limit: u32,
    pub offset: u32,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            sort: SortOrder::default(),
            tag_id: None,
            collection_id: None,
            is_archived: false,
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

impl ListParams {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("sort", self.sort.to_string())];
        if let Some(tag_id) = &self.tag_id {
            pairs.push(("tag_id", tag_id.clone()));
        }
        if let Some(collection_id) = &self.collection_id {
            pairs.push(("collection_id", collection_id.clone()));
        }
        pairs.push(("is_archived", self.is_archived.to_string()));
        pairs.push(("limit", self.limit.to_string()));
        pairs.push(("offset", self.offset.to_string()));
        pairs
    }
}

/// Opaque token of one in-flight ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlaceholderId(Uuid);

impl PlaceholderId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlaceholderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlaceholderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GridItem {
    Placeholder { id: PlaceholderId },
    Artifact { data: Artifact },
}

impl GridItem {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, GridItem::Placeholder { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::{Artifact, ListParams, SortOrder};

    #[test]
    fn sort_order_uses_wire_names() -> Result<(), Box<dyn std::error::Error>> {
        assert_eq!(SortOrder::ImportanceDesc.to_string(), "importance_desc");
        assert_eq!("title_asc".parse::<SortOrder>()?, SortOrder::TitleAsc);
        assert!("newest".parse::<SortOrder>().is_err());
        assert_eq!(
            serde_json::to_string(&SortOrder::CapturedAtAsc)?,
            "\"captured_at_asc\""
        );
        Ok(())
    }

    #[test]
    fn list_params_default_to_first_unarchived_page() {
        let pairs = ListParams::default().query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("sort", "captured_at_desc".to_string()),
                ("is_archived", "false".to_string()),
                ("limit", "50".to_string()),
                ("offset", "0".to_string()),
            ]
        );
    }

    #[test]
    fn artifact_parses_server_card() -> Result<(), Box<dyn std::error::Error>> {
        let raw = r##"{
            "id": "a1",
            "plugin_type": "webpage",
            "title": "Example",
            "excerpt": null,
            "thumbnail_path": null,
            "captured_at": "2024-05-01T12:00:00.123456+00:00",
            "source_url": "https://example.com",
            "source_domain": "example.com",
            "is_archived": false,
            "is_read": false,
            "importance": 0,
            "tags": [{"id": "t1", "name": "rust", "color": "#ff0000"}]
        }"##;

        let artifact: Artifact = serde_json::from_str(raw)?;
        assert_eq!(artifact.tags.len(), 1);
        assert_eq!(artifact.source_domain.as_deref(), Some("example.com"));
        Ok(())
    }
}
