//! Shapes for the synchronization feed.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Parameters for a sync call.
#[derive(Debug, Clone, Default)]
pub struct SyncQuery {
    /// Start a fresh synchronization from scratch.
    pub initial: bool,
    /// Continuation token from a previous sync.
    pub sync_token: Option<String>,
    /// Restrict the feed to one entity type ("Entry", "Asset", "Deletion", ...).
    pub type_filter: Option<String>,
    /// Restrict entries to one content type (implies type filter "Entry").
    pub content_type: Option<String>,
}

impl SyncQuery {
    /// Query for an initial synchronization.
    pub fn initial() -> Self {
        Self {
            initial: true,
            ..Self::default()
        }
    }

    /// Query for a delta synchronization continuing from a token.
    pub fn delta(sync_token: impl Into<String>) -> Self {
        Self {
            sync_token: Some(sync_token.into()),
            ..Self::default()
        }
    }

    /// Restrict the feed to one entity type.
    pub fn with_type_filter(mut self, type_filter: impl Into<String>) -> Self {
        self.type_filter = Some(type_filter.into());
        self
    }

    /// Restrict entries to one content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Render the query-parameter pairs for the first page request.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(token) = &self.sync_token {
            params.push(("sync_token".to_string(), token.clone()));
            return params;
        }
        if self.initial {
            params.push(("initial".to_string(), "true".to_string()));
        }
        if let Some(content_type) = &self.content_type {
            params.push(("type".to_string(), "Entry".to_string()));
            params.push(("content_type".to_string(), content_type.clone()));
        } else if let Some(type_filter) = &self.type_filter {
            params.push(("type".to_string(), type_filter.clone()));
        }
        params
    }
}

/// Aggregated result of a full synchronization run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResult {
    #[serde(default)]
    pub entries: Vec<Value>,
    #[serde(default)]
    pub assets: Vec<Value>,
    #[serde(default)]
    pub deleted_entries: Vec<Value>,
    #[serde(default)]
    pub deleted_assets: Vec<Value>,
    /// Token to hand to the next delta sync.
    pub next_sync_token: String,
}
