//! Pagination driver for the synchronization feed.
//!
//! The sync endpoint delivers changes page by page. Every non-terminal page
//! carries a `nextPageUrl` whose `sync_token` query parameter continues the
//! feed; the terminal page carries a `nextSyncUrl` whose token starts the
//! next delta sync. Pages are strictly sequential: each request depends on
//! the token returned by the previous one.
//!
//! The driver is generic over the page-fetch effect so it can be exercised
//! against canned pages without a server.

use std::future::Future;

use serde_json::{json, Value};
use tracing::debug;

use crate::error::Result;
use crate::resolver::{resolve, ResolveOptions};
use crate::types::{SyncQuery, SyncResult};

/// Extract the `sync_token` query parameter from a page URL.
fn extract_sync_token(url: &str) -> Option<String> {
    let parsed = reqwest::Url::parse(url).ok()?;
    parsed
        .query_pairs()
        .find(|(key, _)| key == "sync_token")
        .map(|(_, value)| value.into_owned())
}

/// Drive the sync feed to exhaustion and aggregate the result.
///
/// `fetch_page` performs one page request with the given query parameters.
/// When `resolve_options` is `Some`, the aggregated items get a single final
/// resolution pass; delta syncs must pass `None` since the full graph is not
/// guaranteed to be present in the feed.
pub async fn paginate<F, Fut>(
    mut fetch_page: F,
    query: &SyncQuery,
    resolve_options: Option<&ResolveOptions>,
) -> Result<SyncResult>
where
    F: FnMut(Vec<(String, String)>) -> Fut,
    Fut: Future<Output = Result<Value>>,
{
    let mut items: Vec<Value> = Vec::new();
    let mut params = query.to_params();
    let mut last_token = query.sync_token.clone();
    let mut pages = 0u32;

    let final_page = loop {
        let page = fetch_page(params).await?;
        pages += 1;

        if let Some(page_items) = page.get("items").and_then(Value::as_array) {
            items.extend(page_items.iter().cloned());
        }

        let next_token = page
            .get("nextPageUrl")
            .and_then(Value::as_str)
            .and_then(extract_sync_token);

        match next_token {
            // An absent or repeating token marks the terminal page.
            Some(token) if last_token.as_deref() != Some(token.as_str()) => {
                params = vec![("sync_token".to_string(), token.clone())];
                last_token = Some(token);
            }
            _ => break page,
        }
    };

    let next_sync_token = final_page
        .get("nextSyncUrl")
        .and_then(Value::as_str)
        .and_then(extract_sync_token)
        .or(last_token)
        .unwrap_or_default();

    debug!(pages, items = items.len(), "sync feed exhausted");

    if let Some(options) = resolve_options {
        let resolved = resolve(json!({ "items": items }), options);
        items = match resolved.get("items").and_then(Value::as_array) {
            Some(resolved_items) => resolved_items.clone(),
            None => Vec::new(),
        };
    }

    Ok(assemble(items, next_sync_token))
}

/// Partition aggregated feed items by their system type.
fn assemble(items: Vec<Value>, next_sync_token: String) -> SyncResult {
    let mut result = SyncResult {
        entries: Vec::new(),
        assets: Vec::new(),
        deleted_entries: Vec::new(),
        deleted_assets: Vec::new(),
        next_sync_token,
    };

    for item in items {
        let kind = item
            .get("sys")
            .and_then(|sys| sys.get("type"))
            .and_then(Value::as_str)
            .unwrap_or_default();
        match kind {
            "Entry" => result.entries.push(item),
            "Asset" => result.assets.push(item),
            "DeletedEntry" => result.deleted_entries.push(item),
            "DeletedAsset" => result.deleted_assets.push(item),
            other => debug!(kind = other, "skipping unrecognized sync item"),
        }
    }

    result
}
