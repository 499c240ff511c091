//! DeliveryClient - public method surface of the library.
//!
//! One client per space/environment. Each method performs one logical
//! request; responses flow through the link resolver according to the
//! configured policy before being handed back.

use serde_json::Value;
use tracing::debug;

use crate::client::http::HttpTransport;
use crate::config::{ApiScope, ClientConfig};
use crate::error::{Error, Result};
use crate::query::Query;
use crate::resolver::{resolve, ResolveOptions};
use crate::sync;
use crate::types::{
    ContentType, ContentTypeCollection, LocaleCollection, ResourceCollection, Space, SyncQuery,
    SyncResult,
};

/// Client for the Delivery API of one space and environment.
#[derive(Debug, Clone)]
pub struct DeliveryClient {
    transport: HttpTransport,
}

impl DeliveryClient {
    /// Create a client. Fails synchronously on invalid configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self {
            transport: HttpTransport::new(config)?,
        })
    }

    fn config(&self) -> &ClientConfig {
        self.transport.config()
    }

    fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            remove_unresolved: self.config().remove_unresolved,
        }
    }

    /// Run a payload through the resolver per the configured policy.
    /// When `resolve_links` is off the raw payload is returned unchanged.
    fn apply_resolution(&self, raw: Value) -> Value {
        if !self.config().resolve_links {
            return raw;
        }
        resolve(raw, &self.resolve_options())
    }

    /// Resolve and type an already-fetched `{ items, includes }` payload.
    ///
    /// This is the public resolution entry point for payloads obtained out of
    /// band (cached responses, webhook bodies).
    pub fn parse_entries(&self, raw: Value) -> Result<ResourceCollection> {
        Ok(serde_json::from_value(self.apply_resolution(raw))?)
    }

    // ===== Space metadata =====

    /// Fetch the space this client is configured for.
    pub async fn get_space(&self) -> Result<Space> {
        let raw = self.transport.get(ApiScope::Space, "", &[]).await?;
        Ok(serde_json::from_value(raw)?)
    }

    /// Fetch one content type by id.
    pub async fn get_content_type(&self, id: &str) -> Result<ContentType> {
        let path = format!("content_types/{}", id);
        let raw = self
            .transport
            .get(ApiScope::Environment, &path, &[])
            .await
            .map_err(|e| self.map_not_found(e, id))?;
        Ok(serde_json::from_value(raw)?)
    }

    /// Fetch all content types of the environment.
    pub async fn get_content_types(&self, query: &Query) -> Result<ContentTypeCollection> {
        let raw = self
            .transport
            .get(ApiScope::Environment, "content_types", &query.to_params())
            .await?;
        Ok(serde_json::from_value(raw)?)
    }

    /// Fetch the locales configured for the environment.
    pub async fn get_locales(&self) -> Result<LocaleCollection> {
        let raw = self.transport.get(ApiScope::Environment, "locales", &[]).await?;
        Ok(serde_json::from_value(raw)?)
    }

    // ===== Entries =====

    /// Query entries; links resolve per the configured policy.
    pub async fn get_entries(&self, query: &Query) -> Result<ResourceCollection> {
        let raw = self
            .transport
            .get(ApiScope::Environment, "entries", &query.to_params())
            .await?;
        self.parse_entries(raw)
    }

    /// Fetch one entry by id.
    ///
    /// Issued as a `sys.id`-filtered entries query so the response carries
    /// the includes needed for link resolution.
    pub async fn get_entry(&self, id: &str) -> Result<Value> {
        let query = Query::new().field_equals("sys.id", id).limit(1);
        let collection = self.get_entries(&query).await?;

        collection.items.into_iter().next().ok_or_else(|| {
            Error::not_found(id, &self.config().space, &self.config().environment)
        })
    }

    // ===== Assets =====

    /// Query assets; links resolve per the configured policy.
    pub async fn get_assets(&self, query: &Query) -> Result<ResourceCollection> {
        let raw = self
            .transport
            .get(ApiScope::Environment, "assets", &query.to_params())
            .await?;
        self.parse_entries(raw)
    }

    /// Fetch one asset by id.
    pub async fn get_asset(&self, id: &str) -> Result<Value> {
        let path = format!("assets/{}", id);
        self.transport
            .get(ApiScope::Environment, &path, &[])
            .await
            .map_err(|e| self.map_not_found(e, id))
    }

    // ===== Sync =====

    /// Run the synchronization feed to exhaustion.
    ///
    /// Initial syncs get one final link-resolution pass over the aggregated
    /// entries and assets; delta syncs skip resolution since the feed does
    /// not guarantee the full graph is present.
    pub async fn sync(&self, query: &SyncQuery) -> Result<SyncResult> {
        let options = self.resolve_options();
        let resolve_options =
            (query.initial && self.config().resolve_links).then_some(&options);

        debug!(initial = query.initial, "starting sync run");
        sync::paginate(
            |params| {
                let transport = &self.transport;
                async move { transport.get_sync_page(&params).await }
            },
            query,
            resolve_options,
        )
        .await
    }

    /// Map a 404 from a single-entity endpoint to a structured NotFound.
    fn map_not_found(&self, error: Error, entity_id: &str) -> Error {
        match error {
            Error::Api { status: 404, .. } => {
                Error::not_found(entity_id, &self.config().space, &self.config().environment)
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> DeliveryClient {
        DeliveryClient::new(ClientConfig::new("my-space", "token")).unwrap()
    }

    #[test]
    fn test_invalid_config_rejected_synchronously() {
        let result = DeliveryClient::new(ClientConfig::new("my-space", ""));
        assert!(matches!(result.unwrap_err(), Error::Config(_)));
    }

    #[test]
    fn test_parse_entries_resolves_links() {
        let raw = json!({
            "total": 1,
            "items": [
                { "sys": { "type": "Entry", "id": "e1" },
                  "fields": { "animal": { "sys": { "type": "Link", "linkType": "Animal", "id": "oink" } } } }
            ],
            "includes": {
                "Animal": [ { "sys": { "id": "oink" }, "fields": { "name": "Pig" } } ]
            }
        });

        let collection = client().parse_entries(raw).unwrap();
        assert_eq!(collection.total, Some(1));
        assert_eq!(
            collection.items[0]["fields"]["animal"]["fields"]["name"],
            "Pig"
        );
    }

    #[test]
    fn test_parse_entries_skips_resolver_when_disabled() {
        let raw = json!({
            "items": [
                { "sys": { "type": "Entry", "id": "e1" },
                  "fields": { "animal": { "sys": { "type": "Link", "linkType": "Animal", "id": "oink" } } } }
            ],
            "includes": {
                "Animal": [ { "sys": { "id": "oink" }, "fields": { "name": "Pig" } } ]
            }
        });

        let config = ClientConfig::new("my-space", "token").with_resolve_links(false);
        let client = DeliveryClient::new(config).unwrap();
        let collection = client.parse_entries(raw.clone()).unwrap();

        // Marker untouched: the resolver was skipped entirely
        assert_eq!(
            collection.items[0]["fields"]["animal"],
            raw["items"][0]["fields"]["animal"]
        );
    }

    #[test]
    fn test_parse_entries_removal_policy() {
        let raw = json!({
            "items": [
                { "sys": { "type": "Entry", "id": "e1" },
                  "fields": { "ghost": { "sys": { "type": "Link", "linkType": "Entry", "id": "gone" } } } }
            ]
        });

        let config = ClientConfig::new("my-space", "token").with_remove_unresolved(true);
        let client = DeliveryClient::new(config).unwrap();
        let collection = client.parse_entries(raw).unwrap();

        let fields = collection.items[0]["fields"].as_object().unwrap();
        assert!(!fields.contains_key("ghost"));
    }

    #[test]
    fn test_map_not_found() {
        let client = client();
        let mapped = client.map_not_found(Error::api(404, "Not Found", "{}"), "nyancat");
        match mapped {
            Error::NotFound {
                entity_id,
                space,
                environment,
            } => {
                assert_eq!(entity_id, "nyancat");
                assert_eq!(space, "my-space");
                assert_eq!(environment, "master");
            }
            _ => panic!("Expected NotFound error"),
        }

        // Other statuses pass through unchanged
        let passthrough = client.map_not_found(Error::api(500, "Internal Server Error", ""), "x");
        assert!(matches!(passthrough, Error::Api { status: 500, .. }));
    }
}
