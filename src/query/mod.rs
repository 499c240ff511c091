//! Typed query-parameter builder for entry and asset listings.
//!
//! The Delivery API accepts filtering, projection, ordering, and paging as
//! URL query parameters. [`Query`] collects them through typed methods and
//! renders the final pairs for the transport.

/// A typed query over entries or assets.
#[derive(Debug, Clone, Default)]
pub struct Query {
    params: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict entries to one content type.
    pub fn content_type(mut self, id: impl Into<String>) -> Self {
        self.params.push(("content_type".to_string(), id.into()));
        self
    }

    /// Project the response onto selected properties (e.g. `fields.title`).
    pub fn select<I, S>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let projection: Vec<String> = properties.into_iter().map(Into::into).collect();
        self.params.push(("select".to_string(), projection.join(",")));
        self
    }

    /// Equality filter on a property.
    pub fn field_equals(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((property.into(), value.into()));
        self
    }

    /// Inequality filter on a property.
    pub fn field_not_equals(
        mut self,
        property: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.params.push((format!("{}[ne]", property.into()), value.into()));
        self
    }

    /// Inclusion filter: the property matches any of the given values.
    pub fn field_in<I, S>(mut self, property: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let joined: Vec<String> = values.into_iter().map(Into::into).collect();
        self.params
            .push((format!("{}[in]", property.into()), joined.join(",")));
        self
    }

    /// Full-text search across all text fields.
    pub fn query_text(mut self, text: impl Into<String>) -> Self {
        self.params.push(("query".to_string(), text.into()));
        self
    }

    /// Order results by a property; prefix with `-` for descending.
    pub fn order(mut self, property: impl Into<String>) -> Self {
        self.params.push(("order".to_string(), property.into()));
        self
    }

    /// Page size.
    pub fn limit(mut self, limit: u32) -> Self {
        self.params.push(("limit".to_string(), limit.to_string()));
        self
    }

    /// Page offset.
    pub fn skip(mut self, skip: u32) -> Self {
        self.params.push(("skip".to_string(), skip.to_string()));
        self
    }

    /// How many levels of linked entries to deliver in `includes`.
    pub fn include_depth(mut self, depth: u8) -> Self {
        self.params.push(("include".to_string(), depth.to_string()));
        self
    }

    /// Deliver fields in one locale, or `*` for all locales.
    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.params.push(("locale".to_string(), locale.into()));
        self
    }

    /// Render the accumulated query-parameter pairs.
    pub fn to_params(&self) -> Vec<(String, String)> {
        self.params.clone()
    }
}
