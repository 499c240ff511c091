//! ContentHub Delivery API client - Rust Implementation
//!
//! A read-only client for the ContentHub Content Delivery API. It
//! authenticates, queries structured content (entries, assets, content
//! types, locales), paginates the synchronization feed, and resolves
//! cross-references between returned objects client-side.
//!
//! # Architecture
//!
//! 1. **Client Layer** (`client`) - HTTP transport, retry, and the public
//!    `DeliveryClient` method surface
//! 2. **Resolver** (`resolver`) - the link-resolution engine that rewrites
//!    reference markers in a response into the referenced objects
//! 3. **Sync Driver** (`sync`) - continuation-token pagination over the
//!    synchronization feed
//! 4. **Support Modules** - configuration, typed query builder, wire types,
//!    errors
//!
//! # Features
//!
//! - **Link Resolution**: cycle-safe rewriting of entry/asset references,
//!   including arrays of links and locale-keyed fields
//! - **Sync Feed**: initial and delta synchronization with token handoff
//! - **Typed Queries**: builder for select projection, filters, and paging

pub mod client;
pub mod config;
pub mod error;
pub mod query;
pub mod resolver;
pub mod sync;
pub mod types;

pub use client::DeliveryClient;
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use query::Query;
pub use resolver::{resolve, ResolveOptions};

/// Library version reported in the user agent.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default Delivery API host.
pub const DEFAULT_HOST: &str = "cdn.contenthub.io";

/// Default environment when none is configured.
pub const DEFAULT_ENVIRONMENT: &str = "master";
