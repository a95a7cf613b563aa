//! OSB Registry - Catalog resolution against the external service registry.
//!
//! This crate fetches services and plans from the registry, resolves the
//! artifact types named in each plan's metadata, and fetches the validation
//! schema published next to every artifact in blob storage.
//!
//! # Architecture
//!
//! - **Registry** ([`registry`]): `ServiceRegistry` trait with HTTP and static implementations
//! - **Types** ([`types`]): Plan metadata to artifact locator resolution
//! - **Blob** ([`blob`]): `gs://` locator rewriting, schema and artifact download
//! - **Catalog** ([`catalog`]): All-or-nothing catalog enrichment
//! - **Errors** ([`error`]): Registry-specific error types
//!
//! # Example
//!
//! ```rust,no_run
//! use osb_core::AppConfig;
//! use osb_registry::{BlobClient, CatalogResolver, HttpRegistry};
//! use std::sync::Arc;
//!
//! # async fn run() -> osb_registry::Result<()> {
//! let config = AppConfig::default();
//! let registry = Arc::new(HttpRegistry::new(&config.registry)?);
//! let blobs = BlobClient::new(&config.blob)?;
//!
//! let resolver = CatalogResolver::new(registry, blobs);
//! let catalog = resolver.catalog().await?;
//! println!("{} services", catalog.services.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod blob;
pub mod catalog;
pub mod error;
pub mod registry;
pub mod types;

// Re-export commonly used types
pub use blob::{BlobClient, GCS_SCHEME};
pub use catalog::CatalogResolver;
pub use error::{RegistryError, Result};
pub use registry::{HttpRegistry, ServiceRegistry, StaticRegistry};
pub use types::resolve_types;
