//! OSB Storage - Binding records in the cluster object store.
//!
//! Bindings are persisted as unstructured objects through a watch-based
//! client. The adapter stamps the object kind and API version, converts
//! between the typed [`Binding`](osb_core::Binding) and its unstructured
//! form, and scopes every call to one namespace.
//!
//! # Architecture
//!
//! - **Unstructured** ([`unstructured`]): Generic JSON object representation
//! - **Watch** ([`watch`]): `Watcher` / `ResourceClient` traits over the object store
//! - **Memory** ([`memory`]): In-process `Watcher` for local runs and tests
//! - **Binding** ([`binding`]): `BindingStorage` trait and the `BindingStore` adapter
//! - **Errors** ([`error`]): Storage-specific error types
//!
//! # Example
//!
//! ```rust
//! use osb_core::{Binding, Namespace};
//! use osb_storage::{BindingStorage, BindingStore, MemoryWatcher};
//! use std::sync::Arc;
//!
//! # async fn run() -> osb_storage::Result<()> {
//! let store = BindingStore::new(Arc::new(MemoryWatcher::new()), Namespace::default());
//! store.create(Binding::new("cf-b-1", "cf-i-1")).await?;
//! assert_eq!(store.list().await?.len(), 1);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod binding;
pub mod error;
pub mod memory;
pub mod unstructured;
pub mod watch;

// Re-export commonly used types
pub use binding::{BindingStorage, BindingStore};
pub use error::{Result, StorageError};
pub use memory::MemoryWatcher;
pub use unstructured::Unstructured;
pub use watch::{ResourceClient, Watcher, FULL_API_VERSION};
