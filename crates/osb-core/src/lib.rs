//! OSB Core - Foundation crate for the service broker bridge.
//!
//! This crate provides the broker data model, deterministic resource naming,
//! error handling and configuration management that the other bridge crates
//! depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Catalog, plan, request/response and binding records
//! - [`naming`] - Deterministic cluster resource names
//!
//! # Example
//!
//! ```rust
//! use osb_core::{resource_name, AppConfig, ResourceKind};
//!
//! let config = AppConfig::default();
//! assert_eq!(config.storage.namespace, "default");
//!
//! let name = resource_name("abc-123-def", ResourceKind::ServiceInstance);
//! assert_eq!(name, "cf-i-abc123def");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod naming;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, BlobConfig, RegistryConfig, StagingConfig, StorageConfig};
pub use error::{ConfigError, ConfigResult, CoreError, Result};
pub use naming::{resource_name, ResourceKind};
pub use types::{
    Binding, BindingCondition, BindingSpec, BindingRequest, BindingStatus, Catalog,
    CreateServiceBindingResponse, CreateServiceInstanceResponse, Namespace, ObjectMeta,
    ObjectReference, PlanMetadata, Schema, Schemas, Service, ServiceInstanceRequest, ServicePlan,
    Types, BINDING_TYPE_KEY, INSTANCE_TYPE_KEY,
};
