//! OSB Controller - Service instance and binding lifecycle.
//!
//! The controller answers the broker API operations. It resolves plans to
//! chart locators through the registry, stages charts in scoped temporary
//! files, derives deterministic resource names, and hands the actual
//! provisioning to a [`Reifier`].
//!
//! # Architecture
//!
//! - **Controller** ([`controller`]): `BrokerController` trait, the broker-facing surface
//! - **Lifecycle** ([`lifecycle`]): `LifecycleController`, the registry-backed implementation
//! - **Reifier** ([`reifier`]): Pluggable provisioning delegate
//! - **Staging** ([`staging`]): Charts downloaded into self-deleting temp files
//! - **Errors** ([`error`]): Controller-specific error types

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod controller;
pub mod error;
pub mod lifecycle;
pub mod reifier;
pub mod staging;

// Re-export commonly used types
pub use controller::BrokerController;
pub use error::{ControllerError, ReifierError, Result};
pub use lifecycle::LifecycleController;
pub use reifier::Reifier;
pub use staging::StagedArtifact;
