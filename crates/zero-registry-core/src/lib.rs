//! # zero-registry-core
//!
//! Identity registry and delegation service.
//!
//! This crate is responsible for:
//! - Identity registration, display names and backup addresses
//! - Named attributes and their time-bounded verification
//! - Permission-scoped, time-bounded delegations between identities
//! - The append-only activity trail written alongside every mutation
//!
//! Storage, logical time and caller authentication are supplied by the host
//! through [`zero_registry_storage::Storage`], [`LogicalClock`] and
//! [`CallerContext`].

#![warn(clippy::all)]

pub mod bootstrap;
pub mod clock;
pub mod config;
pub mod constants;
pub mod errors;
mod service;
pub mod telemetry;
pub mod traits;
pub mod types;
pub mod validation;


pub use bootstrap::{open_registry, DurableRegistry};
pub use clock::{LogicalClock, ManualClock, SystemClock};
pub use config::RegistryConfig;
pub use errors::{ErrorKind, RegistryError, Result};
pub use service::RegistryService;
pub use traits::{EventPublisher, IdentityRegistry, NoOpEventPublisher};
pub use types::*;
