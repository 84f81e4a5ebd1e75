//! # API Shared
//!
//! Shared definitions for the depot API surface.
//!
//! Contains the health check service and its response type, used by the
//! REST crate and the server binary.

pub mod health;

pub use health::{HealthRes, HealthService};
