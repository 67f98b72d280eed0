//! Core types and service wiring for the Ecoleta collection point registration client.

/// Configuration loading and validation.
pub mod config;
/// Registration form state and reducer.
pub mod form;
/// Map viewport math.
pub mod map;
/// Domain models and identifiers.
pub mod model;
/// Bundle of port implementations used by the service.
pub mod plugin;
/// Traits describing the remote services.
pub mod ports;
/// High-level service facade used by clients.
pub mod service;

pub use model::*;
pub use plugin::*;
pub use ports::*;
pub use service::*;
