//! In-process operations boundary over the skill catalog.
//!
//! Exposes every catalog operation as a named method behind a registry
//! (`repos.*`, `skills.*`, `favorites.*`, `settings.*`, `index.build`) so a
//! transport or embedding application dispatches by name with JSON params.

pub mod methods;
pub mod protocol;
pub mod services;

pub use {
    methods::{MethodContext, MethodRegistry, Services},
    protocol::{error_codes, ErrorShape, ResponseFrame},
    services::{CatalogPaths, CatalogService, LiveCatalogService, NoopCatalogService, ServiceError},
};
