//! Metric schema, instruments and snapshot projection.
//!
//! This module owns everything the scrape endpoint exposes: the static schema
//! of known device fields, the registry holding one instrument per field, and
//! the projection that writes snapshot values into those instruments.

pub mod projection;
pub mod registry;
pub mod schema;

// Re-export commonly used items
pub use projection::project;
pub use registry::{InfoMetric, Instrument, MetricRegistry};
pub use schema::{MetricKind, SchemaEntry, SCHEMA};
