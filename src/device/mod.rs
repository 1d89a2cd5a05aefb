//! Access to the HomeWizard Energy device.
//!
//! This module contains the HTTP client for the device's local API, the
//! snapshot type produced by each poll, and the [`DeviceClient`] trait the
//! poll loop is written against.

pub mod client;
pub mod snapshot;
pub mod traits;

// Re-export commonly used items
pub use client::HomeWizardClient;
pub use snapshot::{FieldValue, Snapshot};
pub use traits::DeviceClient;
