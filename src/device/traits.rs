//! Traits for device data sources.

use crate::device::snapshot::Snapshot;
use crate::error::Result;

/// A source of device snapshots.
///
/// The poll loop only depends on this trait, so tests can drive it with
/// scripted snapshots instead of a real meter.
pub trait DeviceClient {
    /// Fetch the current state of the device.
    ///
    /// Implementations own their connection lifecycle and any request
    /// timeout; callers do not add one.
    fn fetch_snapshot(&self) -> impl std::future::Future<Output = Result<Snapshot>> + Send;
}
