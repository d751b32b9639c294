//! Core trait for BLAS backends

use std::sync::Arc;

use super::{Device, MemoryStaging, NativeHandle};
use crate::error::Result;

/// Core trait for BLAS backends
///
/// `Backend` abstracts over the native numerical libraries a queue can be
/// bound to. It uses static dispatch via generics: every routine is
/// monomorphized per backend, and a routine the backend cannot run for a
/// given element type fails to compile rather than at runtime.
///
/// # Associated Types
///
/// - `Device`: Identifies a specific compute unit (e.g., GPU 0, GPU 1)
/// - `Context`: Native execution context, one per device per platform
/// - `Handle`: Native stream plus library handle, one per queue
/// - `Staging`: Memory translation session scoped to one interop task
pub trait Backend: Clone + Send + Sync + 'static {
    /// Device identifier type
    type Device: Device;

    /// Native execution context for a device
    type Context: Send + Sync + 'static;

    /// Native handle owned by a queue
    type Handle: NativeHandle;

    /// Per-task memory translator
    type Staging: MemoryStaging;

    /// Human-readable name of this backend
    fn name() -> &'static str;

    /// Enumerate the devices this backend can drive
    ///
    /// Returns an empty list when the native driver is missing.
    fn devices() -> Vec<Self::Device>;

    /// Get the default device
    fn default_device() -> Self::Device;

    /// Create the native execution context for a device
    ///
    /// Returns `Err(BackendUnavailable)` when the driver refuses.
    fn create_context(device: &Self::Device) -> Result<Arc<Self::Context>>;

    /// Create a native handle (stream + library handle) bound to a context
    fn create_handle(device: &Self::Device, context: &Arc<Self::Context>) -> Result<Self::Handle>;

    /// Open a staging session for one interop task on the handle's stream
    fn begin_interop(handle: &Self::Handle) -> Result<Self::Staging>;
}
