//! Platform: device enumeration and the device-context cache

use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use super::queue::{Queue, QueueConfig};
use super::traits::{Backend, Device};
use crate::error::Result;

struct PlatformInner<B: Backend> {
    contexts: Mutex<HashMap<usize, Arc<B::Context>>>,
}

/// Entry point for one backend
///
/// A platform owns the native context of every device it has touched, at
/// most one per device, and creates queues bound to those devices. It is an
/// explicit object: independent platforms never share contexts, and clones
/// share the same cache.
///
/// # Example
///
/// ```
/// use blashal::runtime::Platform;
/// use blashal::runtime::cpu::CpuBackend;
///
/// let platform = Platform::<CpuBackend>::new();
/// let device = platform.default_device();
/// let queue = platform.queue(&device).unwrap();
/// queue.wait();
/// ```
pub struct Platform<B: Backend> {
    inner: Arc<PlatformInner<B>>,
}

impl<B: Backend> Clone for Platform<B> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<B: Backend> Default for Platform<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> fmt::Debug for Platform<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Platform")
            .field("backend", &B::name())
            .field("contexts", &self.context_count())
            .finish()
    }
}

impl<B: Backend> Platform<B> {
    /// Create a platform with an empty context cache
    pub fn new() -> Self {
        Self {
            inner: Arc::new(PlatformInner {
                contexts: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Backend name
    pub fn name(&self) -> &'static str {
        B::name()
    }

    /// Devices the backend can drive
    pub fn devices(&self) -> Vec<B::Device> {
        B::devices()
    }

    /// The backend's default device
    pub fn default_device(&self) -> B::Device {
        B::default_device()
    }

    /// Get or create the native context for a device
    ///
    /// Failures are not cached; a later call asks the backend again.
    pub fn context(&self, device: &B::Device) -> Result<Arc<B::Context>> {
        let mut contexts = self.inner.contexts.lock();
        if let Some(ctx) = contexts.get(&device.id()) {
            return Ok(ctx.clone());
        }

        let ctx = B::create_context(device)?;
        debug!(backend = B::name(), device = %device.name(), "device context created");
        contexts.insert(device.id(), ctx.clone());
        Ok(ctx)
    }

    /// Number of live device contexts
    pub fn context_count(&self) -> usize {
        self.inner.contexts.lock().len()
    }

    /// Create a deferred queue bound to `device`
    ///
    /// The device context is resolved lazily, on the first submission.
    pub fn queue(&self, device: &B::Device) -> Result<Queue<B>> {
        self.queue_with(device, QueueConfig::default())
    }

    /// Create a queue bound to `device` with explicit options
    pub fn queue_with(&self, device: &B::Device, config: QueueConfig) -> Result<Queue<B>> {
        Queue::new(self.clone(), device.clone(), config)
    }

    /// Create a deferred queue on the default device
    pub fn default_queue(&self) -> Result<Queue<B>> {
        self.queue(&B::default_device())
    }
}
