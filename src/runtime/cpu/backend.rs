//! CPU backend: context, handle and staging

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use tracing::debug;

use super::device::CpuDevice;
use crate::dtype::Element;
use crate::error::{Error, Result};
use crate::runtime::{
    AccessMode, Backend, Device, DevicePtr, MemoryStaging, NativeHandle, PointerMode, RawRegion,
};

/// Minimum number of matrix columns per rayon task
const RAYON_MIN_LEN: usize = 4;

/// Reference CPU BLAS backend
///
/// Routines run on the host over the buffer storage itself; the memory
/// translator hands out host addresses.
#[derive(Clone, Debug, Default)]
pub struct CpuBackend;

/// CPU execution context
#[derive(Debug)]
pub struct CpuContext {
    device: CpuDevice,
    rayon_min_len: usize,
}

impl CpuContext {
    /// Device this context belongs to
    pub fn device(&self) -> &CpuDevice {
        &self.device
    }
}

/// Per-queue CPU handle
///
/// Records the pointer mode so the reference routines can enforce the
/// same scalar-location contract a device library has.
#[derive(Debug)]
pub struct CpuHandle {
    context: Arc<CpuContext>,
    pointer_mode: AtomicU8,
}

impl CpuHandle {
    /// Context this handle was created from
    pub fn context(&self) -> &Arc<CpuContext> {
        &self.context
    }

    #[inline]
    pub(crate) fn rayon_min_len(&self) -> usize {
        self.context.rayon_min_len
    }

    /// Fail unless the handle is in `expected` pointer mode
    pub(crate) fn expect_mode(&self, routine: &'static str, expected: PointerMode) -> Result<()> {
        let mode = PointerMode::from_u8(self.pointer_mode.load(Ordering::Acquire));
        if mode != expected {
            return Err(Error::native(
                routine,
                format!("pointer mode {mode:?}, expected {expected:?}"),
            ));
        }
        Ok(())
    }
}

impl NativeHandle for CpuHandle {
    fn set_pointer_mode(&self, mode: PointerMode) -> Result<()> {
        self.pointer_mode.store(mode as u8, Ordering::Release);
        Ok(())
    }

    fn pointer_mode(&self) -> Result<PointerMode> {
        Ok(PointerMode::from_u8(self.pointer_mode.load(Ordering::Acquire)))
    }
}

/// CPU staging: buffers are used in place
#[derive(Debug, Default)]
pub struct CpuStaging;

impl MemoryStaging for CpuStaging {
    fn translate<T: Element>(
        &mut self,
        region: RawRegion<T>,
        _mode: AccessMode,
    ) -> Result<DevicePtr<T>> {
        Ok(DevicePtr::from_addr(region.as_mut_ptr() as usize as u64))
    }

    fn finish(self) -> Result<()> {
        Ok(())
    }
}

impl Backend for CpuBackend {
    type Device = CpuDevice;
    type Context = CpuContext;
    type Handle = CpuHandle;
    type Staging = CpuStaging;

    fn name() -> &'static str {
        "cpu"
    }

    fn devices() -> Vec<CpuDevice> {
        vec![CpuDevice::new()]
    }

    fn default_device() -> CpuDevice {
        CpuDevice::new()
    }

    fn create_context(device: &CpuDevice) -> Result<Arc<CpuContext>> {
        if device.id() != 0 {
            return Err(Error::backend_unavailable(
                Self::name(),
                device.id(),
                "the host exposes a single CPU device",
            ));
        }
        debug!(device = %device.name(), "creating CPU context");
        Ok(Arc::new(CpuContext {
            device: device.clone(),
            rayon_min_len: RAYON_MIN_LEN,
        }))
    }

    fn create_handle(_device: &CpuDevice, context: &Arc<CpuContext>) -> Result<CpuHandle> {
        Ok(CpuHandle {
            context: context.clone(),
            pointer_mode: AtomicU8::new(PointerMode::Host as u8),
        })
    }

    fn begin_interop(_handle: &CpuHandle) -> Result<CpuStaging> {
        Ok(CpuStaging)
    }
}
