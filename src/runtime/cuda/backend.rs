//! CUDA backend: context, handle and staging
//!
//! Buffers live in host memory. For each interop task the staging session
//! allocates stream-ordered device memory for every access, uploads the
//! contents when the access reads, and downloads them when it writes. The
//! session synchronizes the queue's stream before publishing results.

use cudarc::cublas::CudaBlas;
use cudarc::cublas::sys::{cublasPointerMode_t, cublasStatus_t};
use cudarc::driver::safe::{CudaContext, CudaStream};
use cudarc::driver::sys::CUresult;
use std::ffi::c_void;
use std::sync::Arc;
use tracing::{debug, warn};

use super::device::{self, CudaDevice};
use crate::dtype::Element;
use crate::error::{Error, Result};
use crate::runtime::{
    AccessMode, Backend, Device, DevicePtr, MemoryStaging, NativeHandle, PointerMode, RawRegion,
};

/// NVIDIA cuBLAS backend
#[derive(Clone, Debug, Default)]
pub struct CudaBackend;

/// Per-queue CUDA handle: stream plus cuBLAS handle bound to it
pub struct CudaHandle {
    device: CudaDevice,
    context: Arc<CudaContext>,
    stream: Arc<CudaStream>,
    blas: CudaBlas,
}

impl std::fmt::Debug for CudaHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CudaHandle")
            .field("device", &self.device)
            .finish_non_exhaustive()
    }
}

impl CudaHandle {
    /// Device this handle runs on
    pub fn device(&self) -> &CudaDevice {
        &self.device
    }

    /// CUDA context for this device
    #[inline]
    pub fn context(&self) -> &Arc<CudaContext> {
        &self.context
    }

    /// Stream on which every routine of the queue launches
    #[inline]
    pub fn stream(&self) -> &Arc<CudaStream> {
        &self.stream
    }

    /// cuBLAS handle
    #[inline]
    pub fn cublas(&self) -> &CudaBlas {
        &self.blas
    }

    #[inline]
    pub(super) fn raw(&self) -> cudarc::cublas::sys::cublasHandle_t {
        *self.blas.handle()
    }
}

/// Map a cuBLAS status to an error naming the native routine
pub(super) fn check(routine: &'static str, status: cublasStatus_t) -> Result<()> {
    if status != cublasStatus_t::CUBLAS_STATUS_SUCCESS {
        return Err(Error::native(routine, status));
    }
    Ok(())
}

impl NativeHandle for CudaHandle {
    fn set_pointer_mode(&self, mode: PointerMode) -> Result<()> {
        let mode = match mode {
            PointerMode::Host => cublasPointerMode_t::CUBLAS_POINTER_MODE_HOST,
            PointerMode::Device => cublasPointerMode_t::CUBLAS_POINTER_MODE_DEVICE,
        };
        check("cublasSetPointerMode_v2", unsafe {
            cudarc::cublas::sys::cublasSetPointerMode_v2(self.raw(), mode)
        })
    }

    fn pointer_mode(&self) -> Result<PointerMode> {
        let mut mode = cublasPointerMode_t::CUBLAS_POINTER_MODE_HOST;
        check("cublasGetPointerMode_v2", unsafe {
            cudarc::cublas::sys::cublasGetPointerMode_v2(self.raw(), &mut mode)
        })?;
        Ok(match mode {
            cublasPointerMode_t::CUBLAS_POINTER_MODE_DEVICE => PointerMode::Device,
            _ => PointerMode::Host,
        })
    }
}

struct Staged {
    device: u64,
    host: *mut u8,
    bytes: usize,
    write_back: bool,
}

/// Staging session for one interop task
pub struct CudaStaging {
    stream: Arc<CudaStream>,
    staged: Vec<Staged>,
}

impl CudaStaging {
    fn release(&mut self) {
        for s in self.staged.drain(..) {
            let result = unsafe { cudarc::driver::sys::cuMemFreeAsync(s.device, self.stream.cu_stream()) };
            if result != CUresult::CUDA_SUCCESS {
                warn!(ptr = s.device, ?result, "cuMemFreeAsync failed");
            }
        }
    }
}

impl MemoryStaging for CudaStaging {
    fn translate<T: Element>(
        &mut self,
        region: RawRegion<T>,
        mode: AccessMode,
    ) -> Result<DevicePtr<T>> {
        let bytes = region.size_in_bytes();
        let stream = self.stream.cu_stream();

        let mut ptr: u64 = 0;
        let result = unsafe { cudarc::driver::sys::cuMemAllocAsync(&mut ptr, bytes, stream) };
        if result != CUresult::CUDA_SUCCESS {
            return Err(Error::native("cuMemAllocAsync", result));
        }
        self.staged.push(Staged {
            device: ptr,
            host: region.as_mut_ptr() as *mut u8,
            bytes,
            write_back: mode.writes(),
        });

        if mode.reads() {
            let result = unsafe {
                cudarc::driver::sys::cuMemcpyHtoDAsync_v2(
                    ptr,
                    region.as_mut_ptr() as *const c_void,
                    bytes,
                    stream,
                )
            };
            if result != CUresult::CUDA_SUCCESS {
                return Err(Error::native("cuMemcpyHtoDAsync_v2", result));
            }
        }

        Ok(DevicePtr::from_addr(ptr))
    }

    fn finish(mut self) -> Result<()> {
        let stream = self.stream.cu_stream();
        for s in self.staged.iter().filter(|s| s.write_back) {
            let result = unsafe {
                cudarc::driver::sys::cuMemcpyDtoHAsync_v2(s.host as *mut c_void, s.device, s.bytes, stream)
            };
            if result != CUresult::CUDA_SUCCESS {
                return Err(Error::native("cuMemcpyDtoHAsync_v2", result));
            }
        }

        self.stream
            .synchronize()
            .map_err(|e| Error::native("cuStreamSynchronize", e))?;
        self.release();
        Ok(())
    }
}

impl Drop for CudaStaging {
    fn drop(&mut self) {
        if !self.staged.is_empty() {
            // Outstanding work may still read the allocations; free in stream order.
            self.release();
        }
    }
}

impl Backend for CudaBackend {
    type Device = CudaDevice;
    type Context = CudaContext;
    type Handle = CudaHandle;
    type Staging = CudaStaging;

    fn name() -> &'static str {
        "cuda"
    }

    fn devices() -> Vec<CudaDevice> {
        device::enumerate()
    }

    fn default_device() -> CudaDevice {
        CudaDevice::new(0)
    }

    fn create_context(device: &CudaDevice) -> Result<Arc<CudaContext>> {
        let context = CudaContext::new(device.index).map_err(|e| {
            Error::backend_unavailable(Self::name(), device.id(), format!("{:?}", e))
        })?;
        match device.compute_capability() {
            Ok((major, minor)) => {
                debug!(device = %device.name(), sm = major * 10 + minor, "CUDA context created")
            }
            Err(e) => debug!(device = %device.name(), error = %e, "CUDA context created"),
        }
        Ok(context)
    }

    fn create_handle(device: &CudaDevice, context: &Arc<CudaContext>) -> Result<CudaHandle> {
        context.bind_to_thread().map_err(|e| {
            Error::Backend(format!("Failed to bind CUDA context to thread: {:?}", e))
        })?;

        let stream = context
            .new_stream()
            .map_err(|e| Error::Backend(format!("Failed to create CUDA stream: {:?}", e)))?;

        let blas = CudaBlas::new(stream.clone())
            .map_err(|e| Error::Backend(format!("Failed to initialize cuBLAS: {:?}", e)))?;

        Ok(CudaHandle {
            device: device.clone(),
            context: context.clone(),
            stream,
            blas,
        })
    }

    fn begin_interop(handle: &CudaHandle) -> Result<CudaStaging> {
        handle.context.bind_to_thread().map_err(|e| {
            Error::Backend(format!("Failed to bind CUDA context to thread: {:?}", e))
        })?;
        Ok(CudaStaging {
            stream: handle.stream.clone(),
            staged: Vec::new(),
        })
    }
}
