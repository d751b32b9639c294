//! CUDA device implementation

use crate::error::{Error, Result};
use crate::runtime::Device;

/// CUDA device identified by its ordinal
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct CudaDevice {
    /// Index of the GPU device (0, 1, 2, ...)
    pub(crate) index: usize,
}

impl CudaDevice {
    /// Create a new CUDA device
    pub fn new(index: usize) -> Self {
        Self { index }
    }

    /// Get the compute capability of this CUDA device
    ///
    /// Returns (major, minor) version numbers (e.g., (8, 6) for sm_86)
    pub fn compute_capability(&self) -> Result<(u32, u32)> {
        let device = cudarc::driver::result::device::get(self.index as i32).map_err(|e| {
            Error::Backend(format!("Failed to get CUDA device {}: {:?}", self.index, e))
        })?;

        let major = unsafe {
            cudarc::driver::result::device::get_attribute(
                device,
                cudarc::driver::sys::CUdevice_attribute::CU_DEVICE_ATTRIBUTE_COMPUTE_CAPABILITY_MAJOR,
            )
        }
        .map_err(|e| Error::Backend(format!("Failed to get compute capability major: {:?}", e)))?
            as u32;

        let minor = unsafe {
            cudarc::driver::result::device::get_attribute(
                device,
                cudarc::driver::sys::CUdevice_attribute::CU_DEVICE_ATTRIBUTE_COMPUTE_CAPABILITY_MINOR,
            )
        }
        .map_err(|e| Error::Backend(format!("Failed to get compute capability minor: {:?}", e)))?
            as u32;

        Ok((major, minor))
    }
}

impl Device for CudaDevice {
    fn id(&self) -> usize {
        self.index
    }

    fn name(&self) -> String {
        format!("cuda:{}", self.index)
    }
}

/// Enumerate CUDA devices; empty when the driver is missing
pub(crate) fn enumerate() -> Vec<CudaDevice> {
    if cudarc::driver::result::init().is_err() {
        return Vec::new();
    }
    match cudarc::driver::result::device::get_count() {
        Ok(count) => (0..count.max(0) as usize).map(CudaDevice::new).collect(),
        Err(_) => Vec::new(),
    }
}
