//! CUDA backend
//!
//! Dispatches to cuBLAS through cudarc. Each queue owns a stream and a
//! cuBLAS handle bound to it; each device has one CUDA context per
//! platform.
//!
//! Buffers are host-backed, so every interop task stages its accesses into
//! stream-ordered device memory and publishes writes back before the task
//! completes.

mod backend;
mod blas;
mod device;
mod types;

pub use backend::{CudaBackend, CudaHandle, CudaStaging};
pub use device::CudaDevice;
pub use types::CudaEquivalent;
