//! CPU backend
//!
//! A reference BLAS running on the host. The memory translator hands out
//! the buffer storage addresses directly, so there is no staging copy, and
//! the handle records the pointer mode so routines fail the same way a
//! device library would when called with scalars in the wrong place.

mod backend;
mod blas;
mod device;

pub use backend::{CpuBackend, CpuContext, CpuHandle, CpuStaging};
pub use blas::CpuScalar;
pub use device::CpuDevice;
