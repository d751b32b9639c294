//! # blashal
//!
//! **Portable BLAS dispatch over native libraries, driven by queues and buffers.**
//!
//! blashal exposes one set of BLAS routines for every backend. A routine
//! takes a [`Queue`](runtime::Queue) and [`Buffer`](runtime::Buffer)s,
//! declares how it accesses each buffer, and submits a single interop task
//! that translates the buffers to native pointers and calls the backend's
//! library routine. Ordering between submissions follows from the declared
//! accesses, on one queue or across queues.
//!
//! ## Backends
//!
//! - **CPU** (`cpu`, default): reference BLAS in Rust, parallel level 3 with `rayon`
//! - **CUDA** (`cuda`): cuBLAS on a per-queue stream
//!
//! ## Conventions
//!
//! - Indices returned by `iamax`/`iamin` are 0-based.
//! - `asum`, `nrm2`, `scal` and `scal_real` treat a negative increment like
//!   its absolute value.
//! - Routines with results written to buffers run the native call with
//!   device-resident scalars; routines taking scalars by value pass them
//!   from the host.
//! - Capability gaps (`sdsdot`, `dsdot`, 0-based indices) are closed with a
//!   host-side correction of the nearest native result.
//!
//! ## Quick Start
//!
//! ```
//! use blashal::prelude::*;
//!
//! let platform = Platform::<CpuBackend>::new();
//! let queue = platform.default_queue()?;
//!
//! let x = Buffer::from_slice(&[1.0f64, 2.0, 3.0]);
//! let y = Buffer::from_slice(&[4.0f64, 5.0, 6.0]);
//! let result = Buffer::<f64>::zeroed(1);
//!
//! blas::axpy(&queue, 3, 2.0, &x, 1, &y, 1)?;
//! blas::dot(&queue, 3, &x, 1, &y, 1, &result)?;
//! assert_eq!(result.to_vec(), vec![6.0 + 18.0 + 36.0]);
//! # Ok::<(), blashal::error::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cpu` (default): CPU reference backend
//! - `rayon` (default): multi-threaded level 3 on the CPU backend
//! - `cuda`: NVIDIA cuBLAS backend

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod blas;
pub mod dtype;
pub mod error;
pub mod runtime;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::blas::{self, Transpose, Uplo};
    pub use crate::dtype::{Complex64, Complex128, DType};
    pub use crate::error::{Error, Result};
    pub use crate::runtime::{
        AccessMode, Backend, Buffer, Device, Event, ExecutionMode, Platform, Queue, QueueConfig,
    };

    #[cfg(feature = "cpu")]
    pub use crate::runtime::cpu::{CpuBackend, CpuDevice};

    #[cfg(feature = "cuda")]
    pub use crate::runtime::cuda::{CudaBackend, CudaDevice};
}

/// Default backend based on enabled features
///
/// - With `cuda` feature: `CudaBackend`
/// - Otherwise: `CpuBackend`
#[cfg(feature = "cuda")]
pub type DefaultBackend = runtime::cuda::CudaBackend;

/// Default backend based on enabled features
#[cfg(all(feature = "cpu", not(feature = "cuda")))]
pub type DefaultBackend = runtime::cpu::CpuBackend;
