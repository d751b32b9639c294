//! Element type to cuBLAS layout mapping

use cudarc::cublas::sys::{cuComplex, cuDoubleComplex};

use crate::dtype::{Complex64, Complex128, Element};
use crate::runtime::DevicePtr;

/// Maps a portable element type to the layout cuBLAS declares for it
///
/// Every pair is bit-identical in size and alignment, so buffers and host
/// scalars are passed by pointer cast.
pub trait CudaEquivalent: Element {
    /// cuBLAS-side type
    type Native;
}

impl CudaEquivalent for f32 {
    type Native = f32;
}

impl CudaEquivalent for f64 {
    type Native = f64;
}

impl CudaEquivalent for i32 {
    type Native = std::ffi::c_int;
}

impl CudaEquivalent for Complex64 {
    type Native = cuComplex;
}

impl CudaEquivalent for Complex128 {
    type Native = cuDoubleComplex;
}

const _: () = {
    assert!(std::mem::size_of::<Complex64>() == std::mem::size_of::<cuComplex>());
    assert!(std::mem::size_of::<Complex128>() == std::mem::size_of::<cuDoubleComplex>());
};

/// Device pointer as the cuBLAS type, read-only
#[inline]
pub(super) fn dev<T: CudaEquivalent>(p: DevicePtr<T>) -> *const T::Native {
    p.as_ptr() as *const T::Native
}

/// Device pointer as the cuBLAS type, writable
#[inline]
pub(super) fn dev_mut<T: CudaEquivalent>(p: DevicePtr<T>) -> *mut T::Native {
    p.as_mut_ptr() as *mut T::Native
}

/// Host scalar as the cuBLAS type
#[inline]
pub(super) fn host<T: CudaEquivalent>(v: &T) -> *const T::Native {
    v as *const T as *const T::Native
}
