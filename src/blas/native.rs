//! Native routine traits
//!
//! Implemented per `(native handle, element type)` by each backend. The
//! dispatcher only calls a routine when the handle implements the trait for
//! the element type, so an unsupported combination is a compile error.
//!
//! All methods are `unsafe`: pointers must come from the enclosing interop
//! task and cover every element the routine touches. Dimensions and strides
//! arrive validated (non-negative dimensions, products within `i64`);
//! backends with a narrower native integer reject out-of-range values with
//! `Overflow`. Results through `DevicePtr` scalars require
//! `PointerMode::Device`; by-reference scalars require `PointerMode::Host`.

use super::{Transpose, Uplo};
use crate::dtype::{BlasScalar, ComplexScalar, RealScalar};
use crate::error::Result;
use crate::runtime::{DevicePtr, NativeHandle};

/// Level 1 routines available for every scalar type
pub trait Level1<T: BlasScalar>: NativeHandle {
    /// result = Σ |re(x_i)| + |im(x_i)|
    unsafe fn asum(&self, n: i64, x: DevicePtr<T>, incx: i64, result: DevicePtr<T::Real>)
    -> Result<()>;

    /// x = alpha · x
    unsafe fn scal(&self, n: i64, alpha: &T, x: DevicePtr<T>, incx: i64) -> Result<()>;

    /// y = alpha · x + y
    unsafe fn axpy(
        &self,
        n: i64,
        alpha: &T,
        x: DevicePtr<T>,
        incx: i64,
        y: DevicePtr<T>,
        incy: i64,
    ) -> Result<()>;

    /// y = x
    unsafe fn copy(&self, n: i64, x: DevicePtr<T>, incx: i64, y: DevicePtr<T>, incy: i64)
    -> Result<()>;

    /// x <-> y
    unsafe fn swap(&self, n: i64, x: DevicePtr<T>, incx: i64, y: DevicePtr<T>, incy: i64)
    -> Result<()>;

    /// result = ||x||₂
    unsafe fn nrm2(&self, n: i64, x: DevicePtr<T>, incx: i64, result: DevicePtr<T::Real>)
    -> Result<()>;

    /// Apply the plane rotation (c, s) to the pairs (x_i, y_i)
    #[allow(clippy::too_many_arguments)]
    unsafe fn rot(
        &self,
        n: i64,
        x: DevicePtr<T>,
        incx: i64,
        y: DevicePtr<T>,
        incy: i64,
        c: &T::Real,
        s: &T::Real,
    ) -> Result<()>;

    /// Construct a Givens rotation zeroing `b`; all arguments are device scalars
    unsafe fn rotg(
        &self,
        a: DevicePtr<T>,
        b: DevicePtr<T>,
        c: DevicePtr<T::Real>,
        s: DevicePtr<T>,
    ) -> Result<()>;

    /// 1-based index of the first element of maximum |re| + |im|; 0 when n < 1
    unsafe fn iamax(&self, n: i64, x: DevicePtr<T>, incx: i64, result: DevicePtr<i32>)
    -> Result<()>;

    /// 1-based index of the first element of minimum |re| + |im|; 0 when n < 1
    unsafe fn iamin(&self, n: i64, x: DevicePtr<T>, incx: i64, result: DevicePtr<i32>)
    -> Result<()>;
}

/// Level 1 routines specific to real types
pub trait RealLevel1<T: RealScalar>: Level1<T> {
    /// result = Σ x_i · y_i
    #[allow(clippy::too_many_arguments)]
    unsafe fn dot(
        &self,
        n: i64,
        x: DevicePtr<T>,
        incx: i64,
        y: DevicePtr<T>,
        incy: i64,
        result: DevicePtr<T>,
    ) -> Result<()>;

    /// Apply the modified Givens transformation described by `param[0..5]`
    #[allow(clippy::too_many_arguments)]
    unsafe fn rotm(
        &self,
        n: i64,
        x: DevicePtr<T>,
        incx: i64,
        y: DevicePtr<T>,
        incy: i64,
        param: DevicePtr<T>,
    ) -> Result<()>;

    /// Construct a modified Givens transformation; `y1` is read-only
    unsafe fn rotmg(
        &self,
        d1: DevicePtr<T>,
        d2: DevicePtr<T>,
        x1: DevicePtr<T>,
        y1: DevicePtr<T>,
        param: DevicePtr<T>,
    ) -> Result<()>;
}

/// Level 1 routines specific to complex types
pub trait ComplexLevel1<T: ComplexScalar>: Level1<T> {
    /// result = Σ conj(x_i) · y_i
    #[allow(clippy::too_many_arguments)]
    unsafe fn dotc(
        &self,
        n: i64,
        x: DevicePtr<T>,
        incx: i64,
        y: DevicePtr<T>,
        incy: i64,
        result: DevicePtr<T>,
    ) -> Result<()>;

    /// result = Σ x_i · y_i
    #[allow(clippy::too_many_arguments)]
    unsafe fn dotu(
        &self,
        n: i64,
        x: DevicePtr<T>,
        incx: i64,
        y: DevicePtr<T>,
        incy: i64,
        result: DevicePtr<T>,
    ) -> Result<()>;

    /// x = alpha · x with a real alpha
    unsafe fn scal_real(&self, n: i64, alpha: &T::Real, x: DevicePtr<T>, incx: i64)
    -> Result<()>;
}

/// Level 2 routines
pub trait Level2<T: BlasScalar>: NativeHandle {
    /// y = alpha · op(A) · x + beta · y, A is m × n column-major
    #[allow(clippy::too_many_arguments)]
    unsafe fn gemv(
        &self,
        trans: Transpose,
        m: i64,
        n: i64,
        alpha: &T,
        a: DevicePtr<T>,
        lda: i64,
        x: DevicePtr<T>,
        incx: i64,
        beta: &T,
        y: DevicePtr<T>,
        incy: i64,
    ) -> Result<()>;
}

/// Level 3 routines available for every scalar type
pub trait Level3<T: BlasScalar>: NativeHandle {
    /// Symmetric rank-2k update of one triangle of C (n × n)
    ///
    /// - `NoTrans`: C = alpha·A·Bᵀ + alpha·B·Aᵀ + beta·C, A and B are n × k
    /// - `Trans`: C = alpha·Aᵀ·B + alpha·Bᵀ·A + beta·C, A and B are k × n
    #[allow(clippy::too_many_arguments)]
    unsafe fn syr2k(
        &self,
        uplo: Uplo,
        trans: Transpose,
        n: i64,
        k: i64,
        alpha: &T,
        a: DevicePtr<T>,
        lda: i64,
        b: DevicePtr<T>,
        ldb: i64,
        beta: &T,
        c: DevicePtr<T>,
        ldc: i64,
    ) -> Result<()>;
}

/// Hermitian level 3 routines
pub trait HermitianLevel3<T: ComplexScalar>: NativeHandle {
    /// Hermitian rank-2k update of one triangle of C (n × n)
    ///
    /// - `NoTrans`: C = alpha·A·Bᴴ + conj(alpha)·B·Aᴴ + beta·C, A and B are n × k
    /// - `ConjTrans`: C = alpha·Aᴴ·B + conj(alpha)·Bᴴ·A + beta·C, A and B are k × n
    ///
    /// The diagonal of C is real on exit.
    #[allow(clippy::too_many_arguments)]
    unsafe fn her2k(
        &self,
        uplo: Uplo,
        trans: Transpose,
        n: i64,
        k: i64,
        alpha: &T,
        a: DevicePtr<T>,
        lda: i64,
        b: DevicePtr<T>,
        ldb: i64,
        beta: &T::Real,
        c: DevicePtr<T>,
        ldc: i64,
    ) -> Result<()>;
}
