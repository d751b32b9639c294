//! Level 1 routines: vector-vector operations
//!
//! `asum`, `nrm2`, `scal` and `scal_real` pass `|inc|` to the native call: a
//! negative increment produces the same result as the positive one rather
//! than the reference BLAS no-op.

use tracing::trace;

use super::native::{ComplexLevel1, Level1, RealLevel1};
use super::shim::{HostFinish, zero_based_index};
use super::validate;
use crate::dtype::{BlasScalar, ComplexScalar, RealScalar};
use crate::error::Result;
use crate::runtime::{AccessMode, Backend, Buffer, NativeHandle, PointerMode, Queue};

/// Sum of magnitudes: `result[0] = Σ |re(x_i)| + |im(x_i)|`
///
/// # Example
///
/// ```
/// use blashal::blas;
/// use blashal::runtime::{Buffer, Platform};
/// use blashal::runtime::cpu::CpuBackend;
///
/// let platform = Platform::<CpuBackend>::new();
/// let queue = platform.default_queue().unwrap();
/// let x = Buffer::from_slice(&[1.0f32, -2.0, 3.0]);
/// let result = Buffer::<f32>::zeroed(1);
/// blas::asum(&queue, 3, &x, 1, &result).unwrap();
/// assert_eq!(result.to_vec(), vec![6.0]);
/// ```
pub fn asum<B, T>(
    queue: &Queue<B>,
    n: i64,
    x: &Buffer<T>,
    incx: i64,
    result: &Buffer<T::Real>,
) -> Result<()>
where
    B: Backend,
    T: BlasScalar,
    B::Handle: Level1<T>,
{
    validate::dim("n", n)?;
    validate::vector("x", "incx", x.len(), n, incx)?;
    validate::scalars("result", result.len(), 1)?;
    let incx = incx.abs();
    trace!(routine = "asum", dtype = %T::DTYPE, n, incx);

    queue.submit("asum", |cgh| {
        let x = cgh.access(x, AccessMode::Read);
        let result = cgh.access(result, AccessMode::Write);
        cgh.interop_task(move |ih| {
            let x = ih.get_mem(&x)?;
            let result = ih.get_mem(&result)?;
            let handle = ih.native_handle();
            handle.set_pointer_mode(PointerMode::Device)?;
            unsafe { handle.asum(n, x, incx, result) }
        });
        Ok(())
    })?;
    Ok(())
}

/// `x = alpha · x`
pub fn scal<B, T>(queue: &Queue<B>, n: i64, alpha: T, x: &Buffer<T>, incx: i64) -> Result<()>
where
    B: Backend,
    T: BlasScalar,
    B::Handle: Level1<T>,
{
    validate::dim("n", n)?;
    validate::vector("x", "incx", x.len(), n, incx)?;
    let incx = incx.abs();
    trace!(routine = "scal", dtype = %T::DTYPE, n, incx);

    queue.submit("scal", |cgh| {
        let x = cgh.access(x, AccessMode::ReadWrite);
        cgh.interop_task(move |ih| {
            let x = ih.get_mem(&x)?;
            let handle = ih.native_handle();
            handle.set_pointer_mode(PointerMode::Host)?;
            unsafe { handle.scal(n, &alpha, x, incx) }
        });
        Ok(())
    })?;
    Ok(())
}

/// `x = alpha · x` for a complex vector and a real scalar
pub fn scal_real<B, T>(
    queue: &Queue<B>,
    n: i64,
    alpha: T::Real,
    x: &Buffer<T>,
    incx: i64,
) -> Result<()>
where
    B: Backend,
    T: ComplexScalar,
    B::Handle: ComplexLevel1<T>,
{
    validate::dim("n", n)?;
    validate::vector("x", "incx", x.len(), n, incx)?;
    let incx = incx.abs();
    trace!(routine = "scal_real", dtype = %T::DTYPE, n, incx);

    queue.submit("scal_real", |cgh| {
        let x = cgh.access(x, AccessMode::ReadWrite);
        cgh.interop_task(move |ih| {
            let x = ih.get_mem(&x)?;
            let handle = ih.native_handle();
            handle.set_pointer_mode(PointerMode::Host)?;
            unsafe { handle.scal_real(n, &alpha, x, incx) }
        });
        Ok(())
    })?;
    Ok(())
}

/// `y = alpha · x + y`
#[allow(clippy::too_many_arguments)]
pub fn axpy<B, T>(
    queue: &Queue<B>,
    n: i64,
    alpha: T,
    x: &Buffer<T>,
    incx: i64,
    y: &Buffer<T>,
    incy: i64,
) -> Result<()>
where
    B: Backend,
    T: BlasScalar,
    B::Handle: Level1<T>,
{
    validate::dim("n", n)?;
    validate::vector("x", "incx", x.len(), n, incx)?;
    validate::vector("y", "incy", y.len(), n, incy)?;
    trace!(routine = "axpy", dtype = %T::DTYPE, n, incx, incy);

    queue.submit("axpy", |cgh| {
        let x = cgh.access(x, AccessMode::Read);
        let y = cgh.access(y, AccessMode::ReadWrite);
        cgh.interop_task(move |ih| {
            let x = ih.get_mem(&x)?;
            let y = ih.get_mem(&y)?;
            let handle = ih.native_handle();
            handle.set_pointer_mode(PointerMode::Host)?;
            unsafe { handle.axpy(n, &alpha, x, incx, y, incy) }
        });
        Ok(())
    })?;
    Ok(())
}

/// `y = x`
pub fn copy<B, T>(
    queue: &Queue<B>,
    n: i64,
    x: &Buffer<T>,
    incx: i64,
    y: &Buffer<T>,
    incy: i64,
) -> Result<()>
where
    B: Backend,
    T: BlasScalar,
    B::Handle: Level1<T>,
{
    validate::dim("n", n)?;
    validate::vector("x", "incx", x.len(), n, incx)?;
    validate::vector("y", "incy", y.len(), n, incy)?;
    trace!(routine = "copy", dtype = %T::DTYPE, n, incx, incy);

    queue.submit("copy", |cgh| {
        let x = cgh.access(x, AccessMode::Read);
        let y = cgh.access(y, AccessMode::Write);
        cgh.interop_task(move |ih| {
            let x = ih.get_mem(&x)?;
            let y = ih.get_mem(&y)?;
            let handle = ih.native_handle();
            handle.set_pointer_mode(PointerMode::Host)?;
            unsafe { handle.copy(n, x, incx, y, incy) }
        });
        Ok(())
    })?;
    Ok(())
}

/// Exchange `x` and `y`
pub fn swap<B, T>(
    queue: &Queue<B>,
    n: i64,
    x: &Buffer<T>,
    incx: i64,
    y: &Buffer<T>,
    incy: i64,
) -> Result<()>
where
    B: Backend,
    T: BlasScalar,
    B::Handle: Level1<T>,
{
    validate::dim("n", n)?;
    validate::vector("x", "incx", x.len(), n, incx)?;
    validate::vector("y", "incy", y.len(), n, incy)?;
    trace!(routine = "swap", dtype = %T::DTYPE, n, incx, incy);

    queue.submit("swap", |cgh| {
        let x = cgh.access(x, AccessMode::ReadWrite);
        let y = cgh.access(y, AccessMode::ReadWrite);
        cgh.interop_task(move |ih| {
            let x = ih.get_mem(&x)?;
            let y = ih.get_mem(&y)?;
            let handle = ih.native_handle();
            handle.set_pointer_mode(PointerMode::Host)?;
            unsafe { handle.swap(n, x, incx, y, incy) }
        });
        Ok(())
    })?;
    Ok(())
}

/// Real dot product: `result[0] = Σ x_i · y_i`
#[allow(clippy::too_many_arguments)]
pub fn dot<B, T>(
    queue: &Queue<B>,
    n: i64,
    x: &Buffer<T>,
    incx: i64,
    y: &Buffer<T>,
    incy: i64,
    result: &Buffer<T>,
) -> Result<()>
where
    B: Backend,
    T: RealScalar,
    B::Handle: RealLevel1<T>,
{
    validate::dim("n", n)?;
    validate::vector("x", "incx", x.len(), n, incx)?;
    validate::vector("y", "incy", y.len(), n, incy)?;
    validate::scalars("result", result.len(), 1)?;
    trace!(routine = "dot", dtype = %T::DTYPE, n, incx, incy);

    queue.submit("dot", |cgh| {
        let x = cgh.access(x, AccessMode::Read);
        let y = cgh.access(y, AccessMode::Read);
        let result = cgh.access(result, AccessMode::Write);
        cgh.interop_task(move |ih| {
            let x = ih.get_mem(&x)?;
            let y = ih.get_mem(&y)?;
            let result = ih.get_mem(&result)?;
            let handle = ih.native_handle();
            handle.set_pointer_mode(PointerMode::Device)?;
            unsafe { handle.dot(n, x, incx, y, incy, result) }
        });
        Ok(())
    })?;
    Ok(())
}

/// Conjugated complex dot product: `result[0] = Σ conj(x_i) · y_i`
#[allow(clippy::too_many_arguments)]
pub fn dotc<B, T>(
    queue: &Queue<B>,
    n: i64,
    x: &Buffer<T>,
    incx: i64,
    y: &Buffer<T>,
    incy: i64,
    result: &Buffer<T>,
) -> Result<()>
where
    B: Backend,
    T: ComplexScalar,
    B::Handle: ComplexLevel1<T>,
{
    validate::dim("n", n)?;
    validate::vector("x", "incx", x.len(), n, incx)?;
    validate::vector("y", "incy", y.len(), n, incy)?;
    validate::scalars("result", result.len(), 1)?;
    trace!(routine = "dotc", dtype = %T::DTYPE, n, incx, incy);

    queue.submit("dotc", |cgh| {
        let x = cgh.access(x, AccessMode::Read);
        let y = cgh.access(y, AccessMode::Read);
        let result = cgh.access(result, AccessMode::Write);
        cgh.interop_task(move |ih| {
            let x = ih.get_mem(&x)?;
            let y = ih.get_mem(&y)?;
            let result = ih.get_mem(&result)?;
            let handle = ih.native_handle();
            handle.set_pointer_mode(PointerMode::Device)?;
            unsafe { handle.dotc(n, x, incx, y, incy, result) }
        });
        Ok(())
    })?;
    Ok(())
}

/// Unconjugated complex dot product: `result[0] = Σ x_i · y_i`
#[allow(clippy::too_many_arguments)]
pub fn dotu<B, T>(
    queue: &Queue<B>,
    n: i64,
    x: &Buffer<T>,
    incx: i64,
    y: &Buffer<T>,
    incy: i64,
    result: &Buffer<T>,
) -> Result<()>
where
    B: Backend,
    T: ComplexScalar,
    B::Handle: ComplexLevel1<T>,
{
    validate::dim("n", n)?;
    validate::vector("x", "incx", x.len(), n, incx)?;
    validate::vector("y", "incy", y.len(), n, incy)?;
    validate::scalars("result", result.len(), 1)?;
    trace!(routine = "dotu", dtype = %T::DTYPE, n, incx, incy);

    queue.submit("dotu", |cgh| {
        let x = cgh.access(x, AccessMode::Read);
        let y = cgh.access(y, AccessMode::Read);
        let result = cgh.access(result, AccessMode::Write);
        cgh.interop_task(move |ih| {
            let x = ih.get_mem(&x)?;
            let y = ih.get_mem(&y)?;
            let result = ih.get_mem(&result)?;
            let handle = ih.native_handle();
            handle.set_pointer_mode(PointerMode::Device)?;
            unsafe { handle.dotu(n, x, incx, y, incy, result) }
        });
        Ok(())
    })?;
    Ok(())
}

/// Euclidean norm: `result[0] = ||x||₂`
pub fn nrm2<B, T>(
    queue: &Queue<B>,
    n: i64,
    x: &Buffer<T>,
    incx: i64,
    result: &Buffer<T::Real>,
) -> Result<()>
where
    B: Backend,
    T: BlasScalar,
    B::Handle: Level1<T>,
{
    validate::dim("n", n)?;
    validate::vector("x", "incx", x.len(), n, incx)?;
    validate::scalars("result", result.len(), 1)?;
    let incx = incx.abs();
    trace!(routine = "nrm2", dtype = %T::DTYPE, n, incx);

    queue.submit("nrm2", |cgh| {
        let x = cgh.access(x, AccessMode::Read);
        let result = cgh.access(result, AccessMode::Write);
        cgh.interop_task(move |ih| {
            let x = ih.get_mem(&x)?;
            let result = ih.get_mem(&result)?;
            let handle = ih.native_handle();
            handle.set_pointer_mode(PointerMode::Device)?;
            unsafe { handle.nrm2(n, x, incx, result) }
        });
        Ok(())
    })?;
    Ok(())
}

/// Apply a plane rotation with real `c` and `s`:
/// `x_i = c·x_i + s·y_i`, `y_i = c·y_i − s·x_i`
#[allow(clippy::too_many_arguments)]
pub fn rot<B, T>(
    queue: &Queue<B>,
    n: i64,
    x: &Buffer<T>,
    incx: i64,
    y: &Buffer<T>,
    incy: i64,
    c: T::Real,
    s: T::Real,
) -> Result<()>
where
    B: Backend,
    T: BlasScalar,
    B::Handle: Level1<T>,
{
    validate::dim("n", n)?;
    validate::vector("x", "incx", x.len(), n, incx)?;
    validate::vector("y", "incy", y.len(), n, incy)?;
    trace!(routine = "rot", dtype = %T::DTYPE, n, incx, incy);

    queue.submit("rot", |cgh| {
        let x = cgh.access(x, AccessMode::ReadWrite);
        let y = cgh.access(y, AccessMode::ReadWrite);
        cgh.interop_task(move |ih| {
            let x = ih.get_mem(&x)?;
            let y = ih.get_mem(&y)?;
            let handle = ih.native_handle();
            handle.set_pointer_mode(PointerMode::Host)?;
            unsafe { handle.rot(n, x, incx, y, incy, &c, &s) }
        });
        Ok(())
    })?;
    Ok(())
}

/// Construct a Givens rotation
///
/// On exit `c` and `s` hold the rotation, `a` holds r; for real types `b`
/// holds the reconstruction parameter z.
pub fn rotg<B, T>(
    queue: &Queue<B>,
    a: &Buffer<T>,
    b: &Buffer<T>,
    c: &Buffer<T::Real>,
    s: &Buffer<T>,
) -> Result<()>
where
    B: Backend,
    T: BlasScalar,
    B::Handle: Level1<T>,
{
    validate::scalars("a", a.len(), 1)?;
    validate::scalars("b", b.len(), 1)?;
    validate::scalars("c", c.len(), 1)?;
    validate::scalars("s", s.len(), 1)?;
    trace!(routine = "rotg", dtype = %T::DTYPE);

    queue.submit("rotg", |cgh| {
        let a = cgh.access(a, AccessMode::ReadWrite);
        let b = cgh.access(b, AccessMode::ReadWrite);
        let c = cgh.access(c, AccessMode::Write);
        let s = cgh.access(s, AccessMode::Write);
        cgh.interop_task(move |ih| {
            let a = ih.get_mem(&a)?;
            let b = ih.get_mem(&b)?;
            let c = ih.get_mem(&c)?;
            let s = ih.get_mem(&s)?;
            let handle = ih.native_handle();
            handle.set_pointer_mode(PointerMode::Device)?;
            unsafe { handle.rotg(a, b, c, s) }
        });
        Ok(())
    })?;
    Ok(())
}

/// Apply the modified Givens transformation stored in `param[0..5]`
#[allow(clippy::too_many_arguments)]
pub fn rotm<B, T>(
    queue: &Queue<B>,
    n: i64,
    x: &Buffer<T>,
    incx: i64,
    y: &Buffer<T>,
    incy: i64,
    param: &Buffer<T>,
) -> Result<()>
where
    B: Backend,
    T: RealScalar,
    B::Handle: RealLevel1<T>,
{
    validate::dim("n", n)?;
    validate::vector("x", "incx", x.len(), n, incx)?;
    validate::vector("y", "incy", y.len(), n, incy)?;
    validate::scalars("param", param.len(), 5)?;
    trace!(routine = "rotm", dtype = %T::DTYPE, n, incx, incy);

    queue.submit("rotm", |cgh| {
        let x = cgh.access(x, AccessMode::ReadWrite);
        let y = cgh.access(y, AccessMode::ReadWrite);
        let param = cgh.access(param, AccessMode::Read);
        cgh.interop_task(move |ih| {
            let x = ih.get_mem(&x)?;
            let y = ih.get_mem(&y)?;
            let param = ih.get_mem(&param)?;
            let handle = ih.native_handle();
            handle.set_pointer_mode(PointerMode::Device)?;
            unsafe { handle.rotm(n, x, incx, y, incy, param) }
        });
        Ok(())
    })?;
    Ok(())
}

/// Construct a modified Givens transformation
///
/// `y1` is a host value; it is copied into a device-visible scalar before
/// the native call, which takes every scalar from device memory.
pub fn rotmg<B, T>(
    queue: &Queue<B>,
    d1: &Buffer<T>,
    d2: &Buffer<T>,
    x1: &Buffer<T>,
    y1: T,
    param: &Buffer<T>,
) -> Result<()>
where
    B: Backend,
    T: RealScalar,
    B::Handle: RealLevel1<T>,
{
    validate::scalars("d1", d1.len(), 1)?;
    validate::scalars("d2", d2.len(), 1)?;
    validate::scalars("x1", x1.len(), 1)?;
    validate::scalars("param", param.len(), 5)?;
    trace!(routine = "rotmg", dtype = %T::DTYPE);

    let y1 = Buffer::from_slice(&[y1]);
    queue.submit("rotmg", |cgh| {
        let d1 = cgh.access(d1, AccessMode::ReadWrite);
        let d2 = cgh.access(d2, AccessMode::ReadWrite);
        let x1 = cgh.access(x1, AccessMode::ReadWrite);
        let y1 = cgh.access(&y1, AccessMode::Read);
        let param = cgh.access(param, AccessMode::Write);
        cgh.interop_task(move |ih| {
            let d1 = ih.get_mem(&d1)?;
            let d2 = ih.get_mem(&d2)?;
            let x1 = ih.get_mem(&x1)?;
            let y1 = ih.get_mem(&y1)?;
            let param = ih.get_mem(&param)?;
            let handle = ih.native_handle();
            handle.set_pointer_mode(PointerMode::Device)?;
            unsafe { handle.rotmg(d1, d2, x1, y1, param) }
        });
        Ok(())
    })?;
    Ok(())
}

/// 0-based index of the first element of maximum `|re| + |im|`
///
/// Blocks until the index is available in `result`. An empty vector or a
/// non-positive increment yields 0.
pub fn iamax<B, T>(
    queue: &Queue<B>,
    n: i64,
    x: &Buffer<T>,
    incx: i64,
    result: &Buffer<i64>,
) -> Result<()>
where
    B: Backend,
    T: BlasScalar,
    B::Handle: Level1<T>,
{
    validate::dim("n", n)?;
    validate::vector("x", "incx", x.len(), n, incx)?;
    validate::scalars("result", result.len(), 1)?;
    trace!(routine = "iamax", dtype = %T::DTYPE, n, incx);

    let pending = HostFinish::<i32>::submit(queue, "iamax", |cgh, out| {
        let x = cgh.access(x, AccessMode::Read);
        cgh.interop_task(move |ih| {
            let x = ih.get_mem(&x)?;
            let out = ih.get_mem(&out)?;
            let handle = ih.native_handle();
            handle.set_pointer_mode(PointerMode::Device)?;
            unsafe { handle.iamax(n, x, incx, out) }
        });
        Ok(())
    })?;
    pending.complete(result, zero_based_index);
    Ok(())
}

/// 0-based index of the first element of minimum `|re| + |im|`
///
/// Blocks until the index is available in `result`. An empty vector or a
/// non-positive increment yields 0.
pub fn iamin<B, T>(
    queue: &Queue<B>,
    n: i64,
    x: &Buffer<T>,
    incx: i64,
    result: &Buffer<i64>,
) -> Result<()>
where
    B: Backend,
    T: BlasScalar,
    B::Handle: Level1<T>,
{
    validate::dim("n", n)?;
    validate::vector("x", "incx", x.len(), n, incx)?;
    validate::scalars("result", result.len(), 1)?;
    trace!(routine = "iamin", dtype = %T::DTYPE, n, incx);

    let pending = HostFinish::<i32>::submit(queue, "iamin", |cgh, out| {
        let x = cgh.access(x, AccessMode::Read);
        cgh.interop_task(move |ih| {
            let x = ih.get_mem(&x)?;
            let out = ih.get_mem(&out)?;
            let handle = ih.native_handle();
            handle.set_pointer_mode(PointerMode::Device)?;
            unsafe { handle.iamin(n, x, incx, out) }
        });
        Ok(())
    })?;
    pending.complete(result, zero_based_index);
    Ok(())
}

/// Single-precision dot product plus a scalar: `result[0] = sb + Σ x_i · y_i`
///
/// The sum is accumulated in single precision and `sb` is added in single
/// precision, unlike reference SDSDOT which accumulates in double.
/// Blocks until the result is available.
#[allow(clippy::too_many_arguments)]
pub fn sdsdot<B>(
    queue: &Queue<B>,
    n: i64,
    sb: f32,
    x: &Buffer<f32>,
    incx: i64,
    y: &Buffer<f32>,
    incy: i64,
    result: &Buffer<f32>,
) -> Result<()>
where
    B: Backend,
    B::Handle: RealLevel1<f32>,
{
    validate::dim("n", n)?;
    validate::vector("x", "incx", x.len(), n, incx)?;
    validate::vector("y", "incy", y.len(), n, incy)?;
    validate::scalars("result", result.len(), 1)?;
    trace!(routine = "sdsdot", n, incx, incy);

    let pending = dot_into_scratch(queue, "sdsdot", n, x, incx, y, incy)?;
    pending.complete(result, |dot| dot + sb);
    Ok(())
}

/// Single-precision inputs, double-precision output: `result[0] = Σ x_i · y_i`
///
/// The sum is accumulated in single precision and widened. Blocks until
/// the result is available.
#[allow(clippy::too_many_arguments)]
pub fn dsdot<B>(
    queue: &Queue<B>,
    n: i64,
    x: &Buffer<f32>,
    incx: i64,
    y: &Buffer<f32>,
    incy: i64,
    result: &Buffer<f64>,
) -> Result<()>
where
    B: Backend,
    B::Handle: RealLevel1<f32>,
{
    validate::dim("n", n)?;
    validate::vector("x", "incx", x.len(), n, incx)?;
    validate::vector("y", "incy", y.len(), n, incy)?;
    validate::scalars("result", result.len(), 1)?;
    trace!(routine = "dsdot", n, incx, incy);

    let pending = dot_into_scratch(queue, "dsdot", n, x, incx, y, incy)?;
    pending.complete(result, f64::from);
    Ok(())
}

fn dot_into_scratch<B>(
    queue: &Queue<B>,
    routine: &'static str,
    n: i64,
    x: &Buffer<f32>,
    incx: i64,
    y: &Buffer<f32>,
    incy: i64,
) -> Result<HostFinish<f32>>
where
    B: Backend,
    B::Handle: RealLevel1<f32>,
{
    HostFinish::submit(queue, routine, |cgh, out| {
        let x = cgh.access(x, AccessMode::Read);
        let y = cgh.access(y, AccessMode::Read);
        cgh.interop_task(move |ih| {
            let x = ih.get_mem(&x)?;
            let y = ih.get_mem(&y)?;
            let out = ih.get_mem(&out)?;
            let handle = ih.native_handle();
            handle.set_pointer_mode(PointerMode::Device)?;
            unsafe { handle.dot(n, x, incx, y, incy, out) }
        });
        Ok(())
    })
}
