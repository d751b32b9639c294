//! Level 2 routines: matrix-vector operations

use tracing::trace;

use super::native::Level2;
use super::{Transpose, validate};
use crate::dtype::BlasScalar;
use crate::error::Result;
use crate::runtime::{AccessMode, Backend, Buffer, NativeHandle, PointerMode, Queue};

/// General matrix-vector product: `y = alpha · op(A) · x + beta · y`
///
/// `A` is `m × n`. `x` has `n` elements for `NoTrans` and `m` otherwise;
/// `y` the other way round. When `beta` is zero `y` is not read.
#[allow(clippy::too_many_arguments)]
pub fn gemv<B, T>(
    queue: &Queue<B>,
    trans: Transpose,
    m: i64,
    n: i64,
    alpha: T,
    a: &Buffer<T>,
    lda: i64,
    x: &Buffer<T>,
    incx: i64,
    beta: T,
    y: &Buffer<T>,
    incy: i64,
) -> Result<()>
where
    B: Backend,
    T: BlasScalar,
    B::Handle: Level2<T>,
{
    validate::dim("m", m)?;
    validate::dim("n", n)?;
    validate::nonzero_increment("incx", incx)?;
    validate::nonzero_increment("incy", incy)?;
    let (lenx, leny) = if trans.is_transposed() { (m, n) } else { (n, m) };
    validate::matrix("a", "lda", a.len(), m, n, lda)?;
    validate::vector("x", "incx", x.len(), lenx, incx)?;
    validate::vector("y", "incy", y.len(), leny, incy)?;
    trace!(routine = "gemv", dtype = %T::DTYPE, %trans, m, n, lda, incx, incy);

    queue.submit("gemv", |cgh| {
        let a = cgh.access(a, AccessMode::Read);
        let x = cgh.access(x, AccessMode::Read);
        let y = cgh.access(y, AccessMode::ReadWrite);
        cgh.interop_task(move |ih| {
            let a = ih.get_mem(&a)?;
            let x = ih.get_mem(&x)?;
            let y = ih.get_mem(&y)?;
            let handle = ih.native_handle();
            handle.set_pointer_mode(PointerMode::Host)?;
            unsafe { handle.gemv(trans, m, n, &alpha, a, lda, x, incx, &beta, y, incy) }
        });
        Ok(())
    })?;
    Ok(())
}
