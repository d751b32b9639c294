//! Level 3 routines: rank-2k updates

use tracing::trace;

use super::native::{HermitianLevel3, Level3};
use super::{Transpose, Uplo, validate};
use crate::dtype::{BlasScalar, ComplexScalar};
use crate::error::{Error, Result};
use crate::runtime::{AccessMode, Backend, Buffer, NativeHandle, PointerMode, Queue};

/// Shape of A and B as stored: `n × k` untransposed, `k × n` otherwise
fn operand_shape(trans: Transpose, n: i64, k: i64) -> (i64, i64) {
    if trans.is_transposed() { (k, n) } else { (n, k) }
}

#[allow(clippy::too_many_arguments)]
fn validate_rank2k(
    trans: Transpose,
    n: i64,
    k: i64,
    a_len: usize,
    lda: i64,
    b_len: usize,
    ldb: i64,
    c_len: usize,
    ldc: i64,
) -> Result<()> {
    validate::dim("n", n)?;
    validate::dim("k", k)?;
    let (rows, cols) = operand_shape(trans, n, k);
    validate::matrix("a", "lda", a_len, rows, cols, lda)?;
    validate::matrix("b", "ldb", b_len, rows, cols, ldb)?;
    validate::matrix("c", "ldc", c_len, n, n, ldc)
}

/// Symmetric rank-2k update of the `uplo` triangle of the `n × n` matrix C
///
/// - `NoTrans`: `C = alpha·A·Bᵀ + alpha·B·Aᵀ + beta·C`, A and B are `n × k`
/// - `Trans`: `C = alpha·Aᵀ·B + alpha·Bᵀ·A + beta·C`, A and B are `k × n`
///
/// `ConjTrans` is accepted as `Trans` for real types and rejected for
/// complex types. The opposite triangle of C is not referenced.
#[allow(clippy::too_many_arguments)]
pub fn syr2k<B, T>(
    queue: &Queue<B>,
    uplo: Uplo,
    trans: Transpose,
    n: i64,
    k: i64,
    alpha: T,
    a: &Buffer<T>,
    lda: i64,
    b: &Buffer<T>,
    ldb: i64,
    beta: T,
    c: &Buffer<T>,
    ldc: i64,
) -> Result<()>
where
    B: Backend,
    T: BlasScalar,
    B::Handle: Level3<T>,
{
    let trans = match trans {
        Transpose::ConjTrans if T::IS_COMPLEX => {
            return Err(Error::invalid_argument(
                "trans",
                "conjugate transpose is not defined for a complex symmetric update",
            ));
        }
        Transpose::ConjTrans => Transpose::Trans,
        other => other,
    };
    validate_rank2k(trans, n, k, a.len(), lda, b.len(), ldb, c.len(), ldc)?;
    trace!(routine = "syr2k", dtype = %T::DTYPE, %uplo, %trans, n, k, lda, ldb, ldc);

    queue.submit("syr2k", |cgh| {
        let a = cgh.access(a, AccessMode::Read);
        let b = cgh.access(b, AccessMode::Read);
        let c = cgh.access(c, AccessMode::ReadWrite);
        cgh.interop_task(move |ih| {
            let a = ih.get_mem(&a)?;
            let b = ih.get_mem(&b)?;
            let c = ih.get_mem(&c)?;
            let handle = ih.native_handle();
            handle.set_pointer_mode(PointerMode::Host)?;
            unsafe {
                handle.syr2k(uplo, trans, n, k, &alpha, a, lda, b, ldb, &beta, c, ldc)
            }
        });
        Ok(())
    })?;
    Ok(())
}

/// Hermitian rank-2k update of the `uplo` triangle of the `n × n` matrix C
///
/// - `NoTrans`: `C = alpha·A·Bᴴ + conj(alpha)·B·Aᴴ + beta·C`, A and B are `n × k`
/// - `ConjTrans`: `C = alpha·Aᴴ·B + conj(alpha)·Bᴴ·A + beta·C`, A and B are `k × n`
///
/// `beta` is real and the diagonal of C is real on exit. `Trans` is
/// rejected with `InvalidArgument`.
///
/// # Example
///
/// ```
/// use blashal::blas::{self, Transpose, Uplo};
/// use blashal::dtype::Complex64;
/// use blashal::runtime::{Buffer, Platform};
/// use blashal::runtime::cpu::CpuBackend;
///
/// let platform = Platform::<CpuBackend>::new();
/// let queue = platform.default_queue().unwrap();
/// let a = Buffer::from_slice(&[Complex64::new(1.0, 1.0)]);
/// let b = Buffer::from_slice(&[Complex64::new(2.0, 0.0)]);
/// let c = Buffer::from_slice(&[Complex64::new(0.5, 0.0)]);
/// let alpha = Complex64::ONE;
/// blas::her2k(&queue, Uplo::Lower, Transpose::NoTrans, 1, 1, alpha, &a, 1, &b, 1, 1.0, &c, 1)
///     .unwrap();
/// // 2·re(a·conj(b)) + 0.5
/// assert_eq!(c.to_vec(), vec![Complex64::new(4.5, 0.0)]);
/// ```
#[allow(clippy::too_many_arguments)]
pub fn her2k<B, T>(
    queue: &Queue<B>,
    uplo: Uplo,
    trans: Transpose,
    n: i64,
    k: i64,
    alpha: T,
    a: &Buffer<T>,
    lda: i64,
    b: &Buffer<T>,
    ldb: i64,
    beta: T::Real,
    c: &Buffer<T>,
    ldc: i64,
) -> Result<()>
where
    B: Backend,
    T: ComplexScalar,
    B::Handle: HermitianLevel3<T>,
{
    if trans == Transpose::Trans {
        return Err(Error::invalid_argument(
            "trans",
            "a Hermitian update takes NoTrans or ConjTrans",
        ));
    }
    validate_rank2k(trans, n, k, a.len(), lda, b.len(), ldb, c.len(), ldc)?;
    trace!(routine = "her2k", dtype = %T::DTYPE, %uplo, %trans, n, k, lda, ldb, ldc);

    queue.submit("her2k", |cgh| {
        let a = cgh.access(a, AccessMode::Read);
        let b = cgh.access(b, AccessMode::Read);
        let c = cgh.access(c, AccessMode::ReadWrite);
        cgh.interop_task(move |ih| {
            let a = ih.get_mem(&a)?;
            let b = ih.get_mem(&b)?;
            let c = ih.get_mem(&c)?;
            let handle = ih.native_handle();
            handle.set_pointer_mode(PointerMode::Host)?;
            unsafe {
                handle.her2k(uplo, trans, n, k, &alpha, a, lda, b, ldb, &beta, c, ldc)
            }
        });
        Ok(())
    })?;
    Ok(())
}
