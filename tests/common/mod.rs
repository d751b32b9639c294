//! Common test utilities
#![allow(dead_code)]

use blashal::blas::{Transpose, Uplo};
use blashal::dtype::{BlasScalar, Complex64, Complex128, RealScalar};
use blashal::runtime::{Platform, Queue};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[cfg(feature = "cpu")]
use blashal::runtime::cpu::CpuBackend;
#[cfg(feature = "cpu")]
use blashal::runtime::{ExecutionMode, QueueConfig};
#[cfg(feature = "cuda")]
use blashal::runtime::cuda::CudaBackend;

// ============================================================================
// Queues
// ============================================================================

/// Deferred queue on the CPU backend
#[cfg(feature = "cpu")]
pub fn cpu_queue() -> Queue<CpuBackend> {
    Platform::<CpuBackend>::new()
        .default_queue()
        .expect("cpu queue")
}

/// Inline queue on the CPU backend: task failures are returned by `submit`
#[cfg(feature = "cpu")]
pub fn cpu_inline_queue() -> Queue<CpuBackend> {
    let platform = Platform::<CpuBackend>::new();
    let device = platform.default_device();
    platform
        .queue_with(&device, QueueConfig::new().with_mode(ExecutionMode::Inline))
        .expect("inline cpu queue")
}

/// Deferred queue on CUDA device 0, or `None` when no usable device exists
///
/// The native handle is forced so an unavailable driver shows up here
/// rather than at the first routine.
#[cfg(feature = "cuda")]
pub fn cuda_queue() -> Option<Queue<CudaBackend>> {
    let queue = Platform::<CudaBackend>::new().default_queue().ok()?;
    queue.native_handle().ok()?;
    Some(queue)
}

// ============================================================================
// Random data
// ============================================================================

/// Scalar types that can be drawn uniformly from [-1, 1) per component
pub trait Sample: BlasScalar {
    fn sample(rng: &mut StdRng) -> Self;
}

impl Sample for f32 {
    fn sample(rng: &mut StdRng) -> Self {
        rng.random_range(-1.0..1.0)
    }
}

impl Sample for f64 {
    fn sample(rng: &mut StdRng) -> Self {
        rng.random_range(-1.0..1.0)
    }
}

impl Sample for Complex64 {
    fn sample(rng: &mut StdRng) -> Self {
        Complex64::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0))
    }
}

impl Sample for Complex128 {
    fn sample(rng: &mut StdRng) -> Self {
        Complex128::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0))
    }
}

/// Seeded random vector of `len` elements
pub fn rand_vec<T: Sample>(len: usize, seed: u64) -> Vec<T> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| T::sample(&mut rng)).collect()
}

/// Seeded random column-major `rows × cols` matrix stored with leading dimension `ld`
///
/// Padding rows hold random values too, so a routine reading past `rows`
/// would be caught by the comparison.
pub fn rand_matrix<T: Sample>(rows: usize, cols: usize, ld: usize, seed: u64) -> Vec<T> {
    assert!(ld >= rows.max(1));
    rand_vec(ld * cols, seed)
}

// ============================================================================
// Reference BLAS (straightforward loops, column-major)
// ============================================================================

#[inline]
pub fn at(i: usize, j: usize, ld: usize) -> usize {
    i + j * ld
}

/// Rank-2k update of the `uplo` triangle of C
///
/// `hermitian` selects her2k semantics: the second factor of each product
/// is conjugated, the second term uses conj(alpha) and the diagonal is kept
/// real. Otherwise syr2k semantics; any transposed `trans` means Aᵀ·B.
#[allow(clippy::too_many_arguments)]
pub fn ref_rank2k<T: BlasScalar>(
    hermitian: bool,
    uplo: Uplo,
    trans: Transpose,
    n: usize,
    k: usize,
    alpha: T,
    a: &[T],
    lda: usize,
    b: &[T],
    ldb: usize,
    beta: T,
    c: &mut [T],
    ldc: usize,
) {
    let cj = |v: T| if hermitian { v.conj() } else { v };
    let alpha2 = cj(alpha);
    for j in 0..n {
        let rows = match uplo {
            Uplo::Upper => 0..j + 1,
            Uplo::Lower => j..n,
        };
        for i in rows {
            let mut sum = T::zero();
            for l in 0..k {
                if trans.is_transposed() {
                    sum += alpha * cj(a[at(l, i, lda)]) * b[at(l, j, ldb)];
                    sum += alpha2 * cj(b[at(l, i, ldb)]) * a[at(l, j, lda)];
                } else {
                    sum += alpha * a[at(i, l, lda)] * cj(b[at(j, l, ldb)]);
                    sum += alpha2 * b[at(i, l, ldb)] * cj(a[at(j, l, lda)]);
                }
            }
            let old = if beta == T::zero() {
                T::zero()
            } else {
                beta * c[at(i, j, ldc)]
            };
            let mut v = old + sum;
            if hermitian && i == j {
                v = T::from_real(v.re());
            }
            c[at(i, j, ldc)] = v;
        }
    }
}

/// y = alpha · op(A) · x + beta · y with unit increments
#[allow(clippy::too_many_arguments)]
pub fn ref_gemv<T: BlasScalar>(
    trans: Transpose,
    m: usize,
    n: usize,
    alpha: T,
    a: &[T],
    lda: usize,
    x: &[T],
    beta: T,
    y: &mut [T],
) {
    let leny = if trans.is_transposed() { n } else { m };
    for (r, yr) in y.iter_mut().enumerate().take(leny) {
        let mut sum = T::zero();
        match trans {
            Transpose::NoTrans => {
                for j in 0..n {
                    sum += a[at(r, j, lda)] * x[j];
                }
            }
            Transpose::Trans => {
                for i in 0..m {
                    sum += a[at(i, r, lda)] * x[i];
                }
            }
            Transpose::ConjTrans => {
                for i in 0..m {
                    sum += a[at(i, r, lda)].conj() * x[i];
                }
            }
        }
        let old = if beta == T::zero() {
            T::zero()
        } else {
            beta * *yr
        };
        *yr = old + alpha * sum;
    }
}

// ============================================================================
// Comparison
// ============================================================================

/// Machine epsilon of the real type underlying `T`
pub fn eps<T: BlasScalar>() -> f64 {
    <T::Real as RealScalar>::EPSILON.to_f64()
}

/// Assert every element of `got` is within `units` epsilons of `want`
///
/// The error bound scales with the largest magnitude in `want` (at least
/// one), which is the size of the rounding an accumulated sum can carry.
pub fn assert_close<T: BlasScalar>(got: &[T], want: &[T], units: f64, msg: &str) {
    assert_eq!(got.len(), want.len(), "{}: length mismatch", msg);
    let mag = want
        .iter()
        .map(|v| v.abs().to_f64())
        .fold(1.0f64, f64::max);
    let tol = units * eps::<T>() * mag;
    for (i, (g, w)) in got.iter().zip(want).enumerate() {
        let diff = (*g - *w).abs().to_f64();
        assert!(
            diff <= tol,
            "{}: element {} differs: {:?} vs {:?} (diff={:.2e}, tol={:.2e})",
            msg,
            i,
            g,
            w,
            diff,
            tol
        );
    }
}
