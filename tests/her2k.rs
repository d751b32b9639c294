//! Integration tests for the Hermitian rank-2k update
//!
//! Uses non-square operands and leading dimensions larger than the stored
//! rows so layout mistakes show up as mismatches.
#![cfg(feature = "cpu")]

mod common;

use blashal::blas::{self, HermitianLevel3, Transpose, Uplo};
use blashal::dtype::{BlasScalar, Complex64, Complex128, ComplexScalar, RealScalar};
use blashal::error::Error;
use blashal::runtime::{Backend, Buffer, Queue};
use common::{Sample, assert_close, cpu_inline_queue, cpu_queue, rand_matrix, ref_rank2k};

const N: usize = 72;
const K: usize = 27;
const LDA: usize = 101;
const LDB: usize = 102;
const LDC: usize = 103;

const CASES: [(Uplo, Transpose); 4] = [
    (Uplo::Lower, Transpose::NoTrans),
    (Uplo::Upper, Transpose::NoTrans),
    (Uplo::Lower, Transpose::ConjTrans),
    (Uplo::Upper, Transpose::ConjTrans),
];

fn alpha<T: ComplexScalar>() -> T {
    T::new(
        <T::Real as RealScalar>::from_f64(2.0),
        <T::Real as RealScalar>::from_f64(-0.5),
    )
}

/// Run one her2k against the reference and compare the whole C buffer
fn check_her2k<B, T>(queue: &Queue<B>, uplo: Uplo, trans: Transpose, seed: u64)
where
    B: Backend,
    T: ComplexScalar + Sample,
    B::Handle: HermitianLevel3<T>,
{
    let (rows, cols) = if trans.is_transposed() { (K, N) } else { (N, K) };
    let a_host: Vec<T> = rand_matrix(rows, cols, LDA, seed);
    let b_host: Vec<T> = rand_matrix(rows, cols, LDB, seed + 1);
    let mut c_host: Vec<T> = rand_matrix(N, N, LDC, seed + 2);

    let alpha = alpha::<T>();
    let beta = <T::Real as BlasScalar>::one();

    let a = Buffer::from_slice(&a_host);
    let b = Buffer::from_slice(&b_host);
    let c = Buffer::from_slice(&c_host);
    blas::her2k(
        queue, uplo, trans, N as i64, K as i64, alpha, &a, LDA as i64, &b, LDB as i64, beta, &c,
        LDC as i64,
    )
    .unwrap();

    ref_rank2k(
        true,
        uplo,
        trans,
        N,
        K,
        alpha,
        &a_host,
        LDA,
        &b_host,
        LDB,
        T::from_real(beta),
        &mut c_host,
        LDC,
    );

    let units = 10.0 * N.max(K) as f64;
    let msg = format!("her2k {} {} {}", T::DTYPE, uplo, trans);
    assert_close(&c.to_vec(), &c_host, units, &msg);
}

#[test]
fn test_her2k_complex64() {
    let queue = cpu_queue();
    for (i, (uplo, trans)) in CASES.into_iter().enumerate() {
        check_her2k::<_, Complex64>(&queue, uplo, trans, 100 + 10 * i as u64);
    }
}

#[test]
fn test_her2k_complex128() {
    let queue = cpu_queue();
    for (i, (uplo, trans)) in CASES.into_iter().enumerate() {
        check_her2k::<_, Complex128>(&queue, uplo, trans, 200 + 10 * i as u64);
    }
}

#[test]
fn test_her2k_inline_queue_matches() {
    let queue = cpu_inline_queue();
    check_her2k::<_, Complex128>(&queue, Uplo::Lower, Transpose::ConjTrans, 300);
}

#[test]
fn test_her2k_diagonal_is_real() {
    let queue = cpu_queue();
    let n = 4usize;
    let a: Vec<Complex64> = rand_matrix(n, 3, n, 7);
    let b: Vec<Complex64> = rand_matrix(n, 3, n, 8);
    // Non-real diagonal on input
    let c: Vec<Complex64> = rand_matrix(n, n, n, 9);

    let (a, b, c) = (
        Buffer::from_slice(&a),
        Buffer::from_slice(&b),
        Buffer::from_slice(&c),
    );
    blas::her2k(
        &queue,
        Uplo::Upper,
        Transpose::NoTrans,
        n as i64,
        3,
        Complex64::new(0.5, 1.5),
        &a,
        n as i64,
        &b,
        n as i64,
        0.75,
        &c,
        n as i64,
    )
    .unwrap();

    let c = c.to_vec();
    for j in 0..n {
        assert_eq!(c[j + j * n].im, 0.0, "diagonal element {j}");
    }
}

#[test]
fn test_her2k_beta_zero_ignores_c() {
    let queue = cpu_queue();
    let n = 5usize;
    let k = 2usize;
    let a_host: Vec<Complex128> = rand_matrix(n, k, n, 11);
    let b_host: Vec<Complex128> = rand_matrix(n, k, n, 12);
    let nan = Complex128::new(f64::NAN, f64::NAN);
    let mut c_host = vec![Complex128::ZERO; n * n];
    for j in 0..n {
        for i in j..n {
            c_host[i + j * n] = nan;
        }
    }

    let c = Buffer::from_slice(&c_host);
    blas::her2k(
        &queue,
        Uplo::Lower,
        Transpose::NoTrans,
        n as i64,
        k as i64,
        Complex128::ONE,
        &Buffer::from_slice(&a_host),
        n as i64,
        &Buffer::from_slice(&b_host),
        n as i64,
        0.0,
        &c,
        n as i64,
    )
    .unwrap();

    ref_rank2k(
        true,
        Uplo::Lower,
        Transpose::NoTrans,
        n,
        k,
        Complex128::ONE,
        &a_host,
        n,
        &b_host,
        n,
        Complex128::ZERO,
        &mut c_host,
        n,
    );
    assert_close(&c.to_vec(), &c_host, 10.0 * n as f64, "her2k beta=0");
}

#[test]
fn test_her2k_quick_return_leaves_c() {
    let queue = cpu_queue();
    let c_host: Vec<Complex64> = rand_matrix(3, 3, 3, 21);
    let c = Buffer::from_slice(&c_host);
    let empty = Buffer::<Complex64>::zeroed(0);

    // k = 0 with beta = 1: C is not touched, not even its diagonal
    blas::her2k(
        &queue,
        Uplo::Upper,
        Transpose::NoTrans,
        3,
        0,
        Complex64::ONE,
        &empty,
        3,
        &empty,
        3,
        1.0,
        &c,
        3,
    )
    .unwrap();
    assert_eq!(c.to_vec(), c_host);

    // n = 0: nothing to do
    blas::her2k(
        &queue,
        Uplo::Lower,
        Transpose::ConjTrans,
        0,
        4,
        Complex64::ONE,
        &empty,
        4,
        &empty,
        4,
        0.0,
        &empty,
        1,
    )
    .unwrap();
}

#[test]
fn test_her2k_rejects_plain_transpose() {
    let queue = cpu_queue();
    let buf = Buffer::<Complex64>::zeroed(4);
    let err = blas::her2k(
        &queue,
        Uplo::Lower,
        Transpose::Trans,
        2,
        2,
        Complex64::ONE,
        &buf,
        2,
        &buf,
        2,
        1.0,
        &buf,
        2,
    )
    .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { arg: "trans", .. }));
}

#[test]
fn test_her2k_rejects_short_leading_dimension() {
    let queue = cpu_queue();
    let buf = Buffer::<Complex128>::zeroed(64);
    let err = blas::her2k(
        &queue,
        Uplo::Upper,
        Transpose::NoTrans,
        4,
        2,
        Complex128::ONE,
        &buf,
        3,
        &buf,
        4,
        1.0,
        &buf,
        4,
    )
    .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { arg: "lda", .. }));
}

#[test]
fn test_her2k_rejects_small_buffer() {
    let queue = cpu_queue();
    let a = Buffer::<Complex64>::zeroed(LDA * K);
    let b = Buffer::<Complex64>::zeroed(LDB * K);
    let c = Buffer::<Complex64>::zeroed(LDC * (N - 1));
    let err = blas::her2k(
        &queue,
        Uplo::Upper,
        Transpose::NoTrans,
        N as i64,
        K as i64,
        Complex64::ONE,
        &a,
        LDA as i64,
        &b,
        LDB as i64,
        1.0,
        &c,
        LDC as i64,
    )
    .unwrap_err();
    assert!(matches!(err, Error::BufferTooSmall { arg: "c", .. }));
}
