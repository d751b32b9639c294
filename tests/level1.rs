//! Integration tests for the level 1 routines on the CPU backend
#![cfg(feature = "cpu")]

mod common;

use blashal::blas;
use blashal::dtype::{Complex64, Complex128};
use blashal::error::Error;
use blashal::runtime::{Buffer, NativeHandle, PointerMode};
use common::{assert_close, cpu_inline_queue, cpu_queue, rand_vec};

// ============================================================================
// Reductions
// ============================================================================

#[test]
fn test_asum_real_and_complex() {
    let queue = cpu_queue();

    let x = Buffer::from_slice(&[1.0f32, -2.0, 3.0, -4.0]);
    let result = Buffer::<f32>::zeroed(1);
    blas::asum(&queue, 4, &x, 1, &result).unwrap();
    assert_eq!(result.to_vec(), vec![10.0]);

    let z = Buffer::from_slice(&[Complex128::new(1.0, -2.0), Complex128::new(-3.0, 0.5)]);
    let result = Buffer::<f64>::zeroed(1);
    blas::asum(&queue, 2, &z, 1, &result).unwrap();
    assert_eq!(result.to_vec(), vec![6.5]);
}

#[test]
fn test_negative_increment_matches_positive() {
    let queue = cpu_queue();
    let data: Vec<f64> = rand_vec(9, 42);
    let x = Buffer::from_slice(&data);

    let pos = Buffer::<f64>::zeroed(1);
    let neg = Buffer::<f64>::zeroed(1);
    blas::asum(&queue, 5, &x, 2, &pos).unwrap();
    blas::asum(&queue, 5, &x, -2, &neg).unwrap();
    assert_eq!(pos.to_vec(), neg.to_vec());
    assert!(pos.to_vec()[0] > 0.0);

    blas::nrm2(&queue, 5, &x, 2, &pos).unwrap();
    blas::nrm2(&queue, 5, &x, -2, &neg).unwrap();
    assert_eq!(pos.to_vec(), neg.to_vec());
    assert!(pos.to_vec()[0] > 0.0);

    let a = Buffer::from_slice(&data);
    let b = Buffer::from_slice(&data);
    blas::scal(&queue, 5, 3.0, &a, 2).unwrap();
    blas::scal(&queue, 5, 3.0, &b, -2).unwrap();
    assert_eq!(a.to_vec(), b.to_vec());
    assert_eq!(a.to_vec()[2], 3.0 * data[2]);
    assert_eq!(a.to_vec()[1], data[1]);

    let zdata: Vec<Complex64> = rand_vec(6, 43);
    let za = Buffer::from_slice(&zdata);
    let zb = Buffer::from_slice(&zdata);
    blas::scal_real(&queue, 3, -0.5, &za, 2).unwrap();
    blas::scal_real(&queue, 3, -0.5, &zb, -2).unwrap();
    assert_eq!(za.to_vec(), zb.to_vec());
    assert_eq!(za.to_vec()[4], zdata[4].scale(-0.5));
}

#[test]
fn test_nrm2_scaled() {
    let queue = cpu_queue();
    let x = Buffer::from_slice(&[3.0e200f64, 4.0e200]);
    let result = Buffer::<f64>::zeroed(1);
    blas::nrm2(&queue, 2, &x, 1, &result).unwrap();
    let norm = result.to_vec()[0];
    assert!((norm - 5.0e200).abs() <= 5.0e200 * 1e-15, "norm = {norm}");

    let z = Buffer::from_slice(&[Complex64::new(3.0, 4.0)]);
    let result = Buffer::<f32>::zeroed(1);
    blas::nrm2(&queue, 1, &z, 1, &result).unwrap();
    assert!((result.to_vec()[0] - 5.0).abs() < 1e-6);
}

#[test]
fn test_dot_family() {
    let queue = cpu_queue();

    let x = Buffer::from_slice(&[1.0f64, 2.0, 3.0]);
    let y = Buffer::from_slice(&[4.0f64, 5.0, 6.0]);
    let result = Buffer::<f64>::zeroed(1);
    blas::dot(&queue, 3, &x, 1, &y, 1, &result).unwrap();
    assert_eq!(result.to_vec(), vec![32.0]);

    // Reversed y: 1·6 + 2·5 + 3·4
    blas::dot(&queue, 3, &x, 1, &y, -1, &result).unwrap();
    assert_eq!(result.to_vec(), vec![28.0]);

    let zx = Buffer::from_slice(&[Complex64::new(1.0, 2.0), Complex64::new(0.0, -1.0)]);
    let zy = Buffer::from_slice(&[Complex64::new(3.0, -1.0), Complex64::new(2.0, 2.0)]);
    let result = Buffer::<Complex64>::zeroed(1);

    // (1+2i)(3-i) + (-i)(2+2i) = (5+5i) + (2-2i)
    blas::dotu(&queue, 2, &zx, 1, &zy, 1, &result).unwrap();
    assert_eq!(result.to_vec(), vec![Complex64::new(7.0, 3.0)]);

    // (1-2i)(3-i) + (i)(2+2i) = (1-7i) + (-2+2i)
    blas::dotc(&queue, 2, &zx, 1, &zy, 1, &result).unwrap();
    assert_eq!(result.to_vec(), vec![Complex64::new(-1.0, -5.0)]);
}

#[test]
fn test_sdsdot_adds_scalar_in_single_precision() {
    let queue = cpu_queue();
    let x = Buffer::from_slice(&[1.0f32, 2.0, 3.0]);
    let y = Buffer::from_slice(&[4.0f32, 5.0, 6.0]);
    let result = Buffer::<f32>::zeroed(1);
    blas::sdsdot(&queue, 3, 0.5, &x, 1, &y, 1, &result).unwrap();
    assert_eq!(result.to_vec(), vec![32.5]);

    // n = 0 still adds sb
    blas::sdsdot(&queue, 0, -1.25, &x, 1, &y, 1, &result).unwrap();
    assert_eq!(result.to_vec(), vec![-1.25]);
}

#[test]
fn test_dsdot_widens_single_precision_sum() {
    let queue = cpu_queue();
    let x = Buffer::from_slice(&[1.0f32, 2.0, 3.0]);
    let y = Buffer::from_slice(&[4.0f32, 5.0, 6.0]);
    let result = Buffer::<f64>::zeroed(1);
    blas::dsdot(&queue, 3, &x, 1, &y, 1, &result).unwrap();
    assert_eq!(result.to_vec(), vec![32.0]);

    // 1e8 + 1 rounds away in f32; the widened result keeps that rounding
    let x = Buffer::from_slice(&[1.0e8f32, 1.0, -1.0e8]);
    let y = Buffer::from_slice(&[1.0f32, 1.0, 1.0]);
    blas::dsdot(&queue, 3, &x, 1, &y, 1, &result).unwrap();
    let mut expected = 0.0f32;
    for v in [1.0e8f32, 1.0, -1.0e8] {
        expected += v;
    }
    assert_eq!(result.to_vec(), vec![f64::from(expected)]);
}

// ============================================================================
// Vector updates
// ============================================================================

#[test]
fn test_axpy_with_strides() {
    let queue = cpu_queue();
    let x = Buffer::from_slice(&[1.0f64, 9.0, 2.0, 9.0, 3.0]);
    let y = Buffer::from_slice(&[10.0f64, 20.0, 30.0]);
    blas::axpy(&queue, 3, 2.0, &x, 2, &y, 1).unwrap();
    assert_eq!(y.to_vec(), vec![12.0, 24.0, 36.0]);

    // Negative incy walks y from its far end
    let y = Buffer::from_slice(&[10.0f64, 20.0, 30.0]);
    blas::axpy(&queue, 3, 1.0, &x, 2, &y, -1).unwrap();
    assert_eq!(y.to_vec(), vec![13.0, 22.0, 31.0]);
}

#[test]
fn test_copy_and_swap() {
    let queue = cpu_queue();
    let x = Buffer::from_slice(&[Complex128::new(1.0, 1.0), Complex128::new(2.0, 2.0)]);
    let y = Buffer::<Complex128>::zeroed(4);
    blas::copy(&queue, 2, &x, 1, &y, 2).unwrap();
    assert_eq!(
        y.to_vec(),
        vec![
            Complex128::new(1.0, 1.0),
            Complex128::ZERO,
            Complex128::new(2.0, 2.0),
            Complex128::ZERO
        ]
    );

    // A zero increment broadcasts the first element
    let z = Buffer::<Complex128>::zeroed(3);
    blas::copy(&queue, 3, &x, 0, &z, 1).unwrap();
    assert_eq!(z.to_vec(), vec![Complex128::new(1.0, 1.0); 3]);

    let a = Buffer::from_slice(&[1.0f32, 2.0, 3.0]);
    let b = Buffer::from_slice(&[4.0f32, 5.0, 6.0]);
    blas::swap(&queue, 3, &a, 1, &b, -1).unwrap();
    assert_eq!(a.to_vec(), vec![6.0, 5.0, 4.0]);
    assert_eq!(b.to_vec(), vec![3.0, 2.0, 1.0]);
}

#[test]
fn test_swap_twice_restores() {
    let queue = cpu_queue();
    let xs: Vec<f64> = rand_vec(16, 5);
    let ys: Vec<f64> = rand_vec(16, 6);
    let (x, y) = (Buffer::from_slice(&xs), Buffer::from_slice(&ys));
    blas::swap(&queue, 8, &x, 2, &y, -2).unwrap();
    blas::swap(&queue, 8, &x, 2, &y, -2).unwrap();
    assert_eq!(x.to_vec(), xs);
    assert_eq!(y.to_vec(), ys);
}

// ============================================================================
// Rotations
// ============================================================================

#[test]
fn test_rotg_then_rot_annihilates() {
    let queue = cpu_queue();
    let a = Buffer::from_slice(&[3.0f64]);
    let b = Buffer::from_slice(&[4.0f64]);
    let c = Buffer::<f64>::zeroed(1);
    let s = Buffer::<f64>::zeroed(1);
    blas::rotg(&queue, &a, &b, &c, &s).unwrap();

    let (r, c, s) = (a.to_vec()[0], c.to_vec()[0], s.to_vec()[0]);
    assert!((r - 5.0).abs() < 1e-12);
    assert!((c - 0.6).abs() < 1e-12);
    assert!((s - 0.8).abs() < 1e-12);

    let x = Buffer::from_slice(&[3.0f64, 6.0]);
    let y = Buffer::from_slice(&[4.0f64, 8.0]);
    blas::rot(&queue, 2, &x, 1, &y, 1, c, s).unwrap();
    assert_close(&x.to_vec(), &[5.0, 10.0], 64.0, "rot x");
    assert_close(&y.to_vec(), &[0.0, 0.0], 64.0, "rot y");
}

#[test]
fn test_complex_rotg() {
    let queue = cpu_queue();
    let a0 = Complex64::new(1.0, 1.0);
    let b0 = Complex64::new(2.0, -1.0);
    let (a, b) = (Buffer::from_slice(&[a0]), Buffer::from_slice(&[b0]));
    let c = Buffer::<f32>::zeroed(1);
    let s = Buffer::<Complex64>::zeroed(1);
    blas::rotg(&queue, &a, &b, &c, &s).unwrap();

    // r = c·a + s·b, and -conj(s)·a + c·b = 0
    let (r, c, s) = (a.to_vec()[0], c.to_vec()[0], s.to_vec()[0]);
    let lhs = a0.scale(c) + s * b0;
    assert_close(&[lhs], &[r], 64.0, "rotg r");
    let zero = b0.scale(c) - s.conj() * a0;
    assert_close(&[zero], &[Complex64::ZERO], 64.0, "rotg annihilation");
}

#[test]
fn test_rotmg_then_rotm_annihilates() {
    let queue = cpu_queue();
    let (x1, y1) = (1.5f64, 0.7f64);
    let d1 = Buffer::from_slice(&[2.0f64]);
    let d2 = Buffer::from_slice(&[3.0f64]);
    let x1_buf = Buffer::from_slice(&[x1]);
    let param = Buffer::<f64>::zeroed(5);
    blas::rotmg(&queue, &d1, &d2, &x1_buf, y1, &param).unwrap();
    assert_ne!(param.to_vec()[0], -2.0);

    let x = Buffer::from_slice(&[x1]);
    let y = Buffer::from_slice(&[y1]);
    blas::rotm(&queue, 1, &x, 1, &y, 1, &param).unwrap();
    assert_close(&y.to_vec(), &[0.0], 8.0, "rotm y");
    assert_close(&x.to_vec(), &x1_buf.to_vec(), 8.0, "rotm x");
}

#[test]
fn test_rotm_identity_flag() {
    let queue = cpu_queue();
    let x = Buffer::from_slice(&[1.0f32, 2.0]);
    let y = Buffer::from_slice(&[3.0f32, 4.0]);
    let param = Buffer::from_slice(&[-2.0f32, 7.0, 7.0, 7.0, 7.0]);
    blas::rotm(&queue, 2, &x, 1, &y, 1, &param).unwrap();
    assert_eq!(x.to_vec(), vec![1.0, 2.0]);
    assert_eq!(y.to_vec(), vec![3.0, 4.0]);
}

// ============================================================================
// Index routines
// ============================================================================

#[test]
fn test_iamax_iamin_zero_based() {
    let queue = cpu_queue();
    let x = Buffer::from_slice(&[1.0f64, -7.0, 3.0, 7.0, 0.5]);
    let result = Buffer::<i64>::zeroed(1);

    blas::iamax(&queue, 5, &x, 1, &result).unwrap();
    assert_eq!(result.to_vec(), vec![1], "first of the tied maxima");

    blas::iamin(&queue, 5, &x, 1, &result).unwrap();
    assert_eq!(result.to_vec(), vec![4]);

    // Stride 2 sees [1, 3, 0.5]
    blas::iamax(&queue, 3, &x, 2, &result).unwrap();
    assert_eq!(result.to_vec(), vec![1]);
}

#[test]
fn test_iamax_complex_uses_abs1() {
    let queue = cpu_queue();
    // |re| + |im|: 3, 4, 3.5; the modulus would pick index 0
    let x = Buffer::from_slice(&[
        Complex128::new(3.0, 0.0),
        Complex128::new(2.0, 2.0),
        Complex128::new(-0.5, 3.0),
    ]);
    let result = Buffer::<i64>::zeroed(1);
    blas::iamax(&queue, 3, &x, 1, &result).unwrap();
    assert_eq!(result.to_vec(), vec![1]);
}

#[test]
fn test_index_of_empty_vector_is_zero() {
    let queue = cpu_queue();
    let x = Buffer::<f32>::zeroed(0);
    let result = Buffer::from_slice(&[99i64]);
    blas::iamax(&queue, 0, &x, 1, &result).unwrap();
    assert_eq!(result.to_vec(), vec![0]);

    let result = Buffer::from_slice(&[99i64]);
    blas::iamin(&queue, 0, &x, 1, &result).unwrap();
    assert_eq!(result.to_vec(), vec![0]);
}

#[test]
fn test_index_of_non_positive_stride_is_zero() {
    let queue = cpu_queue();
    let x = Buffer::from_slice(&[1.0f64, -9.0, 4.0]);

    for incx in [-1, 0] {
        let result = Buffer::from_slice(&[99i64]);
        blas::iamax(&queue, 3, &x, incx, &result).unwrap();
        assert_eq!(result.to_vec(), vec![0], "iamax incx={incx}");

        let result = Buffer::from_slice(&[99i64]);
        blas::iamin(&queue, 3, &x, incx, &result).unwrap();
        assert_eq!(result.to_vec(), vec![0], "iamin incx={incx}");
    }
}

// ============================================================================
// Dispatch properties
// ============================================================================

#[test]
fn test_pointer_mode_follows_scalar_location() {
    let queue = cpu_inline_queue();
    let handle = queue.native_handle().unwrap();
    let x = Buffer::from_slice(&[1.0f64, 2.0]);
    let result = Buffer::<f64>::zeroed(1);

    blas::asum(&queue, 2, &x, 1, &result).unwrap();
    assert_eq!(handle.pointer_mode().unwrap(), PointerMode::Device);

    blas::scal(&queue, 2, 2.0, &x, 1).unwrap();
    assert_eq!(handle.pointer_mode().unwrap(), PointerMode::Host);

    blas::nrm2(&queue, 2, &x, 1, &result).unwrap();
    assert_eq!(handle.pointer_mode().unwrap(), PointerMode::Device);

    // Consecutive routines with opposite modes both succeed
    assert_eq!(x.to_vec(), vec![2.0, 4.0]);
    assert!((result.to_vec()[0] - 20.0f64.sqrt()).abs() < 1e-12);
}

#[test]
fn test_results_are_idempotent() {
    let queue = cpu_queue();
    let data: Vec<Complex64> = rand_vec(32, 77);
    let x = Buffer::from_slice(&data);
    let first = Buffer::<f32>::zeroed(1);
    let second = Buffer::<f32>::zeroed(1);
    blas::nrm2(&queue, 32, &x, 1, &first).unwrap();
    blas::nrm2(&queue, 32, &x, 1, &second).unwrap();
    assert_eq!(first.to_vec(), second.to_vec());
    assert_eq!(x.to_vec(), data);
}

#[test]
fn test_validation_errors_are_synchronous() {
    let queue = cpu_queue();
    let x = Buffer::from_slice(&[1.0f64, 2.0, 3.0]);
    let empty = Buffer::<f64>::zeroed(0);

    let err = blas::asum(&queue, 3, &x, 1, &empty).unwrap_err();
    assert!(matches!(err, Error::BufferTooSmall { arg: "result", .. }));

    let err = blas::scal(&queue, 4, 2.0, &x, 1).unwrap_err();
    assert!(matches!(
        err,
        Error::BufferTooSmall {
            arg: "x",
            required: 4,
            len: 3
        }
    ));

    let err = blas::scal(&queue, 2, 2.0, &x, i64::MIN).unwrap_err();
    assert!(matches!(err, Error::Overflow { arg: "incx", .. }));

    let err = blas::scal(&queue, -1, 2.0, &x, 1).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { arg: "n", .. }));

    let param = Buffer::<f64>::zeroed(4);
    let err = blas::rotm(&queue, 1, &x, 1, &x, 1, &param).unwrap_err();
    assert!(matches!(err, Error::BufferTooSmall { arg: "param", .. }));

    // Nothing was submitted
    assert_eq!(x.to_vec(), vec![1.0, 2.0, 3.0]);
    assert!(queue.take_async_errors().is_empty());
}
