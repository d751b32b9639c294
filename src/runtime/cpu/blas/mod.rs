//! Reference BLAS over host memory
//!
//! Netlib semantics: column-major storage, negative increments walk the
//! vector from its far end, and routines return early for `n <= 0`. Level 3
//! routines split the output matrix by column across rayon workers.

mod level1;
mod level2;
mod level3;

use crate::dtype::{BlasScalar, Complex64, Complex128, ComplexScalar, RealScalar};
use crate::runtime::DevicePtr;

/// Element types the reference CPU BLAS implements
///
/// Carries the per-type pieces that cannot be written once for real and
/// complex scalars alike.
pub trait CpuScalar: BlasScalar {
    /// Construct a Givens rotation in place (netlib `?rotg` semantics)
    fn rotg(a: &mut Self, b: &mut Self, c: &mut Self::Real, s: &mut Self);
}

impl CpuScalar for f32 {
    fn rotg(a: &mut f32, b: &mut f32, c: &mut f32, s: &mut f32) {
        real_rotg(a, b, c, s);
    }
}

impl CpuScalar for f64 {
    fn rotg(a: &mut f64, b: &mut f64, c: &mut f64, s: &mut f64) {
        real_rotg(a, b, c, s);
    }
}

impl CpuScalar for Complex64 {
    fn rotg(a: &mut Self, b: &mut Self, c: &mut f32, s: &mut Self) {
        complex_rotg(a, b, c, s);
    }
}

impl CpuScalar for Complex128 {
    fn rotg(a: &mut Self, b: &mut Self, c: &mut f64, s: &mut Self) {
        complex_rotg(a, b, c, s);
    }
}

/// Real Givens rotation: on exit `a` holds r and `b` holds z
fn real_rotg<T: RealScalar>(a: &mut T, b: &mut T, c: &mut T, s: &mut T) {
    let (zero, one) = (T::zero(), T::one());
    let roe = if a.abs() > b.abs() { *a } else { *b };
    let scale = a.abs() + b.abs();

    if scale == zero {
        *c = one;
        *s = zero;
        *a = zero;
        *b = zero;
        return;
    }

    let (sa, sb) = (*a / scale, *b / scale);
    let mut r = scale * (sa * sa + sb * sb).sqrt();
    if roe < zero {
        r = -r;
    }
    *c = *a / r;
    *s = *b / r;

    let mut z = one;
    if a.abs() > b.abs() {
        z = *s;
    }
    if b.abs() >= a.abs() && *c != zero {
        z = one / *c;
    }
    *a = r;
    *b = z;
}

/// Complex Givens rotation: on exit `a` holds r, `b` is unchanged
fn complex_rotg<T: ComplexScalar>(a: &mut T, b: &mut T, c: &mut T::Real, s: &mut T) {
    let zero = T::Real::zero();
    let abs_a = a.abs();

    if abs_a == zero {
        *c = zero;
        *s = T::one();
        *a = *b;
        return;
    }

    let scale = abs_a + b.abs();
    let ra = abs_a / scale;
    let rb = b.abs() / scale;
    let norm = scale * (ra * ra + rb * rb).sqrt();
    let alpha = a.scale(T::Real::one() / abs_a);

    *c = abs_a / norm;
    *s = (alpha * b.conj()).scale(T::Real::one() / norm);
    *a = alpha.scale(norm);
}

/// A strided vector view with netlib start-offset semantics
#[derive(Clone, Copy)]
pub(super) struct Strided<T> {
    base: *mut T,
    inc: isize,
}

impl<T: Copy> Strided<T> {
    /// View `n` elements with increment `inc`
    ///
    /// A negative increment starts at element `(1 - n) · inc`, so logical
    /// element 0 is the last one in memory.
    pub(super) fn new(ptr: DevicePtr<T>, n: i64, inc: i64) -> Self {
        let start = if inc < 0 { (1 - n) * inc } else { 0 };
        Self {
            base: ptr.as_mut_ptr().wrapping_offset(start as isize),
            inc: inc as isize,
        }
    }

    #[inline]
    fn at(&self, i: i64) -> *mut T {
        self.base.wrapping_offset(i as isize * self.inc)
    }

    /// # Safety
    /// Logical element `i` must lie inside the backing allocation.
    #[inline]
    pub(super) unsafe fn get(&self, i: i64) -> T {
        unsafe { self.at(i).read() }
    }

    /// # Safety
    /// Logical element `i` must lie inside the backing allocation.
    #[inline]
    pub(super) unsafe fn set(&self, i: i64, v: T) {
        unsafe { self.at(i).write(v) }
    }
}

/// Column-major matrix view
#[derive(Clone, Copy)]
pub(super) struct Matrix<T> {
    base: *mut T,
    ld: usize,
}

impl<T: Copy> Matrix<T> {
    pub(super) fn new(ptr: DevicePtr<T>, ld: i64) -> Self {
        Self {
            base: ptr.as_mut_ptr(),
            ld: ld as usize,
        }
    }

    /// # Safety
    /// (i, j) must lie inside the matrix.
    #[inline]
    pub(super) unsafe fn get(&self, i: usize, j: usize) -> T {
        unsafe { self.base.add(i + j * self.ld).read() }
    }

    /// # Safety
    /// (i, j) must lie inside the matrix.
    #[inline]
    pub(super) unsafe fn set(&self, i: usize, j: usize, v: T) {
        unsafe { self.base.add(i + j * self.ld).write(v) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_real_rotg() {
        let (mut a, mut b, mut c, mut s) = (3.0f64, 4.0, 0.0, 0.0);
        f64::rotg(&mut a, &mut b, &mut c, &mut s);
        assert!((a - 5.0).abs() < 1e-12);
        assert!((c - 0.6).abs() < 1e-12);
        assert!((s - 0.8).abs() < 1e-12);
        // |b| >= |a| and c != 0: z = 1/c
        assert!((b - 1.0 / 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_real_rotg_zero() {
        let (mut a, mut b, mut c, mut s) = (0.0f32, 0.0, 9.0, 9.0);
        f32::rotg(&mut a, &mut b, &mut c, &mut s);
        assert_eq!((a, b, c, s), (0.0, 0.0, 1.0, 0.0));
    }

    #[test]
    fn test_complex_rotg_annihilates() {
        let mut a = Complex128::new(1.0, 1.0);
        let b0 = Complex128::new(2.0, -1.0);
        let mut b = b0;
        let (mut c, mut s) = (0.0f64, Complex128::ZERO);
        let a0 = a;
        Complex128::rotg(&mut a, &mut b, &mut c, &mut s);

        // [c s; -conj(s) c] · [a0; b0] = [r; 0]
        let r = a0.scale(c) + s * b0;
        let zero = b0.scale(c) - s.conj() * a0;
        assert!((r.re - a.re).abs() < 1e-12 && (r.im - a.im).abs() < 1e-12);
        assert!(zero.magnitude() < 1e-12);
        assert_eq!(b, b0);
    }

    #[test]
    fn test_strided_negative_increment() {
        let mut v = [1.0f32, 2.0, 3.0, 4.0, 5.0];
        let p: DevicePtr<f32> = DevicePtr::from_addr(v.as_mut_ptr() as u64);
        let x = Strided::new(p, 3, -2);
        unsafe {
            assert_eq!(x.get(0), 5.0);
            assert_eq!(x.get(1), 3.0);
            assert_eq!(x.get(2), 1.0);
        }
    }
}
