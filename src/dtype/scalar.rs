//! Scalar traits for the closed set of BLAS element types
//!
//! Routines are generic over these traits; the set of implementors is fixed
//! (`f32`, `f64`, `Complex64`, `Complex128`), so any unsupported combination
//! of element types is rejected at compile time.

use super::{Complex64, Complex128, Element};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

/// A BLAS element type: real or complex, single or double precision
pub trait BlasScalar:
    Element
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + AddAssign
{
    /// Real type of the same precision (`Self` for real types)
    type Real: RealScalar;

    /// Whether this is a complex type
    const IS_COMPLEX: bool;

    /// Additive identity
    fn zero() -> Self;

    /// Multiplicative identity
    fn one() -> Self;

    /// Embed a real value
    fn from_real(re: Self::Real) -> Self;

    /// Real part
    fn re(self) -> Self::Real;

    /// Imaginary part (zero for real types)
    fn im(self) -> Self::Real;

    /// Complex conjugate (identity for real types)
    fn conj(self) -> Self;

    /// Multiply by a real factor
    fn scale(self, factor: Self::Real) -> Self;

    /// Modulus |z|
    fn abs(self) -> Self::Real;

    /// BLAS "abs1" magnitude: |re| + |im|
    ///
    /// Used by the `asum` and `i?amax` / `i?amin` families.
    #[inline]
    fn abs1(self) -> Self::Real {
        self.re().abs() + self.im().abs()
    }
}

/// Real BLAS element types
pub trait RealScalar: BlasScalar<Real = Self> + PartialOrd {
    /// Machine epsilon
    const EPSILON: Self;

    /// Square root
    fn sqrt(self) -> Self;

    /// Lossless widening to f64
    fn to_f64(self) -> f64;

    /// Rounding conversion from f64
    fn from_f64(v: f64) -> Self;
}

/// Complex BLAS element types
pub trait ComplexScalar: BlasScalar {
    /// Build from real and imaginary parts
    fn new(re: Self::Real, im: Self::Real) -> Self;
}

macro_rules! impl_real_scalar {
    ($t:ty) => {
        impl BlasScalar for $t {
            type Real = $t;
            const IS_COMPLEX: bool = false;

            #[inline]
            fn zero() -> Self {
                0.0
            }

            #[inline]
            fn one() -> Self {
                1.0
            }

            #[inline]
            fn from_real(re: $t) -> Self {
                re
            }

            #[inline]
            fn re(self) -> $t {
                self
            }

            #[inline]
            fn im(self) -> $t {
                0.0
            }

            #[inline]
            fn conj(self) -> Self {
                self
            }

            #[inline]
            fn scale(self, factor: $t) -> Self {
                self * factor
            }

            #[inline]
            fn abs(self) -> $t {
                <$t>::abs(self)
            }

            #[inline]
            fn abs1(self) -> $t {
                <$t>::abs(self)
            }
        }

        impl RealScalar for $t {
            const EPSILON: $t = <$t>::EPSILON;

            #[inline]
            fn sqrt(self) -> Self {
                <$t>::sqrt(self)
            }

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }

            #[inline]
            fn from_f64(v: f64) -> Self {
                v as $t
            }
        }
    };
}

impl_real_scalar!(f32);
impl_real_scalar!(f64);

macro_rules! impl_complex_scalar {
    ($t:ty, $real:ty) => {
        impl BlasScalar for $t {
            type Real = $real;
            const IS_COMPLEX: bool = true;

            #[inline]
            fn zero() -> Self {
                <$t>::ZERO
            }

            #[inline]
            fn one() -> Self {
                <$t>::ONE
            }

            #[inline]
            fn from_real(re: $real) -> Self {
                <$t>::new(re, 0.0)
            }

            #[inline]
            fn re(self) -> $real {
                self.re
            }

            #[inline]
            fn im(self) -> $real {
                self.im
            }

            #[inline]
            fn conj(self) -> Self {
                <$t>::conj(self)
            }

            #[inline]
            fn scale(self, factor: $real) -> Self {
                <$t>::scale(self, factor)
            }

            #[inline]
            fn abs(self) -> $real {
                self.magnitude()
            }
        }

        impl ComplexScalar for $t {
            #[inline]
            fn new(re: $real, im: $real) -> Self {
                <$t>::new(re, im)
            }
        }
    };
}

impl_complex_scalar!(Complex64, f32);
impl_complex_scalar!(Complex128, f64);

#[cfg(test)]
mod tests {
    use super::*;

    fn abs1_of<T: BlasScalar>(v: T) -> T::Real {
        v.abs1()
    }

    #[test]
    fn test_abs1_real_and_complex() {
        assert_eq!(abs1_of(-3.0f32), 3.0);
        assert_eq!(abs1_of(Complex64::new(-3.0, 4.0)), 7.0);
        assert_eq!(abs1_of(Complex128::new(1.0, -1.0)), 2.0);
    }

    #[test]
    fn test_conj_is_identity_for_reals() {
        assert_eq!(BlasScalar::conj(2.5f64), 2.5);
        assert_eq!(
            BlasScalar::conj(Complex128::new(1.0, 2.0)),
            Complex128::new(1.0, -2.0)
        );
    }

    #[test]
    fn test_real_part_roundtrip() {
        let z = <Complex64 as BlasScalar>::from_real(4.0);
        assert_eq!(z.re(), 4.0);
        assert_eq!(z.im(), 0.0);
        assert!(Complex64::IS_COMPLEX);
        assert!(!f32::IS_COMPLEX);
    }
}
