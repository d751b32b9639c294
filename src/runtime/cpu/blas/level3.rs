//! Level 3 reference routines
//!
//! Rank-2k updates are computed in dot form per output element, one column
//! of C per task. Only the `uplo` triangle of C is read or written.

use super::{CpuScalar, Matrix};
use crate::blas::native::{HermitianLevel3, Level3};
use crate::blas::{Transpose, Uplo};
use crate::dtype::{BlasScalar, ComplexScalar};
use crate::error::Result;
use crate::runtime::cpu::CpuHandle;
use crate::runtime::{DevicePtr, PointerMode};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Operands of one rank-2k update
struct Rank2k<T> {
    uplo: Uplo,
    transposed: bool,
    /// Conjugate the "second" operand of each product (Hermitian update)
    conj: bool,
    n: usize,
    k: usize,
    alpha: T,
    alpha2: T,
    beta: T,
    /// Keep the diagonal real (Hermitian update)
    real_diagonal: bool,
    a: Matrix<T>,
    b: Matrix<T>,
    c: Matrix<T>,
}

// SAFETY: each task writes a disjoint column of C; A and B are only read.
unsafe impl<T: Send> Send for Rank2k<T> {}
unsafe impl<T: Sync> Sync for Rank2k<T> {}

impl<T: BlasScalar> Rank2k<T> {
    #[inline]
    fn op(&self, v: T) -> T {
        if self.conj { v.conj() } else { v }
    }

    /// Σ_l A(i,l)·op(B(j,l)) and Σ_l B(i,l)·op(A(j,l)), or their transposed forms
    ///
    /// # Safety
    /// i, j < n and the operands cover their validated extents.
    unsafe fn sums(&self, i: usize, j: usize) -> (T, T) {
        let (mut s1, mut s2) = (T::zero(), T::zero());
        for l in 0..self.k {
            unsafe {
                if self.transposed {
                    s1 += self.op(self.a.get(l, i)) * self.b.get(l, j);
                    s2 += self.op(self.b.get(l, i)) * self.a.get(l, j);
                } else {
                    s1 += self.a.get(i, l) * self.op(self.b.get(j, l));
                    s2 += self.b.get(i, l) * self.op(self.a.get(j, l));
                }
            }
        }
        (s1, s2)
    }

    /// Update column `j` of the referenced triangle
    ///
    /// # Safety
    /// j < n.
    unsafe fn column(&self, j: usize) {
        let rows = match self.uplo {
            Uplo::Upper => 0..j + 1,
            Uplo::Lower => j..self.n,
        };
        let skip_products = self.alpha == T::zero();

        for i in rows {
            let update = if skip_products {
                T::zero()
            } else {
                let (s1, s2) = unsafe { self.sums(i, j) };
                self.alpha * s1 + self.alpha2 * s2
            };

            let scaled = if self.beta == T::zero() {
                T::zero()
            } else {
                self.beta * unsafe { self.c.get(i, j) }
            };

            let mut v = scaled + update;
            if self.real_diagonal && i == j {
                v = T::from_real(v.re());
            }
            unsafe { self.c.set(i, j, v) };
        }
    }

    fn run(&self, min_len: usize) {
        #[cfg(feature = "rayon")]
        {
            (0..self.n)
                .into_par_iter()
                .with_min_len(min_len)
                .for_each(|j| unsafe { self.column(j) });
        }

        #[cfg(not(feature = "rayon"))]
        {
            let _ = min_len;
            for j in 0..self.n {
                unsafe { self.column(j) };
            }
        }
    }
}

impl<T: CpuScalar> Level3<T> for CpuHandle {
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
    ) -> Result<()> {
        self.expect_mode("cpu_syr2k", PointerMode::Host)?;
        let (alpha, beta) = (*alpha, *beta);
        if n == 0 || ((alpha == T::zero() || k == 0) && beta == T::one()) {
            return Ok(());
        }

        Rank2k {
            uplo,
            transposed: trans.is_transposed(),
            conj: false,
            n: n as usize,
            k: k as usize,
            alpha,
            alpha2: alpha,
            beta,
            real_diagonal: false,
            a: Matrix::new(a, lda),
            b: Matrix::new(b, ldb),
            c: Matrix::new(c, ldc),
        }
        .run(self.rayon_min_len());
        Ok(())
    }
}

impl<T: CpuScalar + ComplexScalar> HermitianLevel3<T> for CpuHandle {
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
    ) -> Result<()> {
        self.expect_mode("cpu_her2k", PointerMode::Host)?;
        let (alpha, beta) = (*alpha, *beta);
        let one = <T::Real as BlasScalar>::one();
        if n == 0 || ((alpha == T::zero() || k == 0) && beta == one) {
            return Ok(());
        }

        Rank2k {
            uplo,
            transposed: trans.is_transposed(),
            conj: true,
            n: n as usize,
            k: k as usize,
            alpha,
            alpha2: alpha.conj(),
            beta: T::from_real(beta),
            real_diagonal: true,
            a: Matrix::new(a, lda),
            b: Matrix::new(b, ldb),
            c: Matrix::new(c, ldc),
        }
        .run(self.rayon_min_len());
        Ok(())
    }
}
