//! Level 2 reference routines

use super::{CpuScalar, Matrix, Strided};
use crate::blas::Transpose;
use crate::blas::native::Level2;
use crate::error::Result;
use crate::runtime::cpu::CpuHandle;
use crate::runtime::{DevicePtr, PointerMode};

impl<T: CpuScalar> Level2<T> for CpuHandle {
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
    ) -> Result<()> {
        self.expect_mode("cpu_gemv", PointerMode::Host)?;
        let (alpha, beta) = (*alpha, *beta);
        if m == 0 || n == 0 || (alpha == T::zero() && beta == T::one()) {
            return Ok(());
        }

        let (lenx, leny) = if trans.is_transposed() { (m, n) } else { (n, m) };
        let a = Matrix::new(a, lda);
        let x = Strided::new(x, lenx, incx);
        let y = Strided::new(y, leny, incy);

        if beta != T::one() {
            for i in 0..leny {
                let v = if beta == T::zero() {
                    T::zero()
                } else {
                    beta * unsafe { y.get(i) }
                };
                unsafe { y.set(i, v) };
            }
        }
        if alpha == T::zero() {
            return Ok(());
        }

        let (m, n) = (m as usize, n as usize);
        match trans {
            Transpose::NoTrans => {
                for j in 0..n {
                    let temp = alpha * unsafe { x.get(j as i64) };
                    for i in 0..m {
                        unsafe { y.set(i as i64, y.get(i as i64) + temp * a.get(i, j)) };
                    }
                }
            }
            Transpose::Trans | Transpose::ConjTrans => {
                let conj = trans == Transpose::ConjTrans;
                for j in 0..n {
                    let mut temp = T::zero();
                    for i in 0..m {
                        let aij = unsafe { a.get(i, j) };
                        let aij = if conj { aij.conj() } else { aij };
                        temp += aij * unsafe { x.get(i as i64) };
                    }
                    unsafe { y.set(j as i64, y.get(j as i64) + alpha * temp) };
                }
            }
        }
        Ok(())
    }
}
