//! cuBLAS entry points per element type
//!
//! Each macro instantiation binds one element type to its typed cuBLAS
//! symbols. Dimensions and strides are narrowed to the native `int`; values
//! outside its range fail with `Overflow` before the library is called.

use cudarc::cublas::sys::{self as cublas, cublasFillMode_t, cublasOperation_t};
use std::ffi::c_int;

use super::backend::{CudaHandle, check};
use super::types::{dev, dev_mut, host};
use crate::blas::native::{ComplexLevel1, HermitianLevel3, Level1, Level2, Level3, RealLevel1};
use crate::blas::{Transpose, Uplo};
use crate::dtype::{Complex64, Complex128};
use crate::error::{Error, Result};
use crate::runtime::DevicePtr;

#[inline]
fn narrow(arg: &'static str, v: i64) -> Result<c_int> {
    c_int::try_from(v).map_err(|_| Error::overflow(arg, v))
}

#[inline]
fn op(trans: Transpose) -> cublasOperation_t {
    match trans {
        Transpose::NoTrans => cublasOperation_t::CUBLAS_OP_N,
        Transpose::Trans => cublasOperation_t::CUBLAS_OP_T,
        Transpose::ConjTrans => cublasOperation_t::CUBLAS_OP_C,
    }
}

#[inline]
fn fill(uplo: Uplo) -> cublasFillMode_t {
    match uplo {
        Uplo::Upper => cublasFillMode_t::CUBLAS_FILL_MODE_UPPER,
        Uplo::Lower => cublasFillMode_t::CUBLAS_FILL_MODE_LOWER,
    }
}

macro_rules! impl_level1 {
    (
        $t:ty, $real:ty,
        asum: $asum:ident, scal: $scal:ident, axpy: $axpy:ident, copy: $copy:ident,
        swap: $swap:ident, nrm2: $nrm2:ident, rot: $rot:ident, rotg: $rotg:ident,
        iamax: $iamax:ident, iamin: $iamin:ident
    ) => {
        impl Level1<$t> for CudaHandle {
            unsafe fn asum(
                &self,
                n: i64,
                x: DevicePtr<$t>,
                incx: i64,
                result: DevicePtr<$real>,
            ) -> Result<()> {
                let (n, incx) = (narrow("n", n)?, narrow("incx", incx)?);
                check(stringify!($asum), unsafe {
                    cublas::$asum(self.raw(), n, dev(x), incx, dev_mut(result))
                })
            }

            unsafe fn scal(&self, n: i64, alpha: &$t, x: DevicePtr<$t>, incx: i64) -> Result<()> {
                let (n, incx) = (narrow("n", n)?, narrow("incx", incx)?);
                check(stringify!($scal), unsafe {
                    cublas::$scal(self.raw(), n, host(alpha), dev_mut(x), incx)
                })
            }

            unsafe fn axpy(
                &self,
                n: i64,
                alpha: &$t,
                x: DevicePtr<$t>,
                incx: i64,
                y: DevicePtr<$t>,
                incy: i64,
            ) -> Result<()> {
                let n = narrow("n", n)?;
                let (incx, incy) = (narrow("incx", incx)?, narrow("incy", incy)?);
                check(stringify!($axpy), unsafe {
                    cublas::$axpy(self.raw(), n, host(alpha), dev(x), incx, dev_mut(y), incy)
                })
            }

            unsafe fn copy(
                &self,
                n: i64,
                x: DevicePtr<$t>,
                incx: i64,
                y: DevicePtr<$t>,
                incy: i64,
            ) -> Result<()> {
                let n = narrow("n", n)?;
                let (incx, incy) = (narrow("incx", incx)?, narrow("incy", incy)?);
                check(stringify!($copy), unsafe {
                    cublas::$copy(self.raw(), n, dev(x), incx, dev_mut(y), incy)
                })
            }

            unsafe fn swap(
                &self,
                n: i64,
                x: DevicePtr<$t>,
                incx: i64,
                y: DevicePtr<$t>,
                incy: i64,
            ) -> Result<()> {
                let n = narrow("n", n)?;
                let (incx, incy) = (narrow("incx", incx)?, narrow("incy", incy)?);
                check(stringify!($swap), unsafe {
                    cublas::$swap(self.raw(), n, dev_mut(x), incx, dev_mut(y), incy)
                })
            }

            unsafe fn nrm2(
                &self,
                n: i64,
                x: DevicePtr<$t>,
                incx: i64,
                result: DevicePtr<$real>,
            ) -> Result<()> {
                let (n, incx) = (narrow("n", n)?, narrow("incx", incx)?);
                check(stringify!($nrm2), unsafe {
                    cublas::$nrm2(self.raw(), n, dev(x), incx, dev_mut(result))
                })
            }

            unsafe fn rot(
                &self,
                n: i64,
                x: DevicePtr<$t>,
                incx: i64,
                y: DevicePtr<$t>,
                incy: i64,
                c: &$real,
                s: &$real,
            ) -> Result<()> {
                let n = narrow("n", n)?;
                let (incx, incy) = (narrow("incx", incx)?, narrow("incy", incy)?);
                check(stringify!($rot), unsafe {
                    cublas::$rot(
                        self.raw(),
                        n,
                        dev_mut(x),
                        incx,
                        dev_mut(y),
                        incy,
                        host(c),
                        host(s),
                    )
                })
            }

            unsafe fn rotg(
                &self,
                a: DevicePtr<$t>,
                b: DevicePtr<$t>,
                c: DevicePtr<$real>,
                s: DevicePtr<$t>,
            ) -> Result<()> {
                check(stringify!($rotg), unsafe {
                    cublas::$rotg(self.raw(), dev_mut(a), dev_mut(b), dev_mut(c), dev_mut(s))
                })
            }

            unsafe fn iamax(
                &self,
                n: i64,
                x: DevicePtr<$t>,
                incx: i64,
                result: DevicePtr<i32>,
            ) -> Result<()> {
                let (n, incx) = (narrow("n", n)?, narrow("incx", incx)?);
                check(stringify!($iamax), unsafe {
                    cublas::$iamax(self.raw(), n, dev(x), incx, dev_mut(result))
                })
            }

            unsafe fn iamin(
                &self,
                n: i64,
                x: DevicePtr<$t>,
                incx: i64,
                result: DevicePtr<i32>,
            ) -> Result<()> {
                let (n, incx) = (narrow("n", n)?, narrow("incx", incx)?);
                check(stringify!($iamin), unsafe {
                    cublas::$iamin(self.raw(), n, dev(x), incx, dev_mut(result))
                })
            }
        }
    };
}

macro_rules! impl_real_level1 {
    ($t:ty, dot: $dot:ident, rotm: $rotm:ident, rotmg: $rotmg:ident) => {
        impl RealLevel1<$t> for CudaHandle {
            unsafe fn dot(
                &self,
                n: i64,
                x: DevicePtr<$t>,
                incx: i64,
                y: DevicePtr<$t>,
                incy: i64,
                result: DevicePtr<$t>,
            ) -> Result<()> {
                let n = narrow("n", n)?;
                let (incx, incy) = (narrow("incx", incx)?, narrow("incy", incy)?);
                check(stringify!($dot), unsafe {
                    cublas::$dot(self.raw(), n, dev(x), incx, dev(y), incy, dev_mut(result))
                })
            }

            unsafe fn rotm(
                &self,
                n: i64,
                x: DevicePtr<$t>,
                incx: i64,
                y: DevicePtr<$t>,
                incy: i64,
                param: DevicePtr<$t>,
            ) -> Result<()> {
                let n = narrow("n", n)?;
                let (incx, incy) = (narrow("incx", incx)?, narrow("incy", incy)?);
                check(stringify!($rotm), unsafe {
                    cublas::$rotm(self.raw(), n, dev_mut(x), incx, dev_mut(y), incy, dev(param))
                })
            }

            unsafe fn rotmg(
                &self,
                d1: DevicePtr<$t>,
                d2: DevicePtr<$t>,
                x1: DevicePtr<$t>,
                y1: DevicePtr<$t>,
                param: DevicePtr<$t>,
            ) -> Result<()> {
                check(stringify!($rotmg), unsafe {
                    cublas::$rotmg(
                        self.raw(),
                        dev_mut(d1),
                        dev_mut(d2),
                        dev_mut(x1),
                        dev(y1),
                        dev_mut(param),
                    )
                })
            }
        }
    };
}

macro_rules! impl_complex_level1 {
    ($t:ty, $real:ty, dotc: $dotc:ident, dotu: $dotu:ident, scal_real: $scal_real:ident) => {
        impl ComplexLevel1<$t> for CudaHandle {
            unsafe fn dotc(
                &self,
                n: i64,
                x: DevicePtr<$t>,
                incx: i64,
                y: DevicePtr<$t>,
                incy: i64,
                result: DevicePtr<$t>,
            ) -> Result<()> {
                let n = narrow("n", n)?;
                let (incx, incy) = (narrow("incx", incx)?, narrow("incy", incy)?);
                check(stringify!($dotc), unsafe {
                    cublas::$dotc(self.raw(), n, dev(x), incx, dev(y), incy, dev_mut(result))
                })
            }

            unsafe fn dotu(
                &self,
                n: i64,
                x: DevicePtr<$t>,
                incx: i64,
                y: DevicePtr<$t>,
                incy: i64,
                result: DevicePtr<$t>,
            ) -> Result<()> {
                let n = narrow("n", n)?;
                let (incx, incy) = (narrow("incx", incx)?, narrow("incy", incy)?);
                check(stringify!($dotu), unsafe {
                    cublas::$dotu(self.raw(), n, dev(x), incx, dev(y), incy, dev_mut(result))
                })
            }

            unsafe fn scal_real(
                &self,
                n: i64,
                alpha: &$real,
                x: DevicePtr<$t>,
                incx: i64,
            ) -> Result<()> {
                let (n, incx) = (narrow("n", n)?, narrow("incx", incx)?);
                check(stringify!($scal_real), unsafe {
                    cublas::$scal_real(self.raw(), n, host(alpha), dev_mut(x), incx)
                })
            }
        }
    };
}

macro_rules! impl_level2 {
    ($t:ty, gemv: $gemv:ident) => {
        impl Level2<$t> for CudaHandle {
            unsafe fn gemv(
                &self,
                trans: Transpose,
                m: i64,
                n: i64,
                alpha: &$t,
                a: DevicePtr<$t>,
                lda: i64,
                x: DevicePtr<$t>,
                incx: i64,
                beta: &$t,
                y: DevicePtr<$t>,
                incy: i64,
            ) -> Result<()> {
                let (m, n, lda) = (narrow("m", m)?, narrow("n", n)?, narrow("lda", lda)?);
                let (incx, incy) = (narrow("incx", incx)?, narrow("incy", incy)?);
                check(stringify!($gemv), unsafe {
                    cublas::$gemv(
                        self.raw(),
                        op(trans),
                        m,
                        n,
                        host(alpha),
                        dev(a),
                        lda,
                        dev(x),
                        incx,
                        host(beta),
                        dev_mut(y),
                        incy,
                    )
                })
            }
        }
    };
}

macro_rules! impl_level3 {
    ($t:ty, syr2k: $syr2k:ident) => {
        impl Level3<$t> for CudaHandle {
            unsafe fn syr2k(
                &self,
                uplo: Uplo,
                trans: Transpose,
                n: i64,
                k: i64,
                alpha: &$t,
                a: DevicePtr<$t>,
                lda: i64,
                b: DevicePtr<$t>,
                ldb: i64,
                beta: &$t,
                c: DevicePtr<$t>,
                ldc: i64,
            ) -> Result<()> {
                let (n, k) = (narrow("n", n)?, narrow("k", k)?);
                let (lda, ldb, ldc) = (narrow("lda", lda)?, narrow("ldb", ldb)?, narrow("ldc", ldc)?);
                check(stringify!($syr2k), unsafe {
                    cublas::$syr2k(
                        self.raw(),
                        fill(uplo),
                        op(trans),
                        n,
                        k,
                        host(alpha),
                        dev(a),
                        lda,
                        dev(b),
                        ldb,
                        host(beta),
                        dev_mut(c),
                        ldc,
                    )
                })
            }
        }
    };
}

macro_rules! impl_hermitian_level3 {
    ($t:ty, $real:ty, her2k: $her2k:ident) => {
        impl HermitianLevel3<$t> for CudaHandle {
            unsafe fn her2k(
                &self,
                uplo: Uplo,
                trans: Transpose,
                n: i64,
                k: i64,
                alpha: &$t,
                a: DevicePtr<$t>,
                lda: i64,
                b: DevicePtr<$t>,
                ldb: i64,
                beta: &$real,
                c: DevicePtr<$t>,
                ldc: i64,
            ) -> Result<()> {
                let (n, k) = (narrow("n", n)?, narrow("k", k)?);
                let (lda, ldb, ldc) = (narrow("lda", lda)?, narrow("ldb", ldb)?, narrow("ldc", ldc)?);
                check(stringify!($her2k), unsafe {
                    cublas::$her2k(
                        self.raw(),
                        fill(uplo),
                        op(trans),
                        n,
                        k,
                        host(alpha),
                        dev(a),
                        lda,
                        dev(b),
                        ldb,
                        host(beta),
                        dev_mut(c),
                        ldc,
                    )
                })
            }
        }
    };
}

impl_level1!(
    f32, f32,
    asum: cublasSasum_v2, scal: cublasSscal_v2, axpy: cublasSaxpy_v2, copy: cublasScopy_v2,
    swap: cublasSswap_v2, nrm2: cublasSnrm2_v2, rot: cublasSrot_v2, rotg: cublasSrotg_v2,
    iamax: cublasIsamax_v2, iamin: cublasIsamin_v2
);
impl_level1!(
    f64, f64,
    asum: cublasDasum_v2, scal: cublasDscal_v2, axpy: cublasDaxpy_v2, copy: cublasDcopy_v2,
    swap: cublasDswap_v2, nrm2: cublasDnrm2_v2, rot: cublasDrot_v2, rotg: cublasDrotg_v2,
    iamax: cublasIdamax_v2, iamin: cublasIdamin_v2
);
impl_level1!(
    Complex64, f32,
    asum: cublasScasum_v2, scal: cublasCscal_v2, axpy: cublasCaxpy_v2, copy: cublasCcopy_v2,
    swap: cublasCswap_v2, nrm2: cublasScnrm2_v2, rot: cublasCsrot_v2, rotg: cublasCrotg_v2,
    iamax: cublasIcamax_v2, iamin: cublasIcamin_v2
);
impl_level1!(
    Complex128, f64,
    asum: cublasDzasum_v2, scal: cublasZscal_v2, axpy: cublasZaxpy_v2, copy: cublasZcopy_v2,
    swap: cublasZswap_v2, nrm2: cublasDznrm2_v2, rot: cublasZdrot_v2, rotg: cublasZrotg_v2,
    iamax: cublasIzamax_v2, iamin: cublasIzamin_v2
);

impl_real_level1!(f32, dot: cublasSdot_v2, rotm: cublasSrotm_v2, rotmg: cublasSrotmg_v2);
impl_real_level1!(f64, dot: cublasDdot_v2, rotm: cublasDrotm_v2, rotmg: cublasDrotmg_v2);

impl_complex_level1!(Complex64, f32, dotc: cublasCdotc_v2, dotu: cublasCdotu_v2, scal_real: cublasCsscal_v2);
impl_complex_level1!(Complex128, f64, dotc: cublasZdotc_v2, dotu: cublasZdotu_v2, scal_real: cublasZdscal_v2);

impl_level2!(f32, gemv: cublasSgemv_v2);
impl_level2!(f64, gemv: cublasDgemv_v2);
impl_level2!(Complex64, gemv: cublasCgemv_v2);
impl_level2!(Complex128, gemv: cublasZgemv_v2);

impl_level3!(f32, syr2k: cublasSsyr2k_v2);
impl_level3!(f64, syr2k: cublasDsyr2k_v2);
impl_level3!(Complex64, syr2k: cublasCsyr2k_v2);
impl_level3!(Complex128, syr2k: cublasZsyr2k_v2);

impl_hermitian_level3!(Complex64, f32, her2k: cublasCher2k_v2);
impl_hermitian_level3!(Complex128, f64, her2k: cublasZher2k_v2);
