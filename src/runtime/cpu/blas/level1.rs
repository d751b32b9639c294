//! Level 1 reference routines

use super::{CpuScalar, Strided};
use crate::blas::native::{ComplexLevel1, Level1, RealLevel1};
use crate::dtype::{BlasScalar, ComplexScalar, RealScalar};
use crate::error::{Error, Result};
use crate::runtime::cpu::CpuHandle;
use crate::runtime::{DevicePtr, PointerMode};

/// Scaled sum of squares: returns (scale, ssq) with ||v||² = scale² · ssq
fn sum_squares<R: RealScalar>(mut scale: R, mut ssq: R, v: R) -> (R, R) {
    if v != R::zero() {
        let absv = v.abs();
        if scale < absv {
            let r = scale / absv;
            ssq = R::one() + ssq * r * r;
            scale = absv;
        } else {
            let r = absv / scale;
            ssq += r * r;
        }
    }
    (scale, ssq)
}

/// Index of the first element selected by `better`, netlib conventions
///
/// # Safety
/// `x` must hold `n` elements at stride `incx`.
unsafe fn select_index<T: BlasScalar>(
    n: i64,
    x: DevicePtr<T>,
    incx: i64,
    better: impl Fn(T::Real, T::Real) -> bool,
) -> i64 {
    if n < 1 || incx <= 0 {
        return 0;
    }
    let x = Strided::new(x, n, incx);
    let mut best = 0i64;
    let mut best_val = unsafe { x.get(0) }.abs1();
    for i in 1..n {
        let v = unsafe { x.get(i) }.abs1();
        if better(v, best_val) {
            best = i;
            best_val = v;
        }
    }
    best + 1
}

fn write_index(routine: &'static str, result: DevicePtr<i32>, index: i64) -> Result<()> {
    let index = i32::try_from(index).map_err(|_| Error::overflow(routine, index))?;
    // SAFETY: result points at one validated i32 scalar.
    unsafe { result.as_mut_ptr().write(index) };
    Ok(())
}

impl<T: CpuScalar> Level1<T> for CpuHandle {
    unsafe fn asum(
        &self,
        n: i64,
        x: DevicePtr<T>,
        incx: i64,
        result: DevicePtr<T::Real>,
    ) -> Result<()> {
        self.expect_mode("cpu_asum", PointerMode::Device)?;
        let mut sum = T::Real::zero();
        if n > 0 && incx > 0 {
            let x = Strided::new(x, n, incx);
            for i in 0..n {
                sum += unsafe { x.get(i) }.abs1();
            }
        }
        unsafe { result.as_mut_ptr().write(sum) };
        Ok(())
    }

    unsafe fn scal(&self, n: i64, alpha: &T, x: DevicePtr<T>, incx: i64) -> Result<()> {
        self.expect_mode("cpu_scal", PointerMode::Host)?;
        if n <= 0 || incx <= 0 {
            return Ok(());
        }
        let x = Strided::new(x, n, incx);
        for i in 0..n {
            unsafe { x.set(i, *alpha * x.get(i)) };
        }
        Ok(())
    }

    unsafe fn axpy(
        &self,
        n: i64,
        alpha: &T,
        x: DevicePtr<T>,
        incx: i64,
        y: DevicePtr<T>,
        incy: i64,
    ) -> Result<()> {
        self.expect_mode("cpu_axpy", PointerMode::Host)?;
        if n <= 0 || *alpha == T::zero() {
            return Ok(());
        }
        let (x, y) = (Strided::new(x, n, incx), Strided::new(y, n, incy));
        for i in 0..n {
            unsafe { y.set(i, y.get(i) + *alpha * x.get(i)) };
        }
        Ok(())
    }

    unsafe fn copy(
        &self,
        n: i64,
        x: DevicePtr<T>,
        incx: i64,
        y: DevicePtr<T>,
        incy: i64,
    ) -> Result<()> {
        if n <= 0 {
            return Ok(());
        }
        let (x, y) = (Strided::new(x, n, incx), Strided::new(y, n, incy));
        for i in 0..n {
            unsafe { y.set(i, x.get(i)) };
        }
        Ok(())
    }

    unsafe fn swap(
        &self,
        n: i64,
        x: DevicePtr<T>,
        incx: i64,
        y: DevicePtr<T>,
        incy: i64,
    ) -> Result<()> {
        if n <= 0 {
            return Ok(());
        }
        let (x, y) = (Strided::new(x, n, incx), Strided::new(y, n, incy));
        for i in 0..n {
            unsafe {
                let t = x.get(i);
                x.set(i, y.get(i));
                y.set(i, t);
            }
        }
        Ok(())
    }

    unsafe fn nrm2(
        &self,
        n: i64,
        x: DevicePtr<T>,
        incx: i64,
        result: DevicePtr<T::Real>,
    ) -> Result<()> {
        self.expect_mode("cpu_nrm2", PointerMode::Device)?;
        let mut norm = T::Real::zero();
        if n > 0 && incx > 0 {
            let x = Strided::new(x, n, incx);
            let (mut scale, mut ssq) = (T::Real::zero(), T::Real::one());
            for i in 0..n {
                let v = unsafe { x.get(i) };
                (scale, ssq) = sum_squares(scale, ssq, v.re());
                if T::IS_COMPLEX {
                    (scale, ssq) = sum_squares(scale, ssq, v.im());
                }
            }
            norm = scale * ssq.sqrt();
        }
        unsafe { result.as_mut_ptr().write(norm) };
        Ok(())
    }

    unsafe fn rot(
        &self,
        n: i64,
        x: DevicePtr<T>,
        incx: i64,
        y: DevicePtr<T>,
        incy: i64,
        c: &T::Real,
        s: &T::Real,
    ) -> Result<()> {
        self.expect_mode("cpu_rot", PointerMode::Host)?;
        if n <= 0 {
            return Ok(());
        }
        let (c, s) = (*c, *s);
        let (x, y) = (Strided::new(x, n, incx), Strided::new(y, n, incy));
        for i in 0..n {
            unsafe {
                let (xi, yi) = (x.get(i), y.get(i));
                x.set(i, xi.scale(c) + yi.scale(s));
                y.set(i, yi.scale(c) - xi.scale(s));
            }
        }
        Ok(())
    }

    unsafe fn rotg(
        &self,
        a: DevicePtr<T>,
        b: DevicePtr<T>,
        c: DevicePtr<T::Real>,
        s: DevicePtr<T>,
    ) -> Result<()> {
        self.expect_mode("cpu_rotg", PointerMode::Device)?;
        unsafe {
            let (mut av, mut bv) = (a.as_ptr().read(), b.as_ptr().read());
            let (mut cv, mut sv) = (T::Real::zero(), T::zero());
            T::rotg(&mut av, &mut bv, &mut cv, &mut sv);
            a.as_mut_ptr().write(av);
            b.as_mut_ptr().write(bv);
            c.as_mut_ptr().write(cv);
            s.as_mut_ptr().write(sv);
        }
        Ok(())
    }

    unsafe fn iamax(
        &self,
        n: i64,
        x: DevicePtr<T>,
        incx: i64,
        result: DevicePtr<i32>,
    ) -> Result<()> {
        self.expect_mode("cpu_iamax", PointerMode::Device)?;
        let index = unsafe { select_index(n, x, incx, |v, best| v > best) };
        write_index("cpu_iamax", result, index)
    }

    unsafe fn iamin(
        &self,
        n: i64,
        x: DevicePtr<T>,
        incx: i64,
        result: DevicePtr<i32>,
    ) -> Result<()> {
        self.expect_mode("cpu_iamin", PointerMode::Device)?;
        let index = unsafe { select_index(n, x, incx, |v, best| v < best) };
        write_index("cpu_iamin", result, index)
    }
}

impl<T: CpuScalar + RealScalar> RealLevel1<T> for CpuHandle {
    unsafe fn dot(
        &self,
        n: i64,
        x: DevicePtr<T>,
        incx: i64,
        y: DevicePtr<T>,
        incy: i64,
        result: DevicePtr<T>,
    ) -> Result<()> {
        self.expect_mode("cpu_dot", PointerMode::Device)?;
        let sum = unsafe { dot_with(n, x, incx, y, incy, |v| v) };
        unsafe { result.as_mut_ptr().write(sum) };
        Ok(())
    }

    unsafe fn rotm(
        &self,
        n: i64,
        x: DevicePtr<T>,
        incx: i64,
        y: DevicePtr<T>,
        incy: i64,
        param: DevicePtr<T>,
    ) -> Result<()> {
        self.expect_mode("cpu_rotm", PointerMode::Device)?;
        let p = unsafe { std::slice::from_raw_parts(param.as_ptr(), 5) };
        let flag = p[0];
        let two = T::from_f64(2.0);
        if n <= 0 || flag == -two {
            return Ok(());
        }

        let (h11, h21, h12, h22) = if flag < T::zero() {
            (p[1], p[2], p[3], p[4])
        } else if flag == T::zero() {
            (T::one(), p[2], p[3], T::one())
        } else {
            (p[1], -T::one(), T::one(), p[4])
        };

        let (x, y) = (Strided::new(x, n, incx), Strided::new(y, n, incy));
        for i in 0..n {
            unsafe {
                let (w, z) = (x.get(i), y.get(i));
                x.set(i, w * h11 + z * h12);
                y.set(i, w * h21 + z * h22);
            }
        }
        Ok(())
    }

    unsafe fn rotmg(
        &self,
        d1: DevicePtr<T>,
        d2: DevicePtr<T>,
        x1: DevicePtr<T>,
        y1: DevicePtr<T>,
        param: DevicePtr<T>,
    ) -> Result<()> {
        self.expect_mode("cpu_rotmg", PointerMode::Device)?;
        unsafe {
            let mut state = RotmgState {
                d1: d1.as_ptr().read(),
                d2: d2.as_ptr().read(),
                x1: x1.as_ptr().read(),
            };
            let out = rotmg_kernel(&mut state, y1.as_ptr().read());
            d1.as_mut_ptr().write(state.d1);
            d2.as_mut_ptr().write(state.d2);
            x1.as_mut_ptr().write(state.x1);
            let p = std::slice::from_raw_parts_mut(param.as_mut_ptr(), 5);
            p.copy_from_slice(&out);
        }
        Ok(())
    }
}

impl<T: CpuScalar + ComplexScalar> ComplexLevel1<T> for CpuHandle {
    unsafe fn dotc(
        &self,
        n: i64,
        x: DevicePtr<T>,
        incx: i64,
        y: DevicePtr<T>,
        incy: i64,
        result: DevicePtr<T>,
    ) -> Result<()> {
        self.expect_mode("cpu_dotc", PointerMode::Device)?;
        let sum = unsafe { dot_with(n, x, incx, y, incy, |v: T| v.conj()) };
        unsafe { result.as_mut_ptr().write(sum) };
        Ok(())
    }

    unsafe fn dotu(
        &self,
        n: i64,
        x: DevicePtr<T>,
        incx: i64,
        y: DevicePtr<T>,
        incy: i64,
        result: DevicePtr<T>,
    ) -> Result<()> {
        self.expect_mode("cpu_dotu", PointerMode::Device)?;
        let sum = unsafe { dot_with(n, x, incx, y, incy, |v| v) };
        unsafe { result.as_mut_ptr().write(sum) };
        Ok(())
    }

    unsafe fn scal_real(&self, n: i64, alpha: &T::Real, x: DevicePtr<T>, incx: i64) -> Result<()> {
        self.expect_mode("cpu_scal_real", PointerMode::Host)?;
        if n <= 0 || incx <= 0 {
            return Ok(());
        }
        let x = Strided::new(x, n, incx);
        for i in 0..n {
            unsafe { x.set(i, x.get(i).scale(*alpha)) };
        }
        Ok(())
    }
}

/// Σ op(x_i) · y_i
///
/// # Safety
/// `x` and `y` must hold `n` elements at their strides.
unsafe fn dot_with<T: BlasScalar>(
    n: i64,
    x: DevicePtr<T>,
    incx: i64,
    y: DevicePtr<T>,
    incy: i64,
    op: impl Fn(T) -> T,
) -> T {
    let mut sum = T::zero();
    if n <= 0 {
        return sum;
    }
    let (x, y) = (Strided::new(x, n, incx), Strided::new(y, n, incy));
    for i in 0..n {
        sum += unsafe { op(x.get(i)) * y.get(i) };
    }
    sum
}

struct RotmgState<T> {
    d1: T,
    d2: T,
    x1: T,
}

/// Modified Givens construction (netlib `?rotmg`), returning the param vector
fn rotmg_kernel<T: RealScalar>(st: &mut RotmgState<T>, y1: T) -> [T; 5] {
    let (zero, one) = (T::zero(), T::one());
    let gam = T::from_f64(4096.0);
    let gamsq = gam * gam;
    let rgamsq = one / gamsq;

    let mut flag;
    let (mut h11, mut h12, mut h21, mut h22) = (zero, zero, zero, zero);

    if st.d1 < zero {
        flag = -one;
        st.d1 = zero;
        st.d2 = zero;
        st.x1 = zero;
    } else {
        let p2 = st.d2 * y1;
        if p2 == zero {
            return [-T::from_f64(2.0), zero, zero, zero, zero];
        }

        let p1 = st.d1 * st.x1;
        let q2 = p2 * y1;
        let q1 = p1 * st.x1;

        if q1.abs() > q2.abs() {
            h21 = -y1 / st.x1;
            h12 = p2 / p1;
            let u = one - h12 * h21;
            if u > zero {
                flag = zero;
                st.d1 = st.d1 / u;
                st.d2 = st.d2 / u;
                st.x1 = st.x1 * u;
            } else {
                flag = -one;
                h11 = zero;
                h12 = zero;
                h21 = zero;
                h22 = zero;
                st.d1 = zero;
                st.d2 = zero;
                st.x1 = zero;
            }
        } else if q2 < zero {
            flag = -one;
            st.d1 = zero;
            st.d2 = zero;
            st.x1 = zero;
        } else {
            flag = one;
            h11 = p1 / p2;
            h22 = st.x1 / y1;
            let u = one + h11 * h22;
            let temp = st.d2 / u;
            st.d2 = st.d1 / u;
            st.d1 = temp;
            st.x1 = y1 * u;
        }

        let to_full = |flag: &mut T, h11: &mut T, h12: &mut T, h21: &mut T, h22: &mut T| {
            if *flag >= zero {
                if *flag == zero {
                    *h11 = one;
                    *h22 = one;
                } else {
                    *h21 = -one;
                    *h12 = one;
                }
                *flag = -one;
            }
        };

        if st.d1 != zero {
            while st.d1 <= rgamsq || st.d1 >= gamsq {
                to_full(&mut flag, &mut h11, &mut h12, &mut h21, &mut h22);
                if st.d1 <= rgamsq {
                    st.d1 = st.d1 * gamsq;
                    st.x1 = st.x1 / gam;
                    h11 = h11 / gam;
                    h12 = h12 / gam;
                } else {
                    st.d1 = st.d1 / gamsq;
                    st.x1 = st.x1 * gam;
                    h11 = h11 * gam;
                    h12 = h12 * gam;
                }
            }
        }

        if st.d2 != zero {
            while st.d2.abs() <= rgamsq || st.d2.abs() >= gamsq {
                to_full(&mut flag, &mut h11, &mut h12, &mut h21, &mut h22);
                if st.d2.abs() <= rgamsq {
                    st.d2 = st.d2 * gamsq;
                    h21 = h21 / gam;
                    h22 = h22 / gam;
                } else {
                    st.d2 = st.d2 / gamsq;
                    h21 = h21 * gam;
                    h22 = h22 * gam;
                }
            }
        }
    }

    if flag < zero {
        [flag, h11, h21, h12, h22]
    } else if flag == zero {
        [flag, zero, h21, h12, zero]
    } else {
        [flag, h11, zero, zero, h22]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(param: [f64; 5], x: f64, y: f64) -> (f64, f64) {
        let (h11, h21, h12, h22) = match param[0] {
            f if f < 0.0 => (param[1], param[2], param[3], param[4]),
            f if f == 0.0 => (1.0, param[2], param[3], 1.0),
            _ => (param[1], -1.0, 1.0, param[4]),
        };
        (h11 * x + h12 * y, h21 * x + h22 * y)
    }

    #[test]
    fn test_rotmg_zeroes_second_component() {
        for &(d1, d2, x1, y1) in &[(1.0, 1.0, 3.0, 1.0), (2.0, 0.5, 1.0, 4.0), (1.0, 1e-9, 1.0, 1.0)] {
            let mut st = RotmgState { d1, d2, x1 };
            let param = rotmg_kernel(&mut st, y1);
            let (_, y) = apply(param, x1, y1);
            assert!(y.abs() < 1e-9, "param {param:?} leaves y = {y}");
        }
    }

    #[test]
    fn test_rotmg_zero_y_is_identity() {
        let mut st = RotmgState {
            d1: 1.0f32,
            d2: 1.0,
            x1: 2.0,
        };
        let param = rotmg_kernel(&mut st, 0.0);
        assert_eq!(param[0], -2.0);
        assert_eq!((st.d1, st.d2, st.x1), (1.0, 1.0, 2.0));
    }

    #[test]
    fn test_rotmg_negative_d1_clears() {
        let mut st = RotmgState {
            d1: -1.0f64,
            d2: 1.0,
            x1: 1.0,
        };
        let param = rotmg_kernel(&mut st, 1.0);
        assert_eq!(param, [-1.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!((st.d1, st.d2, st.x1), (0.0, 0.0, 0.0));
    }

    #[test]
    fn test_sum_squares_matches_naive() {
        let v = [3.0f64, -4.0, 12.0];
        let (mut scale, mut ssq) = (0.0, 1.0);
        for &x in &v {
            (scale, ssq) = sum_squares(scale, ssq, x);
        }
        assert!((scale * ssq.sqrt() - 13.0).abs() < 1e-12);
    }
}
