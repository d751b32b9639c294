//! Argument validation shared by the dispatchers
//!
//! Runs on the submitting thread, before any access is registered, so every
//! failure here is synchronous.

use crate::error::{Error, Result};

/// A dimension must be non-negative
pub(crate) fn dim(arg: &'static str, value: i64) -> Result<()> {
    if value < 0 {
        return Err(Error::invalid_argument(
            arg,
            format!("must be non-negative, got {value}"),
        ));
    }
    Ok(())
}

/// An increment whose absolute value is representable
pub(crate) fn increment(arg: &'static str, inc: i64) -> Result<i64> {
    inc.checked_abs().ok_or_else(|| Error::overflow(arg, inc))
}

/// An increment that must not be zero
pub(crate) fn nonzero_increment(arg: &'static str, inc: i64) -> Result<()> {
    if inc == 0 {
        return Err(Error::invalid_argument(arg, "increment must not be zero"));
    }
    Ok(())
}

/// A strided vector of `n` elements stored in a buffer of `len` elements
///
/// `n · |inc|` must fit in `i64`, and the buffer must hold the
/// `1 + (n - 1) · |inc|` elements the access pattern touches.
pub(crate) fn vector(
    arg: &'static str,
    inc_arg: &'static str,
    len: usize,
    n: i64,
    inc: i64,
) -> Result<()> {
    let abs = increment(inc_arg, inc)?;
    if n.checked_mul(abs).is_none() {
        return Err(Error::overflow(inc_arg, i128::from(n) * i128::from(abs)));
    }
    if n == 0 {
        return Ok(());
    }
    let required = 1 + (n - 1) * abs;
    check_len(arg, len, required)
}

/// A column-major `rows × cols` matrix with leading dimension `ld`
pub(crate) fn matrix(
    arg: &'static str,
    ld_arg: &'static str,
    len: usize,
    rows: i64,
    cols: i64,
    ld: i64,
) -> Result<()> {
    if ld < rows.max(1) {
        return Err(Error::invalid_argument(
            ld_arg,
            format!("leading dimension {ld} is smaller than the {rows} stored rows"),
        ));
    }
    if ld.checked_mul(cols).is_none() {
        return Err(Error::overflow(ld_arg, i128::from(ld) * i128::from(cols)));
    }
    if rows == 0 || cols == 0 {
        return Ok(());
    }
    let required = ld * (cols - 1) + rows;
    check_len(arg, len, required)
}

/// A buffer receiving (or providing) `count` scalars
pub(crate) fn scalars(arg: &'static str, len: usize, count: usize) -> Result<()> {
    if len < count {
        return Err(Error::BufferTooSmall {
            arg,
            required: count,
            len,
        });
    }
    Ok(())
}

fn check_len(arg: &'static str, len: usize, required: i64) -> Result<()> {
    let required = usize::try_from(required).map_err(|_| Error::overflow(arg, required))?;
    if len < required {
        return Err(Error::BufferTooSmall { arg, required, len });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_requirements() {
        assert!(vector("x", "incx", 10, 10, 1).is_ok());
        assert!(vector("x", "incx", 10, 4, -3).is_ok());
        assert!(vector("x", "incx", 0, 0, 5).is_ok());
        assert_eq!(
            vector("x", "incx", 9, 4, 3),
            Err(Error::BufferTooSmall {
                arg: "x",
                required: 10,
                len: 9
            })
        );
    }

    #[test]
    fn test_vector_overflow() {
        assert!(matches!(
            vector("x", "incx", 10, 2, i64::MIN),
            Err(Error::Overflow { arg: "incx", .. })
        ));
        assert!(matches!(
            vector("x", "incx", 10, i64::MAX / 2, 3),
            Err(Error::Overflow { arg: "incx", .. })
        ));
    }

    #[test]
    fn test_matrix_requirements() {
        assert!(matrix("a", "lda", 101 * 26 + 72, 72, 27, 101).is_ok());
        assert!(matches!(
            matrix("a", "lda", 1000, 72, 27, 71),
            Err(Error::InvalidArgument { arg: "lda", .. })
        ));
        assert!(matches!(
            matrix("a", "lda", 100, 72, 27, 101),
            Err(Error::BufferTooSmall { arg: "a", .. })
        ));
        assert!(matrix("a", "lda", 0, 0, 5, 1).is_ok());
        assert!(matches!(
            matrix("a", "lda", 0, 1, i64::MAX, 2),
            Err(Error::Overflow { arg: "lda", .. })
        ));
    }

    #[test]
    fn test_negative_dimension() {
        assert!(matches!(
            dim("n", -1),
            Err(Error::InvalidArgument { arg: "n", .. })
        ));
        assert!(dim("n", 0).is_ok());
    }
}
