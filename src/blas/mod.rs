//! BLAS routines dispatched through a queue
//!
//! Every routine validates its arguments on the calling thread, declares
//! the buffer accesses the native call performs, and submits one interop
//! task that sets the pointer mode and invokes the backend's typed native
//! routine. Routines return once the work is submitted; results become
//! visible through [`Buffer::host_read`](crate::runtime::Buffer::host_read)
//! or [`Buffer::to_vec`](crate::runtime::Buffer::to_vec).
//!
//! Routines that need a host-side correction of a native result (`sdsdot`,
//! `dsdot`, `iamax`, `iamin`) block until that correction is applied.
//!
//! Matrices are column-major with an explicit leading dimension.

mod level1;
mod level2;
mod level3;
pub mod native;
mod shim;
mod validate;

pub use level1::{
    asum, axpy, copy, dot, dotc, dotu, dsdot, iamax, iamin, nrm2, rot, rotg, rotm, rotmg, scal,
    scal_real, sdsdot, swap,
};
pub use level2::gemv;
pub use level3::{her2k, syr2k};
pub use native::{ComplexLevel1, HermitianLevel3, Level1, Level2, Level3, RealLevel1};

use std::fmt;

/// Which triangle of a symmetric or Hermitian matrix is referenced
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Uplo {
    /// Upper triangle
    Upper,
    /// Lower triangle
    Lower,
}

/// Operation applied to a matrix operand
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Transpose {
    /// op(A) = A
    NoTrans,
    /// op(A) = Aᵀ
    Trans,
    /// op(A) = Aᴴ
    ConjTrans,
}

impl Transpose {
    /// Whether the operand is stored transposed
    #[inline]
    pub fn is_transposed(self) -> bool {
        !matches!(self, Self::NoTrans)
    }
}

impl fmt::Display for Uplo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Upper => "upper",
            Self::Lower => "lower",
        })
    }
}

impl fmt::Display for Transpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NoTrans => "N",
            Self::Trans => "T",
            Self::ConjTrans => "C",
        })
    }
}
