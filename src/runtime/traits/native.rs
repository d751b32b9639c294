//! Native handle and memory staging capabilities

use crate::dtype::Element;
use crate::error::Result;
use crate::runtime::{AccessMode, DevicePtr, RawRegion};

/// Where the native library reads and writes scalar arguments
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PointerMode {
    /// Scalars are host values passed by reference
    #[default]
    Host = 0,
    /// Scalars live in device memory (buffer scalars)
    Device = 1,
}

impl PointerMode {
    pub(crate) fn from_u8(v: u8) -> Self {
        if v == Self::Device as u8 {
            Self::Device
        } else {
            Self::Host
        }
    }
}

/// A per-queue native handle: execution stream plus BLAS library handle
///
/// The handle carries pointer-mode state that persists between calls, so
/// every routine sets the mode it needs immediately before its native call.
pub trait NativeHandle: Send + Sync + 'static {
    /// Set where the next native calls read/write scalars
    fn set_pointer_mode(&self, mode: PointerMode) -> Result<()>;

    /// Current pointer mode
    fn pointer_mode(&self) -> Result<PointerMode>;
}

/// Translation of portable buffer storage into native pointers
///
/// A staging session lives for exactly one interop task. Pointers it hands
/// out are valid until `finish` (or drop) ends the session.
pub trait MemoryStaging {
    /// Produce a native pointer for a host region accessed in `mode`
    ///
    /// The region is never empty; zero-length buffers are handled before
    /// the backend is consulted.
    fn translate<T: Element>(
        &mut self,
        region: RawRegion<T>,
        mode: AccessMode,
    ) -> Result<DevicePtr<T>>;

    /// End the session: publish writes back to the buffers and release
    /// every native resource acquired by `translate`.
    fn finish(self) -> Result<()>;
}
