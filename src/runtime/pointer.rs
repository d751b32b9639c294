//! Native pointers handed to backend routines

use std::fmt;
use std::marker::PhantomData;

/// A typed native address valid for the duration of one interop task
///
/// On the CPU backend this is the host address of the buffer storage; on
/// GPU backends it is a device allocation. The null pointer is the sentinel
/// for zero-length buffers and must never be dereferenced.
pub struct DevicePtr<T> {
    addr: u64,
    _marker: PhantomData<*mut T>,
}

// SAFETY: a DevicePtr is a plain address; all dereferences are unsafe and
// happen inside the task that owns the access.
unsafe impl<T> Send for DevicePtr<T> {}
unsafe impl<T> Sync for DevicePtr<T> {}

impl<T> DevicePtr<T> {
    /// Sentinel pointer for zero-length buffers
    #[inline]
    pub const fn null() -> Self {
        Self::from_addr(0)
    }

    /// Wrap a raw address
    #[inline]
    pub const fn from_addr(addr: u64) -> Self {
        Self {
            addr,
            _marker: PhantomData,
        }
    }

    /// Raw address
    #[inline]
    pub const fn addr(self) -> u64 {
        self.addr
    }

    /// Whether this is the null sentinel
    #[inline]
    pub const fn is_null(self) -> bool {
        self.addr == 0
    }

    /// Address as a const pointer
    #[inline]
    pub fn as_ptr(self) -> *const T {
        self.addr as usize as *const T
    }

    /// Address as a mutable pointer
    #[inline]
    pub fn as_mut_ptr(self) -> *mut T {
        self.addr as usize as *mut T
    }

    /// Reinterpret as a pointer to a layout-compatible type
    #[inline]
    pub fn cast<U>(self) -> DevicePtr<U> {
        DevicePtr::from_addr(self.addr)
    }
}

impl<T> Clone for DevicePtr<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for DevicePtr<T> {}

impl<T> PartialEq for DevicePtr<T> {
    fn eq(&self, other: &Self) -> bool {
        self.addr == other.addr
    }
}

impl<T> Eq for DevicePtr<T> {}

impl<T> fmt::Debug for DevicePtr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DevicePtr(0x{:x})", self.addr)
    }
}

/// Host storage of a buffer as seen by a staging session
pub struct RawRegion<T> {
    ptr: *mut T,
    len: usize,
}

impl<T> RawRegion<T> {
    pub(crate) fn new(ptr: *mut T, len: usize) -> Self {
        Self { ptr, len }
    }

    /// First element of the host storage
    #[inline]
    pub fn as_mut_ptr(&self) -> *mut T {
        self.ptr
    }

    /// Number of elements
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the region holds no elements
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Size in bytes
    #[inline]
    pub fn size_in_bytes(&self) -> usize {
        self.len * std::mem::size_of::<T>()
    }
}
