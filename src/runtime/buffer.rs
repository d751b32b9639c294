//! Portable buffers with dependency tracking
//!
//! A `Buffer<T>` is reference-counted host storage shared between host code
//! and in-flight tasks. Every access, whether from a queued task or from the
//! host, registers with the buffer's tracker and waits for the submissions
//! it conflicts with:
//!
//! - a read waits on the last writer
//! - a write (or read-write) waits on the last writer and every reader since
//!
//! Registration is serialized process-wide, so accesses spanning several
//! buffers and queues always observe one global order and cannot form a
//! dependency cycle.

use parking_lot::Mutex;
use smallvec::SmallVec;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;
use std::sync::Arc;

use super::event::{Completion, Event};
use super::pointer::RawRegion;
use crate::dtype::Element;

/// Global registration lock; see module docs
static REGISTRATION: Mutex<()> = Mutex::new(());

pub(crate) fn registration_lock() -> parking_lot::MutexGuard<'static, ()> {
    REGISTRATION.lock()
}

/// Dependency list returned by access registration
pub(crate) type Dependencies = SmallVec<[Event; 4]>;

/// How a submission accesses a buffer
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AccessMode {
    /// Contents are read, never written
    Read,
    /// Contents are overwritten without being read
    Write,
    /// Contents are read and written
    ReadWrite,
}

impl AccessMode {
    /// Whether the access observes the previous contents
    #[inline]
    pub fn reads(self) -> bool {
        matches!(self, Self::Read | Self::ReadWrite)
    }

    /// Whether the access modifies the contents
    #[inline]
    pub fn writes(self) -> bool {
        matches!(self, Self::Write | Self::ReadWrite)
    }
}

#[derive(Default)]
struct AccessState {
    writer: Option<Event>,
    readers: SmallVec<[Event; 4]>,
}

impl AccessState {
    fn register(&mut self, mode: AccessMode, event: &Event) -> Dependencies {
        let mut deps = Dependencies::new();
        let mut push = |ev: &Event| {
            if !ev.same_as(event) && !ev.is_complete() {
                deps.push(ev.clone());
            }
        };

        if let Some(writer) = &self.writer {
            push(writer);
        }

        if mode.writes() {
            for reader in &self.readers {
                push(reader);
            }
            self.readers.clear();
            self.writer = Some(event.clone());
        } else {
            self.readers.retain(|r| !r.is_complete());
            if !self.readers.iter().any(|r| r.same_as(event)) {
                self.readers.push(event.clone());
            }
        }

        deps
    }
}

struct BufferInner<T> {
    ptr: NonNull<T>,
    len: usize,
    state: Mutex<AccessState>,
}

// SAFETY: the storage is only touched through tracked accesses, which the
// dependency protocol keeps exclusive for writers.
unsafe impl<T: Send> Send for BufferInner<T> {}
unsafe impl<T: Send + Sync> Sync for BufferInner<T> {}

impl<T> Drop for BufferInner<T> {
    fn drop(&mut self) {
        // SAFETY: ptr/len come from Box::into_raw in Buffer::from_vec.
        unsafe {
            drop(Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                self.ptr.as_ptr(),
                self.len,
            )));
        }
    }
}

/// Reference-counted host-backed storage for one element type
///
/// Clones share the same storage.
///
/// # Examples
///
/// ```
/// use blashal::runtime::Buffer;
///
/// let x = Buffer::from_slice(&[1.0f32, 2.0, 3.0]);
/// {
///     let mut w = x.host_write();
///     w[0] = 5.0;
/// }
/// assert_eq!(x.to_vec(), vec![5.0, 2.0, 3.0]);
/// ```
pub struct Buffer<T: Element> {
    inner: Arc<BufferInner<T>>,
}

impl<T: Element> Clone for Buffer<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Element> Buffer<T> {
    /// Take ownership of a vector's storage
    pub fn from_vec(data: Vec<T>) -> Self {
        let boxed = data.into_boxed_slice();
        let len = boxed.len();
        let raw = Box::into_raw(boxed) as *mut T;
        // SAFETY: Box::into_raw never returns null, even for empty slices.
        let ptr = unsafe { NonNull::new_unchecked(raw) };
        Self {
            inner: Arc::new(BufferInner {
                ptr,
                len,
                state: Mutex::new(AccessState::default()),
            }),
        }
    }

    /// Copy a slice into a new buffer
    pub fn from_slice(data: &[T]) -> Self {
        Self::from_vec(data.to_vec())
    }

    /// Buffer of `len` zero elements
    pub fn zeroed(len: usize) -> Self {
        Self::from_vec(vec![T::zeroed(); len])
    }

    /// Number of elements
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len
    }

    /// Whether the buffer holds no elements
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.len == 0
    }

    /// Whether two handles share storage
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Register an access by `event`, returning the submissions it must wait on
    ///
    /// Callers hold the registration lock.
    pub(crate) fn register(&self, mode: AccessMode, event: &Event) -> Dependencies {
        self.inner.state.lock().register(mode, event)
    }

    pub(crate) fn raw_region(&self) -> RawRegion<T> {
        RawRegion::new(self.inner.ptr.as_ptr(), self.inner.len)
    }

    fn host_access(&self, mode: AccessMode) -> Completion {
        let event = Event::new();
        let deps = {
            let _reg = registration_lock();
            self.register(mode, &event)
        };
        let completion = Completion::new(event);
        for dep in &deps {
            dep.wait();
        }
        completion
    }

    /// Blocking host-visible read of the whole buffer
    ///
    /// Waits for every submitted writer. Holding the guard delays later
    /// writers until it is dropped; do not submit work writing this buffer
    /// and then wait on it while the guard is alive.
    pub fn host_read(&self) -> HostRead<'_, T> {
        let completion = self.host_access(AccessMode::Read);
        HostRead {
            buffer: self,
            _completion: completion,
        }
    }

    /// Blocking host-visible write of the whole buffer
    ///
    /// Waits for every submitted reader and writer.
    pub fn host_write(&self) -> HostWrite<'_, T> {
        let completion = self.host_access(AccessMode::ReadWrite);
        HostWrite {
            buffer: self,
            _completion: completion,
        }
    }

    /// Copy the contents out, waiting for pending writers
    pub fn to_vec(&self) -> Vec<T> {
        self.host_read().to_vec()
    }

    /// Overwrite the contents from a slice of the same length
    pub fn copy_from_slice(&self, src: &[T]) {
        self.host_write().copy_from_slice(src);
    }
}

impl<T: Element> fmt::Debug for Buffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("dtype", &T::DTYPE)
            .field("len", &self.inner.len)
            .finish_non_exhaustive()
    }
}

/// Host read guard returned by [`Buffer::host_read`]
pub struct HostRead<'a, T: Element> {
    buffer: &'a Buffer<T>,
    _completion: Completion,
}

impl<T: Element> Deref for HostRead<'_, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        let inner = &self.buffer.inner;
        // SAFETY: every conflicting writer completed before the guard was made
        // and later writers wait for its completion.
        unsafe { std::slice::from_raw_parts(inner.ptr.as_ptr(), inner.len) }
    }
}

/// Host write guard returned by [`Buffer::host_write`]
pub struct HostWrite<'a, T: Element> {
    buffer: &'a Buffer<T>,
    _completion: Completion,
}

impl<T: Element> Deref for HostWrite<'_, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        let inner = &self.buffer.inner;
        // SAFETY: see DerefMut.
        unsafe { std::slice::from_raw_parts(inner.ptr.as_ptr(), inner.len) }
    }
}

impl<T: Element> DerefMut for HostWrite<'_, T> {
    fn deref_mut(&mut self) -> &mut [T] {
        let inner = &self.buffer.inner;
        // SAFETY: the guard is registered as the buffer's writer; every other
        // access waits on it.
        unsafe { std::slice::from_raw_parts_mut(inner.ptr.as_ptr(), inner.len) }
    }
}
