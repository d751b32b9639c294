//! Scoped access to native handles and pointers inside a task

use super::buffer::{AccessMode, Buffer};
use super::pointer::DevicePtr;
use super::traits::{Backend, MemoryStaging};
use crate::dtype::Element;
use crate::error::Result;

/// A buffer access requested by a command group
///
/// Accessors are moved into the interop task and turned into native pointers
/// there with [`InteropHandle::get_mem`].
pub struct Accessor<T: Element> {
    buffer: Buffer<T>,
    mode: AccessMode,
}

impl<T: Element> Accessor<T> {
    pub(crate) fn new(buffer: Buffer<T>, mode: AccessMode) -> Self {
        Self { buffer, mode }
    }

    /// Access mode
    #[inline]
    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    /// Number of elements in the underlying buffer
    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether the underlying buffer is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

/// Native view handed to an interop task
///
/// Only exists while the task runs; the pointers it yields must not escape.
pub struct InteropHandle<'a, B: Backend> {
    handle: &'a B::Handle,
    staging: B::Staging,
}

impl<'a, B: Backend> InteropHandle<'a, B> {
    pub(crate) fn new(handle: &'a B::Handle, staging: B::Staging) -> Self {
        Self { handle, staging }
    }

    /// The queue's native handle (stream + library handle)
    #[inline]
    pub fn native_handle(&self) -> &'a B::Handle {
        self.handle
    }

    /// Translate an access into a native pointer valid for this task
    ///
    /// Zero-length buffers yield [`DevicePtr::null`].
    pub fn get_mem<T: Element>(&mut self, accessor: &Accessor<T>) -> Result<DevicePtr<T>> {
        if accessor.is_empty() {
            return Ok(DevicePtr::null());
        }
        self.staging
            .translate(accessor.buffer.raw_region(), accessor.mode)
    }

    pub(crate) fn finish(self) -> Result<()> {
        self.staging.finish()
    }
}
