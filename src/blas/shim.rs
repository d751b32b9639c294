//! Host-side completion of native results
//!
//! Some portable routines have no exact native counterpart: the native call
//! produces a nearby result of a supported type and the host corrects it.
//! `HostFinish` makes the two phases explicit: `submit` queues the native
//! call into a one-element scratch buffer, and `complete` blocks on a host
//! read of the scratch, applies the correction and publishes it through a
//! host write of the output buffer.

use crate::dtype::Element;
use crate::error::Result;
use crate::runtime::{AccessMode, Accessor, Backend, Buffer, CommandGroup, Queue};

pub(crate) struct HostFinish<S: Element> {
    scratch: Buffer<S>,
}

impl<S: Element> HostFinish<S> {
    /// Phase one: `build` declares its accesses and a task writing the
    /// scratch accessor it is given.
    pub(crate) fn submit<B, F>(queue: &Queue<B>, routine: &'static str, build: F) -> Result<Self>
    where
        B: Backend,
        F: FnOnce(&mut CommandGroup<B>, Accessor<S>) -> Result<()>,
    {
        let scratch = Buffer::<S>::zeroed(1);
        queue.submit(routine, |cgh| {
            let out = cgh.access(&scratch, AccessMode::Write);
            build(cgh, out)
        })?;
        Ok(Self { scratch })
    }

    /// Phase two: blocks until the native result is available
    pub(crate) fn complete<O: Element>(self, output: &Buffer<O>, correct: impl FnOnce(S) -> O) {
        let native = self.scratch.host_read()[0];
        output.host_write()[0] = correct(native);
    }
}

/// 1-based native index to 0-based portable index, never negative
#[inline]
pub(crate) fn zero_based_index(native: i32) -> i64 {
    (i64::from(native) - 1).max(0)
}
